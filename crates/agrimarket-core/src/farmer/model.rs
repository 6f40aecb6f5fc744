//! Farmer domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Security questions offered at registration, keyed the way they are stored.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SecurityQuestion {
    Mother,
    Pet,
    School,
    Village,
    Color,
    Food,
    City,
    Teacher,
}

impl SecurityQuestion {
    /// The question as shown to the farmer.
    pub fn prompt(&self) -> &'static str {
        match self {
            SecurityQuestion::Mother => "What is your mother's maiden name?",
            SecurityQuestion::Pet => "What was your first pet's name?",
            SecurityQuestion::School => "What is your primary school name?",
            SecurityQuestion::Village => "What is your native village/town?",
            SecurityQuestion::Color => "What is your favorite color?",
            SecurityQuestion::Food => "What is your favorite food crop?",
            SecurityQuestion::City => "In which city were you born?",
            SecurityQuestion::Teacher => "Who was your favorite teacher?",
        }
    }
}

/// Registration payload for a new farmer account.
///
/// Carries every farmer field except the ones the repository assigns
/// (`id` and `createdAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFarmer {
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub aadhaar: String,
    pub username: String,
    pub password: String,
    pub security_q1: SecurityQuestion,
    pub security_a1: String,
    pub security_q2: SecurityQuestion,
    pub security_a2: String,
}

impl NewFarmer {
    /// Creates a registration payload with the required fields.
    ///
    /// Contact and location fields start empty; fill them with the `with_*`
    /// helpers.
    pub fn new(
        name: impl Into<String>,
        mobile: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        first: (SecurityQuestion, impl Into<String>),
        second: (SecurityQuestion, impl Into<String>),
    ) -> Self {
        Self {
            name: name.into(),
            mobile: mobile.into(),
            email: String::new(),
            country: String::new(),
            pin: String::new(),
            city: String::new(),
            state: String::new(),
            aadhaar: String::new(),
            username: username.into(),
            password: password.into(),
            security_q1: first.0,
            security_a1: first.1.into(),
            security_q2: second.0,
            security_a2: second.1.into(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets country, postal code and the city/state resolved from it.
    pub fn with_location(
        mut self,
        country: impl Into<String>,
        pin: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.country = country.into();
        self.pin = pin.into();
        self.city = city.into();
        self.state = state.into();
        self
    }

    pub fn with_aadhaar(mut self, aadhaar: impl Into<String>) -> Self {
        self.aadhaar = aadhaar.into();
        self
    }
}

/// A registered seller account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    /// Unique identifier (millisecond timestamp, monotonic per collection)
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub aadhaar: String,
    pub username: String,
    /// Stored and compared verbatim.
    pub password: String,
    pub security_q1: SecurityQuestion,
    pub security_a1: String,
    pub security_q2: SecurityQuestion,
    pub security_a2: String,
    pub created_at: DateTime<Utc>,
}

impl Farmer {
    /// Builds the stored record from a registration payload.
    pub fn from_registration(id: String, data: NewFarmer, created_at: DateTime<Utc>) -> Self {
        let NewFarmer {
            name,
            mobile,
            email,
            country,
            pin,
            city,
            state,
            aadhaar,
            username,
            password,
            security_q1,
            security_a1,
            security_q2,
            security_a2,
        } = data;

        Self {
            id,
            name,
            mobile,
            email,
            country,
            pin,
            city,
            state,
            aadhaar,
            username,
            password,
            security_q1,
            security_a1,
            security_q2,
            security_a2,
            created_at,
        }
    }

    /// Compares both answers case-insensitively against the stored ones.
    pub fn answers_match(&self, a1: &str, a2: &str) -> bool {
        self.security_a1.to_lowercase() == a1.to_lowercase()
            && self.security_a2.to_lowercase() == a2.to_lowercase()
    }

    /// Mobile number with the middle digits hidden, for public listings.
    pub fn masked_mobile(&self) -> String {
        mask_mobile(&self.mobile)
    }
}

/// The reduced identity of the logged-in farmer.
///
/// Never carries the password or the security answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProjection {
    pub id: String,
    pub name: String,
    pub username: String,
    pub mobile: String,
}

impl From<&Farmer> for SessionProjection {
    fn from(farmer: &Farmer) -> Self {
        Self {
            id: farmer.id.clone(),
            name: farmer.name.clone(),
            username: farmer.username.clone(),
            mobile: farmer.mobile.clone(),
        }
    }
}

/// Hides all but the first two and last two characters of a mobile number.
///
/// Numbers shorter than ten characters are returned unchanged.
pub fn mask_mobile(mobile: &str) -> String {
    let chars: Vec<char> = mobile.chars().collect();
    if chars.len() < 10 {
        return mobile.to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}XXXXXX{}", head, tail)
}
