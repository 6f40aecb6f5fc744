//! Error types for the Agrimarket marketplace.

use thiserror::Error;

/// A shared error type for the marketplace core and its storage backends.
///
/// The first six variants are caller-recoverable rejections raised by the
/// repository. The remaining ones describe failures of the backing store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Another farmer already uses the requested username
    #[error("Username already exists")]
    DuplicateUsername,

    /// Another farmer already registered the requested mobile number
    #[error("Mobile number already registered")]
    DuplicateMobile,

    /// No farmer matches the username/password pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password recovery was requested for an unknown username
    #[error("Username not found")]
    UsernameNotFound,

    /// At least one security answer differs from the stored one
    #[error("Security answers do not match")]
    SecurityMismatch,

    /// Password reset was requested for an unknown username
    #[error("Farmer not found")]
    FarmerNotFound,

    /// A stored value exists but cannot be parsed
    #[error("Corrupt state under key '{key}': {message}")]
    CorruptState { key: String, message: String },

    /// Backing store failure (I/O, locking)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a CorruptState error for the given store key
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorruptState {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a caller-recoverable validation rejection.
    ///
    /// These are the outcomes a front end reports back to the user verbatim.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateUsername
                | Self::DuplicateMobile
                | Self::InvalidCredentials
                | Self::UsernameNotFound
                | Self::SecurityMismatch
                | Self::FarmerNotFound
        )
    }

    /// Check if this is a CorruptState error
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, Self::CorruptState { .. })
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MarketError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MarketError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, MarketError>`.
pub type Result<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_classified() {
        assert!(MarketError::DuplicateUsername.is_rejection());
        assert!(MarketError::SecurityMismatch.is_rejection());
        assert!(!MarketError::storage("disk full").is_rejection());
        assert!(!MarketError::corrupt("farmers", "bad json").is_rejection());
    }

    #[test]
    fn test_corrupt_state_message_names_key() {
        let err = MarketError::corrupt("products", "expected value at line 1");
        assert!(err.is_corrupt_state());
        assert_eq!(
            err.to_string(),
            "Corrupt state under key 'products': expected value at line 1"
        );
    }

    #[test]
    fn test_messages_match_front_end_wording() {
        assert_eq!(
            MarketError::DuplicateUsername.to_string(),
            "Username already exists"
        );
        assert_eq!(
            MarketError::DuplicateMobile.to_string(),
            "Mobile number already registered"
        );
        assert_eq!(
            MarketError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err: MarketError = serde_json::from_str::<Vec<u32>>("not json")
            .unwrap_err()
            .into();
        assert!(err.is_serialization());
    }
}
