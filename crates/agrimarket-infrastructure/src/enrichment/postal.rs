//! Postal code (PIN) to city/state lookup over HTTP.

use async_trait::async_trait;
use tracing::debug;

use super::{LookupError, PostalLocation, PostalLookup, is_postal_code};
use crate::dto::PostalResponse;

/// Resolves Indian 6-digit PIN codes against a postalpincode-style endpoint.
pub struct IndiaPostLookup {
    client: reqwest::Client,
    base_url: String,
}

impl IndiaPostLookup {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, pin: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), pin)
    }
}

#[async_trait]
impl PostalLookup for IndiaPostLookup {
    async fn resolve(&self, pin: &str) -> Result<Option<PostalLocation>, LookupError> {
        if !is_postal_code(pin) {
            return Ok(None);
        }

        let url = self.url_for(pin);
        let responses: Vec<PostalResponse> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let first = responses
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::Malformed("empty response array".to_string()))?;
        let location = first.into_location();
        debug!(pin, found = location.is_some(), "Postal lookup finished");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_code() {
        let lookup = IndiaPostLookup::new(reqwest::Client::new(), "https://example.test/pincode/");
        assert_eq!(lookup.url_for("411001"), "https://example.test/pincode/411001");
    }

    #[tokio::test]
    async fn test_malformed_code_skips_network() {
        // Unroutable base URL: any request would fail, so Ok(None) proves none was made.
        let lookup = IndiaPostLookup::new(reqwest::Client::new(), "http://127.0.0.1:9");
        assert_eq!(lookup.resolve("4110").await.unwrap(), None);
        assert_eq!(lookup.resolve("41100A").await.unwrap(), None);
    }
}
