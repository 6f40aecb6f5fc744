//! IP geolocation over HTTP.

use agrimarket_core::analytics::LocationInfo;
use async_trait::async_trait;
use tracing::debug;

use super::{LocationLookup, LookupError};
use crate::dto::GeolocationResponse;

/// Looks up the caller's public IP location from an ipapi-style endpoint.
pub struct IpApiLocationLookup {
    client: reqwest::Client,
    url: String,
}

impl IpApiLocationLookup {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationLookup for IpApiLocationLookup {
    async fn locate(&self) -> Result<LocationInfo, LookupError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let dto: GeolocationResponse = response.json().await?;
        debug!(url = %self.url, "Geolocation lookup succeeded");
        Ok(dto.into())
    }
}
