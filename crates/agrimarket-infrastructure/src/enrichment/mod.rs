//! Best-effort metadata enrichment.
//!
//! View and login records carry device and location details, and the
//! registration flow resolves a postal code to a city. None of this may block
//! or fail the write it accompanies. Network lookups run under a timeout and a
//! cancellation token, and any failure degrades to "Unknown" (or `None`).

mod device;
mod location;
mod postal;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use agrimarket_core::analytics::{LocationInfo, VisitorMetadata};
use agrimarket_core::config::LookupSettings;
use agrimarket_core::error::{MarketError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub use device::DeviceProbe;
pub use location::IpApiLocationLookup;
pub use postal::IndiaPostLookup;

/// City and state resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalLocation {
    pub city: String,
    pub district: String,
    pub state: String,
}

impl PostalLocation {
    /// "City, State", the form used as a product location.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

/// Errors raised inside a lookup. They never leave this module's `Enricher`.
#[derive(Debug)]
pub enum LookupError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The endpoint answered with something unusable.
    Malformed(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Http(e) => write!(f, "HTTP error: {}", e),
            LookupError::Malformed(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Http(e)
    }
}

/// Resolves the caller's network location.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn locate(&self) -> std::result::Result<LocationInfo, LookupError>;
}

/// Resolves a postal code to a city and state.
#[async_trait]
pub trait PostalLookup: Send + Sync {
    /// `Ok(None)` for malformed or unknown codes.
    async fn resolve(&self, pin: &str) -> std::result::Result<Option<PostalLocation>, LookupError>;
}

/// True for exactly six ASCII digits.
pub fn is_postal_code(pin: &str) -> bool {
    pin.len() == 6 && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Runs `fut` under `timeout` and `cancel`, turning every failure into `None`.
async fn bounded<T, F>(what: &str, timeout: Duration, cancel: &CancellationToken, fut: F) -> Option<T>
where
    F: Future<Output = std::result::Result<T, LookupError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => {
            warn!(lookup = what, "Lookup cancelled");
            None
        }
        outcome = tokio::time::timeout(timeout, fut) => match outcome {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(lookup = what, error = %e, "Lookup failed");
                None
            }
            Err(_) => {
                warn!(lookup = what, timeout_ms = timeout.as_millis() as u64, "Lookup timed out");
                None
            }
        }
    }
}

/// Collects visitor metadata and resolves postal codes, best effort.
#[derive(Clone)]
pub struct Enricher {
    device: DeviceProbe,
    location: Option<Arc<dyn LocationLookup>>,
    postal: Option<Arc<dyn PostalLookup>>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(
        device: DeviceProbe,
        location: Arc<dyn LocationLookup>,
        postal: Arc<dyn PostalLookup>,
        timeout: Duration,
    ) -> Self {
        Self {
            device,
            location: Some(location),
            postal: Some(postal),
            timeout,
        }
    }

    /// An enricher that never touches the network.
    pub fn offline(device: DeviceProbe) -> Self {
        Self {
            device,
            location: None,
            postal: None,
            timeout: Duration::ZERO,
        }
    }

    /// Builds HTTP lookups from configuration, or an offline enricher when
    /// lookups are disabled.
    pub fn from_settings(settings: &LookupSettings, device: DeviceProbe) -> Result<Self> {
        if !settings.enabled {
            return Ok(Self::offline(device));
        }

        let timeout = Duration::from_millis(settings.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            device,
            Arc::new(IpApiLocationLookup::new(
                client.clone(),
                settings.geolocation_url.clone(),
            )),
            Arc::new(IndiaPostLookup::new(client, settings.postal_url.clone())),
            timeout,
        ))
    }

    pub fn is_offline(&self) -> bool {
        self.location.is_none() && self.postal.is_none()
    }

    /// Device and location details for a view or login record.
    ///
    /// Never fails; missing pieces are "Unknown".
    pub async fn collect(&self, cancel: &CancellationToken) -> VisitorMetadata {
        let device = self.device.probe();
        let location = match &self.location {
            Some(lookup) => bounded("geolocation", self.timeout, cancel, lookup.locate())
                .await
                .unwrap_or_else(LocationInfo::unknown),
            None => LocationInfo::unknown(),
        };
        VisitorMetadata::new(device, location)
    }

    /// City/state for a postal code, or `None` on any failure.
    pub async fn resolve_pin(&self, pin: &str, cancel: &CancellationToken) -> Option<PostalLocation> {
        let pin = pin.trim();
        if !is_postal_code(pin) {
            return None;
        }
        let lookup = self.postal.as_ref()?;
        bounded("postal", self.timeout, cancel, lookup.resolve(pin))
            .await
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrimarket_core::analytics::UNKNOWN;

    struct FixedLocation;

    #[async_trait]
    impl LocationLookup for FixedLocation {
        async fn locate(&self) -> std::result::Result<LocationInfo, LookupError> {
            Ok(LocationInfo {
                ip: "203.0.113.9".to_string(),
                city: "Nagpur".to_string(),
                region: "Maharashtra".to_string(),
                country: "India".to_string(),
            })
        }
    }

    struct SlowLocation;

    #[async_trait]
    impl LocationLookup for SlowLocation {
        async fn locate(&self) -> std::result::Result<LocationInfo, LookupError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(LocationInfo::unknown())
        }
    }

    struct BrokenLocation;

    #[async_trait]
    impl LocationLookup for BrokenLocation {
        async fn locate(&self) -> std::result::Result<LocationInfo, LookupError> {
            Err(LookupError::Malformed("rate limited".to_string()))
        }
    }

    struct FixedPostal;

    #[async_trait]
    impl PostalLookup for FixedPostal {
        async fn resolve(
            &self,
            pin: &str,
        ) -> std::result::Result<Option<PostalLocation>, LookupError> {
            if pin == "440001" {
                Ok(Some(PostalLocation {
                    city: "Nagpur".to_string(),
                    district: "Nagpur".to_string(),
                    state: "Maharashtra".to_string(),
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn probe() -> DeviceProbe {
        DeviceProbe::new("agrimarket", "test")
    }

    fn enricher(location: Arc<dyn LocationLookup>, timeout: Duration) -> Enricher {
        Enricher::new(probe(), location, Arc::new(FixedPostal), timeout)
    }

    #[tokio::test]
    async fn test_collect_uses_lookup_result() {
        let enricher = enricher(Arc::new(FixedLocation), Duration::from_secs(1));
        let metadata = enricher.collect(&CancellationToken::new()).await;

        assert_eq!(metadata.location.city, "Nagpur");
        assert_eq!(metadata.viewer_id(), "203.0.113.9");
        assert_eq!(metadata.device.browser_name, "agrimarket");
    }

    #[tokio::test]
    async fn test_slow_lookup_times_out_to_unknown() {
        let enricher = enricher(Arc::new(SlowLocation), Duration::from_millis(20));
        let metadata = enricher.collect(&CancellationToken::new()).await;

        assert_eq!(metadata.location, LocationInfo::unknown());
        // device details are still present
        assert_eq!(metadata.device.browser_version, "test");
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_unknown() {
        let enricher = enricher(Arc::new(BrokenLocation), Duration::from_secs(1));
        let metadata = enricher.collect(&CancellationToken::new()).await;
        assert_eq!(metadata.location.ip, UNKNOWN);
    }

    #[tokio::test]
    async fn test_cancelled_lookup_degrades_to_unknown() {
        let enricher = enricher(Arc::new(SlowLocation), Duration::from_secs(10));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let metadata = enricher.collect(&cancel).await;
        assert!(metadata.location.is_unknown());
    }

    #[tokio::test]
    async fn test_offline_enricher() {
        let enricher = Enricher::offline(probe());
        assert!(enricher.is_offline());

        let cancel = CancellationToken::new();
        assert!(enricher.collect(&cancel).await.location.is_unknown());
        assert_eq!(enricher.resolve_pin("440001", &cancel).await, None);
    }

    #[tokio::test]
    async fn test_resolve_pin() {
        let enricher = enricher(Arc::new(FixedLocation), Duration::from_secs(1));
        let cancel = CancellationToken::new();

        let location = enricher.resolve_pin(" 440001 ", &cancel).await.unwrap();
        assert_eq!(location.display_name(), "Nagpur, Maharashtra");

        assert_eq!(enricher.resolve_pin("999999", &cancel).await, None);
        assert_eq!(enricher.resolve_pin("44000", &cancel).await, None);
    }

    #[test]
    fn test_from_settings_respects_disabled() {
        let settings = LookupSettings {
            enabled: false,
            ..LookupSettings::default()
        };
        assert!(Enricher::from_settings(&settings, probe()).unwrap().is_offline());
    }

    #[test]
    fn test_is_postal_code() {
        assert!(is_postal_code("411001"));
        assert!(!is_postal_code("41100"));
        assert!(!is_postal_code("4110011"));
        assert!(!is_postal_code("41a001"));
    }
}
