//! Analytics records: product views, logins and dashboard totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for any metadata field that could not be determined.
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Best-effort description of the client device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default = "unknown")]
    pub device_type: String,
    #[serde(default = "unknown")]
    pub os_name: String,
    #[serde(default = "unknown")]
    pub os_version: String,
    #[serde(default = "unknown")]
    pub browser_name: String,
    #[serde(default = "unknown")]
    pub browser_version: String,
    #[serde(default = "unknown")]
    pub screen_resolution: String,
}

impl DeviceInfo {
    pub fn unknown() -> Self {
        Self {
            device_type: unknown(),
            os_name: unknown(),
            os_version: unknown(),
            browser_name: unknown(),
            browser_version: unknown(),
            screen_resolution: unknown(),
        }
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Best-effort network location of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    /// Doubles as the viewer identifier for unique-viewer counts.
    #[serde(default = "unknown")]
    pub ip: String,
    #[serde(default = "unknown")]
    pub city: String,
    #[serde(default = "unknown")]
    pub region: String,
    #[serde(default = "unknown")]
    pub country: String,
}

impl LocationInfo {
    pub fn unknown() -> Self {
        Self {
            ip: unknown(),
            city: unknown(),
            region: unknown(),
            country: unknown(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.ip == UNKNOWN
    }
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Device and location details attached to view and login records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorMetadata {
    #[serde(flatten)]
    pub device: DeviceInfo,
    #[serde(flatten)]
    pub location: LocationInfo,
}

impl VisitorMetadata {
    pub fn new(device: DeviceInfo, location: LocationInfo) -> Self {
        Self { device, location }
    }

    /// Metadata with every field set to the placeholder.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Identifier used to tell viewers apart.
    pub fn viewer_id(&self) -> &str {
        &self.location.ip
    }
}

/// One opening of a product detail. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub id: String,
    pub product_id: String,
    #[serde(flatten)]
    pub metadata: VisitorMetadata,
    pub viewed_at: DateTime<Utc>,
}

/// One successful farmer login. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub id: String,
    pub farmer_id: String,
    #[serde(flatten)]
    pub metadata: VisitorMetadata,
    pub login_time: DateTime<Utc>,
}

/// Totals shown on a farmer's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_views: u64,
    pub total_inquiries: u64,
    pub unique_viewers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_record_is_flat() {
        let record = ViewRecord {
            id: "1".to_string(),
            product_id: "p1".to_string(),
            metadata: VisitorMetadata::new(
                DeviceInfo {
                    device_type: "desktop".to_string(),
                    ..DeviceInfo::unknown()
                },
                LocationInfo {
                    ip: "203.0.113.7".to_string(),
                    ..LocationInfo::unknown()
                },
            ),
            viewed_at: Utc::now(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["productId"], "p1");
        assert_eq!(value["deviceType"], "desktop");
        assert_eq!(value["ip"], "203.0.113.7");
        assert_eq!(value["country"], UNKNOWN);

        let back: ViewRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_metadata_fields_default_to_unknown() {
        let json = r#"{"id":"1","farmerId":"f1","ip":"10.0.0.1","loginTime":"2024-01-01T00:00:00Z"}"#;
        let record: LoginRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.metadata.location.ip, "10.0.0.1");
        assert_eq!(record.metadata.location.region, UNKNOWN);
        assert_eq!(record.metadata.device.os_name, UNKNOWN);
    }

    #[test]
    fn test_unknown_location() {
        assert!(LocationInfo::unknown().is_unknown());
        assert_eq!(VisitorMetadata::unknown().viewer_id(), UNKNOWN);
    }
}
