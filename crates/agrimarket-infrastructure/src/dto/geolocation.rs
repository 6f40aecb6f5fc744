//! IP geolocation response DTO (ipapi.co shape).

use agrimarket_core::analytics::{LocationInfo, UNKNOWN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeolocationResponse {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<GeolocationResponse> for LocationInfo {
    fn from(dto: GeolocationResponse) -> Self {
        LocationInfo {
            ip: or_unknown(dto.ip),
            city: or_unknown(dto.city),
            region: or_unknown(dto.region),
            country: or_unknown(dto.country_name),
        }
    }
}
