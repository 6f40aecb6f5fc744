//! Local device probe.

use agrimarket_core::analytics::{DeviceInfo, UNKNOWN};

/// Describes the machine running the client. Purely local; never fails.
#[derive(Debug, Clone)]
pub struct DeviceProbe {
    client_name: String,
    client_version: String,
}

impl DeviceProbe {
    /// `client_name`/`client_version` fill the browser fields of the record.
    pub fn new(client_name: impl Into<String>, client_version: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            client_version: client_version.into(),
        }
    }

    pub fn probe(&self) -> DeviceInfo {
        DeviceInfo {
            device_type: "desktop".to_string(),
            os_name: os_display_name(std::env::consts::OS),
            os_version: UNKNOWN.to_string(),
            browser_name: self.client_name.clone(),
            browser_version: self.client_version.clone(),
            screen_resolution: terminal_size(
                std::env::var("COLUMNS").ok(),
                std::env::var("LINES").ok(),
            ),
        }
    }
}

fn os_display_name(os: &str) -> String {
    match os {
        "linux" => "Linux".to_string(),
        "macos" => "macOS".to_string(),
        "windows" => "Windows".to_string(),
        "android" => "Android".to_string(),
        "ios" => "iOS".to_string(),
        "" => UNKNOWN.to_string(),
        other => other.to_string(),
    }
}

/// `<columns>x<lines>` when both are known positive integers.
fn terminal_size(columns: Option<String>, lines: Option<String>) -> String {
    let parse = |v: Option<String>| v.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n > 0);
    match (parse(columns), parse(lines)) {
        (Some(w), Some(h)) => format!("{}x{}", w, h),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_fills_client_fields() {
        let info = DeviceProbe::new("agrimarket", "0.1.0").probe();
        assert_eq!(info.browser_name, "agrimarket");
        assert_eq!(info.browser_version, "0.1.0");
        assert_eq!(info.device_type, "desktop");
        assert!(!info.os_name.is_empty());
    }

    #[test]
    fn test_os_display_name() {
        assert_eq!(os_display_name("linux"), "Linux");
        assert_eq!(os_display_name("freebsd"), "freebsd");
        assert_eq!(os_display_name(""), UNKNOWN);
    }

    #[test]
    fn test_terminal_size() {
        assert_eq!(
            terminal_size(Some("120".to_string()), Some("40".to_string())),
            "120x40"
        );
        assert_eq!(terminal_size(Some("120".to_string()), None), UNKNOWN);
        assert_eq!(
            terminal_size(Some("wide".to_string()), Some("40".to_string())),
            UNKNOWN
        );
    }
}
