//! Device identity and attribution

use serde::Serialize;
use std::fmt;

/// Display name prefix used for the device and its setup title
pub const PRODUCT_NAME: &str = "myPV AC THOR";

/// Manufacturer reported for every device
pub const MANUFACTURER: &str = "myPV";

/// Model reported until the device-data snapshot names one
pub const FALLBACK_MODEL: &str = "myPV Device";

/// Serial and API key of one configured device. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    serial: String,
    api_key: String,
}

impl DeviceIdentity {
    pub fn new(serial: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            api_key: api_key.into(),
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Title shown once setup succeeds
    pub fn title(&self) -> String {
        format!("{} {}", PRODUCT_NAME, self.serial)
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentity")
            .field("serial", &self.serial)
            .field("api_key", &"***")
            .finish()
    }
}

/// Device attribution attached to every sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    /// Build attribution for `serial`; an absent or empty model falls back
    /// to [`FALLBACK_MODEL`]
    pub fn new(serial: &str, model: Option<&str>) -> Self {
        let model = model
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MODEL)
            .to_string();
        Self {
            identifier: serial.to_string(),
            name: format!("{} {}", PRODUCT_NAME, serial),
            manufacturer: MANUFACTURER.to_string(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let identity = DeviceIdentity::new("2001003", "secret-key");
        let rendered = format!("{:?}", identity);
        assert!(rendered.contains("2001003"));
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn device_info_model_fallback() {
        assert_eq!(DeviceInfo::new("1", None).model, "myPV Device");
        assert_eq!(DeviceInfo::new("1", Some("")).model, "myPV Device");
        let info = DeviceInfo::new("1", Some("AC ELWA 2"));
        assert_eq!(info.model, "AC ELWA 2");
        assert_eq!(info.name, "myPV AC THOR 1");
        assert_eq!(info.manufacturer, "myPV");
    }
}
