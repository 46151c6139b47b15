#![cfg(test)]

use super::config::*;

fn valid() -> Config {
    let mut config = Config::default();
    config.device.serial = "2001003".to_string();
    config.device.api_key = "key".to_string();
    config
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.polling.data_seconds, 30);
    assert_eq!(config.polling.soc_seconds, 300);
    assert_eq!(config.polling.forecast_seconds, 3600);
    assert!(config.web.enabled);
    assert_eq!(config.web.port, 8089);
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_err());

    let mut config = valid();
    assert!(config.validate().is_ok());

    config.api.base_url = "ftp://api.my-pv.com".to_string();
    assert!(config.validate().is_err());

    config = valid();
    config.api.timeout_seconds = 0;
    assert!(config.validate().is_err());

    config = valid();
    config.polling.soc_seconds = 0;
    assert!(config.validate().is_err());

    config = valid();
    config.web.port = 0;
    assert!(config.validate().is_err());
    config.web.enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = valid();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let deserialized: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.device.serial, deserialized.device.serial);
    assert_eq!(config.polling.forecast_seconds, deserialized.polling.forecast_seconds);
}

#[test]
fn test_partial_yaml_uses_defaults() {
    let config: Config = serde_yaml::from_str("device:\n  serial: \"42\"\n").unwrap();
    assert_eq!(config.device.serial, "42");
    assert!(config.device.api_key.is_empty());
    assert_eq!(config.polling.data_seconds, 30);
}

#[test]
fn test_env_overrides() {
    let mut config = Config::default();
    config.apply_env_overrides(|name| match name {
        "MYPV_SERIAL" => Some(" 77 ".to_string()),
        "MYPV_API_KEY" => Some(String::new()),
        _ => None,
    });
    assert_eq!(config.device.serial, "77");
    assert!(config.device.api_key.is_empty());
}

#[test]
fn test_redacted_masks_key() {
    let config = valid().redacted();
    assert_eq!(config.device.api_key, "***");
    assert_eq!(config.device.serial, "2001003");
}
