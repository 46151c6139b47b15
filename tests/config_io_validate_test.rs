use mypv::config::Config;
use std::fs;

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.device.serial = "2001003".to_string();
    cfg.device.api_key = "secret".to_string();
    cfg.polling.soc_seconds = 120;
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.device.serial, "2001003");
    assert_eq!(loaded.device.api_key, "secret");
    assert_eq!(loaded.polling.soc_seconds, 120);
    assert_eq!(loaded.logging.file, cfg.logging.file);
    assert!(loaded.validate().is_ok());
}

#[test]
fn config_validation_errors() {
    let valid = || {
        let mut cfg = Config::default();
        cfg.device.serial = "1".to_string();
        cfg.device.api_key = "k".to_string();
        cfg
    };

    // Missing credentials
    let mut cfg = valid();
    cfg.device.serial.clear();
    assert!(cfg.validate().is_err());

    cfg = valid();
    cfg.device.api_key = "   ".to_string();
    assert!(cfg.validate().is_err());

    // Relative base URL
    cfg = valid();
    cfg.api.base_url = "/api/v1".to_string();
    let msg = cfg.validate().unwrap_err().to_string();
    assert!(msg.contains("api.base_url"));

    // Poll interval zero
    cfg = valid();
    cfg.polling.forecast_seconds = 0;
    let msg = cfg.validate().unwrap_err().to_string();
    assert!(msg.contains("polling.forecast_seconds"));
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}

#[test]
fn from_missing_file_is_io_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(tmp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, mypv::MyPvError::Io { .. }));
}
