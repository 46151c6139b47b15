use mypv::error::{FetchError, MyPvError, SetupError};

#[test]
fn error_constructors_group_1() {
    assert!(matches!(MyPvError::config("x"), MyPvError::Config { .. }));
    assert!(matches!(MyPvError::io("x"), MyPvError::Io { .. }));
    assert!(matches!(MyPvError::web("x"), MyPvError::Web { .. }));
    assert!(matches!(
        MyPvError::validation("f", "m"),
        MyPvError::Validation { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    let ser = MyPvError::Serialization {
        message: "s".into(),
    };
    assert!(matches!(ser, MyPvError::Serialization { .. }));
    assert!(!ser.is_communication());

    let comm: MyPvError = FetchError::Unexpected {
        url: "https://example.invalid".into(),
        message: "bad body".into(),
    }
    .into();
    assert!(comm.is_communication());
}

#[test]
fn conversions_from_foreign_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(MyPvError::from(io), MyPvError::Io { .. }));

    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        MyPvError::from(json),
        MyPvError::Serialization { .. }
    ));
}

#[test]
fn fetch_error_keeps_url() {
    let err = FetchError::HttpStatus {
        url: "https://api.my-pv.com/api/v1/device/1/data".into(),
        status: reqwest::StatusCode::UNAUTHORIZED,
    };
    assert_eq!(err.url(), "https://api.my-pv.com/api/v1/device/1/data");
    assert!(err.to_string().contains("401"));
}

#[test]
fn setup_error_display() {
    assert_eq!(SetupError::CannotConnect.to_string(), "cannot_connect");
    assert!(SetupError::Unknown("boom".into()).to_string().contains("boom"));
}
