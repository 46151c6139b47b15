//! One-shot credential check before a device is brought up

use crate::api::{ApiClient, MyPvClient};
use crate::config::ApiConfig;
use crate::device::DeviceIdentity;
use crate::error::SetupError;
use crate::logging::get_logger;
use serde::Serialize;

/// Outcome of a successful setup validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupInfo {
    pub title: String,
}

/// Validate `identity` against the API with a single device-data request
pub async fn validate_input(
    identity: &DeviceIdentity,
    api: &ApiConfig,
) -> Result<SetupInfo, SetupError> {
    let client = MyPvClient::new(identity.clone(), api).map_err(|e| {
        get_logger("setup").error(&format!("Unexpected exception: {}", e));
        SetupError::Unknown(e.to_string())
    })?;
    validate_with(identity, &client).await
}

/// Same as [`validate_input`] against an already built client
pub async fn validate_with(
    identity: &DeviceIdentity,
    client: &dyn ApiClient,
) -> Result<SetupInfo, SetupError> {
    if !client.validate_connection().await {
        return Err(SetupError::CannotConnect);
    }
    Ok(SetupInfo {
        title: identity.title(),
    })
}
