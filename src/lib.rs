//! # mypv - cloud poller for myPV AC THOR solar diverters
//!
//! Polls the myPV cloud REST API for one device, keeps the latest snapshot
//! of each data category and projects it into named sensor values with
//! units and display metadata.
//!
//! ## Features
//!
//! - **Independent pollers**: device data, state of charge and solar forecast
//!   each refresh on their own interval
//! - **Stale-data tolerance**: a failed fetch keeps the previous snapshot
//! - **Sensor metadata**: static descriptor table with scaling and labels
//! - **Web Interface**: JSON endpoints for sensors and poller status
//! - **Configuration**: YAML-based configuration with validation
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `api`: HTTP client for the myPV cloud
//! - `flatten`, `descriptor`, `transform`: payload to reading pipeline
//! - `snapshot`, `poller`: fetch-and-hold per category
//! - `projector`: readings to sensor values
//! - `driver`: per-device composition root
//! - `setup`: one-shot credential validation
//! - `web`: HTTP adapter

pub mod api;
pub mod config;
pub mod descriptor;
pub mod device;
pub mod driver;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod poller;
pub mod projector;
pub mod setup;
pub mod snapshot;
pub mod transform;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod config_tests;

// Re-export commonly used types
pub use api::{ApiClient, Category, MyPvClient};
pub use config::Config;
pub use driver::{DriverHandle, MyPvDriver};
pub use error::{FetchError, MyPvError, Result, SetupError};
pub use projector::SensorValue;
