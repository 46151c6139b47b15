//! Per-device composition root
//!
//! A [`MyPvDriver`] owns one API client and one poller per [`Category`].
//! Nothing is looked up globally: the web adapter and the binary receive an
//! `Arc<MyPvDriver>` and read sensors through it.

use crate::api::{ApiClient, Category, MyPvClient};
use crate::config::{Config, PollingConfig};
use crate::device::DeviceInfo;
use crate::error::{MyPvError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::poller::{Poller, PollerStatus};
use crate::projector::{SensorValue, project};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One configured device with its three pollers
pub struct MyPvDriver {
    client: Arc<dyn ApiClient>,
    pollers: [Arc<Poller>; 3],
    logger: StructuredLogger,
}

impl MyPvDriver {
    /// Validate `config` and build a driver talking to the myPV cloud
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = MyPvClient::new(config.identity(), &config.api)?;
        Ok(Self::with_client(Arc::new(client), &config.polling))
    }

    /// Build a driver around any [`ApiClient`]
    pub fn with_client(client: Arc<dyn ApiClient>, polling: &PollingConfig) -> Self {
        let poller = |category| {
            Arc::new(Poller::new(
                category,
                interval_for(polling, category),
                Arc::clone(&client),
            ))
        };
        let pollers = Category::ALL.map(poller);
        let logger = get_logger_with_context(LogContext::new("driver").with_serial(client.serial()));
        Self {
            client,
            pollers,
            logger,
        }
    }

    pub fn serial(&self) -> &str {
        self.client.serial()
    }

    pub fn client(&self) -> &Arc<dyn ApiClient> {
        &self.client
    }

    pub fn poller(&self, category: Category) -> &Arc<Poller> {
        &self.pollers[slot(category)]
    }

    pub fn pollers(&self) -> impl Iterator<Item = &Arc<Poller>> {
        self.pollers.iter()
    }

    /// Refresh every category once, in order.
    ///
    /// Fails with the first error after all categories were attempted.
    pub async fn first_refresh(&self) -> Result<()> {
        let mut first_error: Option<MyPvError> = None;
        for poller in &self.pollers {
            if let Err(e) = poller.refresh().await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Sensors of one category; empty while its poller is idle
    pub fn sensors_for(&self, category: Category) -> Vec<SensorValue> {
        self.poller(category)
            .snapshot()
            .map(|snapshot| project(&snapshot, self.serial()))
            .unwrap_or_default()
    }

    /// Sensors of all categories
    pub fn sensors(&self) -> Vec<SensorValue> {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.sensors_for(category))
            .collect()
    }

    /// Attribution taken from the latest device-data snapshot
    pub fn device_info(&self) -> DeviceInfo {
        let snapshot = self.poller(Category::Data).snapshot();
        DeviceInfo::new(
            self.serial(),
            snapshot.as_deref().and_then(|s| s.device_model()),
        )
    }

    pub fn statuses(&self) -> Vec<PollerStatus> {
        self.pollers.iter().map(|p| p.status()).collect()
    }

    /// Spawn one polling task per category
    pub fn start(self: &Arc<Self>) -> DriverHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tasks = self
            .pollers
            .iter()
            .map(|poller| {
                let poller = Arc::clone(poller);
                let shutdown = shutdown_rx.clone();
                tokio::spawn(async move { poller.run(shutdown).await })
            })
            .collect();
        self.logger.info("Driver started");
        DriverHandle {
            shutdown_tx,
            tasks,
            logger: self.logger.clone(),
        }
    }
}

/// Running polling tasks of a driver
pub struct DriverHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    logger: StructuredLogger,
}

impl DriverHandle {
    /// Stop every poller and wait for its task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                self.logger.error(&format!("Poller task failed: {}", e));
            }
        }
        self.logger.info("Driver stopped");
    }
}

fn slot(category: Category) -> usize {
    match category {
        Category::Data => 0,
        Category::Soc => 1,
        Category::Forecast => 2,
    }
}

fn interval_for(polling: &PollingConfig, category: Category) -> Duration {
    let seconds = match category {
        Category::Data => polling.data_seconds,
        Category::Soc => polling.soc_seconds,
        Category::Forecast => polling.forecast_seconds,
    };
    Duration::from_secs(seconds)
}
