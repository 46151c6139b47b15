use anyhow::Result;
use mypv::config::Config;
use mypv::driver::MyPvDriver;
use mypv::setup::validate_input;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    mypv::logging::init_logging(&config.logging)?;
    config.validate()?;

    info!("mypv {} starting up", env!("CARGO_PKG_VERSION"));

    let setup = validate_input(&config.identity(), &config.api)
        .await
        .map_err(|e| anyhow::anyhow!("Setup failed: {}", e))?;
    info!("Configured {}", setup.title);

    let driver = Arc::new(MyPvDriver::new(&config)?);
    if let Err(e) = driver.first_refresh().await {
        warn!("Initial refresh incomplete, pollers will retry: {}", e);
    }
    let handle = driver.start();

    #[cfg(feature = "web")]
    let web_task = if config.web.enabled {
        let state = mypv::web::AppState {
            driver: Arc::clone(&driver),
            config: Arc::new(config.clone()),
        };
        let host = config.web.host.clone();
        let port = config.web.port;
        Some(tokio::spawn(async move {
            if let Err(e) = mypv::web::serve(state, &host, port).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        None
    };
    #[cfg(not(feature = "web"))]
    let web_task: Option<tokio::task::JoinHandle<()>> = None;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");

    if let Some(task) = web_task {
        task.abort();
    }
    handle.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}
