//! Daemon hosting the recurring batch-download scheduler.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use exn_net::BatchDownloadClient;
use exn_scheduler::{
    AuthorizationCapability, BatchDownloadScheduler, TimeWindow, TokioTaskRunner,
};

/// Authorization fed from configuration. A mobile deployment would mirror the
/// platform exposure framework's status here instead.
struct ConfigAuthorization {
    authorized: bool,
}

impl AuthorizationCapability for ConfigAuthorization {
    fn is_authorized(&self) -> bool {
        self.authorized
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = exn_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, task_id = %config.task_id, "starting exn daemon");

    let window = TimeWindow::new(
        config.window_start,
        config.window_end,
        config.slot_interval_hours,
    )?;
    let runner = Arc::new(TokioTaskRunner::new(Duration::from_secs(
        config.task_execution_allowance_secs,
    )));
    let downloads = Arc::new(BatchDownloadClient::new(
        &config.batch_download_base_url,
        config.http_timeout_secs,
    )?);
    let authorization = Arc::new(ConfigAuthorization {
        authorized: config.exposure_authorized,
    });

    let scheduler = BatchDownloadScheduler::new(
        config.task_id.clone(),
        window,
        runner,
        authorization,
        downloads,
    );
    scheduler.register().await;

    shutdown_signal().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
