use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use ancine_dashboard::catalog;
use ancine_dashboard::config::{DashboardConfig, CONFIG_NAME};
use ancine_dashboard::executor::SqliteConnector;
use ancine_dashboard::server::{router, AppState};

#[tokio::main]
async fn main() {
    let config = match DashboardConfig::load(CONFIG_NAME) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.to_lowercase())),
        )
        .try_init()
        .ok();

    let page = match catalog::page(&config.title) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "invalid report catalog");
            std::process::exit(1);
        }
    };
    info!(
        database = %config.database.display(),
        reports = page.reports().len(),
        concurrent = config.concurrent,
        "starting dashboard"
    );
    let state = Arc::new(AppState {
        page,
        connector: SqliteConnector::new(config.database.clone()),
        concurrent: config.concurrent,
    });
    let listener = match TcpListener::bind(&config.listen).await {
        Ok(l) => l,
        Err(e) => {
            error!(listen = %config.listen, error = %e, "cannot bind");
            std::process::exit(1);
        }
    };
    info!(listen = %config.listen, "serving /v1/page");
    if let Err(e) = axum::serve(listener, router(state)).await {
        error!(error = %e, "server stopped");
    }
}
