use anyhow::{Context, Result};
use clap::Parser;
use kpi_dashboard::config::{Args, DashboardConfig};
use kpi_dashboard::page::Logo;
use kpi_dashboard::server::{self, AppContext};
use kpi_dashboard::Dashboard;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = DashboardConfig::from(Args::parse());

    info!("KPI dashboard starting...");
    info!("KPI source: {}", config.data_path.display());

    let dashboard = Dashboard::load(&config)
        .with_context(|| format!("failed to load KPI data from {}", config.data_path.display()))?;
    let logo = Logo::load(&config.logo_path).context("failed to load logo")?;

    let state = Arc::new(AppContext::new(dashboard, &logo));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    if config.open_browser {
        server::spawn_browser_launch(config.root_url(), Duration::from_secs(1));
    }

    server::serve(listener, state).await?;
    Ok(())
}
