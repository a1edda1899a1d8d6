//! HTTP surface for the dashboard
//!
//! Routes:
//!   GET  /            - dashboard page
//!   GET  /api/health  - health check
//!   GET  /api/init    - initial selection, options and chart
//!   POST /api/event   - apply one UI event to the caller's selection state
//!
//! The server holds no per-session state. The page sends its current
//! `SelectionState` with every event and receives the next one back.

use crate::chart::ChartView;
use crate::dashboard::Dashboard;
use crate::page::{render_page, Logo};
use crate::state::{SelectionState, ThemeClass, Transition, UiEvent};
use axum::{
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Everything a request needs; immutable after startup
pub struct AppContext {
    pub dashboard: Dashboard,
    page: String,
}

impl AppContext {
    pub fn new(dashboard: Dashboard, logo: &Logo) -> Self {
        Self {
            dashboard,
            page: render_page(logo),
        }
    }
}

pub type AppState = Arc<AppContext>;

#[derive(Debug, Serialize)]
pub struct InitResponse {
    pub state: SelectionState,
    pub groups: Vec<String>,
    pub kpi_options: Vec<String>,
    pub chart: ChartView,
    pub theme: ThemeClass,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub state: SelectionState,
    pub event: UiEvent,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/init", get(init))
        .route("/api/event", post(event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.clone())
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "kpi-dashboard"}))
}

async fn init(State(state): State<AppState>) -> Json<InitResponse> {
    let dashboard = &state.dashboard;
    let selection = dashboard.initial_state();

    Json(InitResponse {
        groups: dashboard.groups().to_vec(),
        kpi_options: dashboard.kpi_options(selection.group.as_deref()).to_vec(),
        chart: dashboard.chart(selection.kpi.as_deref()),
        theme: ThemeClass::from_flag(selection.dark_mode),
        state: selection,
    })
}

async fn event(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Json<Transition> {
    Json(state.dashboard.apply(&request.state, request.event))
}

/// Serve until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("KPI dashboard listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Open `url` in the default browser after `delay`. Failures are only logged.
pub fn spawn_browser_launch(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let target = url.clone();
        match tokio::task::spawn_blocking(move || open::that(&target)).await {
            Ok(Ok(())) => info!("Opened {} in the browser", url),
            Ok(Err(e)) => warn!("Could not open browser at {}: {}", url, e),
            Err(e) => warn!("Browser launch task failed: {}", e),
        }
    })
}
