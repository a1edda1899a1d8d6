pub mod chart;
pub mod config;
pub mod dashboard;
pub mod descriptions;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod page;
pub mod server;
pub mod state;

pub use chart::{ChartBuilder, ChartSpec, ChartView};
pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
pub use loader::{KpiRecord, KpiTable, KpiTableLoader};
