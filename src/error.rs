use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("KPI source not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Required column '{}' is missing{}", .column, suggestion_suffix(.suggestion))]
    MissingColumn {
        column: String,
        suggestion: Option<String>,
    },

    #[error("Unsupported KPI source format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Polars error: {0}")]
    Polars(String),

    #[error("Asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl From<polars::prelude::PolarsError> for DashboardError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        DashboardError::Polars(err.to_string())
    }
}

impl From<calamine::Error> for DashboardError {
    fn from(err: calamine::Error) -> Self {
        DashboardError::Spreadsheet(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
