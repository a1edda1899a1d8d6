//! Command-line / environment configuration

use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "kpi-dashboard")]
#[command(about = "Interactive dashboard comparing KPI scenarios")]
pub struct Args {
    /// Spreadsheet (xlsx/xls/ods) or CSV export holding the KPI table
    #[arg(long, env = "KPI_DATA_PATH", default_value = "KPI_table.xlsx")]
    pub data: PathBuf,

    /// Worksheet to read from a spreadsheet
    #[arg(long, env = "KPI_SHEET", default_value = "KPI")]
    pub sheet: String,

    /// Logo image embedded in the page header
    #[arg(long, env = "KPI_LOGO_PATH", default_value = "~/Desktop/logo.png")]
    pub logo: PathBuf,

    /// JSON object of extra KPI descriptions, merged over the built-in ones
    #[arg(long, env = "KPI_DESCRIPTIONS")]
    pub descriptions: Option<PathBuf>,

    /// Address to serve the dashboard on
    #[arg(long, env = "KPI_BIND_ADDR", default_value = "127.0.0.1:8050")]
    pub bind: SocketAddr,

    /// Group selected when the page opens (first group when absent or unknown)
    #[arg(long, env = "KPI_DEFAULT_GROUP")]
    pub default_group: Option<String>,

    /// Do not open a browser window after startup
    #[arg(long)]
    pub no_browser: bool,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub sheet: String,
    pub logo_path: PathBuf,
    pub descriptions_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub default_group: Option<String>,
    pub open_browser: bool,
}

impl From<Args> for DashboardConfig {
    fn from(args: Args) -> Self {
        Self {
            data_path: args.data,
            sheet: args.sheet,
            logo_path: expand_home(&args.logo),
            descriptions_path: args.descriptions.map(|p| expand_home(&p)),
            bind_addr: args.bind,
            default_group: args.default_group,
            open_browser: !args.no_browser,
        }
    }
}

impl DashboardConfig {
    pub fn root_url(&self) -> String {
        format!("http://{}/", self.bind_addr)
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
