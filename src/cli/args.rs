//! Command-line arguments.

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "odoo-mcp")]
#[command(version, about = "MCP server for Odoo project management", long_about = None)]
pub struct Cli {
    /// Odoo base URL (default: ODOO_URL env), e.g. https://company.odoo.com
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Database name (default: ODOO_DB env)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Login of the API user (default: ODOO_USERNAME env)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Request timeout in seconds (default: ODOO_TIMEOUT_SECS env or 120)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Check configuration and connectivity, then exit
    Doctor,
}

impl Cli {
    /// Settings given on the command line. The API key is only read from
    /// the environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            db: self.db.clone(),
            username: self.username.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Filter directive used when `RUST_LOG` is not set.
pub fn log_filter(log_level: Option<&str>) -> String {
    let level = log_level
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_lowercase();
    format!("odoo_mcp={level}")
}
