mod args;


pub use args::{Cli, Commands, log_filter};

use clap::Parser;
use miette::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigOverrides, ConnectionConfig};
use crate::doctor;
use crate::mcp::serve_stdio;
use crate::odoo::OdooClient;

/// Log to stderr; stdout belongs to the MCP protocol.
fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(log_level.as_deref()).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let overrides = cli.overrides();
    match cli.command {
        Some(Commands::Doctor) => {
            let report = doctor::run(overrides).await;
            print!("{report}");
            let code = report.outcome().exit_code();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        None => serve(overrides).await,
    }
}

async fn serve(overrides: ConfigOverrides) -> Result<()> {
    let config = ConnectionConfig::from_env(overrides)?;
    info!(url = config.url(), db = config.db(), "Loaded Odoo configuration");

    let client = OdooClient::connect(config)?;
    serve_stdio(client).await?;

    Ok(())
}
