use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use subgraph_inspector::server::Server;
use tracing::info;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the MCP server
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = STYLES,
    about = "Subgraph Inspector - summarize a GraphQL subgraph for an AI agent",
)]
struct Args {
    /// Path to the config file. Without one, configuration is read from
    /// `SUBGRAPH_INSPECTOR_*` environment variables.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Args::parse().config {
        Some(config_path) => runtime::read_config(config_path)?,
        None => runtime::read_config_from_env()?,
    };

    let _guard = runtime::setup_logging(&config)?;

    info!(
        "Subgraph Inspector v{} // Licensed under MIT",
        std::env!("CARGO_PKG_VERSION")
    );

    Ok(Server::builder()
        .transport(config.transport)
        .endpoint(config.endpoint.into_inner())
        .headers(config.headers)
        .timeout(config.timeout)
        .build()
        .start()
        .await?)
}
