//! gtd: activity tracker server.

use clap::Parser;
use gtd_lib::config::Config;
use gtd_lib::constants::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gtd")]
#[command(about = "Daily activity tracker with weekly history")]
struct Cli {
    /// Path to configuration file
    #[arg(long = "conf", default_value = DEFAULT_CONFIG_PATH, env = "GTD_CONF")]
    conf: PathBuf,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(&cli.conf)?;
    tracing::info!(config = %cli.conf.display(), port = config.listen_port, "starting gtd");

    gtd_lib::run(config).await?;
    Ok(())
}
