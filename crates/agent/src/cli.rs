use clap::Parser;
use infrastructure::config::{LogFormat, LogLevel};
use infrastructure::constants::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "edgewall-agent",
    about = "Edgewall device firewall agent",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Log level override (takes precedence over config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Log format: json (default, production) or text (development)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Storage directory override for the persisted configuration
    #[arg(long, env = "EDGEWALL_STORAGE_DIR")]
    pub storage_dir: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
