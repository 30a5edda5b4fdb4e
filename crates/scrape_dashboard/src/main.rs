mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Terminal dashboard for account scraping runs.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the scrape backend; overrides the config file
    #[arg(long)]
    pub base_url: Option<String>,
    /// Path to the RON config file
    #[arg(long, default_value = "dashboard.ron")]
    pub config: PathBuf,
    /// Start a new scrape run on launch
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
    /// Print once everything in flight has settled, then exit
    #[arg(long, default_value_t = false)]
    pub once: bool,
    /// Show the full history of every account
    #[arg(long, default_value_t = false)]
    pub expand: bool,
    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(cli)
}
