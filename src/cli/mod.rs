pub mod alert;
pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "omreport")]
#[command(
    author,
    version,
    about = "Fetches the daily order-management report through a browser, with retries and failure alerts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the report, retrying and alerting on failure
    Run(RunArgs),

    /// Fire the configured alert channels once
    Alert(AlertArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file (JSON or YAML)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Override output folder
    #[arg(long)]
    pub output_folder: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,

    /// Override number of attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Override delay between attempts, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Login email
    #[arg(long, env = "OMREPORT_EMAIL")]
    pub email: Option<String>,

    /// Login password
    #[arg(long, env = "OMREPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// WebDriver endpoint (msedgedriver/chromedriver)
    #[arg(long, env = "OMREPORT_WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Do not alert on failure, only exit non-zero
    #[arg(long)]
    pub no_alert: bool,

    /// Show plan without launching a browser
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct AlertArgs {
    /// Config file (for alert settings)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Message to send as the last error
    #[arg(long, default_value = "test alert")]
    pub message: String,
}
