use clap::{Args, Parser, Subcommand};

/// appcore - headless page bootstrap
#[derive(Parser)]
#[command(name = "appcore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory holding settings, storage and locales. Defaults to ~/.appcore
    #[arg(short = 'd', long, global = true, env = "APPCORE_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full page bootstrap (default)
    Boot(BootArgs),
    /// Run only the storage namespace migration
    Migrate,
    /// Show persisted settings, onboarding and storage state
    Status,
}

#[derive(Args, Debug, Clone)]
pub struct BootArgs {
    /// Page classifier (loras, recipes, checkpoints, embeddings, ...)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Requested locale (e.g. en, zh-CN, ja)
    #[arg(short, long, default_value = "en")]
    pub locale: String,

    /// Version reported by the server; a mismatch raises the version banner
    #[arg(long)]
    pub remote_version: Option<String>,

    /// Delay before the onboarding check, in milliseconds
    #[arg(long)]
    pub onboarding_delay_ms: Option<u64>,

    /// Simulated latency of the update check, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub update_check_delay_ms: u64,
}

impl Default for BootArgs {
    fn default() -> Self {
        Self {
            page: None,
            locale: "en".to_string(),
            remote_version: None,
            onboarding_delay_ms: None,
            update_check_delay_ms: 0,
        }
    }
}
