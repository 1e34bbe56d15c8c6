use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Watches a region for tracked aircraft", long_about = None)]
pub struct Cli {
    /// Stop a headless session after this many seconds.
    #[arg(long)]
    pub duration: Option<u64>,

    /// Open the operator form instead of starting immediately.
    #[arg(long, default_value_t = false)]
    pub gui: bool,

    /// Overrides `tracker.endpoint` from the config file.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    #[arg(long)]
    pub config_file: Option<std::path::PathBuf>,
}
