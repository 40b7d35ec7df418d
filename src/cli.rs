use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "food-checkr",
    about = "Score packaged food products by barcode",
    version
)]
pub struct Cli {
    /// Product barcodes (8 to 14 digits; spaces and hyphens are ignored)
    #[arg(required = true, num_args = 1.., value_name = "BARCODE")]
    pub barcodes: Vec<String>,

    /// Config file [default: ./.food-checkr/config.toml, fallback ~/.config/food-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Knowledge base JSON file (overrides the config)
    #[arg(long, value_name = "FILE")]
    pub knowledge_base: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Skip adverse-event lookups
    #[arg(long)]
    pub offline: bool,

    /// Show nutrients, score breakdown and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print a one-line summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
