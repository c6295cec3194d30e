use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "img-sweep")]
#[command(about = "Find and remove product images no catalog record uses", long_about = None)]
pub struct Cli {
    /// Configuration file, extension optional
    #[arg(long, global = true, default_value = "Config")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report orphaned images without deleting anything
    Scan(ScanArgs),
    /// Delete orphaned images after confirmation
    Delete(DeleteArgs),
    /// List the directories directly under the image root
    Dirs,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan, relative to the image root
    #[arg(long)]
    pub dir: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Directory to clean, relative to the image root
    #[arg(long)]
    pub dir: Option<String>,

    /// Delete the orphans listed in a JSON report saved by `scan --format json`
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}
