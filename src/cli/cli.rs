use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Shell over an in-memory workspace file system.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// YAML file describing the initial tree
    #[clap(long, short)]
    pub seed: Option<PathBuf>,

    /// Run the commands in this file instead of reading standard input
    #[clap(long)]
    pub script: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    #[clap(long)]
    pub no_color: bool,
}
