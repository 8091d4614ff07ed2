use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub seed: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            seed: cli.seed,
            script: cli.script,
            color: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
