use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use compio::io::compat::AsyncStream;
use futures::{AsyncBufRead, AsyncBufReadExt, StreamExt, io::BufReader};
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::config::{SeedConfig, SeedError};
use crate::session::{Session, SessionError};
use crate::shell::{self, Output, ShellError};

const PROMPT: &str = "deskfs> ";

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        colored::control::set_override(app_config.color);

        let seed = match &app_config.seed {
            Some(path) => SeedConfig::from_path(path).await.context(SeedSnafu)?,
            None => SeedConfig::default(),
        };
        debug!("Loaded seed: {:?}", seed);

        let mut session = Session::from_seed(&seed).context(SessionSnafu)?;
        info!("Workspace ready at {}", session.workspace());

        match &app_config.script {
            Some(path) => Self::run_script(&mut session, path).await,
            None => Self::run_interactive(&mut session).await,
        }
    }

    /// Runs every line of `path`, stopping at the first failing command.
    async fn run_script(session: &mut Session, path: &Path) -> Result<(), ApplicationError> {
        debug!("Reading script: {}", path.display());
        let bytes = compio::fs::read(path).await.context(ScriptReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        let script = String::from_utf8(bytes).context(ScriptEncodingSnafu {
            file_path: path.to_path_buf(),
        })?;

        for (index, line) in script.lines().enumerate() {
            let output = shell::run_line(session, line).context(ScriptLineSnafu {
                line_number: index + 1,
            })?;
            if let Some(output) = output {
                print_output(&output);
            }
        }
        info!("Script finished at version {}", session.fs().version());
        Ok(())
    }

    /// Reads commands from standard input until end of file.
    async fn run_interactive(session: &mut Session) -> Result<(), ApplicationError> {
        let interactive = io::stdin().is_terminal();
        let reader = BufReader::new(AsyncStream::new(compio::fs::stdin()));
        Self::run_lines(session, reader, interactive).await
    }

    /// Failing commands are reported and the loop continues.
    async fn run_lines(
        session: &mut Session,
        reader: impl AsyncBufRead + Unpin,
        prompt: bool,
    ) -> Result<(), ApplicationError> {
        let mut lines = reader.lines();

        loop {
            if prompt {
                print!("{PROMPT}");
                io::stdout().flush().context(TerminalSnafu)?;
            }
            let Some(line_result) = lines.next().await else {
                break;
            };
            let line = line_result.context(TerminalSnafu)?;

            match shell::run_line(session, &line) {
                Ok(Some(output)) => print_output(&output),
                Ok(None) => {}
                Err(error) => {
                    warn!("Command failed: {}", line.trim());
                    eprintln!("{error}");
                }
            }
        }
        debug!("Input closed at version {}", session.fs().version());
        Ok(())
    }
}

fn print_output(output: &Output) {
    let rendered = output.render();
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the seed"))]
    SeedError { source: SeedError },
    #[snafu(display("Critical failure encountered while starting the session"))]
    SessionError { source: SessionError },
    #[snafu(display("Failed to read the script file: {}", file_path.display()))]
    ScriptReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Script file {} is not valid UTF-8", file_path.display()))]
    ScriptEncodingError {
        file_path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Script failed at line {}", line_number))]
    ScriptLineError {
        line_number: usize,
        source: ShellError,
    },
    #[snafu(display("Failed to talk to the terminal"))]
    TerminalError { source: std::io::Error },
}
