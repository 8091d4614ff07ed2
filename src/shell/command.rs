use derive_more::Display;
use snafu::prelude::*;

use super::{ShellError, UnterminatedQuoteSnafu, UnknownCommandSnafu, UsageSnafu};

const COMMENT_PREFIX: char = '#';
const SORT_FLAG: &str = "-s";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Command {
    #[display("ls")]
    Ls { path: Option<String>, sorted: bool },
    #[display("mkdir")]
    Mkdir { path: String },
    #[display("touch")]
    Touch { path: String },
    #[display("cat")]
    Cat { path: String },
    #[display("open")]
    Open { path: String },
    #[display("write")]
    Write { path: String, content: String },
    #[display("rm")]
    Rm { path: String },
    #[display("mv")]
    Mv { source: String, destination: String },
    #[display("search")]
    Search { path: String, query: String },
    #[display("tree")]
    Tree { path: Option<String> },
    #[display("version")]
    Version,
}

impl Command {
    /// Parses a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }

        let tokens = tokenize(trimmed)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            ("ls", [flag]) if flag == SORT_FLAG => Command::Ls {
                path: None,
                sorted: true,
            },
            ("ls", [flag, path]) if flag == SORT_FLAG => Command::Ls {
                path: Some(path.clone()),
                sorted: true,
            },
            ("ls", []) => Command::Ls {
                path: None,
                sorted: false,
            },
            ("ls", [path]) => Command::Ls {
                path: Some(path.clone()),
                sorted: false,
            },
            ("ls", _) => return usage("ls", "[-s] [PATH]"),
            ("mkdir", [path]) => Command::Mkdir { path: path.clone() },
            ("mkdir", _) => return usage("mkdir", "PATH"),
            ("touch", [path]) => Command::Touch { path: path.clone() },
            ("touch", _) => return usage("touch", "PATH"),
            ("cat", [path]) => Command::Cat { path: path.clone() },
            ("cat", _) => return usage("cat", "PATH"),
            ("open", [path]) => Command::Open { path: path.clone() },
            ("open", _) => return usage("open", "PATH"),
            ("write", [path, content]) => Command::Write {
                path: path.clone(),
                content: content.clone(),
            },
            ("write", _) => return usage("write", "PATH CONTENT"),
            ("rm", [path]) => Command::Rm { path: path.clone() },
            ("rm", _) => return usage("rm", "PATH"),
            ("mv", [source, destination]) => Command::Mv {
                source: source.clone(),
                destination: destination.clone(),
            },
            ("mv", _) => return usage("mv", "SOURCE DESTINATION"),
            ("search", [path, query]) => Command::Search {
                path: path.clone(),
                query: query.clone(),
            },
            ("search", _) => return usage("search", "PATH QUERY"),
            ("tree", []) => Command::Tree { path: None },
            ("tree", [path]) => Command::Tree {
                path: Some(path.clone()),
            },
            ("tree", _) => return usage("tree", "[PATH]"),
            ("version", []) => Command::Version,
            ("version", _) => return usage("version", "no arguments"),
            (other, _) => return UnknownCommandSnafu { name: other }.fail(),
        };
        Ok(Some(command))
    }
}

fn usage(command: &'static str, expected: &'static str) -> Result<Option<Command>, ShellError> {
    UsageSnafu { command, expected }.fail()
}

/// Splits on unquoted whitespace. Quoted and bare runs that touch join into one
/// token, so `"ab"cd` is `abcd` and `""` is an empty token. Inside quotes `\n`, `\t`,
/// `\"` and `\\` are unescaped.
fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut token: Option<String> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => tokens.extend(token.take()),
            '"' => {
                let token = token.get_or_insert_with(String::new);
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some('n') => token.push('\n'),
                            Some('t') => token.push('\t'),
                            Some(other) => token.push(other),
                            None => break,
                        },
                        c => token.push(c),
                    }
                }
                ensure!(closed, UnterminatedQuoteSnafu { line });
            }
            c => token.get_or_insert_with(String::new).push(c),
        }
    }
    tokens.extend(token);

    Ok(tokens)
}
