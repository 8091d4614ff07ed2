//! Line-oriented front end over a [`Session`], standing in for the editor and file manager.

mod command;
mod language;
mod output;

use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::{FsError, SEPARATOR};
use crate::session::Session;

pub use command::Command;
pub use language::Language;
pub use output::Output;

/// Parses and executes one line. `Ok(None)` for blank lines and comments.
pub fn run_line(session: &mut Session, line: &str) -> Result<Option<Output>, ShellError> {
    match Command::parse(line)? {
        Some(command) => execute(session, &command).map(Some),
        None => Ok(None),
    }
}

pub fn execute(session: &mut Session, command: &Command) -> Result<Output, ShellError> {
    debug!("Executing {:?}", command);
    let context = |_: &mut FsError| FilesystemSnafu {
        command: command.to_string(),
    };

    let output = match command {
        Command::Ls { path, sorted } => {
            let path = target(session, path.as_deref());
            let mut entries = session.fs().ls(&path).with_context(context)?;
            if *sorted {
                entries.sort_by(|a, b| {
                    b.is_directory
                        .cmp(&a.is_directory)
                        .then_with(|| a.name.cmp(&b.name))
                });
            }
            Output::Listing(entries)
        }
        Command::Mkdir { path } => {
            let path = session.absolute(path);
            session.fs_mut().mkdir(&path).with_context(context)?;
            Output::Nothing
        }
        Command::Touch { path } => {
            let path = session.absolute(path);
            session.fs_mut().touch(&path).with_context(context)?;
            Output::Nothing
        }
        Command::Cat { path } => {
            let path = session.absolute(path);
            Output::Text(session.fs().cat(&path).with_context(context)?.to_string())
        }
        Command::Open { path } => {
            let path = session.absolute(path);
            let content = session.fs().cat(&path).with_context(context)?.to_string();
            let name = path.rsplit(SEPARATOR).next().unwrap_or_default();
            Output::Opened {
                language: Language::from_file_name(name),
                content,
            }
        }
        Command::Write { path, content } => {
            let path = session.absolute(path);
            session
                .fs_mut()
                .update_file(&path, content.as_str())
                .with_context(context)?;
            Output::Nothing
        }
        Command::Rm { path } => {
            let path = session.absolute(path);
            session.fs_mut().rm(&path).with_context(context)?;
            Output::Nothing
        }
        Command::Mv {
            source,
            destination,
        } => {
            let source = session.absolute(source);
            let destination = session.absolute(destination);
            session
                .fs_mut()
                .mv(&source, &destination)
                .with_context(context)?;
            Output::Nothing
        }
        Command::Search { path, query } => {
            let path = session.absolute(path);
            Output::Paths(session.fs().search(&path, query).with_context(context)?)
        }
        Command::Tree { path } => {
            let path = target(session, path.as_deref());
            Output::Tree(session.fs().walk_tree(&path).with_context(context)?)
        }
        Command::Version => Output::Version(session.fs().version()),
    };
    Ok(output)
}

/// Optional path argument, defaulting to the workspace.
fn target(session: &Session, path: Option<&str>) -> String {
    match path {
        Some(path) => session.absolute(path),
        None => session.workspace().to_string(),
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ShellError {
    #[snafu(display("Unterminated quote in '{}'", line))]
    UnterminatedQuote { line: String },
    #[snafu(display("Unknown command '{}'", name))]
    UnknownCommand { name: String },
    #[snafu(display("Usage: {} {}", command, expected))]
    UsageError {
        command: &'static str,
        expected: &'static str,
    },
    #[snafu(display("{}: {}", command, source))]
    FilesystemError { command: String, source: FsError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WORKSPACE;
    use crate::filesystem::{DirEntry, ErrorKind};
    use rstest::*;

    #[fixture]
    fn session() -> Session {
        Session::new(DEFAULT_WORKSPACE).unwrap()
    }

    fn run(session: &mut Session, line: &str) -> Output {
        run_line(session, line).unwrap().unwrap()
    }

    fn fs_error_kind(result: Result<Option<Output>, ShellError>) -> ErrorKind {
        match result {
            Err(ShellError::FilesystemError { source, .. }) => source.kind(),
            other => panic!("expected a file system error, got {other:?}"),
        }
    }

    #[rstest]
    fn relative_paths_land_in_workspace(mut session: Session) {
        run(&mut session, "touch a.txt");
        run(&mut session, r#"write a.txt "hello""#);
        assert_eq!(session.fs().cat("/vscode/a.txt").unwrap(), "hello");
        assert_eq!(run(&mut session, "cat /vscode/a.txt"), Output::Text("hello".into()));
    }

    #[rstest]
    fn ls_defaults_to_workspace_and_can_sort(mut session: Session) {
        run(&mut session, "touch b.txt");
        run(&mut session, "mkdir zeta");
        run(&mut session, "touch a.txt");
        let entry = |name: &str, is_directory| DirEntry {
            name: name.to_string(),
            is_directory,
        };

        assert_eq!(
            run(&mut session, "ls"),
            Output::Listing(vec![
                entry("b.txt", false),
                entry("zeta", true),
                entry("a.txt", false)
            ])
        );
        assert_eq!(
            run(&mut session, "ls -s"),
            Output::Listing(vec![
                entry("zeta", true),
                entry("a.txt", false),
                entry("b.txt", false)
            ])
        );
    }

    #[rstest]
    fn open_reports_language(mut session: Session) {
        run(&mut session, "touch main.py");
        run(&mut session, r#"write main.py "print(1)""#);
        assert_eq!(
            run(&mut session, "open main.py"),
            Output::Opened {
                language: Language::Python,
                content: "print(1)".into()
            }
        );
    }

    #[rstest]
    fn rename_and_search(mut session: Session) {
        run(&mut session, "touch a.txt");
        run(&mut session, r#"write a.txt "hello""#);
        run(&mut session, "mv a.txt b.txt");
        assert_eq!(
            run(&mut session, "search /vscode ell"),
            Output::Paths(vec!["/vscode/b.txt".into()])
        );
    }

    #[rstest]
    fn version_tracks_mutations(mut session: Session) {
        assert_eq!(run(&mut session, "version"), Output::Version(1));
        run(&mut session, "mkdir src");
        assert_eq!(run(&mut session, "version"), Output::Version(2));
    }

    #[rstest]
    #[case("cat missing.txt", ErrorKind::NotFound)]
    #[case("rm /", ErrorKind::InvalidOperation)]
    #[case("mkdir /vscode", ErrorKind::AlreadyExists)]
    #[case("mv /vscode /vscode/inner", ErrorKind::InvalidOperation)]
    #[case("tree /nowhere", ErrorKind::NotFound)]
    #[case("search ../x q", ErrorKind::InvalidPath)]
    fn failures_surface_as_filesystem_errors(
        mut session: Session,
        #[case] line: &str,
        #[case] kind: ErrorKind,
    ) {
        assert_eq!(fs_error_kind(run_line(&mut session, line)), kind);
    }

    #[rstest]
    fn error_message_names_command_and_path(mut session: Session) {
        let error = run_line(&mut session, "cat nope").unwrap_err();
        assert_eq!(error.to_string(), "cat: No such file or directory: /vscode/nope");
    }

    #[rstest]
    fn comments_produce_no_output(mut session: Session) {
        assert_eq!(run_line(&mut session, "# nothing").unwrap(), None);
    }
}
