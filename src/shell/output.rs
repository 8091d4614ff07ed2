use colored::Colorize;

use super::Language;
use crate::filesystem::{DirEntry, SEPARATOR, WalkEntry};

const INDENT: &str = "  ";

/// Result of a shell command, rendered for the terminal by [`Output::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Nothing,
    Listing(Vec<DirEntry>),
    Text(String),
    Opened { language: Language, content: String },
    Paths(Vec<String>),
    Tree(Vec<WalkEntry>),
    Version(u64),
}

impl Output {
    /// Terminal text. Directories get a trailing separator and, when colors are enabled,
    /// are highlighted.
    pub fn render(&self) -> String {
        match self {
            Output::Nothing => String::new(),
            Output::Listing(entries) => entries
                .iter()
                .map(render_entry)
                .collect::<Vec<_>>()
                .join("\n"),
            Output::Text(content) => content.clone(),
            Output::Opened { language, content } => {
                format!("{}\n{}", format!("[{language}]").dimmed(), content)
            }
            Output::Paths(paths) => paths.join("\n"),
            Output::Tree(rows) => rows
                .iter()
                .map(|row| format!("{}{}", INDENT.repeat(row.depth), render_entry(&row.entry)))
                .collect::<Vec<_>>()
                .join("\n"),
            Output::Version(version) => version.to_string(),
        }
    }
}

fn render_entry(entry: &DirEntry) -> String {
    if entry.is_directory {
        format!("{}{SEPARATOR}", entry.name).blue().bold().to_string()
    } else {
        entry.name.clone()
    }
}
