use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::{FileTree, FsError, SEPARATOR, VfsPath, validate_name};

/// Directory the editor works in when the seed does not name one.
pub const DEFAULT_WORKSPACE: &str = "/vscode";

const WORKSPACE_KEY: &str = "workspace";
const TREE_KEY: &str = "tree";

/// Node described by a seed file, before it is created in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEntry {
    Directory {
        name: String,
        children: Vec<SeedEntry>,
    },
    File {
        name: String,
        content: String,
    },
}

/// Initial state of a session: the workspace directory and the tree to create at startup.
///
/// ```yaml
/// workspace: /vscode
/// tree:
///   vscode:
///     main.js: "console.log('hi')"
///     src: {}
/// ```
///
/// A mapping is a directory, a string is a file with that content and an empty value is an
/// empty directory. Mapping order becomes insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    workspace: String,
    entries: Vec<SeedEntry>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            workspace: DEFAULT_WORKSPACE.to_string(),
            entries: Vec::new(),
        }
    }
}

impl SeedConfig {
    pub async fn from_path(path: &Path) -> Result<Self, SeedError> {
        debug!("Reading seed file: {}", path.display());
        let bytes = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        debug!("Successfully read seed file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.to_path_buf(),
        })?;
        contents.as_str().try_into()
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn entries(&self) -> &[SeedEntry] {
        &self.entries
    }

    /// Creates every described entry in `tree`, parents before children.
    pub fn apply(&self, tree: &mut FileTree) -> Result<(), SeedError> {
        apply_entries(tree, &VfsPath::root(), &self.entries)
    }

    fn parse_entries(
        mapping: &LinkedHashMap<Yaml, Yaml>,
        parent: &str,
    ) -> Result<Vec<SeedEntry>, SeedError> {
        mapping
            .iter()
            .map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    return NonStringNameSnafu {
                        parent,
                        key: format!("{key:?}"),
                    }
                    .fail();
                };
                validate_name(name).context(InvalidNameSnafu { parent })?;
                let path = format!("{parent}{SEPARATOR}{name}");

                match value {
                    Yaml::Value(Scalar::String(content)) => Ok(SeedEntry::File {
                        name: name.to_string(),
                        content: content.to_string(),
                    }),
                    Yaml::Value(Scalar::Null) => Ok(SeedEntry::Directory {
                        name: name.to_string(),
                        children: Vec::new(),
                    }),
                    Yaml::Mapping(children) => Ok(SeedEntry::Directory {
                        name: name.to_string(),
                        children: Self::parse_entries(children, &path)?,
                    }),
                    _ => UnsupportedValueSnafu { path }.fail(),
                }
            })
            .collect()
    }
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

fn apply_entries(
    tree: &mut FileTree,
    parent: &VfsPath,
    entries: &[SeedEntry],
) -> Result<(), SeedError> {
    for entry in entries {
        match entry {
            SeedEntry::Directory { name, children } => {
                let path = parent.join(name).context(InvalidNameSnafu {
                    parent: parent.to_string(),
                })?;
                let display = path.to_string();
                tree.mkdir(&display).context(ApplySnafu { path: &display })?;
                apply_entries(tree, &path, children)?;
            }
            SeedEntry::File { name, content } => {
                let path = parent.join(name).context(InvalidNameSnafu {
                    parent: parent.to_string(),
                })?;
                let display = path.to_string();
                tree.touch(&display).context(ApplySnafu { path: &display })?;
                if !content.is_empty() {
                    tree.update_file(&display, content.as_str())
                        .context(ApplySnafu { path: &display })?;
                }
            }
        }
    }
    Ok(())
}

impl TryFrom<&str> for SeedConfig {
    type Error = SeedError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedSeedSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let workspace = match top_level.get(&key(WORKSPACE_KEY)) {
            None => DEFAULT_WORKSPACE.to_string(),
            Some(value) => {
                let raw = value.as_str().context(WorkspaceNotStringSnafu)?;
                VfsPath::parse(raw)
                    .context(InvalidWorkspaceSnafu)?
                    .to_string()
            }
        };

        let entries = match top_level.get(&key(TREE_KEY)) {
            None | Some(Yaml::Value(Scalar::Null)) => Vec::new(),
            Some(value) => {
                let mapping = value.as_mapping().context(TreeNotMapSnafu)?;
                Self::parse_entries(mapping, "")?
            }
        };

        Ok(SeedConfig { workspace, entries })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SeedError {
    #[snafu(display("Failed to read the seed file: {}", file_path.display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Seed file {} is not valid UTF-8", file_path.display()))]
    EncodingError {
        file_path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the seed file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted seed file"))]
    MalformedSeed,
    #[snafu(display("Top level of the seed file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Workspace should be a path string"))]
    WorkspaceNotString,
    #[snafu(display("Workspace path is invalid"))]
    InvalidWorkspace { source: FsError },
    #[snafu(display("Tree section should be a map"))]
    TreeNotMap,
    #[snafu(display("Entry names under '{}' should be strings, got {}", parent, key))]
    NonStringName { parent: String, key: String },
    #[snafu(display("Invalid entry name under '{}'", parent))]
    InvalidName { parent: String, source: FsError },
    #[snafu(display("Entry '{}' should be a string, a map or empty", path))]
    UnsupportedValue { path: String },
    #[snafu(display("Failed to create '{}' while seeding", path))]
    ApplyError { path: String, source: FsError },
}
