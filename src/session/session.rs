use snafu::prelude::*;
use tracing::{debug, info};

use crate::config::{SeedConfig, SeedError};
use crate::filesystem::{ErrorKind, FileTree, FsError, SEPARATOR, VfsPath};

/// Owner of the session's file tree.
///
/// Consumers never hold the tree itself; they borrow it through [`Session::fs`] and
/// [`Session::fs_mut`], which only offer the path-addressed file system calls.
#[derive(Debug)]
pub struct Session {
    tree: FileTree,
    workspace: VfsPath,
}

impl Session {
    /// Empty tree with `workspace` created.
    pub fn new(workspace: &str) -> Result<Self, SessionError> {
        Self::with_tree(FileTree::new(), workspace)
    }

    pub fn from_seed(seed: &SeedConfig) -> Result<Self, SessionError> {
        let mut tree = FileTree::new();
        seed.apply(&mut tree).context(SeedSnafu)?;
        debug!("Seeded {} top-level entries", seed.entries().len());
        Self::with_tree(tree, seed.workspace())
    }

    fn with_tree(tree: FileTree, workspace: &str) -> Result<Self, SessionError> {
        let workspace = VfsPath::parse(workspace).context(WorkspaceSnafu { workspace })?;
        let mut session = Self { tree, workspace };
        session.ensure_workspace()?;
        Ok(session)
    }

    pub fn workspace(&self) -> &VfsPath {
        &self.workspace
    }

    pub fn fs(&self) -> &FileTree {
        &self.tree
    }

    pub fn fs_mut(&mut self) -> &mut FileTree {
        &mut self.tree
    }

    /// Creates the workspace directory and any missing ancestors.
    /// Returns whether anything had to be created.
    pub fn ensure_workspace(&mut self) -> Result<bool, SessionError> {
        let workspace = self.workspace.to_string();
        let mut current = VfsPath::root();
        let mut created = false;

        for segment in self.workspace.segments() {
            current = current
                .join(segment)
                .context(WorkspaceSnafu { workspace: &workspace })?;
            let path = current.to_string();
            match self.tree.stat(&path) {
                Ok(entry) if entry.is_directory => {}
                Ok(_) => {
                    return Err(FsError::NotADirectory { path }).context(WorkspaceSnafu {
                        workspace: &workspace,
                    });
                }
                Err(error) if error.kind() == ErrorKind::NotFound => {
                    self.tree
                        .mkdir(&path)
                        .context(WorkspaceSnafu { workspace: &workspace })?;
                    created = true;
                }
                Err(error) => {
                    return Err(error).context(WorkspaceSnafu {
                        workspace: &workspace,
                    });
                }
            }
        }

        if created {
            info!("Created workspace directory {}", workspace);
        }
        Ok(created)
    }

    /// Absolute form of a user-supplied path; relative paths are taken from the workspace.
    pub fn absolute(&self, input: &str) -> String {
        if input.starts_with(SEPARATOR) {
            input.to_string()
        } else if self.workspace.is_root() {
            format!("{SEPARATOR}{input}")
        } else {
            format!("{}{SEPARATOR}{input}", self.workspace)
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SessionError {
    #[snafu(display("Failed to seed the file tree"))]
    SeedError { source: SeedError },
    #[snafu(display("Failed to prepare workspace '{}'", workspace))]
    WorkspaceError { workspace: String, source: FsError },
}
