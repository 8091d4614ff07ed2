use std::ptr;

use snafu::{OptionExt, ensure};

use super::error::{
    AlreadyExistsSnafu, FsError, InvalidOperationSnafu, IsADirectorySnafu, NotADirectorySnafu,
    NotFoundSnafu,
};
use super::node::{DirEntry, Node, NodeKind};
use super::path::{SEPARATOR, VfsPath};
use super::version::{VersionCounter, VersionReceiver};

/// One row of a recursive walk below a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Zero for the immediate children of the walked directory.
    pub depth: usize,
    pub path: String,
    pub entry: DirEntry,
}

/// In-memory hierarchical file system.
///
/// The root directory owns every other node, so each node has exactly one parent and
/// detaching a directory drops its whole subtree. Every call parses and resolves its paths
/// and validates all preconditions before touching the tree; a call that returns an error
/// has not mutated anything and has not bumped the version.
#[derive(Debug)]
pub struct FileTree {
    root: Node,
    version: VersionCounter,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        Self {
            root: Node::directory(SEPARATOR),
            version: VersionCounter::default(),
        }
    }

    /// Number of successful mutations so far.
    pub fn version(&self) -> u64 {
        self.version.current()
    }

    pub fn subscribe(&mut self) -> VersionReceiver {
        self.version.subscribe()
    }

    /// Immediate children of a directory, in insertion order.
    pub fn ls(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let path = VfsPath::parse(path)?;
        let children = self.directory(path.segments(), &path)?;
        Ok(children.iter().map(DirEntry::from).collect())
    }

    pub fn stat(&self, path: &str) -> Result<DirEntry, FsError> {
        let path = VfsPath::parse(path)?;
        self.walk(path.segments(), &path).map(DirEntry::from)
    }

    pub fn mkdir(&mut self, path: &str) -> Result<(), FsError> {
        self.create(path, Node::directory)
    }

    pub fn touch(&mut self, path: &str) -> Result<(), FsError> {
        self.create(path, Node::file)
    }

    pub fn cat(&self, path: &str) -> Result<&str, FsError> {
        let path = VfsPath::parse(path)?;
        self.walk(path.segments(), &path)?
            .content()
            .with_context(|| IsADirectorySnafu {
                path: path.to_string(),
            })
    }

    /// Replaces the content of an existing file in a single step.
    pub fn update_file(&mut self, path: &str, content: impl Into<String>) -> Result<(), FsError> {
        let path = VfsPath::parse(path)?;
        match &mut self.walk_mut(path.segments(), &path)?.kind {
            NodeKind::File { content: current } => *current = content.into(),
            NodeKind::Directory { .. } => {
                return IsADirectorySnafu {
                    path: path.to_string(),
                }
                .fail();
            }
        }
        self.version.bump();
        Ok(())
    }

    /// Detaches a node, and with it any subtree it owns.
    pub fn rm(&mut self, path: &str) -> Result<(), FsError> {
        let path = VfsPath::parse(path)?;
        let (name, parent) = path
            .segments()
            .split_last()
            .context(InvalidOperationSnafu {
                path: path.to_string(),
                reason: "the root directory cannot be removed",
            })?;

        let siblings = self.directory_mut(parent, &path)?;
        let index = position(siblings, name).with_context(|| NotFoundSnafu {
            path: path.to_string(),
        })?;
        siblings.remove(index);
        self.version.bump();
        Ok(())
    }

    /// Renames and/or re-parents a node.
    ///
    /// A rename inside the same directory keeps the node's position among its siblings;
    /// a move appends it to the destination directory.
    pub fn mv(&mut self, source: &str, destination: &str) -> Result<(), FsError> {
        let source = VfsPath::parse(source)?;
        let destination = VfsPath::parse(destination)?;
        let (source_name, source_parent) =
            source
                .segments()
                .split_last()
                .context(InvalidOperationSnafu {
                    path: source.to_string(),
                    reason: "the root directory cannot be moved",
                })?;
        let (target_name, target_parent) =
            destination
                .segments()
                .split_last()
                .context(InvalidOperationSnafu {
                    path: destination.to_string(),
                    reason: "the root directory cannot be replaced",
                })?;

        let node = self.walk(source.segments(), &source)?;
        ensure!(
            !self.is_on_path(node, &destination),
            InvalidOperationSnafu {
                path: destination.to_string(),
                reason: "a node cannot be moved onto itself or into its own subtree",
            }
        );
        let target_siblings = self.directory(target_parent, &destination)?;
        ensure!(
            position(target_siblings, target_name).is_none(),
            AlreadyExistsSnafu {
                path: destination.to_string(),
            }
        );

        let source_siblings = self.directory_mut(source_parent, &source)?;
        let index = position(source_siblings, source_name).with_context(|| NotFoundSnafu {
            path: source.to_string(),
        })?;
        if source_parent == target_parent {
            source_siblings[index].name = target_name.clone();
        } else {
            let mut node = source_siblings.remove(index);
            node.name = target_name.clone();
            // the target directory is outside the detached subtree, so it still resolves
            self.directory_mut(target_parent, &destination)?.push(node);
        }
        self.version.bump();
        Ok(())
    }

    /// Paths below `path` whose name contains `query` (ignoring case) or, for files, whose
    /// content contains `query`. Depth-first pre-order, siblings in insertion order.
    pub fn search(&self, path: &str, query: &str) -> Result<Vec<String>, FsError> {
        let path = VfsPath::parse(path)?;
        let children = self.directory(path.segments(), &path)?;
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        let mut collect = |child_path: &str, _depth: usize, node: &Node| {
            let name_matches = node.name.to_lowercase().contains(&needle);
            let content_matches = node.content().is_some_and(|content| content.contains(query));
            if name_matches || content_matches {
                matches.push(child_path.to_string());
            }
        };
        visit(children, &prefix_of(&path), 0, &mut collect);
        Ok(matches)
    }

    /// Every node below `path` in the same order `search` visits them.
    pub fn walk_tree(&self, path: &str) -> Result<Vec<WalkEntry>, FsError> {
        let path = VfsPath::parse(path)?;
        let children = self.directory(path.segments(), &path)?;
        let mut entries = Vec::new();
        let mut collect = |child_path: &str, depth: usize, node: &Node| {
            entries.push(WalkEntry {
                depth,
                path: child_path.to_string(),
                entry: DirEntry::from(node),
            });
        };
        visit(children, &prefix_of(&path), 0, &mut collect);
        Ok(entries)
    }

    fn create(&mut self, path: &str, make: impl FnOnce(String) -> Node) -> Result<(), FsError> {
        let path = VfsPath::parse(path)?;
        // the root always exists
        let (name, parent) = path
            .segments()
            .split_last()
            .with_context(|| AlreadyExistsSnafu {
                path: path.to_string(),
            })?;

        let siblings = self.directory_mut(parent, &path)?;
        ensure!(
            position(siblings, name).is_none(),
            AlreadyExistsSnafu {
                path: path.to_string(),
            }
        );
        siblings.push(make(name.clone()));
        self.version.bump();
        Ok(())
    }

    /// Resolves `segments` from the root. Failures are reported against `requested`.
    fn walk(&self, segments: &[String], requested: &VfsPath) -> Result<&Node, FsError> {
        let mut current = &self.root;
        for segment in segments {
            let children = current.children().with_context(|| NotADirectorySnafu {
                path: requested.to_string(),
            })?;
            current = children
                .iter()
                .find(|child| child.name == *segment)
                .with_context(|| NotFoundSnafu {
                    path: requested.to_string(),
                })?;
        }
        Ok(current)
    }

    fn walk_mut(&mut self, segments: &[String], requested: &VfsPath) -> Result<&mut Node, FsError> {
        let mut current = &mut self.root;
        for segment in segments {
            let children = current.children_mut().with_context(|| NotADirectorySnafu {
                path: requested.to_string(),
            })?;
            current = children
                .iter_mut()
                .find(|child| child.name == *segment)
                .with_context(|| NotFoundSnafu {
                    path: requested.to_string(),
                })?;
        }
        Ok(current)
    }

    fn directory(&self, segments: &[String], requested: &VfsPath) -> Result<&[Node], FsError> {
        self.walk(segments, requested)?
            .children()
            .with_context(|| NotADirectorySnafu {
                path: requested.to_string(),
            })
    }

    fn directory_mut(
        &mut self,
        segments: &[String],
        requested: &VfsPath,
    ) -> Result<&mut Vec<Node>, FsError> {
        self.walk_mut(segments, requested)?
            .children_mut()
            .with_context(|| NotADirectorySnafu {
                path: requested.to_string(),
            })
    }

    /// Whether `ancestor` is one of the nodes on the chain from the root to `candidate`,
    /// `candidate` itself included. Compares node identity, not names.
    fn is_on_path(&self, ancestor: &Node, candidate: &VfsPath) -> bool {
        let mut current = &self.root;
        for segment in candidate.segments() {
            match current.child(segment) {
                Some(child) if ptr::eq(child, ancestor) => return true,
                Some(child) => current = child,
                None => return false,
            }
        }
        false
    }
}

fn position(siblings: &[Node], name: &str) -> Option<usize> {
    siblings.iter().position(|sibling| sibling.name == name)
}

/// Absolute path of `dir` in the form children are appended to (`""` for the root).
fn prefix_of(dir: &VfsPath) -> String {
    if dir.is_root() {
        String::new()
    } else {
        dir.to_string()
    }
}

fn visit(
    children: &[Node],
    prefix: &str,
    depth: usize,
    on_node: &mut impl FnMut(&str, usize, &Node),
) {
    for child in children {
        let child_path = format!("{prefix}{SEPARATOR}{}", child.name);
        on_node(&child_path, depth, child);
        if let Some(grandchildren) = child.children() {
            visit(grandchildren, &child_path, depth + 1, on_node);
        }
    }
}
