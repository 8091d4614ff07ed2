//! In-memory hierarchical file system shared by the editor and the file manager.
//!
//! [`FileTree`] owns the whole tree and exposes it only through path-addressed calls:
//! `ls`, `mkdir`, `touch`, `cat`, `update_file`, `rm`, `mv` and `search`.

mod error;
mod node;
mod path;
mod tree;
mod version;

pub use error::{ErrorKind, FsError};
pub use node::{DirEntry, Node, NodeKind};
pub use path::{SEPARATOR, VfsPath, validate_name};
pub use tree::{FileTree, WalkEntry};
pub use version::{VersionCounter, VersionReceiver};
