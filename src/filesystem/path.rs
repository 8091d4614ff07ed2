use std::fmt;

use snafu::ensure;

use super::error::{FsError, InvalidPathSnafu};

pub const SEPARATOR: char = '/';

const PARENT_SEGMENT: &str = "..";
const CURRENT_SEGMENT: &str = ".";

/// A normalized absolute path: the list of segment names walked from the root.
///
/// Parsing drops empty and `.` segments and refuses `..`, so a `VfsPath` can never
/// address anything outside the subtree it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, FsError> {
        let mut segments = Vec::new();
        for segment in raw.split(SEPARATOR) {
            match segment {
                "" | CURRENT_SEGMENT => continue,
                PARENT_SEGMENT => {
                    return InvalidPathSnafu {
                        path: raw,
                        reason: "parent directory traversal is not supported",
                    }
                    .fail();
                }
                name => segments.push(name.to_string()),
            }
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Appends a single child name. The name must already be a legal segment.
    pub fn join(&self, name: &str) -> Result<VfsPath, FsError> {
        validate_name(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(VfsPath { segments })
    }
}

/// Checks that `name` can be used as a single node name.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    ensure!(
        !name.is_empty(),
        InvalidPathSnafu {
            path: name,
            reason: "name is empty",
        }
    );
    ensure!(
        !name.contains(SEPARATOR),
        InvalidPathSnafu {
            path: name,
            reason: "name contains the path separator",
        }
    );
    ensure!(
        name != CURRENT_SEGMENT && name != PARENT_SEGMENT,
        InvalidPathSnafu {
            path: name,
            reason: "name is reserved",
        }
    );
    Ok(())
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}
