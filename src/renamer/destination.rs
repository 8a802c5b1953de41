use std::fmt;
use std::path::{Path, PathBuf};

use crate::renamer::FileEntry;

/// Where renamed files are written, as chosen in the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    InPlace,
    Mirrored,
}

impl OutputMode {
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::InPlace => "in_place",
            Self::Mirrored => "mirrored",
        }
    }

    #[must_use]
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name.trim() {
            "in_place" => Some(Self::InPlace),
            "mirrored" => Some(Self::Mirrored),
            _ => None,
        }
    }
}

/// Resolved output location for a run.
///
/// A mirrored run always carries its destination root,
/// so a missing destination cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Rename next to the source file.
    #[default]
    InPlace,
    /// Write under `root`, either keeping the relative folder chain or flat.
    Mirrored { root: PathBuf, preserve_structure: bool },
}

impl DestinationPolicy {
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        match self {
            Self::InPlace => None,
            Self::Mirrored { root, .. } => Some(root),
        }
    }

    /// Full destination path for `entry` renamed to `new_name`.
    #[must_use]
    pub fn resolve(&self, entry: &FileEntry, new_name: &str) -> PathBuf {
        match self {
            Self::InPlace => entry.path.with_file_name(new_name),
            Self::Mirrored {
                root,
                preserve_structure: true,
            } => root.join(&entry.relative_parent).join(new_name),
            Self::Mirrored {
                root,
                preserve_structure: false,
            } => root.join(new_name),
        }
    }

    /// Destination relative to the output base, for log lines.
    ///
    /// In place the base is the scan root.
    #[must_use]
    pub fn relative_display(&self, scan_root: &Path, destination: &Path) -> String {
        let base = self.root().unwrap_or(scan_root);
        destination.strip_prefix(base).map_or_else(
            |_| crate::path_to_string(destination),
            crate::path_to_slash_string,
        )
    }
}

impl fmt::Display for DestinationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPlace => write!(f, "in place"),
            Self::Mirrored {
                root,
                preserve_structure,
            } => write!(
                f,
                "mirrored to {} ({})",
                root.display(),
                if *preserve_structure { "keep structure" } else { "flat" }
            ),
        }
    }
}
