use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::ToolError;

/// What the writer will do with a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Write,
    SkipExisting,
    Overwrite,
}

/// Result of one write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    SkippedExists,
    Overwritten,
    /// Nothing was touched, carries what a real run would have done.
    DryRun(Classification),
}

impl WriteOutcome {
    #[must_use]
    pub const fn classification(self) -> Classification {
        match self {
            Self::Written => Classification::Write,
            Self::SkippedExists => Classification::SkipExisting,
            Self::Overwritten => Classification::Overwrite,
            Self::DryRun(classification) => classification,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteMode {
    /// Move instead of copy.
    pub move_files: bool,
    pub overwrite: bool,
    pub dry_run: bool,
}

impl WriteMode {
    /// Log tag for a file that will be written.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        if self.move_files { "move" } else { "copy" }
    }

    /// Tag used in log lines: `skip`, `overwrite`, `move` or `copy`.
    #[must_use]
    pub const fn tag(&self, classification: Classification) -> &'static str {
        match classification {
            Classification::SkipExisting => "skip",
            Classification::Overwrite => "overwrite",
            Classification::Write => self.action(),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => write!(f, "write"),
            Self::SkipExisting => write!(f, "skip"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Decide what happens to `destination` without touching anything.
///
/// A destination that is the source itself is always a skip,
/// so overwriting can never delete the only copy of a file.
/// This includes other paths to the same file, such as a name differing only
/// in case on a case-insensitive filesystem or a hard link.
#[must_use]
pub fn classify(source: &Path, destination: &Path, overwrite: bool) -> Classification {
    if source == destination || same_file::is_same_file(source, destination).unwrap_or(false) {
        Classification::SkipExisting
    } else if !destination.exists() {
        Classification::Write
    } else if overwrite {
        Classification::Overwrite
    } else {
        Classification::SkipExisting
    }
}

/// Move or copy `source` to `destination`.
///
/// # Errors
/// Returns `FileSystem` with the failing path if any filesystem operation fails.
pub fn write(source: &Path, destination: &Path, mode: &WriteMode) -> Result<WriteOutcome, ToolError> {
    let classification = classify(source, destination, mode.overwrite);
    if mode.dry_run {
        return Ok(WriteOutcome::DryRun(classification));
    }

    match classification {
        Classification::SkipExisting => return Ok(WriteOutcome::SkippedExists),
        Classification::Overwrite => {
            fs::remove_file(destination).map_err(|e| ToolError::file_system("remove", destination, e))?;
        }
        Classification::Write => {}
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| ToolError::file_system("create directory", parent, e))?;
    }

    if mode.move_files {
        move_file(source, destination)?;
    } else {
        copy_file(source, destination)?;
    }

    Ok(match classification {
        Classification::Overwrite => WriteOutcome::Overwritten,
        _ => WriteOutcome::Written,
    })
}

fn move_file(source: &Path, destination: &Path) -> Result<(), ToolError> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            copy_file(source, destination)?;
            fs::remove_file(source).map_err(|e| ToolError::file_system("remove", source, e))
        }
        Err(error) => Err(ToolError::file_system("move", source, error)),
    }
}

/// Copy contents and permissions, then carry over access and modification times.
///
/// The times are set through a handle without write access to the contents,
/// since the copied permissions may already have made the destination read-only.
fn copy_file(source: &Path, destination: &Path) -> Result<(), ToolError> {
    fs::copy(source, destination).map_err(|e| ToolError::file_system("copy", source, e))?;

    let metadata = fs::metadata(source).map_err(|e| ToolError::file_system("read metadata of", source, e))?;
    let mut times = fs::FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    open_for_times(destination)
        .and_then(|file| file.set_times(times))
        .map_err(|e| ToolError::file_system("set file times of", destination, e))
}

#[cfg(windows)]
fn open_for_times(path: &Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;
    File::options().access_mode(FILE_WRITE_ATTRIBUTES).open(path)
}

/// The owner may change timestamps through a read-only descriptor.
#[cfg(not(windows))]
fn open_for_times(path: &Path) -> io::Result<File> {
    File::open(path)
}
