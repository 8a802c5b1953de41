//! Bulk creation of numbered folders named `prefix_NNNN_suffix`.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crate::ToolError;
use crate::renamer::{RESERVED_CHARACTERS, format_number, validate_file_name};
use crate::worker::{Event, Job};

/// Parameters of one folder creator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOptions {
    pub parent: PathBuf,
    pub count: usize,
    pub prefix: String,
    pub suffix: String,
    pub padding: usize,
    pub start_index: i64,
    pub dry_run: bool,
}

impl FolderOptions {
    #[must_use]
    pub fn new(parent: PathBuf, count: usize, prefix: &str, suffix: &str) -> Self {
        Self {
            parent,
            count,
            prefix: prefix.trim().to_string(),
            suffix: suffix.trim().to_string(),
            padding: 4,
            start_index: 1,
            dry_run: false,
        }
    }

    /// Folder names in creation order.
    pub fn folder_names(&self) -> impl Iterator<Item = String> + '_ {
        (self.start_index..)
            .take(self.count)
            .map(|index| folder_name(&self.prefix, &self.suffix, index, self.padding))
    }
}

impl fmt::Display for FolderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Folder creator options:")?;
        writeln!(f, "  parent: {}", self.parent.display())?;
        writeln!(f, "  count: {}", self.count)?;
        writeln!(f, "  prefix: \"{}\"", self.prefix)?;
        writeln!(f, "  suffix: \"{}\"", self.suffix)?;
        writeln!(f, "  padding: {}", self.padding)?;
        writeln!(f, "  start index: {}", self.start_index)?;
        write!(f, "  dryrun: {}", self.dry_run)
    }
}

/// Build a folder name.
///
/// ```rust
/// use file_tools::folder_creator::folder_name;
///
/// assert_eq!(folder_name("test", "bseong", 1, 4), "test_0001_bseong");
/// ```
#[must_use]
pub fn folder_name(prefix: &str, suffix: &str, index: i64, padding: usize) -> String {
    format!("{prefix}_{}_{suffix}", format_number(index, padding))
}

/// Creates the folders described by [`FolderOptions`].
#[derive(Debug)]
pub struct FolderCreator {
    options: FolderOptions,
}

impl FolderCreator {
    #[must_use]
    pub const fn new(options: FolderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &FolderOptions {
        &self.options
    }

    /// Check the options before anything is created.
    ///
    /// # Errors
    /// Returns an error for a zero count, a start index too close to the numeric limit,
    /// a blank or illegal prefix or suffix, or a parent path whose own parent does not exist.
    pub fn validate(&self) -> Result<(), ToolError> {
        let options = &self.options;
        let parent_usable = options.parent.exists() || options.parent.parent().is_some_and(|dir| dir.is_dir());
        if !parent_usable || (options.parent.exists() && !options.parent.is_dir()) {
            return Err(ToolError::InvalidDirectory(options.parent.clone()));
        }
        if options.count == 0 {
            return Err(ToolError::InvalidCount);
        }
        if i64::try_from(options.count)
            .ok()
            .and_then(|count| options.start_index.checked_add(count))
            .is_none()
        {
            return Err(ToolError::IndexOutOfRange {
                start: options.start_index,
                count: options.count,
            });
        }
        for (label, value) in [("prefix", &options.prefix), ("suffix", &options.suffix)] {
            if value.trim().is_empty() {
                return Err(ToolError::invalid_name(value.as_str(), format!("{label} is empty")));
            }
            if let Some(c) = value.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
                return Err(ToolError::invalid_name(
                    value.as_str(),
                    format!("{label} contains reserved character '{c}'"),
                ));
            }
        }
        options.folder_names().try_for_each(|name| validate_file_name(&name))
    }

    /// Create all folders, reporting through `events`.
    ///
    /// Existing folders are left as they are and still count as done.
    ///
    /// # Errors
    /// Returns an error if validation fails or a folder cannot be created.
    pub fn create(&self, events: &Sender<Event>) -> Result<usize, ToolError> {
        self.validate()?;
        let options = &self.options;
        let total = options.count;

        if !options.parent.exists() && !options.dry_run {
            fs::create_dir_all(&options.parent)
                .map_err(|e| ToolError::file_system("create directory", &options.parent, e))?;
        }

        let _ = events.send(Event::Progress { current: 0, total });
        let _ = events.send(Event::Log(format!(
            "Creating {total} folders in {}",
            options.parent.display()
        )));

        let mut done = 0;
        for (number, name) in options.folder_names().enumerate() {
            let path = options.parent.join(&name);
            let tag = if path.exists() {
                "exists"
            } else {
                if !options.dry_run {
                    fs::create_dir(&path).map_err(|e| ToolError::file_system("create directory", &path, e))?;
                }
                "create"
            };
            let _ = events.send(Event::Log(format!("[{tag}] {name}")));
            done += 1;
            let _ = events.send(Event::Progress {
                current: number + 1,
                total,
            });
        }
        Ok(done)
    }

    /// Run to completion with exactly one terminal event.
    pub fn run(&self, events: &Sender<Event>) {
        let terminal = match self.create(events) {
            Ok(succeeded) => Event::Finished {
                succeeded,
                total: self.options.count,
            },
            Err(error) => Event::Failed(error.to_string()),
        };
        let _ = events.send(terminal);
    }
}

impl fmt::Display for FolderCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.options)
    }
}

impl Job for FolderCreator {
    fn execute(self, events: &Sender<Event>) {
        self.run(events);
    }
}
