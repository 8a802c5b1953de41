use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use itertools::Itertools;

use crate::ToolError;
use crate::natural_sort::NaturalKey;
use crate::renamer::{
    DestinationPolicy, FileEntry, IndexedEntry, NamingRule, WriteMode, assign, filter, scan, validate_file_name,
    write,
};
use crate::worker::{Event, Job};

/// Stage of a renamer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineState {
    #[default]
    Idle,
    Scanning,
    Pairing,
    Filtering,
    /// Every rename is computed and nothing has been written.
    Planned,
    Writing,
    Completed,
    Failed,
}

/// All parameters of one renamer run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameOptions {
    pub root: PathBuf,
    /// Glob matched against file names.
    pub pattern: String,
    pub recursive: bool,
    pub rule: NamingRule,
    pub destination: DestinationPolicy,
    pub move_files: bool,
    pub overwrite: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl RenameOptions {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            pattern: "*".to_string(),
            recursive: true,
            rule: NamingRule::default(),
            destination: DestinationPolicy::default(),
            move_files: false,
            overwrite: false,
            dry_run: false,
            verbose: false,
        }
    }

    #[must_use]
    pub const fn write_mode(&self) -> WriteMode {
        WriteMode {
            move_files: self.move_files,
            overwrite: self.overwrite,
            dry_run: self.dry_run,
        }
    }
}

impl fmt::Display for RenameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = &self.rule;
        writeln!(f, "Renamer options:")?;
        writeln!(f, "  root: {}", self.root.display())?;
        writeln!(f, "  pattern: {}", self.pattern)?;
        writeln!(f, "  recursive: {}", self.recursive)?;
        writeln!(f, "  mode: {}", rule.mode)?;
        writeln!(f, "  multiplier: {}", rule.multiplier)?;
        writeln!(f, "  offset: {}", rule.offset)?;
        writeln!(f, "  padding: {}", rule.pad_width)?;
        writeln!(f, "  prefix: \"{}\"", rule.prefix)?;
        writeln!(f, "  postfix: \"{}\"", rule.postfix)?;
        writeln!(f, "  folder prefix: {}", rule.folder_prefix)?;
        writeln!(f, "  index base: {}", rule.base)?;
        writeln!(f, "  reset per folder: {}", rule.reset_per_folder)?;
        if rule.selection.is_active() {
            writeln!(
                f,
                "  select: offset {} divisor {}",
                rule.selection.offset, rule.selection.divisor
            )?;
        }
        writeln!(f, "  output: {}", self.destination)?;
        writeln!(f, "  move: {}", self.move_files)?;
        writeln!(f, "  overwrite: {}", self.overwrite)?;
        writeln!(f, "  dryrun: {}", self.dry_run)?;
        write!(f, "  verbose: {}", self.verbose)
    }
}

/// One file with its computed name and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRename {
    pub source: FileEntry,
    pub index: i64,
    pub new_name: String,
    pub destination: PathBuf,
}

impl PlannedRename {
    /// `[tag] <relative dir> | <source name> -> <relative destination>`
    #[must_use]
    pub fn log_line(&self, tag: &str, options: &RenameOptions) -> String {
        format!(
            "[{tag}] {} | {} -> {}",
            self.source.relative_dir_display(),
            self.source.file_name(),
            options.destination.relative_display(&options.root, &self.destination)
        )
    }
}

/// Group planned renames by destination directory for the preview listing.
///
/// Directories are in natural order, files keep their planned order.
#[must_use]
pub fn group_by_destination(plan: &[PlannedRename]) -> Vec<(PathBuf, Vec<&PlannedRename>)> {
    plan.iter()
        .into_group_map_by(|item| item.destination.parent().map(Path::to_path_buf).unwrap_or_default())
        .into_iter()
        .sorted_by_cached_key(|(dir, _)| (NaturalKey::new(&crate::path_to_string(dir)), dir.clone()))
        .collect()
}

/// A scanned file with its index and whether the selection rule keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub entry: FileEntry,
    pub index: i64,
    pub selected: bool,
}

/// Group the scan listing by relative folder, `.` for the scan root.
///
/// Folders are ordered case-insensitively, files keep their listing order.
#[must_use]
pub fn group_by_folder(listing: &[ScannedFile]) -> Vec<(String, Vec<&ScannedFile>)> {
    listing
        .iter()
        .into_group_map_by(|file| file.entry.relative_key())
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)))
        .map(|(key, files)| (if key.is_empty() { ".".to_string() } else { key }, files))
        .collect()
}

/// Drives one renamer run from scanning to writing.
#[derive(Debug)]
pub struct Renamer {
    options: RenameOptions,
    state: PipelineState,
}

impl Renamer {
    #[must_use]
    pub const fn new(options: RenameOptions) -> Self {
        Self {
            options,
            state: PipelineState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub const fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Compute every rename without touching the filesystem.
    ///
    /// # Errors
    /// Returns an error if the scan root is not a directory, the pattern is invalid,
    /// or any affix or computed name is not a legal file name.
    pub fn plan(&mut self) -> Result<Vec<PlannedRename>, ToolError> {
        let result = self.build_plan();
        if result.is_err() {
            self.state = PipelineState::Failed;
        }
        result
    }

    /// List every matching file with its index, marking the ones the selection rule keeps.
    ///
    /// # Errors
    /// Returns an error if the scan root is not a directory, the pattern is invalid,
    /// or an affix is not a legal file name.
    pub fn scan_listing(&mut self) -> Result<Vec<ScannedFile>, ToolError> {
        let result = self.scan_indexed().map(|indexed| {
            let selection = &self.options.rule.selection;
            indexed
                .into_iter()
                .map(|item| ScannedFile {
                    selected: selection.matches(item.index),
                    entry: item.entry,
                    index: item.index,
                })
                .collect()
        });
        if result.is_err() {
            self.state = PipelineState::Failed;
        }
        result
    }

    /// Run the whole pipeline, reporting through `events`.
    ///
    /// Always ends with exactly one `Finished` or `Failed` event.
    pub fn run(&mut self, events: &Sender<Event>) {
        let terminal = match self.execute_run(events) {
            Ok((succeeded, total)) => {
                self.state = PipelineState::Completed;
                Event::Finished { succeeded, total }
            }
            Err(error) => {
                self.state = PipelineState::Failed;
                Event::Failed(error.to_string())
            }
        };
        let _ = events.send(terminal);
    }

    fn scan_indexed(&mut self) -> Result<Vec<IndexedEntry>, ToolError> {
        let options = &self.options;
        if !options.root.is_dir() {
            return Err(ToolError::InvalidDirectory(options.root.clone()));
        }
        options.rule.validate()?;

        self.state = PipelineState::Scanning;
        let entries = scan(&options.root, &options.pattern, options.recursive)?;

        self.state = PipelineState::Pairing;
        Ok(assign(entries, options.rule.base, options.rule.reset_per_folder))
    }

    fn build_plan(&mut self) -> Result<Vec<PlannedRename>, ToolError> {
        let indexed = self.scan_indexed()?;

        self.state = PipelineState::Filtering;
        let options = &self.options;
        let selected = filter(indexed, &options.rule.selection);

        let mut plan = Vec::with_capacity(selected.len());
        for item in selected {
            item.entry.check_unicode()?;
            let new_name = options.rule.file_name(&item)?;
            validate_file_name(&new_name)?;
            let destination = options.destination.resolve(&item.entry, &new_name);
            plan.push(PlannedRename {
                source: item.entry,
                index: item.index,
                new_name,
                destination,
            });
        }
        self.state = PipelineState::Planned;
        Ok(plan)
    }

    fn execute_run(&mut self, events: &Sender<Event>) -> Result<(usize, usize), ToolError> {
        let plan = self.build_plan()?;
        let total = plan.len();
        if total == 0 {
            return Ok((0, 0));
        }

        self.state = PipelineState::Writing;
        let options = &self.options;
        let mode = options.write_mode();
        let log = options.verbose || options.dry_run;

        let _ = events.send(Event::Progress { current: 0, total });
        let mut succeeded = 0;
        for (number, item) in plan.iter().enumerate() {
            let outcome = write(&item.source.path, &item.destination, &mode)?;
            if log {
                let tag = mode.tag(outcome.classification());
                let _ = events.send(Event::Log(item.log_line(tag, options)));
            }
            succeeded += 1;
            let _ = events.send(Event::Progress {
                current: number + 1,
                total,
            });
        }

        Ok((succeeded, total))
    }
}

impl fmt::Display for Renamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.options)
    }
}

impl Job for Renamer {
    fn execute(mut self, events: &Sender<Event>) {
        self.run(events);
    }
}
