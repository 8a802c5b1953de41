use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use file_tools::folder_creator::FolderOptions;
use file_tools::labels::ModeLabels;
use file_tools::renamer::{
    DestinationPolicy, IndexBase, NamingMode, NamingRule, OutputMode, RenameOptions, SelectionRule,
};

use crate::{FolderArgs, RenameArgs};

/// Final renamer config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct RenamerConfig {
    pub(crate) options: RenameOptions,
    pub(crate) preview: bool,
    pub(crate) scan: bool,
    pub(crate) verbose: bool,
}

/// Final folder creator config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct FolderConfig {
    pub(crate) options: FolderOptions,
    pub(crate) verbose: bool,
}

/// Renamer config from the `[renamer]` section of the user config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenamerUserConfig {
    pattern: Option<String>,
    keep: bool,
    mode: Option<String>,
    index_base: Option<String>,
    padding: Option<usize>,
    multiplier: Option<f64>,
    offset: Option<i64>,
    prefix: Option<String>,
    postfix: Option<String>,
    folder_prefix: bool,
    reset: bool,
    output: Option<String>,
    flat: bool,
    #[serde(rename = "move")]
    move_files: bool,
    overwrite: bool,
    dryrun: bool,
    shallow: bool,
    verbose: bool,
    labels: Option<PathBuf>,
}

/// Folder creator config from the `[folder_creator]` section of the user config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FolderUserConfig {
    count: Option<usize>,
    prefix: Option<String>,
    suffix: Option<String>,
    padding: Option<usize>,
    start_index: Option<i64>,
    dryrun: bool,
    verbose: bool,
}

impl RenamerUserConfig {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        file_tools::config::parse_section(toml_str, "renamer")
    }
}

impl FolderUserConfig {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        file_tools::config::parse_section(toml_str, "folder_creator")
    }
}

/// Use the first non-blank string.
fn pick_string(cli: Option<String>, user: Option<String>) -> Option<String> {
    cli.filter(|value| !value.trim().is_empty())
        .or_else(|| user.filter(|value| !value.trim().is_empty()))
}

impl RenamerConfig {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if a mode label is not known.
    pub fn from_args(args: RenameArgs) -> anyhow::Result<Self> {
        let user_config: RenamerUserConfig = file_tools::config::read_section("renamer")?;
        let root = file_tools::resolve_input_path(args.path.as_deref())?;
        Self::from_args_with_user_config(args, user_config, root)
    }

    /// Merge CLI args over user config values. CLI values win, flags are combined.
    pub(crate) fn from_args_with_user_config(
        args: RenameArgs,
        user_config: RenamerUserConfig,
        root: PathBuf,
    ) -> anyhow::Result<Self> {
        let labels = match args.labels.as_ref().or(user_config.labels.as_ref()) {
            Some(path) => ModeLabels::from_file(path)?,
            None => ModeLabels::builtin(),
        };

        let mode = if args.keep {
            NamingMode::KeepOriginal
        } else if let Some(label) = pick_string(args.mode, user_config.mode) {
            labels
                .naming_mode(&label)
                .with_context(|| format!("Unknown naming mode: '{label}'"))?
        } else if user_config.keep {
            NamingMode::KeepOriginal
        } else {
            NamingMode::SequentialTransform
        };

        let base = match pick_string(args.base, user_config.index_base) {
            Some(label) => labels
                .index_base(&label)
                .with_context(|| format!("Unknown index base: '{label}'"))?,
            None => IndexBase::default(),
        };

        let selection = match args.select.as_deref() {
            Some([offset, divisor]) => SelectionRule::new(*offset, *divisor),
            Some(values) => anyhow::bail!("Selection needs an offset and a divisor, got {values:?}"),
            None => SelectionRule::default(),
        };

        let defaults = NamingRule::default();
        let rule = NamingRule {
            mode,
            multiplier: args.multiplier.or(user_config.multiplier).unwrap_or(defaults.multiplier),
            offset: args.offset.or(user_config.offset).unwrap_or(defaults.offset),
            pad_width: args.width.or(user_config.padding).unwrap_or(defaults.pad_width),
            prefix: args.prefix.or(user_config.prefix).unwrap_or_default(),
            postfix: args.postfix.or(user_config.postfix).unwrap_or_default(),
            folder_prefix: args.folder_prefix || user_config.folder_prefix,
            base,
            reset_per_folder: args.reset || user_config.reset,
            selection,
        };

        let output = match pick_string(args.output, user_config.output) {
            Some(label) => Some(
                labels
                    .output_mode(&label)
                    .with_context(|| format!("Unknown output mode: '{label}'"))?,
            ),
            None => None,
        };
        let destination = match (output, args.dest) {
            (Some(OutputMode::InPlace), Some(dest)) => anyhow::bail!(
                "Output mode '{}' does not take a destination directory: {}",
                OutputMode::InPlace.method_name(),
                dest.display()
            ),
            (Some(OutputMode::Mirrored), None) => anyhow::bail!(
                "Output mode '{}' needs a destination directory",
                OutputMode::Mirrored.method_name()
            ),
            (Some(OutputMode::Mirrored) | None, Some(dest)) => DestinationPolicy::Mirrored {
                root: file_tools::resolve_output_path(&dest)?,
                preserve_structure: !(args.flat || user_config.flat),
            },
            (Some(OutputMode::InPlace) | None, None) => DestinationPolicy::InPlace,
        };

        let verbose = args.verbose || user_config.verbose;
        let mut options = RenameOptions::new(root);
        if let Some(pattern) = pick_string(args.pattern, user_config.pattern) {
            options.pattern = pattern;
        }
        options.recursive = !(args.shallow || user_config.shallow);
        options.rule = rule;
        options.destination = destination;
        options.move_files = args.move_files || user_config.move_files;
        options.overwrite = args.force || user_config.overwrite;
        options.dry_run = args.print || user_config.dryrun;
        options.verbose = verbose;

        Ok(Self {
            options,
            preview: args.preview,
            scan: args.scan,
            verbose,
        })
    }
}

impl FolderConfig {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if count, prefix or suffix is missing from both.
    pub fn from_args(args: FolderArgs) -> anyhow::Result<Self> {
        let user_config: FolderUserConfig = file_tools::config::read_section("folder_creator")?;
        Self::from_args_with_user_config(args, user_config)
    }

    pub(crate) fn from_args_with_user_config(args: FolderArgs, user_config: FolderUserConfig) -> anyhow::Result<Self> {
        let count = args
            .count
            .or(user_config.count)
            .context("Folder count is required")?;
        let prefix = pick_string(args.prefix, user_config.prefix).context("Folder prefix is required")?;
        let suffix = pick_string(args.suffix, user_config.suffix).context("Folder suffix is required")?;
        let parent = file_tools::resolve_output_path(&args.parent)?;

        let mut options = FolderOptions::new(parent, count, &prefix, &suffix);
        if let Some(padding) = args.width.or(user_config.padding) {
            options.padding = padding;
        }
        if let Some(start_index) = args.start.or(user_config.start_index) {
            options.start_index = start_index;
        }
        options.dry_run = args.print || user_config.dryrun;

        Ok(Self {
            options,
            verbose: args.verbose || user_config.verbose,
        })
    }
}
