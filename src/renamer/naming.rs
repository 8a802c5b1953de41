use std::fmt;
use std::path::{Component, Path};

use crate::ToolError;
use crate::renamer::{IndexBase, IndexedEntry, SelectionRule};

/// Characters that are never allowed in a prefix, postfix or folder name segment.
pub const RESERVED_CHARACTERS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum length of an assembled file name in characters.
pub const MAX_NAME_LENGTH: usize = 255;

const AFFIX_SEPARATORS: &[char] = &['_', '-'];

/// How the core token of a new name is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingMode {
    /// Number computed from the file index.
    #[default]
    SequentialTransform,
    /// Original file stem.
    KeepOriginal,
}

impl NamingMode {
    /// Internal method name used by the mode label mapping.
    #[must_use]
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::SequentialTransform => "build_new_name",
            Self::KeepOriginal => "build_keep_name",
        }
    }

    #[must_use]
    pub fn from_method_name(name: &str) -> Option<Self> {
        match name.trim() {
            "build_new_name" => Some(Self::SequentialTransform),
            "build_keep_name" => Some(Self::KeepOriginal),
            _ => None,
        }
    }
}

impl fmt::Display for NamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequentialTransform => write!(f, "sequential-transform"),
            Self::KeepOriginal => write!(f, "keep-original"),
        }
    }
}

/// All parameters that decide the new name of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct NamingRule {
    pub mode: NamingMode,
    pub multiplier: f64,
    pub offset: i64,
    pub pad_width: usize,
    pub prefix: String,
    pub postfix: String,
    /// Put the relative parent folder names in front of the prefix.
    pub folder_prefix: bool,
    pub base: IndexBase,
    pub reset_per_folder: bool,
    pub selection: SelectionRule,
}

impl Default for NamingRule {
    fn default() -> Self {
        Self {
            mode: NamingMode::default(),
            multiplier: 1.0,
            offset: 0,
            pad_width: 4,
            prefix: String::new(),
            postfix: String::new(),
            folder_prefix: false,
            base: IndexBase::default(),
            reset_per_folder: false,
            selection: SelectionRule::default(),
        }
    }
}

impl NamingRule {
    /// Check user-given prefix and postfix before anything is scanned.
    ///
    /// # Errors
    /// Returns `InvalidName` if either contains a reserved character.
    pub fn validate(&self) -> Result<(), ToolError> {
        validate_affix("prefix", &self.prefix)?;
        validate_affix("postfix", &self.postfix)
    }

    /// Compute the new file name for an indexed entry.
    ///
    /// # Errors
    /// Returns `InvalidName` if the folder prefix is enabled and a parent folder name is not usable.
    pub fn file_name(&self, indexed: &IndexedEntry) -> Result<String, ToolError> {
        let entry = &indexed.entry;
        let prefix = if self.folder_prefix {
            let folders = folder_prefix(&entry.relative_parent)?;
            join_prefix(&folders, &self.prefix)
        } else {
            self.prefix.clone()
        };

        Ok(match self.mode {
            NamingMode::SequentialTransform => build_new_name(
                indexed.index,
                &entry.extension,
                self.pad_width,
                self.multiplier,
                self.offset,
                &prefix,
                &self.postfix,
            ),
            NamingMode::KeepOriginal => build_keep_name(&entry.stem, &entry.extension, &prefix, &self.postfix),
        })
    }
}

/// Apply the linear transform `index * multiplier + offset` and round half to even.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn compute_index(index: i64, multiplier: f64, offset: i64) -> i64 {
    (index as f64 * multiplier + offset as f64).round_ties_even() as i64
}

/// Render a number zero-padded to `pad_width` characters.
///
/// The width counts the minus sign of negative numbers. Longer numbers are never truncated.
///
/// ```rust
/// use file_tools::renamer::format_number;
///
/// assert_eq!(format_number(7, 4), "0007");
/// assert_eq!(format_number(-5, 4), "-005");
/// assert_eq!(format_number(12345, 2), "12345");
/// assert_eq!(format_number(3, 0), "3");
/// ```
#[must_use]
pub fn format_number(value: i64, pad_width: usize) -> String {
    if pad_width == 0 {
        value.to_string()
    } else {
        format!("{value:0pad_width$}")
    }
}

/// Build a new file name from an index.
///
/// ```rust
/// use file_tools::renamer::build_new_name;
///
/// assert_eq!(build_new_name(1, ".bmp", 4, 1.0, 0, "frame", ""), "frame_0001.bmp");
/// ```
#[must_use]
pub fn build_new_name(
    index: i64,
    extension: &str,
    pad_width: usize,
    multiplier: f64,
    offset: i64,
    prefix: &str,
    postfix: &str,
) -> String {
    let digits = format_number(compute_index(index, multiplier, offset), pad_width);
    assemble(&digits, extension, prefix, postfix)
}

/// Build a file name that keeps the original stem.
///
/// ```rust
/// use file_tools::renamer::build_keep_name;
///
/// assert_eq!(
///     build_keep_name("original_file", ".bmp", "pre", "post"),
///     "pre_original_file_post.bmp"
/// );
/// ```
#[must_use]
pub fn build_keep_name(stem: &str, extension: &str, prefix: &str, postfix: &str) -> String {
    assemble(stem, extension, prefix, postfix)
}

/// Join the relative parent folder names with underscores for use as a prefix.
///
/// # Errors
/// Returns `InvalidName` if a folder name is blank or contains a reserved character.
pub fn folder_prefix(relative_parent: &Path) -> Result<String, ToolError> {
    let mut segments = Vec::new();
    for component in relative_parent.components() {
        let Component::Normal(name) = component else {
            return Err(ToolError::invalid_name(
                crate::path_to_string(relative_parent),
                "folder prefix must be a plain relative path",
            ));
        };
        let segment = crate::os_str_to_string(name);
        if segment.trim().is_empty() {
            return Err(ToolError::invalid_name(
                crate::path_to_string(relative_parent),
                "folder name is empty",
            ));
        }
        if let Some(c) = segment.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
            return Err(ToolError::invalid_name(
                segment,
                format!("folder name contains reserved character '{c}'"),
            ));
        }
        segments.push(segment);
    }
    Ok(segments.join("_"))
}

/// Check a prefix or postfix.
///
/// Blank values are allowed since they are treated as absent.
///
/// # Errors
/// Returns `InvalidName` if the value contains a reserved character.
pub fn validate_affix(label: &str, value: &str) -> Result<(), ToolError> {
    let value = value.trim();
    if let Some(c) = value.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(ToolError::invalid_name(
            value,
            format!("{label} contains reserved character '{c}'"),
        ));
    }
    Ok(())
}

/// Check an assembled file name.
///
/// # Errors
/// Returns `InvalidName` if the name is blank, a relative directory name,
/// contains a path separator or is longer than [`MAX_NAME_LENGTH`] characters.
pub fn validate_file_name(name: &str) -> Result<(), ToolError> {
    if name.trim().is_empty() {
        return Err(ToolError::invalid_name(name, "name is empty"));
    }
    if name == "." || name == ".." {
        return Err(ToolError::invalid_name(name, "name is a relative directory"));
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(ToolError::invalid_name(
            name,
            format!("name contains path separator or null character {c:?}"),
        ));
    }
    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ToolError::invalid_name(
            name,
            format!("name is {length} characters long, the maximum is {MAX_NAME_LENGTH}"),
        ));
    }
    Ok(())
}

fn join_prefix(folders: &str, prefix: &str) -> String {
    let prefix = prefix.trim();
    match (folders.is_empty(), prefix.is_empty()) {
        (true, _) => prefix.to_string(),
        (false, true) => folders.to_string(),
        (false, false) => format!("{folders}_{prefix}"),
    }
}

/// `prefix + sep + core + sep + postfix + extension`,
/// where a separator is only added when the affix does not already provide one.
fn assemble(core: &str, extension: &str, prefix: &str, postfix: &str) -> String {
    let prefix = prefix.trim();
    let postfix = postfix.trim();

    let mut name = String::with_capacity(prefix.len() + core.len() + postfix.len() + extension.len() + 2);
    if !prefix.is_empty() {
        name.push_str(prefix);
        if !prefix.ends_with(AFFIX_SEPARATORS) {
            name.push('_');
        }
    }
    name.push_str(core);
    if !postfix.is_empty() {
        if !postfix.starts_with(AFFIX_SEPARATORS) {
            name.push('_');
        }
        name.push_str(postfix);
    }
    name.push_str(extension);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::renamer::FileEntry;

    fn indexed(relative: &str, index: i64) -> IndexedEntry {
        let root = Path::new("/root");
        IndexedEntry {
            entry: FileEntry::new(root, root.join(relative)),
            index,
        }
    }

    #[test]
    fn test_build_new_name_basic() {
        assert_eq!(build_new_name(1, ".bmp", 4, 1.0, 0, "frame", ""), "frame_0001.bmp");
    }

    #[test]
    fn test_build_new_name_without_prefix_or_padding() {
        assert_eq!(build_new_name(12, ".png", 0, 1.0, 0, "", ""), "12.png");
        assert_eq!(build_new_name(12, "", 3, 1.0, 0, "", ""), "012");
    }

    #[test]
    fn test_build_new_name_separator_rules() {
        assert_eq!(build_new_name(3, ".bmp", 2, 1.0, 0, "img_", "_l"), "img_03_l.bmp");
        assert_eq!(build_new_name(3, ".bmp", 2, 1.0, 0, "img-", "-l"), "img-03-l.bmp");
        assert_eq!(build_new_name(3, ".bmp", 2, 1.0, 0, "img", "left"), "img_03_left.bmp");
    }

    #[test]
    fn test_build_new_name_blank_affixes_are_absent() {
        assert_eq!(build_new_name(5, ".bmp", 2, 1.0, 0, "   ", "\t"), "05.bmp");
        assert_eq!(build_new_name(5, ".bmp", 2, 1.0, 0, " cam ", " top "), "cam_05_top.bmp");
    }

    #[test]
    fn test_build_new_name_linear_transform() {
        assert_eq!(build_new_name(3, ".bmp", 4, 2.0, 10, "f", ""), "f_0016.bmp");
        assert_eq!(build_new_name(3, ".bmp", 4, 0.5, 0, "f", ""), "f_0002.bmp");
    }

    #[test]
    fn test_compute_index_rounds_half_to_even() {
        assert_eq!(compute_index(1, 0.5, 0), 0);
        assert_eq!(compute_index(3, 0.5, 0), 2);
        assert_eq!(compute_index(5, 0.5, 0), 2);
        assert_eq!(compute_index(7, 0.5, 0), 4);
        assert_eq!(compute_index(-1, 0.5, 0), 0);
        assert_eq!(compute_index(-3, 0.5, 0), -2);
        assert_eq!(compute_index(2, 0.4, 0), 1);
    }

    #[test]
    fn test_negative_numbers_keep_sign_inside_width() {
        assert_eq!(build_new_name(1, ".bmp", 4, 1.0, -6, "f", ""), "f_-005.bmp");
        assert_eq!(format_number(-12345, 3), "-12345");
    }

    #[test]
    fn test_build_keep_name() {
        assert_eq!(
            build_keep_name("original_file", ".bmp", "pre", "post"),
            "pre_original_file_post.bmp"
        );
        assert_eq!(
            build_keep_name("original_file", ".bmp", "pre_", "_post"),
            "pre_original_file_post.bmp"
        );
        assert_eq!(build_keep_name("original_file", ".bmp", "", ""), "original_file.bmp");
    }

    #[test]
    fn test_rule_file_name_by_mode() {
        let item = indexed("shot.bmp", 2);
        let mut rule = NamingRule {
            prefix: "cam".to_string(),
            ..NamingRule::default()
        };
        assert_eq!(rule.file_name(&item).unwrap(), "cam_0002.bmp");

        rule.mode = NamingMode::KeepOriginal;
        assert_eq!(rule.file_name(&item).unwrap(), "cam_shot.bmp");
    }

    #[test]
    fn test_rule_folder_prefix() {
        let rule = NamingRule {
            prefix: "frame".to_string(),
            folder_prefix: true,
            pad_width: 2,
            ..NamingRule::default()
        };
        assert_eq!(rule.file_name(&indexed("day1/cam2/a.bmp", 1)).unwrap(), "day1_cam2_frame_01.bmp");
        assert_eq!(rule.file_name(&indexed("a.bmp", 1)).unwrap(), "frame_01.bmp");

        let rule = NamingRule {
            folder_prefix: true,
            pad_width: 2,
            ..NamingRule::default()
        };
        assert_eq!(rule.file_name(&indexed("day1/a.bmp", 1)).unwrap(), "day1_01.bmp");
    }

    #[test]
    fn test_folder_prefix_rejects_reserved_characters() {
        let result = folder_prefix(Path::new("ok/bad*name"));
        assert!(matches!(result, Err(ToolError::InvalidName { .. })));
        let result = folder_prefix(Path::new("ok/   "));
        assert!(matches!(result, Err(ToolError::InvalidName { .. })));
        assert_eq!(folder_prefix(Path::new("")).unwrap(), "");
    }

    #[test]
    fn test_validate_affix() {
        assert!(validate_affix("prefix", "frame").is_ok());
        assert!(validate_affix("prefix", "   ").is_ok());
        for bad in ["a/b", "a\\b", "a:b", "a*", "a?", "\"a\"", "<a", "a>", "a|b"] {
            assert!(validate_affix("prefix", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_rule_validate_reports_postfix() {
        let rule = NamingRule {
            postfix: "x?".to_string(),
            ..NamingRule::default()
        };
        let error = rule.validate().unwrap_err();
        assert!(error.to_string().contains("postfix"));
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("frame_0001.bmp").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("  ").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("a/b.bmp").is_err());
        assert!(validate_file_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_file_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_naming_mode_method_names() {
        for mode in [NamingMode::SequentialTransform, NamingMode::KeepOriginal] {
            assert_eq!(NamingMode::from_method_name(mode.method_name()), Some(mode));
        }
        assert_eq!(NamingMode::from_method_name("unknown"), None);
    }
}
