use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::ToolError;
use crate::natural_sort;

/// A scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file.
    pub path: PathBuf,
    /// Parent directory relative to the scan root, empty for files directly in the root.
    pub relative_parent: PathBuf,
    pub stem: String,
    /// File extension including the leading dot, or an empty string.
    pub extension: String,
}

impl FileEntry {
    #[must_use]
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative_parent = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = crate::path_to_file_stem_string(&path);
        let extension = path
            .extension()
            .map(|ext| format!(".{}", crate::os_str_to_string(ext)))
            .unwrap_or_default();

        Self {
            path,
            relative_parent,
            stem,
            extension,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        crate::path_to_filename_string(&self.path)
    }

    /// Relative parent directory with forward slashes, empty for the scan root.
    #[must_use]
    pub fn relative_key(&self) -> String {
        crate::path_to_slash_string(&self.relative_parent)
    }

    /// Relative parent directory for display, `.` for the scan root.
    #[must_use]
    pub fn relative_dir_display(&self) -> String {
        let key = self.relative_key();
        if key.is_empty() { ".".to_string() } else { key }
    }

    /// Fail for names that cannot be carried into a new name without loss.
    ///
    /// # Errors
    /// Returns `InvalidName` if the file name or its relative folder is not valid Unicode.
    pub fn check_unicode(&self) -> Result<(), ToolError> {
        let name = self.path.file_name().unwrap_or_default();
        if name.to_str().is_none() {
            return Err(ToolError::invalid_name(
                name.to_string_lossy(),
                "file name is not valid Unicode",
            ));
        }
        if self.relative_parent.to_str().is_none() {
            return Err(ToolError::invalid_name(
                self.relative_parent.to_string_lossy(),
                "folder name is not valid Unicode",
            ));
        }
        Ok(())
    }
}

/// List regular files under `root` whose file name matches `pattern`.
///
/// The result is naturally sorted by file name.
/// A root that does not exist gives an empty list.
pub fn scan(root: &Path, pattern: &str, recursive: bool) -> Result<Vec<FileEntry>, ToolError> {
    let matcher = Pattern::new(pattern).map_err(|source| ToolError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry?;
        if entry.path().is_file() && matcher.matches(&crate::os_str_to_string(entry.file_name())) {
            paths.push(entry.into_path());
        }
    }

    natural_sort::sort_paths(&mut paths);
    Ok(paths.into_iter().map(|path| FileEntry::new(root, path)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{self, File};

    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("Failed to create file");
    }

    fn create_subdir(dir: &Path, name: &str) -> PathBuf {
        let subdir = dir.join(name);
        fs::create_dir_all(&subdir).expect("Failed to create subdir");
        subdir
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(FileEntry::file_name).collect()
    }

    #[test]
    fn test_check_unicode_accepts_valid_names() {
        let root = Path::new("/data");
        let entry = FileEntry::new(root, root.join("sub/kuva_ä.bmp"));
        assert!(entry.check_unicode().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_check_unicode_rejects_invalid_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/data");
        let entry = FileEntry::new(root, root.join(OsStr::from_bytes(b"frame\xfe.bmp")));
        assert!(matches!(entry.check_unicode(), Err(ToolError::InvalidName { .. })));

        let entry = FileEntry::new(root, root.join(OsStr::from_bytes(b"sub\xfe")).join("frame.bmp"));
        let error = entry.check_unicode().unwrap_err();
        assert!(error.to_string().contains("folder name"));
    }

    #[test]
    fn test_scan_natural_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["frame10.bmp", "frame2.bmp", "frame1.bmp"] {
            create_file(temp_dir.path(), name);
        }

        let entries = scan(temp_dir.path(), "*", false).unwrap();
        assert_eq!(names(&entries), ["frame1.bmp", "frame2.bmp", "frame10.bmp"]);
    }

    #[test]
    fn test_scan_filters_by_pattern() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "a.bmp");
        create_file(temp_dir.path(), "b.png");
        create_file(temp_dir.path(), "c.bmp");

        let entries = scan(temp_dir.path(), "*.bmp", false).unwrap();
        assert_eq!(names(&entries), ["a.bmp", "c.bmp"]);
    }

    #[test]
    fn test_scan_excludes_directories() {
        let temp_dir = TempDir::new().unwrap();
        create_subdir(temp_dir.path(), "folder.bmp");
        create_file(temp_dir.path(), "file.bmp");

        let entries = scan(temp_dir.path(), "*.bmp", true).unwrap();
        assert_eq!(names(&entries), ["file.bmp"]);
    }

    #[test]
    fn test_scan_recursive_and_shallow() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "root.txt");
        let sub = create_subdir(temp_dir.path(), "sub");
        create_file(&sub, "nested.txt");
        let deep = create_subdir(&sub, "deep");
        create_file(&deep, "deeper.txt");

        assert_eq!(scan(temp_dir.path(), "*.txt", false).unwrap().len(), 1);

        let entries = scan(temp_dir.path(), "*.txt", true).unwrap();
        assert_eq!(names(&entries), ["deeper.txt", "nested.txt", "root.txt"]);
    }

    #[test]
    fn test_scan_sets_relative_parent() {
        let temp_dir = TempDir::new().unwrap();
        let deep = create_subdir(temp_dir.path(), "sub1/sub2");
        create_file(&deep, "f.txt");
        create_file(temp_dir.path(), "g.txt");

        let entries = scan(temp_dir.path(), "*", true).unwrap();
        assert_eq!(entries[0].relative_key(), "sub1/sub2");
        assert_eq!(entries[1].relative_key(), "");
        assert_eq!(entries[1].relative_dir_display(), ".");
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let entries = scan(&temp_dir.path().join("missing"), "*", true).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_scan_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let result = scan(temp_dir.path(), "[", true);
        assert!(matches!(result, Err(ToolError::InvalidPattern { .. })));
    }

    #[test]
    fn test_scan_is_repeatable() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b3.txt", "a1.txt", "c20.txt", "c3.txt"] {
            create_file(temp_dir.path(), name);
        }
        let first = scan(temp_dir.path(), "*", true).unwrap();
        let second = scan(temp_dir.path(), "*", true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_entry_stem_and_extension() {
        let root = Path::new("/data");
        let entry = FileEntry::new(root, PathBuf::from("/data/shots/clip.tar.gz"));
        assert_eq!(entry.stem, "clip.tar");
        assert_eq!(entry.extension, ".gz");
        assert_eq!(entry.relative_parent, PathBuf::from("shots"));

        let entry = FileEntry::new(root, PathBuf::from("/data/README"));
        assert_eq!(entry.stem, "README");
        assert_eq!(entry.extension, "");
    }
}
