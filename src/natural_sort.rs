//! Natural ordering for file names, so that `file2` sorts before `file10`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One run of a name: either a digit run or the text between digit runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Digit run with leading zeros removed, compared by numeric value.
    Number(String),
    /// Lower-cased non-digit run.
    Text(String),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Digits are normalized, so a longer run is always the larger number.
            (Self::Number(a), Self::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key splitting a name into alternating text and number tokens.
///
/// ```rust
/// use file_tools::natural_sort::NaturalKey;
///
/// let mut names = vec!["a2", "a10", "a1"];
/// names.sort_by_key(|name| NaturalKey::new(name));
/// assert_eq!(names, ["a1", "a2", "a10"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Token>);

impl NaturalKey {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for c in name.chars() {
            let is_digit = c.is_ascii_digit();
            if is_digit != in_digits && !current.is_empty() {
                tokens.push(Self::token(&current, in_digits));
                current.clear();
            }
            in_digits = is_digit;
            current.push(c);
        }
        if !current.is_empty() {
            tokens.push(Self::token(&current, in_digits));
        }

        Self(tokens)
    }

    /// Key for the final component of a path.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self::new(&crate::path_to_filename_string(path))
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    fn token(run: &str, digits: bool) -> Token {
        if digits {
            let trimmed = run.trim_start_matches('0');
            Token::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
        } else {
            Token::Text(run.to_lowercase())
        }
    }
}

/// Compare two names in natural order.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

/// Sort paths naturally by file name.
///
/// Paths with equal keys fall back to plain path order so the result is always deterministic.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| (NaturalKey::for_path(path), path.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(std::string::ToString::to_string).collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn numbers_sort_by_value() {
        assert_eq!(sorted(&["a2", "a10", "a1"]), ["a1", "a2", "a10"]);
        assert_eq!(sorted(&["file10", "file2"]), ["file2", "file10"]);
    }

    #[test]
    fn text_is_case_insensitive() {
        assert_eq!(natural_cmp("Frame1", "frame1"), Ordering::Equal);
        assert_eq!(sorted(&["b1", "A2", "a1"]), ["a1", "A2", "b1"]);
    }

    #[test]
    fn leading_zeros_do_not_change_value() {
        assert_eq!(natural_cmp("img007", "img7"), Ordering::Equal);
        assert_eq!(natural_cmp("img0010", "img9"), Ordering::Greater);
        assert_eq!(natural_cmp("0", "000"), Ordering::Equal);
    }

    #[test]
    fn shorter_key_sorts_first() {
        assert_eq!(natural_cmp("frame", "frame1"), Ordering::Less);
        assert_eq!(natural_cmp("frame1", "frame1.bmp"), Ordering::Less);
    }

    #[test]
    fn numbers_sort_before_text() {
        assert_eq!(natural_cmp("1abc", "abc"), Ordering::Less);
    }

    #[test]
    fn very_long_numbers_are_compared_without_overflow() {
        let big = "f123456789012345678901234567890";
        let bigger = "f123456789012345678901234567891";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
    }

    #[test]
    fn tokens_split_on_digit_runs() {
        let key = NaturalKey::new("Shot12_take3.bmp");
        assert_eq!(
            key.tokens(),
            [
                Token::Text("shot".to_string()),
                Token::Number("12".to_string()),
                Token::Text("_take".to_string()),
                Token::Number("3".to_string()),
                Token::Text(".bmp".to_string()),
            ]
        );
    }

    #[test]
    fn empty_name_has_empty_key() {
        assert!(NaturalKey::new("").tokens().is_empty());
    }

    #[test]
    fn sort_paths_uses_file_name_only() {
        let mut paths = vec![
            PathBuf::from("z/file10.txt"),
            PathBuf::from("a/file2.txt"),
            PathBuf::from("m/file1.txt"),
        ];
        sort_paths(&mut paths);
        assert_eq!(
            paths,
            [
                PathBuf::from("m/file1.txt"),
                PathBuf::from("a/file2.txt"),
                PathBuf::from("z/file10.txt"),
            ]
        );
    }

    #[test]
    fn sort_paths_ties_are_deterministic() {
        let mut first = vec![PathBuf::from("b/f1.txt"), PathBuf::from("a/f1.txt")];
        let mut second = vec![PathBuf::from("a/f1.txt"), PathBuf::from("b/f1.txt")];
        sort_paths(&mut first);
        sort_paths(&mut second);
        assert_eq!(first, second);
    }
}
