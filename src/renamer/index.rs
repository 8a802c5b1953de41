use std::fmt;

use itertools::Itertools;

use crate::natural_sort::natural_cmp;
use crate::renamer::FileEntry;

/// Starting value for index enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

impl IndexBase {
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    #[must_use]
    pub const fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            _ => None,
        }
    }
}

impl fmt::Display for IndexBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A scanned file paired with its index for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry {
    pub entry: FileEntry,
    pub index: i64,
}

/// Keep only entries whose index satisfies `(index - offset) mod divisor == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRule {
    pub enabled: bool,
    pub offset: i64,
    pub divisor: i64,
}

impl SelectionRule {
    #[must_use]
    pub const fn new(offset: i64, divisor: i64) -> Self {
        Self {
            enabled: true,
            offset,
            divisor,
        }
    }

    /// The rule only applies when enabled with a positive divisor.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && self.divisor > 0
    }

    /// Check a single index, using the Euclidean remainder so negative values behave like positive ones.
    #[must_use]
    pub fn matches(&self, index: i64) -> bool {
        if !self.is_active() {
            return true;
        }
        (i128::from(index) - i128::from(self.offset)).rem_euclid(i128::from(self.divisor)) == 0
    }
}

/// Assign an index to every entry.
///
/// Without reset, entries are numbered in the given order starting from `base`.
/// With reset, entries are grouped by their relative parent directory,
/// groups are ordered case-insensitively by their relative path,
/// and numbering restarts from `base` in each group.
#[must_use]
pub fn assign(entries: Vec<FileEntry>, base: IndexBase, reset_per_folder: bool) -> Vec<IndexedEntry> {
    let base = base.value();
    if !reset_per_folder {
        return entries
            .into_iter()
            .zip(base..)
            .map(|(entry, index)| IndexedEntry { entry, index })
            .collect();
    }

    let mut groups = entries.into_iter().into_group_map_by(FileEntry::relative_key);
    let keys: Vec<String> = groups
        .keys()
        .cloned()
        .sorted_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)))
        .collect();

    let mut indexed = Vec::new();
    for key in keys {
        let Some(mut group) = groups.remove(&key) else {
            continue;
        };
        group.sort_by(|a, b| natural_cmp(&a.file_name(), &b.file_name()));
        indexed.extend(
            group
                .into_iter()
                .zip(base..)
                .map(|(entry, index)| IndexedEntry { entry, index }),
        );
    }
    indexed
}

/// Apply the selection rule, preserving order.
#[must_use]
pub fn filter(indexed: Vec<IndexedEntry>, rule: &SelectionRule) -> Vec<IndexedEntry> {
    if !rule.is_active() {
        return indexed;
    }
    indexed.into_iter().filter(|item| rule.matches(item.index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};

    fn entry(relative: &str) -> FileEntry {
        let root = Path::new("/root");
        FileEntry::new(root, root.join(relative))
    }

    fn indexes(indexed: &[IndexedEntry]) -> Vec<(String, i64)> {
        indexed.iter().map(|item| (item.entry.file_name(), item.index)).collect()
    }

    fn indexed_range(range: std::ops::RangeInclusive<i64>) -> Vec<IndexedEntry> {
        range
            .map(|index| IndexedEntry {
                entry: entry(&format!("f{index}.txt")),
                index,
            })
            .collect()
    }

    #[test]
    fn test_assign_sequential_from_one() {
        let entries = vec![entry("a.txt"), entry("sub/b.txt"), entry("c.txt")];
        let indexed = assign(entries, IndexBase::One, false);
        assert_eq!(
            indexes(&indexed),
            [("a.txt".to_string(), 1), ("b.txt".to_string(), 2), ("c.txt".to_string(), 3)]
        );
    }

    #[test]
    fn test_assign_sequential_from_zero() {
        let indexed = assign(vec![entry("a.txt"), entry("b.txt")], IndexBase::Zero, false);
        assert_eq!(indexed[0].index, 0);
        assert_eq!(indexed[1].index, 1);
    }

    #[test]
    fn test_assign_reset_per_folder() {
        let entries = vec![entry("a.txt"), entry("sub/b.txt"), entry("sub/c.txt")];
        let indexed = assign(entries, IndexBase::One, true);
        assert_eq!(
            indexes(&indexed),
            [("a.txt".to_string(), 1), ("b.txt".to_string(), 1), ("c.txt".to_string(), 2)]
        );
    }

    #[test]
    fn test_assign_reset_orders_groups_case_insensitively() {
        let entries = vec![
            entry("beta/x1.txt"),
            entry("Alpha/x1.txt"),
            entry("alpha2/x1.txt"),
            entry("Beta2/x2.txt"),
        ];
        let indexed = assign(entries, IndexBase::Zero, true);
        let folders: Vec<PathBuf> = indexed.iter().map(|item| item.entry.relative_parent.clone()).collect();
        assert_eq!(
            folders,
            [
                PathBuf::from("Alpha"),
                PathBuf::from("alpha2"),
                PathBuf::from("beta"),
                PathBuf::from("Beta2"),
            ]
        );
        assert!(indexed.iter().all(|item| item.index == 0));
    }

    #[test]
    fn test_assign_reset_natural_sorts_within_group() {
        let entries = vec![entry("sub/f10.txt"), entry("sub/f2.txt"), entry("sub/f1.txt")];
        let indexed = assign(entries, IndexBase::One, true);
        assert_eq!(
            indexes(&indexed),
            [("f1.txt".to_string(), 1), ("f2.txt".to_string(), 2), ("f10.txt".to_string(), 3)]
        );
    }

    #[test]
    fn test_assign_is_deterministic() {
        let entries = vec![entry("x/b.txt"), entry("a.txt"), entry("x/a.txt"), entry("Y/c.txt")];
        let first = assign(entries.clone(), IndexBase::One, true);
        let second = assign(entries, IndexBase::One, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_assign_empty() {
        assert!(assign(Vec::new(), IndexBase::One, false).is_empty());
        assert!(assign(Vec::new(), IndexBase::One, true).is_empty());
    }

    #[test]
    fn test_filter_offset_and_divisor() {
        let kept = filter(indexed_range(1..=6), &SelectionRule::new(1, 3));
        let kept: Vec<i64> = kept.iter().map(|item| item.index).collect();
        assert_eq!(kept, [1, 4]);
    }

    #[test]
    fn test_filter_disabled_or_zero_divisor_keeps_all() {
        let disabled = SelectionRule {
            enabled: false,
            offset: 1,
            divisor: 3,
        };
        assert_eq!(filter(indexed_range(1..=6), &disabled).len(), 6);
        assert_eq!(filter(indexed_range(1..=6), &SelectionRule::new(0, 0)).len(), 6);
        assert_eq!(filter(indexed_range(1..=6), &SelectionRule::new(0, -2)).len(), 6);
    }

    #[test]
    fn test_filter_negative_operands_use_euclidean_modulo() {
        let rule = SelectionRule::new(5, 2);
        assert!(rule.matches(1));
        assert!(rule.matches(-1));
        assert!(!rule.matches(0));
        let kept: Vec<i64> = filter(indexed_range(0..=4), &rule).iter().map(|item| item.index).collect();
        assert_eq!(kept, [1, 3]);
    }

    #[test]
    fn test_index_base_values() {
        assert_eq!(IndexBase::from_value(0), Some(IndexBase::Zero));
        assert_eq!(IndexBase::from_value(1), Some(IndexBase::One));
        assert_eq!(IndexBase::from_value(2), None);
        assert_eq!(IndexBase::default().value(), 1);
    }
}
