//! Mapping between the labels shown to the user and internal mode names.
//!
//! Labels are read from a JSON document with one group per option:
//!
//! ```json
//! { "rename_modes": { "display": ["New name"], "mapping": { "New name": "build_new_name" } } }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::renamer::{IndexBase, NamingMode, OutputMode};

const BUILTIN_LABELS: &str = include_str!("labels.json");

/// Display order and label mapping for one option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelGroup<T> {
    pub display: Vec<String>,
    pub mapping: HashMap<String, T>,
}

impl<T> LabelGroup<T> {
    fn get(&self, label: &str) -> Option<&T> {
        self.mapping.get(label.trim())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModeLabels {
    pub rename_modes: LabelGroup<String>,
    pub output_modes: LabelGroup<String>,
    pub index_base_options: LabelGroup<i64>,
}

impl ModeLabels {
    /// Labels embedded in the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_LABELS).expect("Built-in labels should be valid JSON")
    }

    /// Parse labels from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid or has wrong types.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse labels JSON")
    }

    /// Read labels from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read labels file: {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("Invalid labels file: {}", path.display()))
    }

    /// Naming mode for a display label. The internal method name is accepted as well.
    #[must_use]
    pub fn naming_mode(&self, label: &str) -> Option<NamingMode> {
        let method = self.rename_modes.get(label).map_or(label, String::as_str);
        NamingMode::from_method_name(method)
    }

    /// Output mode for a display label. The internal name is accepted as well.
    #[must_use]
    pub fn output_mode(&self, label: &str) -> Option<OutputMode> {
        let method = self.output_modes.get(label).map_or(label, String::as_str);
        OutputMode::from_method_name(method)
    }

    /// Index base for a display label. Plain `0` and `1` are accepted as well.
    #[must_use]
    pub fn index_base(&self, label: &str) -> Option<IndexBase> {
        let value = match self.index_base_options.get(label) {
            Some(value) => *value,
            None => label.trim().parse().ok()?,
        };
        IndexBase::from_value(value)
    }
}
