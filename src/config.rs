use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use serde::de::DeserializeOwned;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Path to the user config file: `$HOME/.config/file-tools.toml`
///
/// Returns `None` if the home directory cannot be determined.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});

/// Get the user config file path if the home directory is known.
#[must_use]
pub fn config_path() -> Option<&'static Path> {
    CONFIG_PATH.as_deref()
}

/// Read one tool section from the user config file.
///
/// A missing config file or a missing section gives the default config.
///
/// # Errors
/// Returns an error if config file exists but cannot be read or parsed.
pub fn read_section<T: DeserializeOwned + Default>(section: &str) -> anyhow::Result<T> {
    let Some(path) = config_path() else {
        return Ok(T::default());
    };

    match fs::read_to_string(path) {
        Ok(content) => parse_section(&content, section)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e:#}", path.display())),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(error) => Err(anyhow::anyhow!(
            "Failed to read config file {}: {error}",
            path.display()
        )),
    }
}

/// Parse one tool section from a TOML string.
///
/// # Errors
/// Returns an error if the TOML string is invalid or the section has wrong types.
pub fn parse_section<T: DeserializeOwned + Default>(toml_str: &str, section: &str) -> anyhow::Result<T> {
    let mut table: toml::Table = toml::from_str(toml_str).context("Failed to parse config TOML")?;
    table.remove(section).map_or_else(
        || Ok(T::default()),
        |value| {
            value
                .try_into()
                .with_context(|| format!("Invalid values in [{section}] section"))
        },
    )
}
