use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::worker::Event;

/// Simple run log with buffered writes.
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileLogger {
    /// Create a new file logger, writing to `~/logs/file-tools/<tool>_<timestamp>.log`
    ///
    /// # Errors
    /// Returns an error if the home directory is unknown or the log file cannot be created.
    pub fn new(tool_id: &str) -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Self::in_directory(&home_dir.join("logs").join(env!("CARGO_PKG_NAME")), tool_id)
    }

    /// Create a new file logger in the given directory.
    ///
    /// # Errors
    /// Returns an error if the directory or the log file cannot be created.
    pub fn in_directory(log_dir: &Path, tool_id: &str) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let path = log_dir.join(format!("{tool_id}_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S")));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log the parameters of a run.
    pub fn log_init(&mut self, options: &impl Display) {
        let _ = writeln!(self.writer, "[{}] INIT", Self::timestamp());
        let _ = writeln!(self.writer, "{options}");
        let _ = self.writer.flush();
    }

    /// Log one worker event. Progress is not logged.
    pub fn log_event(&mut self, event: &Event) {
        match event {
            Event::Progress { .. } => return,
            Event::Log(text) => {
                for line in text.lines() {
                    let _ = writeln!(self.writer, "[{}] {line}", Self::timestamp());
                }
            }
            Event::Finished { succeeded, total } => {
                let _ = writeln!(self.writer, "[{}] FINISHED {succeeded}/{total}", Self::timestamp());
            }
            Event::Failed(message) => {
                let _ = writeln!(self.writer, "[{}] ERROR {message}", Self::timestamp());
            }
        }
        if event.is_terminal() {
            let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        }
        let _ = self.writer.flush();
    }
}
