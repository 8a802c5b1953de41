use std::fmt::Display;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use file_tools::logger::FileLogger;
use file_tools::registry::{Registry, Tool};
use file_tools::renamer::{Renamer, ScannedFile, group_by_destination, group_by_folder};
use file_tools::worker::{self, Event, Job};

const PROGRESS_BAR_CHARS: &str = "=> ";
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} {percent}%";

/// Run a tool job on the worker thread and render its events.
///
/// Log lines are printed above the progress bar and written to the run log file.
pub fn run_tool<J>(registry: &Registry, tool: Tool, job: J, verbose: bool) -> Result<()>
where
    J: Job + Display,
{
    let name = registry.get(tool.id()).map_or_else(|| tool.id(), |info| info.name);
    println!("{}", name.bold().magenta());
    if verbose {
        println!("{job}");
    }

    let mut logger = match FileLogger::new(tool.id()) {
        Ok(mut logger) => {
            logger.log_init(&job);
            Some(logger)
        }
        Err(error) => {
            file_tools::print_warning!("Run log disabled: {error:#}");
            None
        }
    };

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .expect("Failed to set progress bar template")
            .progress_chars(PROGRESS_BAR_CHARS),
    );

    let handle = worker::spawn(job).context("Failed to start worker thread")?;
    let terminal = handle.wait(|event| {
        if let Some(logger) = logger.as_mut() {
            logger.log_event(event);
        }
        match event {
            Event::Log(text) => progress_bar.suspend(|| {
                for line in text.lines() {
                    println!("{}", colorize_log_line(line));
                }
            }),
            Event::Progress { current, total } => {
                progress_bar.set_length(*total as u64);
                progress_bar.set_position(*current as u64);
            }
            Event::Finished { .. } | Event::Failed(_) => progress_bar.finish_and_clear(),
        }
    });

    if let Some(logger) = &logger
        && verbose
    {
        println!("Log file: {}", logger.path().display());
    }

    match terminal {
        Event::Finished { succeeded, total } => {
            let summary = format!("Done: {succeeded}/{total}");
            println!("{}", if succeeded == total { summary.green() } else { summary.yellow() });
            Ok(())
        }
        Event::Failed(message) => Err(anyhow::anyhow!("{name} failed: {message}")),
        _ => Ok(()),
    }
}

/// Print the planned renames grouped by destination folder without writing anything.
pub fn print_preview(renamer: &mut Renamer) -> Result<()> {
    let plan = renamer.plan()?;
    if plan.is_empty() {
        println!("No matching files");
        return Ok(());
    }

    let root = renamer.options().root.clone();
    for (directory, items) in group_by_destination(&plan) {
        let display = directory
            .strip_prefix(&root)
            .map_or_else(|_| file_tools::path_to_string(&directory), file_tools::path_to_slash_string);
        println!("{}", if display.is_empty() { ".".to_string() } else { display }.bold().cyan());
        for item in items {
            println!(
                "  {:>6}  {} -> {}",
                item.index,
                item.source.file_name(),
                item.new_name.green()
            );
        }
    }
    println!("{} files", plan.len());
    Ok(())
}

/// Print every matching file per folder with its index, marking the files the selection keeps.
pub fn print_scan(renamer: &mut Renamer) -> Result<()> {
    let listing = renamer.scan_listing()?;
    if listing.is_empty() {
        println!("No matching files");
        return Ok(());
    }

    for (folder, files) in group_by_folder(&listing) {
        println!("{}", folder.bold().cyan());
        for file in files {
            println!("{}", format_scanned_file(file));
        }
    }
    let selected = listing.iter().filter(|file| file.selected).count();
    println!("{selected}/{} files selected", listing.len());
    Ok(())
}

fn format_scanned_file(file: &ScannedFile) -> ColoredString {
    let line = format!(
        "  {} {:>6}  {}",
        if file.selected { "*" } else { " " },
        file.index,
        file.entry.file_name()
    );
    if file.selected { line.green() } else { line.dimmed() }
}

/// Colour a log line by its `[tag]`.
fn colorize_log_line(line: &str) -> ColoredString {
    let Some(tag) = line.strip_prefix('[').and_then(|rest| rest.split_once(']')).map(|(tag, _)| tag) else {
        return line.normal();
    };
    match tag {
        "skip" | "exists" => line.yellow(),
        "overwrite" => line.red(),
        "move" | "copy" | "create" => line.green(),
        _ => line.normal(),
    }
}
