mod config;
mod shell;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use file_tools::folder_creator::FolderCreator;
use file_tools::registry::{Registry, Tool};
use file_tools::renamer::Renamer;

use crate::config::{FolderConfig, RenamerConfig};

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Batch file renamer and folder creator"
)]
pub struct FileToolsArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available tools
    Tools,

    /// Rename files with sequential numbers or their original names
    Rename(RenameArgs),

    /// Create numbered folders named PREFIX_NNNN_SUFFIX
    Folders(FolderArgs),

    /// Generate shell completion
    Completion {
        /// Target shell
        shell: Shell,

        /// Write the completion file to the shell completion directory
        #[arg(short = 'I', long)]
        install: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct RenameArgs {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Glob pattern for file names
    #[arg(short = 'g', long = "glob", name = "PATTERN")]
    pub pattern: Option<String>,

    /// Keep the original file name instead of numbering
    #[arg(short = 'k', long, conflicts_with = "LABEL")]
    pub keep: bool,

    /// Naming mode by display label or internal name
    #[arg(long, name = "LABEL")]
    pub mode: Option<String>,

    /// Index base: 0 or 1, or an index base label
    #[arg(short = 'b', long, name = "BASE")]
    pub base: Option<String>,

    /// Zero padding width of the number
    #[arg(short = 'w', long, name = "WIDTH")]
    pub width: Option<usize>,

    /// Index multiplier
    #[arg(short = 'm', long = "mul", name = "MULTIPLIER", allow_negative_numbers = true)]
    pub multiplier: Option<f64>,

    /// Index offset
    #[arg(short = 'o', long, name = "OFFSET", allow_negative_numbers = true)]
    pub offset: Option<i64>,

    /// Prefix for new names
    #[arg(short = 'x', long)]
    pub prefix: Option<String>,

    /// Postfix for new names
    #[arg(short = 'u', long)]
    pub postfix: Option<String>,

    /// Put the relative folder names in front of the prefix
    #[arg(short = 'F', long)]
    pub folder_prefix: bool,

    /// Only keep files where (index - OFFSET) mod DIVISOR == 0
    #[arg(
        short = 's',
        long,
        num_args = 2,
        value_names = ["OFFSET", "DIVISOR"],
        allow_negative_numbers = true
    )]
    pub select: Option<Vec<i64>>,

    /// Restart numbering in each folder
    #[arg(short = 'r', long)]
    pub reset: bool,

    /// Output mode by display label or internal name
    #[arg(long, name = "OUTPUT")]
    pub output: Option<String>,

    /// Write renamed files to this directory instead of renaming in place
    #[arg(short = 'd', long, name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// Put all files directly in the destination without subfolders
    #[arg(short = 't', long, requires = "DIR")]
    pub flat: bool,

    /// Move files instead of copying
    #[arg(short = 'M', long = "move")]
    pub move_files: bool,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Only print changes without writing files
    #[arg(short = 'p', long)]
    pub print: bool,

    /// List the planned names grouped by destination folder and exit
    #[arg(short = 'P', long)]
    pub preview: bool,

    /// List all matching files with their index and mark the selected ones, then exit
    #[arg(long, conflicts_with = "preview")]
    pub scan: bool,

    /// Only include files directly in the input directory
    #[arg(short = 'S', long)]
    pub shallow: bool,

    /// Path to a JSON file with mode labels
    #[arg(short = 'l', long, name = "JSON", value_hint = clap::ValueHint::FilePath)]
    pub labels: Option<PathBuf>,

    /// Print verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct FolderArgs {
    /// Parent directory for the new folders
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub parent: PathBuf,

    /// Number of folders to create
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Folder name prefix
    #[arg(short = 'x', long)]
    pub prefix: Option<String>,

    /// Folder name suffix
    #[arg(short = 'u', long)]
    pub suffix: Option<String>,

    /// Zero padding width of the number
    #[arg(short = 'w', long, name = "WIDTH")]
    pub width: Option<usize>,

    /// First folder number
    #[arg(short = 's', long, name = "INDEX", allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Only print folders without creating them
    #[arg(short = 'p', long)]
    pub print: bool,

    /// Print verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn main() {
    if let Err(error) = run(FileToolsArgs::parse()) {
        file_tools::print_error!("{error:#}");
        std::process::exit(1);
    }
}

fn run(args: FileToolsArgs) -> Result<()> {
    let registry = Registry::builtin();
    match args.command {
        Command::Tools => {
            list_tools(&registry);
            Ok(())
        }
        Command::Rename(rename_args) => {
            let config = RenamerConfig::from_args(rename_args)?;
            let mut renamer = Renamer::new(config.options);
            if config.scan {
                shell::print_scan(&mut renamer)
            } else if config.preview {
                shell::print_preview(&mut renamer)
            } else {
                shell::run_tool(&registry, Tool::Renamer, renamer, config.verbose)
            }
        }
        Command::Folders(folder_args) => {
            let config = FolderConfig::from_args(folder_args)?;
            shell::run_tool(
                &registry,
                Tool::FolderCreator,
                FolderCreator::new(config.options),
                config.verbose,
            )
        }
        Command::Completion { shell, install } => {
            file_tools::generate_shell_completion(shell, FileToolsArgs::command(), install, env!("CARGO_BIN_NAME"))
        }
    }
}

fn list_tools(registry: &Registry) {
    for info in registry.tools() {
        println!("{:<16}{}", info.id.bold(), info.name);
        println!("{:<16}{}", "", info.description.dimmed());
    }
}
