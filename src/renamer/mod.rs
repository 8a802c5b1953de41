//! Batch file renamer.
//!
//! A run scans a folder for files matching a glob pattern, pairs every file
//! with an index, optionally keeps only every n-th index, computes a new name
//! for each file and finally moves or copies it to its destination.
//! Every stage is deterministic, so a dry run shows exactly what a real run does.

mod destination;
mod index;
mod naming;
mod pipeline;
mod scan;
mod writer;

pub use destination::{DestinationPolicy, OutputMode};
pub use index::{IndexBase, IndexedEntry, SelectionRule, assign, filter};
pub use naming::{
    MAX_NAME_LENGTH, NamingMode, NamingRule, RESERVED_CHARACTERS, build_keep_name, build_new_name, compute_index,
    folder_prefix, format_number, validate_affix, validate_file_name,
};
pub use pipeline::{
    PipelineState, PlannedRename, RenameOptions, Renamer, ScannedFile, group_by_destination, group_by_folder,
};
pub use scan::{FileEntry, scan};
pub use writer::{Classification, WriteMode, WriteOutcome, classify, write};
