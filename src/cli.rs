use crate::constants::{
    DEFAULT_END_MARKER, DEFAULT_PRIMARY_NAME, DEFAULT_SECONDARY_NAME, DEFAULT_SOURCE_NAME,
    DEFAULT_START_MARKER,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "langsplit")]
#[command(
    about = "Find bilingual source documents and split each one into a primary-language \
             file and a secondary-language file."
)]
pub struct Cli {
    /// Directories or files to search (supporting globs), defaults to "."
    #[arg(default_value = ".", num_args(1..))]
    pub paths: Vec<String>,

    /// Marker opening a secondary-language region.
    #[arg(long = "start", default_value = DEFAULT_START_MARKER)]
    pub start: String,

    /// Marker closing a secondary-language region.
    #[arg(long = "end", default_value = DEFAULT_END_MARKER)]
    pub end: String,

    /// Treat --start and --end as regular expressions instead of literal text.
    #[arg(short = 'r', long = "regex")]
    pub regex: bool,

    /// File name identifying a bilingual source document.
    #[arg(long = "source-name", default_value = DEFAULT_SOURCE_NAME)]
    pub source_name: String,

    /// File name for the primary-language output, written beside the source.
    #[arg(long = "primary-name", default_value = DEFAULT_PRIMARY_NAME)]
    pub primary_name: String,

    /// File name for the secondary-language output, written beside the source.
    #[arg(long = "secondary-name", default_value = DEFAULT_SECONDARY_NAME)]
    pub secondary_name: String,

    /// Glob patterns to exclude documents from processing.
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Also visit hidden and .gitignore'd paths.
    #[arg(long = "no-ignore")]
    pub no_ignore: bool,

    /// Only validate marker balance; write nothing.
    #[arg(long = "check", conflicts_with = "dry_run")]
    pub check: bool,

    /// Split documents and report the destinations without writing them.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Log each document as it is processed.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
