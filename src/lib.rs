pub mod cli;
pub mod config;
pub mod constants;
pub mod document;
pub mod io;
pub mod pipeline;
pub mod split;

pub use split::{Mode, MarkerPair, SplitError, Splitter};
