use std::fmt;
use std::io;

use crate::split::marker::MarkerRole;

/// Invalid marker configuration, rejected before any document is touched.
#[derive(Debug)]
pub enum MarkerError {
    Empty {
        role: MarkerRole,
    },
    Identical {
        pattern: String,
    },
    InvalidPattern {
        role: MarkerRole,
        source: regex::Error,
    },
    MatchesEmpty {
        role: MarkerRole,
        pattern: String,
    },
}

impl fmt::Display for MarkerError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            MarkerError::Empty { role } => write!(f, "{role} marker must not be empty"),
            MarkerError::Identical { pattern } => {
                write!(f, "start and end markers must differ (both are {pattern:?})")
            }
            MarkerError::InvalidPattern { role, source } => {
                write!(f, "invalid {role} marker pattern: {source}")
            }
            MarkerError::MatchesEmpty { role, pattern } => {
                write!(f, "{role} marker pattern {pattern:?} matches the empty string")
            }
        }
    }
}

impl std::error::Error for MarkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarkerError::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure while splitting one document.
#[derive(Debug)]
pub enum SplitError {
    /// A start marker has no end marker after it.
    UnterminatedRegion {
        start: String,
        end: String,
        offset: usize,
        line: usize,
    },
    /// A start marker appears inside a region that is still open.
    NestedStart {
        start: String,
        offset: usize,
        line: usize,
        region_line: usize,
    },
    /// The sink rejected a write.
    Io(io::Error),
}

impl SplitError {
    /// True for marker-structure failures, which abort a whole batch.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            SplitError::UnterminatedRegion { .. } | SplitError::NestedStart { .. }
        )
    }
}

impl fmt::Display for SplitError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            SplitError::UnterminatedRegion {
                start,
                end,
                offset,
                line,
            } => write!(
                f,
                "no end marker {end:?} found for start marker {start:?} at line {line} (byte {offset})"
            ),
            SplitError::NestedStart {
                start,
                offset,
                line,
                region_line,
            } => write!(
                f,
                "nested start marker {start:?} at line {line} (byte {offset}) inside region opened at line {region_line}; nested regions are not supported"
            ),
            SplitError::Io(e) => write!(f, "failed to write split output: {e}"),
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SplitError {
    fn from(e: io::Error) -> Self {
        SplitError::Io(e)
    }
}
