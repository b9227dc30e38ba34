pub mod error;
pub mod marker;
pub mod segments;
pub mod splitter;

pub use error::{MarkerError, SplitError};
pub use marker::{Marker, MarkerPair, MarkerRole};
pub use segments::{Segment, Segments};
pub use splitter::{Mode, RegionStats, SplitOutput, Splitter};
