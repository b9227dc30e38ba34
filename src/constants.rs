// Centralized default values
pub const DEFAULT_START_MARKER: &str = "<cn>";
pub const DEFAULT_END_MARKER: &str = "</cn>";
pub const DEFAULT_SOURCE_NAME: &str = "_index.md";
pub const DEFAULT_PRIMARY_NAME: &str = "index.md";
pub const DEFAULT_SECONDARY_NAME: &str = "index.md.cn";

/// Exit code used when a document has malformed marker regions.
pub const EXIT_MALFORMED: i32 = 3;
/// Exit code for any other failure.
pub const EXIT_FAILURE: i32 = 1;
