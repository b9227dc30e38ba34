use std::path::PathBuf;

/// One bilingual source file, read in full
#[derive(Debug, Clone)]
pub struct Document {
    pub folder: PathBuf,
    pub path: PathBuf,
    pub contents: String,
}
