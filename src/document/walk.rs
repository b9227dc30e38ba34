pub use crate::document::types::Document;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use glob::glob;
use ignore::WalkBuilder;

/// How the directory walk decides which files are source documents.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Exact file name of a bilingual source document.
    pub source_name: String,
    /// Honour hidden-file and .gitignore filtering.
    pub standard_filters: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            source_name: crate::constants::DEFAULT_SOURCE_NAME.to_string(),
            standard_filters: true,
        }
    }
}

pub fn expand_roots(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for p in paths {
        // Normalize Windows path separators for glob patterns
        let pattern = p.replace('\\', "/");
        let pattern_results =
            glob(&pattern).map_err(|e| anyhow!("Invalid glob pattern {}: {:?}", pattern, e))?;

        let mut has_match = false;
        for path_res in pattern_results {
            has_match = true;
            expanded.push(path_res?);
        }
        // No matches: keep it as a literal path and let the walk report it
        if !has_match {
            expanded.push(PathBuf::from(p));
        }
    }

    Ok(expanded)
}

/// Returns every source document under `roots`, sorted and deduplicated.
///
/// A root that is itself a file qualifies only if its name matches.
pub fn find_documents(
    roots: &[PathBuf],
    options: &WalkOptions,
) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for root in roots {
        if !root.exists() {
            tracing::warn!("{:?} does not exist. Skipping.", root);
            continue;
        }

        let walker = WalkBuilder::new(root)
            .follow_links(false)
            .standard_filters(options.standard_filters)
            .require_git(false)
            .build();

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
                    if is_file && is_source(entry.path(), &options.source_name) {
                        results.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Could not process entry in {:?}: {}", root, e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

fn is_source(
    path: &Path,
    source_name: &str,
) -> bool {
    path.file_name().is_some_and(|n| n == source_name)
}

/// Reads a whole document into memory.
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let contents = String::from_utf8(bytes)
        .map_err(|_| anyhow!("{} is not valid UTF-8", path.display()))?;
    Ok(Document {
        folder: path.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
        path: path.to_path_buf(),
        contents,
    })
}
