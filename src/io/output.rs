use crate::split::SplitOutput;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File names the two outputs are written under, beside their source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub primary: String,
    pub secondary: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            primary: crate::constants::DEFAULT_PRIMARY_NAME.to_string(),
            secondary: crate::constants::DEFAULT_SECONDARY_NAME.to_string(),
        }
    }
}

/// Where one source document's outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub primary: PathBuf,
    pub secondary: PathBuf,
}

impl OutputNames {
    /// Output paths inside a document's folder.
    pub fn destinations_in(
        &self,
        folder: &Path,
    ) -> Destinations {
        Destinations {
            primary: folder.join(&self.primary),
            secondary: folder.join(&self.secondary),
        }
    }
}

/// Create or truncate both destination files with the split results.
///
/// Either both files are updated or the primary is put back the way it was,
/// so a failed document never leaves half of its outputs behind.
pub fn write_outputs(
    dest: &Destinations,
    output: &SplitOutput,
) -> Result<()> {
    let previous = fs::read(&dest.primary).ok();
    fs::write(&dest.primary, &output.primary)
        .with_context(|| format!("failed to write {}", dest.primary.display()))?;
    if let Err(e) = fs::write(&dest.secondary, &output.secondary) {
        restore(&dest.primary, previous.as_deref());
        return Err(e).with_context(|| format!("failed to write {}", dest.secondary.display()));
    }
    Ok(())
}

fn restore(
    path: &Path,
    previous: Option<&[u8]>,
) {
    let restored = match previous {
        Some(bytes) => fs::write(path, bytes),
        None => fs::remove_file(path),
    };
    if let Err(e) = restored {
        warn!("could not restore {}: {e}", path.display());
    }
}
