use crate::document::walk::{self, WalkOptions};
use crate::io::output::{self, OutputNames};
use crate::split::{RegionStats, SplitError, Splitter};
use anyhow::{Result, anyhow};
use globset::{Glob, GlobSetBuilder};
use path_slash::PathExt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A document whose markers do not form well-formed regions.
///
/// Fatal for the whole run: no further documents are processed.
#[derive(Debug)]
pub struct MalformedDocument {
    pub path: PathBuf,
    pub source: SplitError,
}

impl std::fmt::Display for MalformedDocument {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "malformed document {}", self.path.display())
    }
}

impl std::error::Error for MalformedDocument {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// What to do with each document once it has been split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Write both outputs beside the source.
    #[default]
    Write,
    /// Print the destinations instead of writing them.
    DryRun,
    /// Validate marker balance only.
    Check,
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub skipped: usize,
    pub regions: usize,
    pub stray_ends: usize,
}

impl RunReport {
    fn record(
        &mut self,
        stats: RegionStats,
    ) {
        self.processed += 1;
        self.regions += stats.regions;
        self.stray_ends += stats.stray_ends;
    }
}

/// Pipeline for discovering and splitting source documents.
#[derive(Default)]
pub struct Pipeline {
    root: PathBuf,
    roots: Vec<PathBuf>,
    documents: Vec<PathBuf>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand user-provided roots relative to the canonical working directory.
    pub fn expand_roots(
        &mut self,
        paths: &[String],
    ) -> Result<()> {
        let cwd = std::env::current_dir()?;
        self.root = dunce::canonicalize(cwd)?;
        self.roots = walk::expand_roots(paths)?;
        Ok(())
    }

    /// Walk the roots and collect every source document.
    pub fn find_documents(
        &mut self,
        options: &WalkOptions,
    ) -> Result<()> {
        let mut documents = walk::find_documents(&self.roots, options)?;
        for path in &mut documents {
            if let Ok(canon) = dunce::canonicalize(&*path) {
                *path = canon;
            }
        }
        documents.sort();
        documents.dedup();
        self.documents = documents;
        Ok(())
    }

    pub fn set_documents(
        &mut self,
        documents: Vec<PathBuf>,
    ) {
        self.documents = documents;
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    /// Drop documents matching any exclude pattern.
    ///
    /// Patterns match against the path relative to the working directory and
    /// against the absolute path. Invalid patterns are warned about and ignored.
    pub fn apply_excludes(
        &mut self,
        exclude: &[String],
    ) -> Result<()> {
        let mut builder = GlobSetBuilder::new();
        let mut valid = 0usize;
        for pattern in exclude {
            let normalized = pattern.replace('\\', "/");
            match Glob::new(&normalized) {
                Ok(glob) => {
                    builder.add(glob);
                    valid += 1;
                }
                Err(e) => warn!("invalid --exclude pattern: {pattern} ({e})"),
            }
        }
        if valid == 0 {
            if exclude.is_empty() {
                return Ok(());
            }
            return Err(anyhow!("every --exclude pattern was invalid: {:?}", exclude));
        }

        let matcher = builder.build()?;
        let root = &self.root;
        self.documents.retain(|path| {
            let abs = path.to_slash_lossy();
            let rel = path.strip_prefix(root).ok().map(|p| p.to_slash_lossy());
            let rel = rel.as_deref().unwrap_or(abs.as_ref());
            let excluded = matcher.is_match(rel) || matcher.is_match(abs.as_ref());
            if excluded {
                info!("excluded {}", path.display());
            }
            !excluded
        });
        Ok(())
    }

    /// Split every document in order.
    ///
    /// Unreadable or unwritable documents are skipped with a warning. A
    /// malformed document aborts the run with [`MalformedDocument`]; outputs of
    /// documents processed before it are left in place.
    pub fn run(
        &self,
        splitter: &Splitter,
        outputs: &OutputNames,
        mode: RunMode,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();

        for path in &self.documents {
            let doc = match walk::read_document(path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("{e:#}. Skipping.");
                    report.skipped += 1;
                    continue;
                }
            };

            // Check mode only needs the balance; the others split in the same pass.
            let (stats, split) = if mode == RunMode::Check {
                let stats = splitter
                    .validate(&doc.contents)
                    .map_err(|e| split_failure(path, e))?;
                (stats, None)
            } else {
                let split = splitter
                    .split_both(&doc.contents)
                    .map_err(|e| split_failure(path, e))?;
                (split.stats, Some(split))
            };
            if stats.stray_ends > 0 {
                warn!(
                    "{}: {} end marker(s) {:?} outside any region kept as text",
                    path.display(),
                    stats.stray_ends,
                    splitter.markers().end().as_str()
                );
            }

            if let Some(split) = split {
                let dest = outputs.destinations_in(&doc.folder);
                if mode == RunMode::DryRun {
                    println!("{} -> {}", path.display(), dest.primary.display());
                    println!("{} -> {}", path.display(), dest.secondary.display());
                } else if let Err(e) = output::write_outputs(&dest, &split) {
                    warn!("{e:#}. Skipping.");
                    report.skipped += 1;
                    continue;
                }
            }

            info!(
                path = %path.display(),
                regions = stats.regions,
                "split document"
            );
            report.record(stats);
        }

        Ok(report)
    }
}

fn split_failure(
    path: &Path,
    err: SplitError,
) -> anyhow::Error {
    if err.is_malformed() {
        anyhow!(MalformedDocument {
            path: path.to_path_buf(),
            source: err,
        })
    } else {
        anyhow::Error::new(err).context(format!("failed to split {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn pipeline_over(docs: Vec<PathBuf>) -> Pipeline {
        let mut p = Pipeline::new();
        p.set_documents(docs);
        p
    }

    #[test]
    fn run_writes_both_outputs() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("_index.md");
        fs::write(&src, "A<cn>B</cn>C")?;
        let report = pipeline_over(vec![src]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::Write,
        )?;
        assert_eq!(report.processed, 1);
        assert_eq!(report.regions, 1);
        assert_eq!(fs::read_to_string(dir.path().join("index.md"))?, "AC");
        assert_eq!(fs::read_to_string(dir.path().join("index.md.cn"))?, "B");
        Ok(())
    }

    #[test]
    fn check_mode_writes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("_index.md");
        fs::write(&src, "A<cn>B</cn>C")?;
        let report = pipeline_over(vec![src]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::Check,
        )?;
        assert_eq!(report.processed, 1);
        assert!(!dir.path().join("index.md").exists());
        Ok(())
    }

    #[test]
    fn malformed_document_aborts_before_writing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("a").join("_index.md");
        let good = dir.path().join("b").join("_index.md");
        fs::create_dir_all(bad.parent().unwrap())?;
        fs::create_dir_all(good.parent().unwrap())?;
        fs::write(&bad, "X<cn>unterminated")?;
        fs::write(&good, "fine")?;
        let err = pipeline_over(vec![bad.clone(), good]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::Write,
        )
        .unwrap_err();
        let malformed = err.downcast_ref::<MalformedDocument>().expect("malformed error");
        assert_eq!(malformed.path, bad);
        assert!(!dir.path().join("a").join("index.md").exists());
        assert!(!dir.path().join("b").join("index.md").exists());
        Ok(())
    }

    #[test]
    fn malformed_error_chains_to_the_split_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("_index.md");
        fs::write(&bad, "one\n<cn>two")?;
        let err = pipeline_over(vec![bad])
            .run(&Splitter::default(), &OutputNames::default(), RunMode::Check)
            .unwrap_err();
        let malformed = err.downcast_ref::<MalformedDocument>().expect("malformed error");
        let source = std::error::Error::source(malformed).expect("split error source");
        assert!(source.to_string().contains("line 2"));
        let rendered = format!("{err:#}");
        assert!(rendered.contains("malformed document"));
        assert_eq!(rendered.matches("no end marker").count(), 1);
        Ok(())
    }

    #[test]
    fn failed_secondary_write_keeps_previous_primary() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("_index.md");
        fs::write(&src, "A<cn>B</cn>C")?;
        fs::write(dir.path().join("index.md"), "OLD")?;
        fs::create_dir(dir.path().join("index.md.cn"))?;
        let report = pipeline_over(vec![src]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::Write,
        )?;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed, 0);
        assert_eq!(fs::read_to_string(dir.path().join("index.md"))?, "OLD");
        Ok(())
    }

    #[test]
    fn report_totals_come_from_the_split() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let src = dir.path().join("_index.md");
        fs::write(&src, "</cn>a<cn>b</cn>c<cn>d</cn>")?;
        let report = pipeline_over(vec![src]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::DryRun,
        )?;
        assert_eq!(
            report,
            RunReport {
                processed: 1,
                skipped: 0,
                regions: 2,
                stray_ends: 1,
            }
        );
        assert!(!dir.path().join("index.md").exists());
        Ok(())
    }

    #[test]
    fn unreadable_document_is_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("gone").join("_index.md");
        let good = dir.path().join("_index.md");
        fs::write(&good, "plain")?;
        let report = pipeline_over(vec![missing, good]).run(
            &Splitter::default(),
            &OutputNames::default(),
            RunMode::Write,
        )?;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed, 1);
        assert_eq!(fs::read_to_string(dir.path().join("index.md"))?, "plain");
        Ok(())
    }

    #[test]
    fn excludes_match_absolute_paths() -> anyhow::Result<()> {
        let mut p = pipeline_over(vec![
            PathBuf::from("/site/drafts/_index.md"),
            PathBuf::from("/site/posts/_index.md"),
        ]);
        p.apply_excludes(&["**/drafts/**".to_string()])?;
        assert_eq!(p.documents(), &[PathBuf::from("/site/posts/_index.md")]);
        Ok(())
    }

    #[test]
    fn all_invalid_excludes_error() {
        let mut p = pipeline_over(vec![PathBuf::from("/x/_index.md")]);
        assert!(p.apply_excludes(&["[".to_string()]).is_err());
    }
}
