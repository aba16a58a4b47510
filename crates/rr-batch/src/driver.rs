//! Incremental batch conversion.

use std::fs;
use std::path::{Path, PathBuf};

use rr_cache::{ChangeCache, fingerprint};
use rr_diagrams::{Renderer, convert};

use crate::BuildError;
use crate::scan::scan;

/// Outcome of a successful batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Output files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Inputs skipped because their fingerprint was unchanged.
    pub skipped: Vec<PathBuf>,
}

/// Converts every changed grammar of a directory into a diagram fragment.
///
/// Each run lists `*.bnf` files, compares their fingerprints with the stored
/// cache and renders only the changed ones into `<stem>.html`. The cache file
/// is rewritten once, after every file has been handled. Any failure stops the
/// run immediately and leaves the cache file untouched, so the next run picks
/// up everything that was not recorded.
pub struct BatchDriver<'a> {
    renderer: &'a dyn Renderer,
    cache_path: PathBuf,
    fresh: bool,
}

impl<'a> BatchDriver<'a> {
    /// Create a driver rendering through `renderer` and tracking fingerprints
    /// in the cache file at `cache_path`.
    pub fn new(renderer: &'a dyn Renderer, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            cache_path: cache_path.into(),
            fresh: false,
        }
    }

    /// Ignore stored fingerprints and process every input.
    ///
    /// The cache file does not need to exist; it is created at the end of a
    /// successful run.
    #[must_use]
    pub fn fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Process all grammar files of `source_dir` into `dest_dir`.
    pub fn run(&self, source_dir: &Path, dest_dir: &Path) -> Result<BuildReport, BuildError> {
        let files = scan(source_dir).map_err(|source| BuildError::ListSource {
            path: source_dir.to_path_buf(),
            source,
        })?;

        let mut cache = if self.fresh {
            ChangeCache::empty(&self.cache_path)
        } else {
            ChangeCache::load(&self.cache_path)?
        };

        tracing::debug!(
            count = files.len(),
            source = %source_dir.display(),
            "Found grammar files"
        );

        let mut report = BuildReport::default();
        for file in files {
            let content = fs::read(&file.path).map_err(|source| BuildError::ReadSource {
                path: file.path.clone(),
                source,
            })?;
            let key = file.path.to_string_lossy().into_owned();
            let digest = fingerprint(&content);

            if !cache.should_process(&key, &digest) {
                tracing::debug!(file = %file.path.display(), "Unchanged, skipping");
                report.skipped.push(file.path);
                continue;
            }

            let grammar = String::from_utf8_lossy(&content);
            let fragment =
                convert(self.renderer, &grammar).map_err(|source| BuildError::Diagram {
                    file: file.path.clone(),
                    source,
                })?;

            let output = dest_dir.join(format!("{}.html", file.stem));
            fs::write(&output, fragment).map_err(|source| BuildError::Write {
                path: output.clone(),
                source,
            })?;
            tracing::info!(file = %file.path.display(), output = %output.display(), "Rendered diagram");

            cache.record(key, digest);
            report.written.push(output);
        }

        cache.persist()?;
        tracing::info!(
            entries = cache.len(),
            path = %cache.path().display(),
            "Saved fingerprint cache"
        );

        Ok(report)
    }
}
