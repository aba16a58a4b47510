//! Diagram build command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rr_batch::BatchDriver;
use rr_config::{CliSettings, Config};
use rr_diagrams::RailroadClient;
use tempfile::NamedTempFile;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for building diagrams.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Directory containing `*.bnf` grammar files.
    source_dir: PathBuf,

    /// Directory receiving one `<name>.html` fragment per grammar.
    dest_dir: PathBuf,

    /// Path to configuration file (default: auto-discover rr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fingerprint cache file (overrides config).
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Railroad Diagram Generator URL (overrides config).
    #[arg(long, env = "RR_RENDER_URL")]
    render_url: Option<String>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Ignore stored fingerprints and render every grammar.
    #[arg(long)]
    fresh: bool,

    /// Enable verbose output (show per-file progress logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories are unusable, configuration fails
    /// or any grammar cannot be converted.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        require_directory(&self.source_dir, "source")?;
        require_directory(&self.dest_dir, "destination")?;
        require_writable(&self.dest_dir)?;

        let cli_settings = CliSettings {
            render_url: self.render_url,
            timeout_secs: self.timeout,
            cache_path: self.cache,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }

        output.info(&format!("Source: {}", self.source_dir.display()));
        output.info(&format!("Output: {}", self.dest_dir.display()));

        let client = RailroadClient::new(config.render.url.clone()).timeout(config.render.timeout());
        let report = BatchDriver::new(&client, &config.cache_path)
            .fresh(self.fresh)
            .run(&self.source_dir, &self.dest_dir)?;

        output.success(&format!(
            "Rendered {} diagram(s), {} unchanged",
            report.written.len(),
            report.skipped.len()
        ));
        Ok(())
    }
}

/// Require `path` to be an existing directory.
fn require_directory(path: &Path, role: &str) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::Usage(format!(
            "{role} directory {} does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(CliError::Usage(format!(
            "{role} {} is not a directory",
            path.display()
        )));
    }
    Ok(())
}

/// Require `dir` to accept new files, checked by creating a temporary file.
fn require_writable(dir: &Path) -> Result<(), CliError> {
    NamedTempFile::new_in(dir).map_err(|e| {
        CliError::Usage(format!(
            "destination directory {} is not writable: {e}",
            dir.display()
        ))
    })?;
    Ok(())
}
