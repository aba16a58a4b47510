//! Change tracking for railroad diagram builds.
//!
//! Two pieces make repeated builds cheap:
//!
//! - [`fingerprint`]: a stable content digest of an input file
//! - [`ChangeCache`]: a persisted map from input path to its last fingerprint,
//!   deciding whether an input needs to be rendered again
//!
//! # Example
//!
//! ```
//! use rr_cache::{ChangeCache, fingerprint};
//!
//! let mut cache = ChangeCache::empty("bnf-digests.json");
//! let digest = fingerprint(b"stmt ::= 'SELECT' expr");
//!
//! assert!(cache.should_process("docs/select.bnf", &digest));
//! cache.record("docs/select.bnf", &digest);
//! assert!(!cache.should_process("docs/select.bnf", &digest));
//! ```

mod digest;
mod file;

pub use digest::fingerprint;
pub use file::ChangeCache;

use std::path::PathBuf;

/// Error reading or writing the fingerprint cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache file could not be read.
    #[error("cannot read cache file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cache file is not a JSON object of strings.
    #[error("cannot parse cache file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory map could not be serialized.
    #[error("cannot serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The cache file could not be written.
    #[error("cannot write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
