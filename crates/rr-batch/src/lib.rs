//! Batch conversion of grammar directories into railroad diagram fragments.
//!
//! [`BatchDriver`] ties the pieces together: it discovers `*.bnf` files,
//! consults the fingerprint cache from `rr-cache`, renders changed grammars
//! through `rr-diagrams` and writes one `<name>.html` fragment per grammar.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//!
//! use rr_batch::BatchDriver;
//! use rr_diagrams::RailroadClient;
//!
//! let client = RailroadClient::default();
//! let report = BatchDriver::new(&client, "bnf-digests.json")
//!     .run(Path::new("docs/grammar"), Path::new("docs/diagrams"))?;
//! println!("{} written, {} unchanged", report.written.len(), report.skipped.len());
//! ```

mod driver;
mod scan;

pub use driver::{BatchDriver, BuildReport};

use std::path::PathBuf;

use rr_cache::CacheError;
use rr_diagrams::DiagramError;

/// Error aborting a batch run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The source directory could not be listed.
    #[error("cannot list source directory {}: {source}", path.display())]
    ListSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A grammar file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fingerprint cache could not be loaded or saved.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A grammar could not be converted into a diagram.
    #[error("{}: {source}", file.display())]
    Diagram {
        file: PathBuf,
        #[source]
        source: DiagramError,
    },

    /// An output fragment could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
