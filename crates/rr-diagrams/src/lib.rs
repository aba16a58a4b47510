//! Railroad diagram rendering for grammar files.
//!
//! This crate turns grammar text into a self-contained SVG fragment that can be
//! embedded in documentation pages:
//! - [`RailroadClient`] posts the grammar to the Railroad Diagram Generator
//! - [`normalize`] cleans the returned namespaced page into a plain tree
//! - [`extract`] picks the diagram `<svg>` out of the page body
//! - [`finalize`] pretty-prints the fragment and appends [`WATERMARK`]
//!
//! [`convert`] chains all four steps.
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - `render`: [`Renderer`] seam and the HTTP client
//! - `tree`: element tree with text/tail character data
//! - `parser` / `serializer`: markup to tree and back, entities kept escaped
//! - `normalize`: namespace stripping and page rewrites
//! - `extract`: diagram fragment selection
//! - `format`: condensed pretty-printing
//! - `pipeline`: the end-to-end conversion
//!
//! # Example
//!
//! ```ignore
//! use rr_diagrams::{RailroadClient, convert};
//!
//! let client = RailroadClient::default();
//! let fragment = convert(&client, "grammar ::= rule+")?;
//! assert!(fragment.starts_with("<svg"));
//! ```

mod consts;
mod error;
mod extract;
mod format;
mod normalize;
mod parser;
mod pipeline;
mod render;
mod serializer;
mod tree;

pub use consts::{DEFAULT_RENDER_URL, DEFAULT_TIMEOUT, WATERMARK};
pub use error::{DiagramError, ExtractionError, ParseError, RenderError};
pub use extract::extract;
pub use format::{finalize, pretty_print};
pub use normalize::{normalize, strip_namespaces};
pub use parser::{parse_document, parse_fragment};
pub use pipeline::convert;
pub use render::{RailroadClient, Renderer};
pub use serializer::{document_to_markup, to_markup};
pub use tree::{Document, NodePath, TreeNode};
