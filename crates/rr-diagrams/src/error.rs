//! Error types for diagram rendering.

use std::str::Utf8Error;

/// Error talking to the rendering service.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The HTTP exchange itself failed (connection, DNS, timeout, body read).
    #[error("request to rendering service failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The service answered with a non-success status.
    #[error("rendering service returned HTTP {status}: {body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },
}

/// Markup that could not be tokenized or parsed into a tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// XML syntax error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding markup.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Tag or attribute name is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] Utf8Error),

    /// Re-serializing the token stream failed.
    #[error("cannot write markup: {0}")]
    Io(#[from] std::io::Error),

    /// The markup contains no element at all.
    #[error("markup has no root element")]
    NoRootElement,

    /// A second element follows the closed root element.
    #[error("unexpected element <{0}> after the root element")]
    TrailingElement(String),

    /// The input ended inside an open element.
    #[error("element <{0}> is never closed")]
    UnclosedElement(String),
}

/// The normalized document does not have the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The document has no `body` element.
    #[error("rendered page has no <body> element")]
    MissingBody,

    /// The body contains no `svg` element.
    #[error("rendered page has no <svg> diagram in its body")]
    NoVisualRoot,
}

/// Error converting one grammar into a diagram fragment.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Rendering service failure.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The service response or the fragment is not well-formed markup.
    #[error("cannot parse rendered markup: {0}")]
    Parse(#[from] ParseError),

    /// The response has an unexpected shape.
    #[error("cannot extract diagram: {0}")]
    Extraction(#[from] ExtractionError),
}
