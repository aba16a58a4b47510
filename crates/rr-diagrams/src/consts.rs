//! Internal constants for diagram rendering.

use std::time::Duration;

/// Public Railroad Diagram Generator endpoint.
pub const DEFAULT_RENDER_URL: &str = "https://www.bottlecaps.de/rr/ui";

/// Default HTTP timeout for rendering requests (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Frame selector sent with every request: only the diagram page.
pub(crate) const FRAME: &str = "diagram";

/// Target diagram width in pixels.
pub(crate) const WIDTH: &str = "620";

/// Layout simplifications requested from the service.
pub(crate) const OPTIONS: &[&str] = &["eliminaterecursion", "factoring", "inline"];

/// Number of `<svg>` elements the service puts in the body after normalization.
pub(crate) const EXPECTED_VISUAL_ROOTS: usize = 2;

/// Provenance line appended to every generated fragment.
pub const WATERMARK: &str =
    "<!-- generated by Railroad Diagram Generator https://www.bottlecaps.de/rr/ui -->\n";
