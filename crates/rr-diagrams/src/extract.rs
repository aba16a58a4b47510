//! Diagram fragment extraction.

use crate::consts::EXPECTED_VISUAL_ROOTS;
use crate::error::ExtractionError;
use crate::serializer::to_markup;
use crate::tree::{Document, TreeNode};

/// Extract the diagram `<svg>` from a normalized page.
///
/// The first outermost `<svg>` inside `<body>` is taken; any others are
/// discarded. Immediate `<a>` children of that element are replaced by their
/// own content, since hyperlinks inside embedded diagrams are not supported
/// by the documentation site. Returns the element's outer markup.
pub fn extract(doc: &Document) -> Result<String, ExtractionError> {
    let body = doc.body().ok_or(ExtractionError::MissingBody)?;
    let roots = body.outermost_paths(&|node: &TreeNode| node.is("svg"));
    let first = roots.first().ok_or(ExtractionError::NoVisualRoot)?;

    if roots.len() != EXPECTED_VISUAL_ROOTS {
        tracing::warn!(
            "expected {EXPECTED_VISUAL_ROOTS} <svg> elements in rendered page, found {}; using the first",
            roots.len()
        );
    }

    let mut svg = body
        .get(first)
        .cloned()
        .ok_or(ExtractionError::NoVisualRoot)?;
    svg.tail.clear();
    unwrap_links(&mut svg);

    Ok(to_markup(&svg))
}

/// Replace every immediate `<a>` child with its own content.
fn unwrap_links(svg: &mut TreeNode) {
    let anchors: Vec<usize> = svg
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is("a"))
        .map(|(index, _)| index)
        .collect();

    for index in anchors.into_iter().rev() {
        svg.unwrap_child(index);
    }
}
