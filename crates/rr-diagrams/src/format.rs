//! Deterministic pretty-printing and watermarking of diagram fragments.
//!
//! Output is condensed: one element per line, two-space indentation, and
//! elements whose only content is a single line of text stay on one line.
//! Whitespace-only character data is dropped and other character data is
//! re-indented line by line, so the same fragment always produces the same
//! bytes regardless of how the service laid out its markup.

use crate::consts::WATERMARK;
use crate::error::ParseError;
use crate::parser::parse_fragment;
use crate::serializer::{write_end_tag, write_start_tag};
use crate::tree::TreeNode;

/// Indentation unit.
const INDENT: &str = "  ";

/// Pretty-print a fragment and append the provenance watermark.
///
/// The result ends with exactly one newline after the formatted markup,
/// followed by [`WATERMARK`] as the final line.
pub fn finalize(fragment: &str) -> Result<String, ParseError> {
    let node = parse_fragment(fragment)?;
    let mut out = pretty_print(&node);

    let content_len = out.trim_end().len();
    out.truncate(content_len);
    out.push('\n');
    out.push_str(WATERMARK);
    Ok(out)
}

/// Pretty-print an element tree (tail excluded).
#[must_use]
pub fn pretty_print(node: &TreeNode) -> String {
    let mut out = String::with_capacity(4096);
    write_pretty(node, 0, &mut out);
    out
}

fn write_pretty(node: &TreeNode, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    let text = node.text.trim();

    if node.children.is_empty() && !text.contains('\n') {
        out.push_str(&indent);
        if text.is_empty() {
            write_start_tag(node, true, out);
        } else {
            write_start_tag(node, false, out);
            out.push_str(text);
            write_end_tag(node, out);
        }
        out.push('\n');
        return;
    }

    out.push_str(&indent);
    write_start_tag(node, false, out);
    out.push('\n');

    write_text_lines(text, depth + 1, out);
    for child in &node.children {
        write_pretty(child, depth + 1, out);
        write_text_lines(&child.tail, depth + 1, out);
    }

    out.push_str(&indent);
    write_end_tag(node, out);
    out.push('\n');
}

/// Write each non-blank line of `text` on its own indented line.
fn write_text_lines(text: &str, depth: usize, out: &mut String) {
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str(line);
        out.push('\n');
    }
}
