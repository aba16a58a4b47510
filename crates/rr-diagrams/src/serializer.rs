//! Markup serializer for [`TreeNode`] trees.
//!
//! Text and attribute values are already escaped in the tree, so they are
//! written as-is. Empty elements are written self-closed.

use crate::tree::{Document, TreeNode};

/// Serialize the outer markup of an element (without its tail).
#[must_use]
pub fn to_markup(node: &TreeNode) -> String {
    let mut out = String::with_capacity(4096);
    serialize_node(node, &mut out);
    out
}

/// Serialize a whole document, including its document type declaration.
#[must_use]
pub fn document_to_markup(doc: &Document) -> String {
    let mut out = String::with_capacity(16384);
    if let Some(doctype) = &doc.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(doctype);
        out.push('>');
    }
    serialize_node(&doc.root, &mut out);
    out
}

/// Serialize a single node recursively (tails of children included).
fn serialize_node(node: &TreeNode, out: &mut String) {
    let self_closing = node.children.is_empty() && node.text.is_empty();
    write_start_tag(node, self_closing, out);
    if self_closing {
        return;
    }

    out.push_str(&node.text);
    for child in &node.children {
        serialize_node(child, out);
        out.push_str(&child.tail);
    }
    write_end_tag(node, out);
}

/// Write `<tag attrs>` or `<tag attrs />`.
pub(crate) fn write_start_tag(node: &TreeNode, self_closing: bool, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        // Values from single-quoted attributes may contain a bare quote
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
    out.push_str(if self_closing { " />" } else { ">" });
}

/// Write `</tag>`.
pub(crate) fn write_end_tag(node: &TreeNode, out: &mut String) {
    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_document, parse_fragment};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_simple_element() {
        let node = TreeNode::new("p").with_text("Hello").with_tail("ignored");

        assert_eq!(to_markup(&node), "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_with_children_and_tails() {
        let strong = TreeNode::new("strong").with_text("Bold").with_tail(" text");
        let p = TreeNode::new("p").with_children(vec![strong]);

        assert_eq!(to_markup(&p), "<p><strong>Bold</strong> text</p>");
    }

    #[test]
    fn test_serialize_self_closing_with_attributes() {
        let rect = TreeNode::new("rect")
            .with_attr("x", "1")
            .with_attr("class", "a \"b\"");

        assert_eq!(
            to_markup(&rect),
            r#"<rect x="1" class="a &quot;b&quot;" />"#
        );
    }

    #[test]
    fn test_serialize_preserves_parsed_content() {
        let markup = r#"<svg width="10"><g>a &amp; b<rect/>tail</g><text>&lt;x&gt;</text></svg>"#;
        let node = parse_fragment(markup).unwrap();

        assert_eq!(
            to_markup(&node),
            r#"<svg width="10"><g>a &amp; b<rect />tail</g><text>&lt;x&gt;</text></svg>"#
        );
    }

    #[test]
    fn test_serialize_document_with_doctype() {
        let doc = parse_document("<!DOCTYPE html><html><head/><body/></html>").unwrap();

        assert_eq!(
            document_to_markup(&doc),
            "<!DOCTYPE html><html><head /><body /></html>"
        );
    }
}
