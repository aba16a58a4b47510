//! Markup parser building a [`Document`] tree.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::tree::{Document, TreeNode, append_text};

/// Parse well-formed markup into a [`Document`].
///
/// Character data is kept escaped, exactly as it appears in the input.
/// Comments and CDATA sections inside the root element are kept verbatim as
/// part of the surrounding character data. Declarations and processing
/// instructions are dropped.
pub fn parse_document(markup: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<TreeNode> = Vec::new();
    let mut root: Option<TreeNode> = None;
    let mut doctype = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(decode_element(&e)?);
            }
            Event::Empty(e) => {
                let node = decode_element(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                // End names are checked by the reader
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node)?;
                }
            }
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    let text = reader.decoder().decode(&e)?;
                    append_text(node, &text);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(node) = stack.last_mut() {
                    let entity = reader.decoder().decode(&e)?;
                    append_text(node, &format!("&{entity};"));
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    let text = reader.decoder().decode(&e)?;
                    append_text(node, &format!("<![CDATA[{text}]]>"));
                }
            }
            Event::Comment(e) => {
                if let Some(node) = stack.last_mut() {
                    let text = reader.decoder().decode(&e)?;
                    append_text(node, &format!("<!--{text}-->"));
                }
            }
            Event::DocType(e) => {
                if root.is_none() && stack.is_empty() {
                    doctype = Some(reader.decoder().decode(&e)?.trim().to_owned());
                }
            }
            Event::Decl(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::UnclosedElement(open.tag.clone()));
    }
    let root = root.ok_or(ParseError::NoRootElement)?;
    Ok(Document { doctype, root })
}

/// Parse a single element (with optional surrounding whitespace).
pub fn parse_fragment(markup: &str) -> Result<TreeNode, ParseError> {
    parse_document(markup).map(|doc| doc.root)
}

/// Attach a completed element to its parent, or make it the root.
fn attach(
    stack: &mut [TreeNode],
    root: &mut Option<TreeNode>,
    node: TreeNode,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(ParseError::TrailingElement(node.tag));
    }
    Ok(())
}

/// Decode tag name and attributes of a start or empty tag.
fn decode_element(e: &BytesStart) -> Result<TreeNode, ParseError> {
    let mut node = TreeNode::new(std::str::from_utf8(e.name().as_ref())?);
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        node.attrs.push((key.to_owned(), value.to_owned()));
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_document() {
        let doc = parse_document("<!DOCTYPE html><html><body><p>Hello</p></body></html>").unwrap();

        assert_eq!(doc.doctype.as_deref(), Some("html"));
        assert_eq!(doc.root.tag, "html");
        let body = doc.body().unwrap();
        assert_eq!(body.children[0].tag, "p");
        assert_eq!(body.children[0].text, "Hello");
    }

    #[test]
    fn test_parse_text_and_tail() {
        let root = parse_fragment("<p><strong>Bold</strong> text</p>").unwrap();

        assert!(root.text.is_empty());
        assert_eq!(root.children[0].text, "Bold");
        assert_eq!(root.children[0].tail, " text");
    }

    #[test]
    fn test_parse_keeps_entities_escaped() {
        let root = parse_fragment(r#"<text title="a &amp; b">x &lt; y&#160;z</text>"#).unwrap();

        assert_eq!(root.text, "x &lt; y&#160;z");
        assert_eq!(root.attr("title"), Some("a &amp; b"));
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let root = parse_fragment(r#"<rect y="2" x="1" width="3"/>"#).unwrap();

        let keys: Vec<_> = root.attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["y", "x", "width"]);
    }

    #[test]
    fn test_parse_comment_and_cdata() {
        let root = parse_fragment("<style><!-- c --><![CDATA[a > b]]></style>").unwrap();

        assert_eq!(root.text, "<!-- c --><![CDATA[a > b]]>");
    }

    #[test]
    fn test_parse_ignores_prolog() {
        let markup = "<?xml version=\"1.0\"?>\n<!-- generated -->\n<svg/>\n";
        let root = parse_fragment(markup).unwrap();

        assert_eq!(root.tag, "svg");
        assert!(root.text.is_empty());
    }

    #[test]
    fn test_parse_mismatched_end_tag() {
        assert!(parse_document("<html><body></html>").is_err());
    }

    #[test]
    fn test_parse_unclosed_element() {
        assert!(parse_document("<html><body>").is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            parse_document("  "),
            Err(ParseError::NoRootElement)
        ));
    }

    #[test]
    fn test_parse_trailing_element() {
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(ParseError::TrailingElement(tag)) if tag == "b"
        ));
    }
}
