//! Normalization of rendering-service markup.
//!
//! The service answers with namespaced XHTML that mixes host-page markup with
//! SVG. [`normalize`] turns it into a plain [`Document`]:
//!
//! 1. Namespace prefixes are stripped from every tag and `xmlns*` attributes
//!    are dropped, on the raw token stream ([`strip_namespaces`]).
//! 2. The cleaned markup is parsed into a tree.
//! 3. Page-level rewrites prepare the tree for fragment extraction:
//!    shared `<defs>` move into the head, the leading style-only `<svg>` is
//!    dropped, `http-equiv` metas are replaced by one charset declaration, and
//!    named anchors become links to themselves.
//!
//! The service puts the style-only `<svg>` in `<head>` or as the first element
//! of `<body>`. Either way it is the first `<svg>` of the page.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;
use crate::parser::parse_document;
use crate::tree::{Document, TreeNode};

/// Attribute-name prefix of namespace declarations.
const XMLNS_PREFIX: &[u8] = b"xmlns";

/// Parse raw service markup into a normalized [`Document`].
pub fn normalize(raw: &str) -> Result<Document, ParseError> {
    let cleaned = strip_namespaces(raw)?;
    let mut doc = parse_document(&cleaned)?;

    move_defs_to_head(&mut doc);
    remove_first_svg(&mut doc);
    remove_http_equiv_meta(&mut doc);
    insert_charset_meta(&mut doc);
    link_named_anchors(&mut doc);

    Ok(doc)
}

/// Strip namespace prefixes from tag names and drop `xmlns*` attributes.
///
/// Everything up to and including the first `:` of a start, end or empty tag
/// name is removed. All other tokens pass through unchanged.
pub fn strip_namespaces(raw: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(raw.len()));

    loop {
        match reader.read_event()? {
            Event::Start(e) => writer.write_event(Event::Start(strip_start(&e)?))?,
            Event::Empty(e) => writer.write_event(Event::Empty(strip_start(&e)?))?,
            Event::End(e) => {
                let qname = e.name();
                let name = std::str::from_utf8(local_name(qname.as_ref()))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| ParseError::Utf8(e.utf8_error()))
}

/// Copy a start tag without namespace prefix and namespace declarations.
fn strip_start(e: &BytesStart) -> Result<BytesStart<'static>, ParseError> {
    let qname = e.name();
    let name = std::str::from_utf8(local_name(qname.as_ref()))?;
    let mut stripped = BytesStart::new(name.to_owned());
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref().starts_with(XMLNS_PREFIX) {
            continue;
        }
        stripped.push_attribute(attr);
    }
    Ok(stripped)
}

/// Tag name after the first `:`, or the whole name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Move the content of the first `<defs>` into `<head>` and drop every `<defs>`.
fn move_defs_to_head(doc: &mut Document) {
    let targets = doc.root.outermost_paths(&|node: &TreeNode| node.is("defs"));
    let Some(shared) = targets.first().and_then(|path| doc.root.get(path)).cloned() else {
        return;
    };
    for path in targets.iter().rev() {
        doc.root.remove_at(path);
    }
    doc.head_mut().append_content(&shared.text, shared.children);
}

/// Remove the first `<svg>` of the page, wherever it sits.
fn remove_first_svg(doc: &mut Document) {
    if let Some(path) = doc.root.find_path(&|node: &TreeNode| node.is("svg")) {
        doc.root.remove_at(&path);
    }
}

/// Remove every `<meta http-equiv>` element.
fn remove_http_equiv_meta(doc: &mut Document) {
    let targets = doc
        .root
        .outermost_paths(&|node: &TreeNode| node.is("meta") && node.has_attr("http-equiv"));
    for path in targets.iter().rev() {
        doc.root.remove_at(path);
    }
}

/// Insert `<meta charset="UTF-8" />` as the first child of `<head>`.
fn insert_charset_meta(doc: &mut Document) {
    let head = doc.head_mut();
    let leading = std::mem::take(&mut head.text);
    let meta = TreeNode::new("meta")
        .with_attr("charset", "UTF-8")
        .with_tail(leading);
    head.insert_child(0, meta);
}

/// Give every `<a name>` without `href` a link to itself.
fn link_named_anchors(doc: &mut Document) {
    doc.root.walk_mut(&mut |node: &mut TreeNode| {
        if !node.is("a") || node.has_attr("href") {
            return;
        }
        let Some(href) = node.attr("name").map(|name| format!("#{name}")) else {
            return;
        };
        node.set_attr("href", href);
    });
}
