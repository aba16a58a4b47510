//! Grammar to diagram fragment conversion.

use crate::error::DiagramError;
use crate::extract::extract;
use crate::format::finalize;
use crate::normalize::normalize;
use crate::render::Renderer;

/// Convert one grammar into a finished diagram fragment.
///
/// Renders the grammar, normalizes the returned page, extracts the diagram
/// `<svg>` and pretty-prints it with the watermark appended. Nothing is
/// written anywhere; the caller decides where the fragment goes.
pub fn convert(renderer: &dyn Renderer, source: &str) -> Result<String, DiagramError> {
    let raw = renderer.render(source)?;
    let doc = normalize(&raw)?;
    let fragment = extract(&doc)?;
    Ok(finalize(&fragment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WATERMARK;
    use crate::error::{ExtractionError, RenderError};
    use pretty_assertions::assert_eq;

    const PAGE: &str = concat!(
        r#"<html xmlns="http://www.w3.org/1999/xhtml">"#,
        r#"<head><meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/></head>"#,
        r#"<body>"#,
        r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:defs><svg:style type="text/css">.line {stroke: #331F07;}</svg:style></svg:defs></svg:svg>"#,
        r#"<p><a name="grammar">grammar:</a></p>"#,
        r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="101" height="37">"#,
        r#"<svg:polygon points="9 17 1 13 1 21"/>"#,
        r##"<svg:a xlink:href="#expr" xmlns:xlink="http://www.w3.org/1999/xlink"><svg:rect x="31" y="3"/><svg:text x="39" y="21">expr</svg:text></svg:a>"##,
        r#"</svg:svg>"#,
        r#"<p>generated by RR</p>"#,
        r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="10"/>"#,
        r#"</body></html>"#,
    );

    /// Service answer with the style-only `<svg>` inside `<head>`.
    const HEAD_STYLE_PAGE: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n<head>\n",
        r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:defs><svg:style type="text/css">.line {stroke: black;}</svg:style></svg:defs></svg:svg>"#,
        "\n</head>\n<body>\n<p/>\n",
        r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" id="diagram" width="101" height="37">"#,
        r#"<svg:polygon points="9 17 1 13 1 21"/>"#,
        r##"<svg:a xlink:href="#expr" xmlns:xlink="http://www.w3.org/1999/xlink"><svg:rect x="31" y="3"/></svg:a>"##,
        r#"</svg:svg>"#,
        "\n",
        r#"<p><a href="https://www.bottlecaps.de/rr/ui"><svg:svg xmlns:svg="http://www.w3.org/2000/svg" id="logo" width="16"/></a></p>"#,
        "\n</body>\n</html>\n",
    );

    struct StaticRenderer(&'static str);

    impl Renderer for StaticRenderer {
        fn render(&self, _source: &str) -> Result<String, RenderError> {
            Ok(self.0.to_owned())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _source: &str) -> Result<String, RenderError> {
            Err(RenderError::Service {
                status: 500,
                body: "boom".to_owned(),
            })
        }
    }

    #[test]
    fn test_convert_produces_formatted_fragment() {
        let output = convert(&StaticRenderer(PAGE), "grammar ::= expr").unwrap();

        assert_eq!(
            output,
            format!(
                "{}{WATERMARK}",
                concat!(
                    "<svg width=\"101\" height=\"37\">\n",
                    "  <polygon points=\"9 17 1 13 1 21\" />\n",
                    "  <rect x=\"31\" y=\"3\" />\n",
                    "  <text x=\"39\" y=\"21\">expr</text>\n",
                    "</svg>\n",
                )
            )
        );
    }

    #[test]
    fn test_convert_keeps_diagram_when_style_svg_in_head() {
        let output = convert(&StaticRenderer(HEAD_STYLE_PAGE), "grammar ::= expr").unwrap();

        assert_eq!(
            output,
            format!(
                "{}{WATERMARK}",
                concat!(
                    "<svg id=\"diagram\" width=\"101\" height=\"37\">\n",
                    "  <polygon points=\"9 17 1 13 1 21\" />\n",
                    "  <rect x=\"31\" y=\"3\" />\n",
                    "</svg>\n",
                )
            )
        );
    }

    #[test]
    fn test_convert_is_deterministic() {
        let renderer = StaticRenderer(PAGE);

        assert_eq!(
            convert(&renderer, "g").unwrap(),
            convert(&renderer, "g").unwrap()
        );
    }

    #[test]
    fn test_convert_propagates_render_error() {
        let err = convert(&FailingRenderer, "g").unwrap_err();

        assert!(matches!(
            err,
            DiagramError::Render(RenderError::Service { status: 500, .. })
        ));
    }

    #[test]
    fn test_convert_rejects_page_without_diagram() {
        let renderer = StaticRenderer("<html><body><p>no diagram</p></body></html>");

        assert!(matches!(
            convert(&renderer, "g"),
            Err(DiagramError::Extraction(ExtractionError::NoVisualRoot))
        ));
    }

    #[test]
    fn test_convert_rejects_malformed_page() {
        let renderer = StaticRenderer("<html><body><svg></body>");

        assert!(matches!(
            convert(&renderer, "g"),
            Err(DiagramError::Parse(_))
        ));
    }
}
