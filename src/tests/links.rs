use super::html;
use crate::nodes::{InlineKind, Span};
use crate::parse_document;

#[test]
fn basic_link() {
    html("[text](/url)\n", "<p><a href=\"/url\">text</a></p>\n");
}

#[test]
fn link_with_title() {
    html(
        "[a](b \"title\")\n",
        "<p><a href=\"b\" title=\"title\">a</a></p>\n",
    );
    html(
        "[a](b 'title')\n",
        "<p><a href=\"b\" title=\"title\">a</a></p>\n",
    );
}

#[test]
fn link_title_escapes() {
    html(
        "[a](b \"two \\\"quotes\\\"\")\n",
        "<p><a href=\"b\" title=\"two \\&quot;quotes\\&quot;\">a</a></p>\n",
    );
}

#[test]
fn link_text_recurses() {
    html(
        "[**bold**](x)\n",
        "<p><a href=\"x\"><strong>bold</strong></a></p>\n",
    );
    html(
        "[a `code` b](x)\n",
        "<p><a href=\"x\">a <code>code</code> b</a></p>\n",
    );
}

#[test]
fn link_url_is_attribute_escaped() {
    html(
        "[a](/x?a=1&b=2)\n",
        "<p><a href=\"/x?a=1&amp;b=2\">a</a></p>\n",
    );
}

#[test]
fn quote_in_destination_starts_title() {
    // A quote character ends the URL scan and begins the title.
    html(
        "[a](/x't')\n",
        "<p><a href=\"/x\" title=\"t\">a</a></p>\n",
    );
}

#[test]
fn emphasis_wraps_link() {
    html(
        "*[text](url)*\n",
        "<p><em><a href=\"url\">text</a></em></p>\n",
    );
}

#[test]
fn nested_brackets_in_text() {
    html("[a [b] c](x)\n", "<p><a href=\"x\">a [b] c</a></p>\n");
}

#[test]
fn broken_links_degrade_to_text() {
    html("[a]\n", "<p>[a]</p>\n");
    html("[a](\n", "<p>[a](</p>\n");
    html("[a](b \"t\n", "<p>[a](b &quot;t</p>\n");
    html("[unclosed\n", "<p>[unclosed</p>\n");
}

#[test]
fn empty_url() {
    html("[a]()\n", "<p><a href=\"\">a</a></p>\n");
}

#[test]
fn basic_image() {
    html(
        "![alt](img.png)\n",
        "<p><img src=\"img.png\" alt=\"alt\" /></p>\n",
    );
}

#[test]
fn image_with_title() {
    html(
        "![image](https://example.com/image.png \"this is an image\")\n",
        "<p><img src=\"https://example.com/image.png\" alt=\"image\" title=\"this is an image\" /></p>\n",
    );
}

#[test]
fn image_alt_flattens_children() {
    html(
        "![*em* and `code`](u)\n",
        "<p><img src=\"u\" alt=\"em and code\" /></p>\n",
    );
}

#[test]
fn bang_without_bracket_is_literal() {
    html("hey!\n", "<p>hey!</p>\n");
}

#[test]
fn image_stores_spans() {
    let source = "![alt](url \"t\")\n";
    let doc = parse_document(source);
    let para = &doc.top_level()[0];
    let inlines = doc.block_inlines(para);
    assert_eq!(inlines.len(), 1);
    match inlines[0].kind {
        InlineKind::Image(nl) => {
            assert_eq!(doc.text(nl.url), "url");
            assert_eq!(doc.text(nl.title), "t");
        }
        ref k => panic!("expected image, got {:?}", k),
    }
    assert_eq!(doc.text(inlines[0].content), "alt");
}

#[test]
fn missing_title_is_empty_span() {
    let doc = parse_document("[a](b)\n");
    let para = &doc.top_level()[0];
    match doc.block_inlines(para)[0].kind {
        InlineKind::Link(nl) => assert_eq!(nl.title, Span::default()),
        ref k => panic!("expected link, got {:?}", k),
    }
}
