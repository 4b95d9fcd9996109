use super::html;
use crate::parse_document;

#[test]
fn quote_interrupts_paragraph() {
    html(
        concat!("Hi\n", "> q\n"),
        concat!("<p>Hi</p>\n", "<blockquote>\n", "<p>q</p>\n", "</blockquote>\n"),
    );
}

#[test]
fn list_interrupts_paragraph() {
    html(
        concat!("Hi\n", "- q\n"),
        concat!("<p>Hi</p>\n", "<ul>\n", "<li>q</li>\n", "</ul>\n"),
    );
}

#[test]
fn fence_interrupts_paragraph() {
    html(
        concat!("Hi\n", "```\n", "x\n", "```\n"),
        concat!("<p>Hi</p>\n", "<pre><code>x\n", "</code></pre>\n"),
    );
}

#[test]
fn emphasis_spans_a_soft_break() {
    html("*a\nb*\n", "<p><em>a b</em></p>\n");
}

#[test]
fn intraword_strong() {
    html("foo**bar**\n", "<p>foo<strong>bar</strong></p>\n");
}

#[test]
fn code_span_in_list_item() {
    html("- `x`\n", "<ul>\n<li><code>x</code></li>\n</ul>\n");
}

#[test]
fn paren_delimited_ordered_list() {
    html("1) a\n2) b\n", "<ol>\n<li>a</li>\n<li>b</li>\n</ol>\n");
}

#[test]
fn ordered_list_start_ten() {
    html("10. ten\n", "<ol start=\"10\">\n<li>ten</li>\n</ol>\n");
}

#[test]
fn link_in_emphasis_in_heading() {
    html(
        "# *[a](u)*\n",
        "<h1><em><a href=\"u\">a</a></em></h1>\n",
    );
}

#[test]
fn text_directly_after_autolink() {
    html(
        "<http://a.b>c\n",
        "<p><a href=\"http://a.b\">http://a.b</a>c</p>\n",
    );
}

#[test]
fn image_without_destination_is_text() {
    html("![a]\n", "<p>![a]</p>\n");
}

#[test]
fn heading_strips_trailing_whitespace() {
    html("# a  \nb\n", "<h1>a</h1>\n<p>b</p>\n");
}

#[test]
fn empty_quote() {
    html("> \n", "<blockquote>\n</blockquote>\n");
}

#[test]
fn tab_indent_opens_code_block() {
    html("\tcode\n", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn escaped_backslash() {
    html("\\\\\n", "<p>\\</p>\n");
}

#[test]
fn stray_close_bracket_is_text() {
    html("a] b) c\n", "<p>a] b) c</p>\n");
}

#[test]
fn emphasis_delimiters_never_cross_a_code_span() {
    html("`*`a*\n", "<p><code>*</code>a*</p>\n");
}

#[test]
fn container_children_follow_their_parent() {
    let doc = parse_document(concat!(
        "- a\n",
        "  - b\n",
        "  - c\n",
        "\n",
        "> q\n",
        "> > r\n"
    ));
    assert!(doc.invariants_hold());
    for (ix, block) in doc.blocks().iter().enumerate() {
        if block.child_count > 0 {
            assert!(block.first_child > ix);
            assert!(block.first_child + block.child_count <= doc.blocks().len());
        }
    }
    for (ix, inline) in doc.inlines().iter().enumerate() {
        if inline.child_count > 0 {
            assert!(inline.first_child > ix);
        }
    }
}
