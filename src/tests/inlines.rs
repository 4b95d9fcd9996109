use super::html;

#[test]
fn code_span() {
    html(
        "Use the `printf()` function.",
        "<p>Use the <code>printf()</code> function.</p>\n",
    );
    // Inline code is text position: apostrophes stay literal.
    html("`don't`\n", "<p><code>don't</code></p>\n");
}

#[test]
fn code_span_strips_one_padding_space() {
    html("` code `\n", "<p><code>code</code></p>\n");
    html("` `\n", "<p><code> </code></p>\n");
}

#[test]
fn code_span_backtick_runs_must_match() {
    html("`` a`b ``\n", "<p><code>a`b</code></p>\n");
    html("`no close\n", "<p>`no close</p>\n");
}

#[test]
fn code_span_binds_tighter_than_emphasis() {
    html("*a `*` b*\n", "<p><em>a <code>*</code> b</em></p>\n");
}

#[test]
fn emphasis_and_strong() {
    html("*foo*\n", "<p><em>foo</em></p>\n");
    html("_foo_\n", "<p><em>foo</em></p>\n");
    html("**foo**\n", "<p><strong>foo</strong></p>\n");
    html("__foo__\n", "<p><strong>foo</strong></p>\n");
}

#[test]
fn triple_delimiters_nest() {
    html("***foo***\n", "<p><em><strong>foo</strong></em></p>\n");
}

#[test]
fn nested_emphasis() {
    html(
        "*outer **inner** tail*\n",
        "<p><em>outer <strong>inner</strong> tail</em></p>\n",
    );
}

#[test]
fn unbalanced_delimiters_spill_as_literals() {
    html("**a*\n", "<p>*<em>a</em></p>\n");
    html("*a**\n", "<p><em>a</em>*</p>\n");
}

#[test]
fn unmatched_delimiters_are_literal() {
    html("a * b\n", "<p>a * b</p>\n");
    html("*unclosed\n", "<p>*unclosed</p>\n");
    html("fin*\n", "<p>fin*</p>\n");
}

#[test]
fn underscore_refuses_intraword() {
    html("a_b_\n", "<p>a_b_</p>\n");
    html("_foo_bar_\n", "<p><em>foo_bar</em></p>\n");
}

#[test]
fn star_allows_intraword() {
    html("a*b*\n", "<p>a<em>b</em></p>\n");
}

#[test]
fn hard_break_from_spaces() {
    html("a  \nb\n", "<p>a<br />\nb</p>\n");
}

#[test]
fn hard_break_from_backslash() {
    html("a\\\nb\n", "<p>a<br />\nb</p>\n");
}

#[test]
fn single_trailing_space_is_soft() {
    html("a \nb\n", "<p>a b</p>\n");
}

#[test]
fn backslash_escapes_punctuation() {
    html("\\*not em\\*\n", "<p>*not em*</p>\n");
    html("\\[not link](x)\n", "<p>[not link](x)</p>\n");
    html("a\\b\n", "<p>a\\b</p>\n");
    html("end\\", "<p>end\\</p>\n");
}

#[test]
fn autolink_uri() {
    html(
        "<http://example.com/path>\n",
        "<p><a href=\"http://example.com/path\">http://example.com/path</a></p>\n",
    );
}

#[test]
fn autolink_email() {
    html(
        "<me@example.com>\n",
        "<p><a href=\"mailto:me@example.com\">me@example.com</a></p>\n",
    );
}

#[test]
fn autolink_requires_marker() {
    html("<nope>\n", "<p>&lt;nope&gt;</p>\n");
    html("<http://a b>\n", "<p>&lt;http://a b&gt;</p>\n");
}

#[test]
fn raw_html_inline() {
    html("a <br/> b\n", "<p>a <br/> b</p>\n");
    html("close </em> tag\n", "<p>close </em> tag</p>\n");
    html(
        "a <span class=\"x\">b</span>\n",
        "<p>a <span class=\"x\">b</span></p>\n",
    );
    html("c <!-- gone --> d\n", "<p>c <!-- gone --> d</p>\n");
}

#[test]
fn bare_bracketed_word_is_text() {
    html("try <world> now\n", "<p>try &lt;world&gt; now</p>\n");
}

#[test]
fn emphasis_inside_heading() {
    html("# *quiet* title\n", "<h1><em>quiet</em> title</h1>\n");
}

#[test]
fn delimiter_runs_balance_inner_openers() {
    html(
        "*a *b* c*\n",
        "<p><em>a <em>b</em> c</em></p>\n",
    );
}
