//! HTML rendering for the flat document.
//!
//! [`format_document`] traverses the block and inline arrays in a single
//! pass and streams escaped HTML straight to the caller's sink; no
//! intermediate strings are built for tags.

use std::fmt::{self, Write};

use crate::document::Document;
use crate::nodes::{AutolinkType, Block, BlockKind, Inline, InlineKind, ListType};

/// Formats a parsed document as HTML, writing to `output`.
///
/// The only fallible operation is the sink itself; errors from it are
/// propagated unchanged.
pub fn format_document(document: &Document, output: &mut dyn Write) -> fmt::Result {
    let mut context = Context::new(document, output);
    for block in document.top_level() {
        format_block(&mut context, block, false)?;
    }
    Ok(())
}

/// Sink wrapper given to the render functions.  Tracks whether the last
/// byte written was a newline so block tags can start on a fresh line.
struct Context<'d, 'a, 'o> {
    document: &'d Document<'a>,
    output: &'o mut dyn Write,
    last_was_lf: bool,
}

impl<'d, 'a, 'o> Context<'d, 'a, 'o> {
    fn new(document: &'d Document<'a>, output: &'o mut dyn Write) -> Self {
        Context {
            document,
            output,
            last_was_lf: true,
        }
    }

    /// Ensures the output sits at the start of a line.
    fn cr(&mut self) -> fmt::Result {
        if !self.last_was_lf {
            self.write_str("\n")?;
        }
        Ok(())
    }

    fn escape(&mut self, buffer: &str) -> fmt::Result {
        escape(self, buffer)
    }

    fn escape_attr(&mut self, buffer: &str) -> fmt::Result {
        escape_attr(self, buffer)
    }
}

impl<'d, 'a, 'o> Write for Context<'d, 'a, 'o> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !s.is_empty() {
            self.last_was_lf = s.as_bytes()[s.len() - 1] == b'\n';
        }
        self.output.write_str(s)
    }
}

fn format_block(context: &mut Context, block: &Block, tight: bool) -> fmt::Result {
    let document = context.document;
    match block.kind {
        BlockKind::Paragraph => {
            if tight {
                format_inlines(context, block)?;
            } else {
                context.cr()?;
                context.write_str("<p>")?;
                format_inlines(context, block)?;
                context.write_str("</p>\n")?;
            }
        }
        BlockKind::Heading(nh) => {
            context.cr()?;
            write!(context, "<h{}>", nh.level)?;
            format_inlines(context, block)?;
            write!(context, "</h{}>\n", nh.level)?;
        }
        BlockKind::ThematicBreak(_) => {
            context.cr()?;
            context.write_str("<hr />\n")?;
        }
        BlockKind::CodeBlock(ncb) => {
            context.cr()?;
            context.write_str("<pre><code")?;
            if ncb.fenced && !block.data.is_empty() {
                context.write_str(" class=\"language-")?;
                let info = document.text(block.data);
                escape_attr(context, info.split_whitespace().next().unwrap_or(""))?;
                context.write_str("\"")?;
            }
            context.write_str(">")?;
            if ncb.fenced {
                for line_ix in block.content.start..block.content.end {
                    context.escape_attr(document.text(document.line(line_ix)))?;
                    context.write_str("\n")?;
                }
            } else {
                context.escape_attr(document.text(block.content))?;
                context.write_str("\n")?;
            }
            context.write_str("</code></pre>\n")?;
        }
        BlockKind::HtmlBlock => {
            context.cr()?;
            context.write_str(document.text(block.content))?;
            context.write_str("\n")?;
        }
        BlockKind::BlankLine => {}
        BlockKind::BlockQuote => {
            context.cr()?;
            context.write_str("<blockquote>\n")?;
            for child in document.children(block) {
                format_block(context, child, false)?;
            }
            context.cr()?;
            context.write_str("</blockquote>\n")?;
        }
        BlockKind::List(nl) => {
            context.cr()?;
            match nl.list_type {
                ListType::Bullet => context.write_str("<ul>\n")?,
                ListType::Ordered => {
                    if nl.start == 1 {
                        context.write_str("<ol>\n")?;
                    } else {
                        write!(context, "<ol start=\"{}\">\n", nl.start)?;
                    }
                }
            }
            for child in document.children(block) {
                format_block(context, child, false)?;
            }
            context.cr()?;
            match nl.list_type {
                ListType::Bullet => context.write_str("</ul>\n")?,
                ListType::Ordered => context.write_str("</ol>\n")?,
            }
        }
        BlockKind::Item => {
            context.cr()?;
            context.write_str("<li>")?;
            for child in document.children(block) {
                format_block(context, child, true)?;
            }
            context.write_str("</li>\n")?;
        }
    }
    Ok(())
}

fn format_inlines(context: &mut Context, block: &Block) -> fmt::Result {
    for inline in context.document.block_inlines(block) {
        format_inline(context, inline)?;
    }
    Ok(())
}

fn format_inline(context: &mut Context, inline: &Inline) -> fmt::Result {
    let document = context.document;
    match inline.kind {
        InlineKind::Text => context.escape(document.text(inline.content))?,
        InlineKind::SoftBreak => context.write_str(" ")?,
        InlineKind::LineBreak => context.write_str("<br />\n")?,
        InlineKind::Code => {
            context.write_str("<code>")?;
            context.escape(document.text(inline.content))?;
            context.write_str("</code>")?;
        }
        InlineKind::HtmlInline => context.write_str(document.text(inline.content))?,
        InlineKind::Emph(_) => {
            context.write_str("<em>")?;
            format_inline_children(context, inline)?;
            context.write_str("</em>")?;
        }
        InlineKind::Strong(_) => {
            context.write_str("<strong>")?;
            format_inline_children(context, inline)?;
            context.write_str("</strong>")?;
        }
        InlineKind::Link(nl) => {
            context.write_str("<a href=\"")?;
            context.escape_attr(document.text(nl.url))?;
            context.write_str("\"")?;
            if !nl.title.is_empty() {
                context.write_str(" title=\"")?;
                context.escape_attr(document.text(nl.title))?;
                context.write_str("\"")?;
            }
            context.write_str(">")?;
            format_inline_children(context, inline)?;
            context.write_str("</a>")?;
        }
        InlineKind::Image(nl) => {
            context.write_str("<img src=\"")?;
            context.escape_attr(document.text(nl.url))?;
            context.write_str("\" alt=\"")?;
            let mut alt = String::new();
            collect_text(document, inline, &mut alt);
            context.escape_attr(&alt)?;
            context.write_str("\"")?;
            if !nl.title.is_empty() {
                context.write_str(" title=\"")?;
                context.escape_attr(document.text(nl.title))?;
                context.write_str("\"")?;
            }
            context.write_str(" />")?;
        }
        InlineKind::Autolink(kind) => {
            context.write_str("<a href=\"")?;
            if kind == AutolinkType::Email {
                context.write_str("mailto:")?;
            }
            context.escape_attr(document.text(inline.content))?;
            context.write_str("\">")?;
            context.escape(document.text(inline.content))?;
            context.write_str("</a>")?;
        }
    }
    Ok(())
}

fn format_inline_children(context: &mut Context, inline: &Inline) -> fmt::Result {
    for child in context.document.inline_children(inline) {
        format_inline(context, child)?;
    }
    Ok(())
}

/// Flattens an inline subtree to plain text for image `alt` attributes.
/// Soft breaks become spaces and hard breaks newlines.
fn collect_text(document: &Document, inline: &Inline, output: &mut String) {
    match inline.kind {
        InlineKind::Text | InlineKind::Code | InlineKind::Autolink(_) => {
            output.push_str(document.text(inline.content))
        }
        InlineKind::SoftBreak => output.push(' '),
        InlineKind::LineBreak => output.push('\n'),
        _ => {
            for child in document.inline_children(inline) {
                collect_text(document, child, output);
            }
        }
    }
}

/// Writes `buffer` to `output`, replacing the characters that are unsafe
/// in HTML text position with entities.  Runs of safe bytes are written in
/// single batches.
///
/// * U+0022 QUOTATION MARK `"` is rendered as `&quot;`
/// * U+0026 AMPERSAND `&` is rendered as `&amp;`
/// * U+003C LESS-THAN SIGN `<` is rendered as `&lt;`
/// * U+003E GREATER-THAN SIGN `>` is rendered as `&gt;`
/// * Everything else is passed through unchanged.
///
/// Note that this is appropriate and sufficient for free text, but not for
/// attribute values or verbatim code-block content; see [`escape_attr`].
pub fn escape(output: &mut dyn Write, buffer: &str) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let matcher = jetscii::bytes!(b'"', b'&', b'<', b'>');

    let mut offset = 0;
    while let Some(i) = matcher.find(&bytes[offset..]) {
        let esc: &str = match bytes[offset + i] {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => unreachable!(),
        };
        output.write_str(&buffer[offset..offset + i])?;
        output.write_str(esc)?;
        offset += i + 1;
    }
    output.write_str(&buffer[offset..])?;
    Ok(())
}

/// Writes `buffer` to `output` like [`escape`], additionally rendering
/// U+0027 APOSTROPHE `'` as `&#39;`.  Used for attribute values (URLs,
/// titles, image alt text) and for code-block content.
pub fn escape_attr(output: &mut dyn Write, buffer: &str) -> fmt::Result {
    let bytes = buffer.as_bytes();
    let matcher = jetscii::bytes!(b'"', b'&', b'\'', b'<', b'>');

    let mut offset = 0;
    while let Some(i) = matcher.find(&bytes[offset..]) {
        let esc: &str = match bytes[offset + i] {
            b'"' => "&quot;",
            b'&' => "&amp;",
            b'\'' => "&#39;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => unreachable!(),
        };
        output.write_str(&buffer[offset..offset + i])?;
        output.write_str(esc)?;
        offset += i + 1;
    }
    output.write_str(&buffer[offset..])?;
    Ok(())
}
