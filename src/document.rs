//! The parsed document value.

use crate::nodes::{Block, Inline, Span};

/// An immutable parse result, borrowing the source buffer.
///
/// The block and inline arrays are laid out breadth-first: the top-level
/// blocks form the prefix of the block array, and every container's children
/// occupy one contiguous run further along.  The document also keeps the
/// line table built by the block parser's first pass, which the renderer
/// uses to resolve fenced code content without re-scanning the buffer.
#[derive(Debug)]
pub struct Document<'a> {
    source: &'a str,
    blocks: Box<[Block]>,
    top_level_count: usize,
    inlines: Box<[Inline]>,
    lines: Box<[Span]>,
}

impl<'a> Document<'a> {
    pub(crate) fn new(
        source: &'a str,
        blocks: Vec<Block>,
        top_level_count: usize,
        inlines: Vec<Inline>,
        lines: Vec<Span>,
    ) -> Document<'a> {
        let doc = Document {
            source,
            blocks: blocks.into_boxed_slice(),
            top_level_count,
            inlines: inlines.into_boxed_slice(),
            lines: lines.into_boxed_slice(),
        };
        debug_assert!(doc.invariants_hold());
        doc
    }

    /// The buffer this document was parsed from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Every block in the document, in layout order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The top-level blocks, a prefix of [`Self::blocks`].
    pub fn top_level(&self) -> &[Block] {
        &self.blocks[..self.top_level_count]
    }

    /// Every inline in the document.
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    /// The child blocks of a container, as a contiguous slice.
    pub fn children(&self, block: &Block) -> &[Block] {
        &self.blocks[block.first_child..block.first_child + block.child_count]
    }

    /// The inline content of a leaf block.
    pub fn block_inlines(&self, block: &Block) -> &[Inline] {
        &self.inlines[block.first_inline..block.first_inline + block.inline_count]
    }

    /// The child inlines of an inline container.
    pub fn inline_children(&self, inline: &Inline) -> &[Inline] {
        &self.inlines[inline.first_child..inline.first_child + inline.child_count]
    }

    /// Resolves a span against the source buffer.
    pub fn text(&self, span: Span) -> &'a str {
        span.of(self.source)
    }

    /// The boundaries of source line `index`, excluding the terminator.
    pub fn line(&self, index: usize) -> Span {
        self.lines[index]
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Checks the structural invariants of the node arrays: every span is in
    /// bounds, every child range is in bounds and strictly follows its
    /// parent.  Descendants-follow-ancestor makes child cycles impossible.
    pub(crate) fn invariants_hold(&self) -> bool {
        let len = self.source.len();
        let span_ok = |s: Span| s.start <= s.end && s.end <= len;

        if self.top_level_count > self.blocks.len() {
            return false;
        }

        for (ix, b) in self.blocks.iter().enumerate() {
            let content_ok = if let crate::nodes::BlockKind::CodeBlock(ncb) = b.kind {
                if ncb.fenced {
                    b.content.start <= b.content.end && b.content.end <= self.lines.len()
                } else {
                    span_ok(b.content)
                }
            } else {
                span_ok(b.content)
            };
            if !content_ok || !span_ok(b.data) {
                return false;
            }
            if b.container() {
                if b.content != Span::default() || b.inline_count != 0 {
                    return false;
                }
                if b.child_count > 0
                    && (b.first_child <= ix
                        || b.first_child + b.child_count > self.blocks.len())
                {
                    return false;
                }
            } else {
                if b.child_count != 0 {
                    return false;
                }
                if b.first_inline + b.inline_count > self.inlines.len() {
                    return false;
                }
            }
        }

        for (ix, i) in self.inlines.iter().enumerate() {
            if !span_ok(i.content) {
                return false;
            }
            if let crate::nodes::InlineKind::Link(nl) | crate::nodes::InlineKind::Image(nl) =
                i.kind
            {
                if !span_ok(nl.url) || !span_ok(nl.title) {
                    return false;
                }
            }
            if i.child_count > 0
                && (i.first_child <= ix || i.first_child + i.child_count > self.inlines.len())
            {
                return false;
            }
        }

        true
    }
}
