//! The block parser.
//!
//! Two passes over the buffer: the first records every line's boundaries,
//! the second walks the lines and classifies each one against the open
//! container stack.  Blocks accumulate in a scratch tree and are laid out
//! breadth-first into the flat array when parsing ends, so that every
//! container's children form one contiguous index range strictly after the
//! container itself.

mod inlines;

use smallvec::SmallVec;

use crate::document::Document;
use crate::lines::LineScanner;
use crate::nodes::{Block, BlockKind, NodeCodeBlock, NodeHeading, NodeList, Span};
use crate::parser::inlines::Subject;
use crate::scanners::{self, ListMarker};
use crate::strings::{self, leading_indent};

const CODE_INDENT: usize = 4;

// Deeply nested containers can only come from contrived input; past this
// depth new markers are treated as text.
const MAX_CONTAINER_DEPTH: usize = 100;

/// Parse a Markdown document into a flat [`Document`] borrowing `buffer`.
///
/// Parsing is total: every line classifies as *some* block, and malformed
/// constructs degrade to paragraph text rather than errors.
pub fn parse_document(buffer: &str) -> Document<'_> {
    Parser::new(buffer).run()
}

#[derive(Clone, Copy)]
enum Container {
    Quote {
        index: usize,
    },
    List {
        index: usize,
        item: usize,
        /// Columns from the list's local origin to its items' content.
        content_indent: usize,
    },
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    lines: Vec<Span>,
    scratch: Vec<Block>,
    children: Vec<SmallVec<[usize; 4]>>,
    roots: Vec<usize>,
    stack: SmallVec<[Container; 8]>,
    open_paragraph: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Parser<'a> {
        Parser {
            source,
            bytes: source.as_bytes(),
            lines: vec![],
            scratch: vec![],
            children: vec![],
            roots: vec![],
            stack: SmallVec::new(),
            open_paragraph: None,
        }
    }

    fn run(mut self) -> Document<'a> {
        let mut scanner = LineScanner::new(self.source);
        while let Some(span) = scanner.next_line() {
            self.lines.push(span);
        }

        let mut i = 0;
        while i < self.lines.len() {
            i = self.process_line(i);
        }

        let mut blocks = Vec::with_capacity(self.scratch.len());
        flatten_tree(
            &self.scratch,
            &self.children,
            &self.roots,
            &mut blocks,
            |b, first, count| {
                b.first_child = first;
                b.child_count = count;
            },
        );
        let top_level_count = self.roots.len();

        let mut inlines = Vec::new();
        let mut subject = Subject::new(self.source);
        for ix in 0..blocks.len() {
            if !blocks[ix].contains_inlines() {
                continue;
            }
            let content = strings::rtrim(self.bytes, blocks[ix].content);
            blocks[ix].content = content;
            if content.is_empty() {
                continue;
            }
            let roots = subject.parse_range(content.start, content.end);
            let base = inlines.len();
            flatten_tree(
                &subject.scratch,
                &subject.children,
                &roots,
                &mut inlines,
                |n, first, count| {
                    n.first_child = first;
                    n.child_count = count;
                },
            );
            blocks[ix].first_inline = base;
            blocks[ix].inline_count = roots.len();
        }

        Document::new(self.source, blocks, top_level_count, inlines, self.lines)
    }

    fn push_block(&mut self, block: Block) -> usize {
        let ix = self.scratch.len();
        self.scratch.push(block);
        self.children.push(SmallVec::new());
        ix
    }

    /// Appends `ix` to the deepest open container, or to the top level.
    fn attach(&mut self, ix: usize) {
        match self.stack.last() {
            Some(&Container::Quote { index }) => self.children[index].push(ix),
            Some(&Container::List { item, .. }) => self.children[item].push(ix),
            None => self.roots.push(ix),
        }
    }

    fn truncate_stack(&mut self, depth: usize) {
        if depth < self.stack.len() {
            self.open_paragraph = None;
            self.stack.truncate(depth);
        }
    }

    fn in_list(&self) -> bool {
        self.stack
            .iter()
            .any(|c| matches!(c, Container::List { .. }))
    }

    /// Classifies line `line_idx` and returns the index of the next line to
    /// process (fenced code blocks consume several lines at once).
    fn process_line(&mut self, line_idx: usize) -> usize {
        let line = self.lines[line_idx];
        let mut p = line.start;
        let mut col = 0;

        // Match the continuation rules of the open containers, consuming
        // their markers.  The first container that fails closes everything
        // above it.
        let mut matched = self.stack.len();
        let mut new_item: Option<(usize, ListMarker, usize, usize)> = None;
        for d in 0..self.stack.len() {
            match self.stack[d] {
                Container::Quote { .. } => {
                    let rest = &self.bytes[p..line.end];
                    let (icols, ibytes) = leading_indent(rest);
                    if icols <= 3 && rest.get(ibytes) == Some(&b'>') {
                        p += ibytes + 1;
                        col += icols + 1;
                        if p < line.end && self.bytes[p] == b' ' {
                            p += 1;
                            col += 1;
                        }
                    } else {
                        matched = d;
                        break;
                    }
                }
                Container::List {
                    index,
                    content_indent,
                    ..
                } => {
                    let rest = &self.bytes[p..line.end];
                    if strings::is_blank(rest) {
                        matched = d;
                        break;
                    }
                    let (icols, ibytes) = leading_indent(rest);
                    if icols >= content_indent {
                        let adv = consume_columns(rest, content_indent);
                        p += adv;
                        col += content_indent;
                    } else if let Some(m) = scanners::list_marker(&rest[ibytes..]) {
                        if icols <= 3 && self.marker_matches(index, m) {
                            new_item = Some((d, m, p + ibytes, col + icols));
                            matched = d + 1;
                        } else {
                            matched = d;
                        }
                        break;
                    } else {
                        matched = d;
                        break;
                    }
                }
            }
        }
        self.truncate_stack(matched);

        if let Some((d, m, marker_off, marker_col)) = new_item {
            self.open_paragraph = None;
            if let Container::List { index, .. } = self.stack[d] {
                let item = self.push_block(Block::new(BlockKind::Item, line_idx, marker_col));
                self.children[index].push(item);
                // `col` still sits at the list's local origin: the loop broke
                // before consuming anything at this depth.
                self.stack[d] = Container::List {
                    index,
                    item,
                    content_indent: (marker_col - col) + m.content_offset,
                };
                p = marker_off + m.content_offset;
                col = marker_col + m.content_offset;
            }
        }

        // Open new containers at the current position.
        let mut opened_container = false;
        loop {
            if self.stack.len() >= MAX_CONTAINER_DEPTH {
                break;
            }
            let rest = &self.bytes[p..line.end];
            let (icols, ibytes) = leading_indent(rest);
            if icols >= CODE_INDENT || ibytes == rest.len() {
                break;
            }
            let r = &rest[ibytes..];
            if r[0] == b'>' {
                self.open_paragraph = None;
                let quote =
                    self.push_block(Block::new(BlockKind::BlockQuote, line_idx, col + icols));
                self.attach(quote);
                self.stack.push(Container::Quote { index: quote });
                opened_container = true;
                p += ibytes + 1;
                col += icols + 1;
                if p < line.end && self.bytes[p] == b' ' {
                    p += 1;
                    col += 1;
                }
                continue;
            }
            if scanners::thematic_break(r).is_some() {
                break;
            }
            if let Some(m) = scanners::list_marker(r) {
                self.open_paragraph = None;
                let list = self.push_block(Block::new(
                    BlockKind::List(NodeList {
                        list_type: m.list_type,
                        start: m.start,
                        delimiter: scanners::list_delim_type(m.marker_char),
                        bullet_char: if m.list_type == crate::nodes::ListType::Bullet {
                            m.marker_char
                        } else {
                            0
                        },
                    }),
                    line_idx,
                    col + icols,
                ));
                self.attach(list);
                let item = self.push_block(Block::new(BlockKind::Item, line_idx, col + icols));
                self.children[list].push(item);
                self.stack.push(Container::List {
                    index: list,
                    item,
                    content_indent: icols + m.content_offset,
                });
                opened_container = true;
                p += ibytes + m.content_offset;
                col += icols + m.content_offset;
                continue;
            }
            break;
        }

        self.classify_leaf(line_idx, line, p, col, opened_container)
    }

    /// Rules 1–5, 8 and 9: the leaf block classification at the position
    /// left after container matching.
    fn classify_leaf(
        &mut self,
        line_idx: usize,
        line: Span,
        p: usize,
        col: usize,
        opened_container: bool,
    ) -> usize {
        let rest = &self.bytes[p..line.end];
        let (icols, ibytes) = leading_indent(rest);

        if strings::is_blank(rest) {
            self.open_paragraph = None;
            if !opened_container {
                let blank = self.push_block(Block::new(BlockKind::BlankLine, line_idx, col));
                self.attach(blank);
            }
            return line_idx + 1;
        }

        if icols >= CODE_INDENT && !self.in_list() && self.open_paragraph.is_none() {
            let start = p + consume_columns(rest, CODE_INDENT);
            let mut block = Block::new(
                BlockKind::CodeBlock(NodeCodeBlock::default()),
                line_idx,
                col + CODE_INDENT,
            );
            block.content = Span::new(start, line.end);
            let ix = self.push_block(block);
            self.attach(ix);
            return line_idx + 1;
        }

        if icols < CODE_INDENT {
            let r = &rest[ibytes..];

            if let Some((level, content_offset)) = scanners::atx_heading_start(r) {
                self.open_paragraph = None;
                let mut block = Block::new(
                    BlockKind::Heading(NodeHeading { level }),
                    line_idx,
                    col + icols,
                );
                block.content = strings::chop_trailing_hashtags(
                    self.bytes,
                    Span::new(p + ibytes + content_offset, line.end),
                );
                let ix = self.push_block(block);
                self.attach(ix);
                return line_idx + 1;
            }

            if let Some(marker) = scanners::thematic_break(r) {
                self.open_paragraph = None;
                let block = Block::new(BlockKind::ThematicBreak(marker), line_idx, col + icols);
                let ix = self.push_block(block);
                self.attach(ix);
                return line_idx + 1;
            }

            if let Some((fence_char, fence_length, info_offset)) = scanners::open_code_fence(r) {
                self.open_paragraph = None;
                return self.finish_code_fence(
                    line_idx,
                    line,
                    p + ibytes,
                    col + icols,
                    fence_char,
                    fence_length,
                    info_offset,
                );
            }

            if let Some((tag_start, tag_end)) = scanners::html_block_start(r) {
                self.open_paragraph = None;
                let mut block = Block::new(BlockKind::HtmlBlock, line_idx, col + icols);
                block.content = Span::new(p + ibytes, line.end);
                block.data = Span::new(p + ibytes + tag_start, p + ibytes + tag_end);
                let ix = self.push_block(block);
                self.attach(ix);
                return line_idx + 1;
            }
        }

        match self.open_paragraph {
            Some(ix) => {
                self.scratch[ix].content.end = line.end;
                self.scratch[ix].line_count += 1;
            }
            None => {
                let mut block = Block::new(BlockKind::Paragraph, line_idx, col + icols);
                block.content = Span::new(p + ibytes, line.end);
                let ix = self.push_block(block);
                self.attach(ix);
                self.open_paragraph = Some(ix);
            }
        }
        line_idx + 1
    }

    /// Scans ahead through the line index for the closing fence and emits
    /// the whole fenced block at once.  An unclosed fence runs to
    /// end-of-input.  The block's content span is a line-number range.
    #[allow(clippy::too_many_arguments)]
    fn finish_code_fence(
        &mut self,
        line_idx: usize,
        line: Span,
        fence_off: usize,
        fence_col: usize,
        fence_char: u8,
        fence_length: usize,
        info_offset: usize,
    ) -> usize {
        let mut close = None;
        for j in line_idx + 1..self.lines.len() {
            let l = self.lines[j];
            let bytes = &self.bytes[l.start..l.end];
            let (icols, ibytes) = leading_indent(bytes);
            if icols <= 3 && scanners::close_code_fence(&bytes[ibytes..], fence_char, fence_length)
            {
                close = Some(j);
                break;
            }
        }
        let content_end = close.unwrap_or(self.lines.len());

        let mut block = Block::new(
            BlockKind::CodeBlock(NodeCodeBlock {
                fenced: true,
                fence_char,
                fence_length,
            }),
            line_idx,
            fence_col,
        );
        block.content = Span::new(line_idx + 1, content_end);
        block.line_count = content_end - (line_idx + 1);
        block.data = strings::trim(self.bytes, Span::new(fence_off + info_offset, line.end));
        let ix = self.push_block(block);
        self.attach(ix);

        match close {
            Some(j) => j + 1,
            None => self.lines.len(),
        }
    }

    fn marker_matches(&self, list_index: usize, m: ListMarker) -> bool {
        match self.scratch[list_index].kind {
            BlockKind::List(nl) => {
                nl.list_type == m.list_type
                    && match m.list_type {
                        crate::nodes::ListType::Bullet => nl.bullet_char == m.marker_char,
                        crate::nodes::ListType::Ordered => {
                            nl.delimiter == scanners::list_delim_type(m.marker_char)
                        }
                    }
            }
            _ => false,
        }
    }
}

/// Lays a scratch forest out breadth-first into `out`: the roots go first,
/// in order, then each node's children as one contiguous run.  `set_range`
/// receives every node's child range in the coordinates of `out`.
pub(crate) fn flatten_tree<T: Copy>(
    scratch: &[T],
    children: &[SmallVec<[usize; 4]>],
    roots: &[usize],
    out: &mut Vec<T>,
    set_range: impl Fn(&mut T, usize, usize),
) {
    let base = out.len();
    let mut order: Vec<usize> = roots.to_vec();
    let mut ranges: Vec<(usize, usize)> = Vec::with_capacity(roots.len());
    let mut head = 0;
    while head < order.len() {
        let sid = order[head];
        let kids = &children[sid];
        if kids.is_empty() {
            ranges.push((0, 0));
        } else {
            ranges.push((base + order.len(), kids.len()));
            order.extend_from_slice(kids);
        }
        head += 1;
    }
    for (k, &sid) in order.iter().enumerate() {
        let mut node = scratch[sid];
        let (first, count) = ranges[k];
        set_range(&mut node, first, count);
        out.push(node);
    }
}

/// Consumes up to `want` columns of leading whitespace, returning the
/// bytes advanced.  A tab that straddles the target is consumed whole.
fn consume_columns(s: &[u8], want: usize) -> usize {
    let mut col = 0;
    let mut i = 0;
    while i < s.len() && col < want {
        match s[i] {
            b' ' => col += 1,
            b'\t' => col += 4 - col % 4,
            _ => break,
        }
        i += 1;
    }
    i
}
