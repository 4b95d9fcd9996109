//! The inline parser.
//!
//! A single forward pass over one leaf block's content view.  Each special
//! character either opens a construct or falls back to literal text, so
//! every byte of the view is accounted for and parsing cannot fail.
//! Nodes accumulate in the subject's scratch tree; the block parser lays
//! them out into the document's flat inline array afterwards.

use smallvec::SmallVec;
use unicode_categories::UnicodeCategories;

use crate::ctype::ispunct;
use crate::nodes::{AutolinkType, Inline, InlineKind, NodeLink, Span};
use crate::scanners;

// Emphasis and bracket recursion is bounded; past this depth delimiters
// degrade to literal text.
const MAX_INLINE_NESTING: usize = 100;

pub(crate) type Children = SmallVec<[usize; 4]>;

pub(crate) struct Subject<'a> {
    source: &'a str,
    bytes: &'a [u8],
    depth: usize,
    pub(crate) scratch: Vec<Inline>,
    pub(crate) children: Vec<Children>,
}

#[inline]
fn find_special(s: &[u8]) -> Option<usize> {
    jetscii::bytes!(b'`', b'[', b'!', b'\\', b'<', b'*', b'_', b'\n', b'\r').find(s)
}

#[inline]
fn is_punct_char(c: char) -> bool {
    if c.is_ascii() {
        ispunct(c as u8)
    } else {
        c.is_punctuation() || c.is_symbol()
    }
}

impl<'a> Subject<'a> {
    pub(crate) fn new(source: &'a str) -> Subject<'a> {
        Subject {
            source,
            bytes: source.as_bytes(),
            depth: 0,
            scratch: vec![],
            children: vec![],
        }
    }

    /// Tokenizes `[lo, hi)` and returns the produced top-level node ids.
    pub(crate) fn parse_range(&mut self, lo: usize, hi: usize) -> Children {
        let mut nodes = Children::new();
        let mut p = lo;
        while p < hi {
            let next = match find_special(&self.bytes[p..hi]) {
                Some(i) => p + i,
                None => hi,
            };
            if next > p {
                self.push_literal(&mut nodes, Span::new(p, next));
                p = next;
            }
            if p >= hi {
                break;
            }
            match self.bytes[p] {
                b'`' => self.handle_backticks(&mut nodes, &mut p, hi),
                b'[' => self.handle_bracket(&mut nodes, &mut p, hi, false),
                b'!' => {
                    if p + 1 < hi && self.bytes[p + 1] == b'[' {
                        self.handle_bracket(&mut nodes, &mut p, hi, true);
                    } else {
                        self.push_literal(&mut nodes, Span::new(p, p + 1));
                        p += 1;
                    }
                }
                b'\\' => self.handle_backslash(&mut nodes, &mut p, hi),
                b'<' => self.handle_pointy_brace(&mut nodes, &mut p, hi),
                b'*' | b'_' => self.handle_delim(&mut nodes, &mut p, hi),
                _ => self.handle_newline(&mut nodes, &mut p, hi),
            }
        }
        nodes
    }

    fn push(&mut self, kind: InlineKind, content: Span) -> usize {
        let ix = self.scratch.len();
        self.scratch.push(Inline::new(kind, content));
        self.children.push(Children::new());
        ix
    }

    /// Emits a literal, merging with an adjacent preceding literal.
    fn push_literal(&mut self, nodes: &mut Children, span: Span) {
        if span.is_empty() {
            return;
        }
        if let Some(&last) = nodes.last() {
            if self.scratch[last].kind == InlineKind::Text
                && self.scratch[last].content.end == span.start
            {
                self.scratch[last].content.end = span.end;
                return;
            }
        }
        let ix = self.push(InlineKind::Text, span);
        nodes.push(ix);
    }

    fn run_length(&self, p: usize, hi: usize, b: u8) -> usize {
        let mut n = 0;
        while p + n < hi && self.bytes[p + n] == b {
            n += 1;
        }
        n
    }

    /// Code spans bind tighter than everything else: an opening run of `k`
    /// backticks pairs with the next run of exactly `k`.
    fn handle_backticks(&mut self, nodes: &mut Children, p: &mut usize, hi: usize) {
        let start = *p;
        let k = self.run_length(start, hi, b'`');
        let mut q = start + k;
        while q < hi {
            if self.bytes[q] == b'`' {
                let m = self.run_length(q, hi, b'`');
                if m == k {
                    let mut content = Span::new(start + k, q);
                    let inner = &self.bytes[content.start..content.end];
                    if content.len() >= 2
                        && inner[0] == b' '
                        && inner[inner.len() - 1] == b' '
                        && inner.iter().any(|&c| c != b' ')
                    {
                        content.start += 1;
                        content.end -= 1;
                    }
                    let ix = self.push(InlineKind::Code, content);
                    nodes.push(ix);
                    *p = q + m;
                    return;
                }
                q += m;
            } else {
                q += 1;
            }
        }
        // No matching run; the opening run is literal.
        self.push_literal(nodes, Span::new(start, start + k));
        *p = start + k;
    }

    fn handle_backslash(&mut self, nodes: &mut Children, p: &mut usize, hi: usize) {
        let start = *p;
        if start + 1 < hi {
            let next = self.bytes[start + 1];
            if next == b'\n' || next == b'\r' {
                *p = start + 1;
                self.emit_break(nodes, p, hi, true);
                return;
            }
            if ispunct(next) {
                self.push_literal(nodes, Span::new(start + 1, start + 2));
                *p = start + 2;
                return;
            }
        }
        self.push_literal(nodes, Span::new(start, start + 1));
        *p = start + 1;
    }

    /// Autolinks are tried before generic raw HTML, so a well-formed
    /// `<http://…>` never becomes raw HTML.
    fn handle_pointy_brace(&mut self, nodes: &mut Children, p: &mut usize, hi: usize) {
        let start = *p;
        let after = &self.bytes[start + 1..hi];
        if let Some(len) = scanners::autolink_uri(after) {
            let ix = self.push(
                InlineKind::Autolink(AutolinkType::Uri),
                Span::new(start + 1, start + len),
            );
            nodes.push(ix);
            *p = start + 1 + len;
            return;
        }
        if let Some(len) = scanners::autolink_email(after) {
            let ix = self.push(
                InlineKind::Autolink(AutolinkType::Email),
                Span::new(start + 1, start + len),
            );
            nodes.push(ix);
            *p = start + 1 + len;
            return;
        }
        if let Some(len) = scanners::html_inline(after) {
            let ix = self.push(InlineKind::HtmlInline, Span::new(start, start + 1 + len));
            nodes.push(ix);
            *p = start + 1 + len;
            return;
        }
        self.push_literal(nodes, Span::new(start, start + 1));
        *p = start + 1;
    }

    fn handle_newline(&mut self, nodes: &mut Children, p: &mut usize, hi: usize) {
        // Trailing spaces belong to the break, not the text; two or more
        // of them make it hard.
        let mut hard = false;
        if let Some(&last) = nodes.last() {
            let node = self.scratch[last];
            if node.kind == InlineKind::Text && node.content.end == *p {
                let mut end = node.content.end;
                while end > node.content.start && self.bytes[end - 1] == b' ' {
                    end -= 1;
                }
                hard = node.content.end - end >= 2;
                self.scratch[last].content.end = end;
                if self.scratch[last].content.is_empty() {
                    nodes.pop();
                }
            }
        }
        self.emit_break(nodes, p, hi, hard);
    }

    /// Consumes the terminator plus the next line's continuation prefix:
    /// leading whitespace and any block-quote markers, which cannot be
    /// paragraph text (a line starting with `>` never continues one).
    fn emit_break(&mut self, nodes: &mut Children, p: &mut usize, hi: usize, hard: bool) {
        let nl_start = *p;
        if self.bytes[*p] == b'\r' {
            *p += 1;
            if *p < hi && self.bytes[*p] == b'\n' {
                *p += 1;
            }
        } else {
            *p += 1;
        }
        let span = Span::new(nl_start, *p);
        loop {
            while *p < hi && (self.bytes[*p] == b' ' || self.bytes[*p] == b'\t') {
                *p += 1;
            }
            if *p < hi && self.bytes[*p] == b'>' {
                *p += 1;
                if *p < hi && self.bytes[*p] == b' ' {
                    *p += 1;
                }
            } else {
                break;
            }
        }
        let kind = if hard {
            InlineKind::LineBreak
        } else {
            InlineKind::SoftBreak
        };
        let ix = self.push(kind, span);
        nodes.push(ix);
    }

    /// Scans a `[text](url "title")` candidate.  On any failure the opening
    /// bracket is emitted as a literal and scanning resumes after it.
    fn handle_bracket(&mut self, nodes: &mut Children, p: &mut usize, hi: usize, image: bool) {
        let open = *p;
        if self.depth < MAX_INLINE_NESTING {
            if let Some((node, end)) = self.scan_link(open, hi, image) {
                nodes.push(node);
                *p = end;
                return;
            }
        }
        self.push_literal(nodes, Span::new(open, open + 1));
        *p = open + 1;
    }

    fn scan_link(&mut self, open: usize, hi: usize, image: bool) -> Option<(usize, usize)> {
        let bracket = if image { open + 1 } else { open };

        // The matching `]`, honoring nesting and backslash escapes.
        let mut q = bracket + 1;
        let mut nesting = 0;
        let close = loop {
            if q >= hi {
                return None;
            }
            match self.bytes[q] {
                b'\\' => q += 2,
                b'[' => {
                    nesting += 1;
                    q += 1;
                }
                b']' => {
                    if nesting == 0 {
                        break q;
                    }
                    nesting -= 1;
                    q += 1;
                }
                _ => q += 1,
            }
        };

        if close + 1 >= hi || self.bytes[close + 1] != b'(' {
            return None;
        }
        let mut q = close + 2;
        while q < hi && self.bytes[q].is_ascii_whitespace() {
            q += 1;
        }
        let url_start = q;
        while q < hi
            && !self.bytes[q].is_ascii_whitespace()
            && self.bytes[q] != b')'
            && self.bytes[q] != b'"'
            && self.bytes[q] != b'\''
        {
            q += if self.bytes[q] == b'\\' { 2 } else { 1 };
        }
        let url = Span::new(url_start, q.min(hi));
        let mut q = q.min(hi);
        while q < hi && self.bytes[q].is_ascii_whitespace() {
            q += 1;
        }

        let mut title = Span::default();
        if q < hi && (self.bytes[q] == b'"' || self.bytes[q] == b'\'') {
            let quote = self.bytes[q];
            let title_start = q + 1;
            q += 1;
            while q < hi && self.bytes[q] != quote {
                q += if self.bytes[q] == b'\\' { 2 } else { 1 };
            }
            if q >= hi {
                return None;
            }
            title = Span::new(title_start, q);
            q += 1;
            while q < hi && self.bytes[q].is_ascii_whitespace() {
                q += 1;
            }
        }

        if q >= hi || self.bytes[q] != b')' {
            return None;
        }

        let text = Span::new(bracket + 1, close);
        self.depth += 1;
        let kids = self.parse_range(text.start, text.end);
        self.depth -= 1;

        let link = NodeLink { url, title };
        let kind = if image {
            InlineKind::Image(link)
        } else {
            InlineKind::Link(link)
        };
        let node = self.push(kind, text);
        self.children[node] = kids;
        Some((node, q + 1))
    }

    /// Measures the delimiter run at `q` and classifies its flanking per
    /// the CommonMark rules; `_` additionally refuses intra-word use.
    fn scan_delims(&self, q: usize, hi: usize, b: u8) -> (usize, bool, bool) {
        let n = self.run_length(q, hi, b);

        let before_char = self.source[..q].chars().next_back().unwrap_or('\n');
        let after_char = if q + n >= hi {
            '\n'
        } else {
            self.source[q + n..].chars().next().unwrap_or('\n')
        };

        let before_ws = before_char.is_whitespace();
        let before_punct = is_punct_char(before_char);
        let after_ws = after_char.is_whitespace();
        let after_punct = is_punct_char(after_char);

        let left_flanking = !after_ws && (!after_punct || before_ws || before_punct);
        let right_flanking = !before_ws && (!before_punct || after_ws || after_punct);

        if b == b'_' {
            (
                n,
                left_flanking && (!right_flanking || before_punct),
                right_flanking && (!left_flanking || after_punct),
            )
        } else {
            (n, left_flanking, right_flanking)
        }
    }

    fn handle_delim(&mut self, nodes: &mut Children, p: &mut usize, hi: usize) {
        let b = self.bytes[*p];
        let start = *p;
        let (n, can_open, _) = self.scan_delims(start, hi, b);

        if !can_open || self.depth >= MAX_INLINE_NESTING {
            self.push_literal(nodes, Span::new(start, start + n));
            *p = start + n;
            return;
        }

        match self.find_closer(start + n, hi, b) {
            Some((closer, m)) => {
                let interior = Span::new(start + n, closer);
                self.depth += 1;
                let mut kids = self.parse_range(interior.start, interior.end);
                self.depth -= 1;

                // Prefer two-delimiter matches while both ends have two or
                // more to give; leftovers re-enter the stream.
                let mut n_rem = n;
                let mut m_rem = m;
                let mut node = 0;
                while n_rem > 0 && m_rem > 0 {
                    let take = if n_rem >= 2 && m_rem >= 2 { 2 } else { 1 };
                    let kind = if take == 2 {
                        InlineKind::Strong(b)
                    } else {
                        InlineKind::Emph(b)
                    };
                    node = self.push(kind, interior);
                    self.children[node] = std::mem::take(&mut kids);
                    kids.push(node);
                    n_rem -= take;
                    m_rem -= take;
                }
                if n_rem > 0 {
                    self.push_literal(nodes, Span::new(start, start + n_rem));
                }
                nodes.push(node);
                *p = closer + m - m_rem;
            }
            None => {
                self.push_literal(nodes, Span::new(start, start + n));
                *p = start + n;
            }
        }
    }

    /// Finds the closing run for a delimiter opened at the cursor, skipping
    /// escaped characters and closed code spans, and balancing any inner
    /// openers of the same character.
    fn find_closer(&self, from: usize, hi: usize, b: u8) -> Option<(usize, usize)> {
        let mut q = from;
        let mut inner_openers = 0;
        while q < hi {
            let c = self.bytes[q];
            if c == b'\\' {
                q += 2;
            } else if c == b'`' {
                q = self.skip_code_span(q, hi);
            } else if c == b {
                let (m, opens, closes) = self.scan_delims(q, hi, b);
                if closes && inner_openers > 0 {
                    inner_openers -= 1;
                    q += m;
                } else if closes {
                    return Some((q, m));
                } else if opens {
                    inner_openers += 1;
                    q += m;
                } else {
                    q += m;
                }
            } else {
                q += 1;
            }
        }
        None
    }

    fn skip_code_span(&self, q: usize, hi: usize) -> usize {
        let k = self.run_length(q, hi, b'`');
        let mut r = q + k;
        while r < hi {
            if self.bytes[r] == b'`' {
                let m = self.run_length(r, hi, b'`');
                if m == k {
                    return r + m;
                }
                r += m;
            } else {
                r += 1;
            }
        }
        q + k
    }
}
