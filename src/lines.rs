//! The line scanner.
//!
//! Segments the source buffer into logical lines without allocating,
//! recognizing `\n`, `\r`, and `\r\n` terminators.  Returned spans never
//! include the terminator.

use crate::nodes::Span;

pub struct LineScanner<'a> {
    source: &'a [u8],
    pos: usize,
    line_number: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(source: &'a str) -> LineScanner<'a> {
        LineScanner {
            source: source.as_bytes(),
            pos: 0,
            line_number: 0,
        }
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.source.len()
    }

    /// 0-based number of lines returned so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the next line's span and advances past its terminator, or
    /// `None` at end of input.  Input ending without a terminator yields a
    /// final non-empty line.
    pub fn next_line(&mut self) -> Option<Span> {
        if !self.has_more() {
            return None;
        }
        let start = self.pos;
        let mut p = self.pos;
        while p < self.source.len() {
            match self.source[p] {
                b'\n' => {
                    self.pos = p + 1;
                    self.line_number += 1;
                    return Some(Span::new(start, p));
                }
                b'\r' => {
                    self.pos = p + 1;
                    if self.pos < self.source.len() && self.source[self.pos] == b'\n' {
                        self.pos += 1;
                    }
                    self.line_number += 1;
                    return Some(Span::new(start, p));
                }
                _ => p += 1,
            }
        }
        self.pos = p;
        self.line_number += 1;
        Some(Span::new(start, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<&str> {
        let mut scanner = LineScanner::new(input);
        let mut out = vec![];
        while let Some(span) = scanner.next_line() {
            out.push(span.of(input));
        }
        out
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert_eq!(lines(""), Vec::<&str>::new());
    }

    #[test]
    fn recognizes_all_terminators() {
        assert_eq!(lines("a\nb\rc\r\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn terminator_only_input() {
        assert_eq!(lines("\n\r\n\r"), vec!["", "", ""]);
    }

    #[test]
    fn final_line_without_terminator() {
        let l = lines("one\ntwo");
        assert_eq!(l, vec!["one", "two"]);
    }

    #[test]
    fn reconstruction_law() {
        // Concatenating lines with their original terminators reproduces
        // the buffer byte for byte.
        let input = "a\r\nbb\rccc\nno-term";
        let mut scanner = LineScanner::new(input);
        let mut rebuilt = String::new();
        let mut prev_end = 0;
        while let Some(span) = scanner.next_line() {
            rebuilt.push_str(&input[prev_end..span.start]);
            rebuilt.push_str(span.of(input));
            prev_end = span.end;
        }
        rebuilt.push_str(&input[prev_end..]);
        assert_eq!(rebuilt, input);
        assert_eq!(scanner.line_number(), 4);
    }

    #[test]
    fn normalized_rescan_law() {
        let input = "a\rb\r\nc\nd";
        let first: Vec<String> = lines(input).iter().map(|s| s.to_string()).collect();
        let normalized: String = first.iter().map(|l| format!("{}\n", l)).collect();
        let second: Vec<String> = lines(&normalized).iter().map(|s| s.to_string()).collect();
        assert_eq!(first, second);
    }
}
