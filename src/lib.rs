//! A zero-copy Markdown parser and HTML renderer for a pragmatic
//! CommonMark subset.
//!
//! The input buffer is treated as an immutable sequence of bytes; parsing
//! produces a [`Document`] of fixed-size value nodes that reference the
//! buffer by offset ranges and each other by index ranges.  No substring
//! is materialized while parsing, and the document cannot outlive the
//! buffer it borrows.
//!
//! ```
//! assert_eq!(
//!     spandown::markdown_to_html("Hello, **世界**!\n"),
//!     "<p>Hello, <strong>世界</strong>!</p>\n"
//! );
//! ```
//!
//! For control over rendering, parse and format separately:
//!
//! ```
//! use spandown::{parse_document, html};
//!
//! let doc = parse_document("# Greetings\n");
//! let mut out = String::new();
//! html::format_document(&doc, &mut out).unwrap();
//! assert_eq!(out, "<h1>Greetings</h1>\n");
//! ```

mod character_set;
mod ctype;
mod document;
pub mod html;
mod lines;
pub mod nodes;
mod parser;
mod scanners;
mod strings;


pub use crate::document::Document;
pub use crate::parser::parse_document;

/// Converts Markdown to HTML in one call.
///
/// The output buffer is pre-sized to 2.5× the input length, which covers
/// typical documents without reallocating.
pub fn markdown_to_html(md: &str) -> String {
    let document = parse_document(md);
    let mut output = String::with_capacity(md.len() * 5 / 2 + 64);
    html::format_document(&document, &mut output).unwrap();
    output
}
