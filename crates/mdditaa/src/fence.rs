//! Line scanner for fenced diagram blocks.
//!
//! The scanner walks a document line by line and splits it into
//! [`Segment`]s: plain lines that pass through untouched, and
//! [`DiagramBlock`]s found between a `` ```ditaa `` opener and a matching
//! `` ``` `` closer. Openers may be indented or nested inside block quotes;
//! the closer must repeat the opener's prefix exactly.
//!
//! Scanning is pure. Rendering and substitution happen in the caller.

use log::{debug, warn};

/// Marker opening a diagram block.
pub const OPEN_MARKER: &str = "```ditaa";

/// Marker closing a diagram block, after the block's prefix.
pub const CLOSE_MARKER: &str = "```";

/// Opener annotation overriding the copy destination of one block.
const PATH_ANNOTATION: &str = "path=";

/// A diagram block lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    prefix: String,
    body: Vec<String>,
    path_override: Option<String>,
}

impl DiagramBlock {
    /// Creates a block from its prefix and prefix-stripped body lines.
    pub fn new(
        prefix: impl Into<String>,
        body: Vec<String>,
        path_override: Option<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            body,
            path_override,
        }
    }

    /// Literal prefix shared by the opener, body and closer.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Body lines with the prefix removed.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Directory given by a `path=` annotation on the opener.
    pub fn path_override(&self) -> Option<&str> {
        self.path_override.as_deref()
    }

    /// Diagram source: body lines joined with `\n`.
    pub fn text(&self) -> String {
        self.body.join("\n")
    }

    /// Image embed line for `reference`, carrying the block prefix.
    pub fn embed_line(&self, reference: &str) -> String {
        format!("{}![{reference}]({reference})", self.prefix)
    }

    /// Literal fallback lines: the body indented as a code block between
    /// two blank lines.
    pub fn fallback_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        lines.push(String::new());
        lines.extend(
            self.body
                .iter()
                .map(|line| format!("{}    {line}", self.prefix)),
        );
        lines.push(String::new());
        lines
    }
}

/// A piece of the scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A line emitted unchanged.
    Line(String),
    /// A complete diagram block.
    Diagram(DiagramBlock),
}

/// An opener line recognised by [`parse_opener`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct Opener {
    prefix: String,
    path_override: Option<String>,
}

/// Checks whether `line` opens a diagram block.
///
/// The text after the marker, minus one separator character, may start with
/// `path=<dir>`. Once that annotation is removed the marker must end the
/// line, and the text before it may only contain spaces, tabs and `>`.
fn parse_opener(line: &str) -> Option<Opener> {
    let start = line.find(OPEN_MARKER)?;
    let prefix = &line[..start];
    let after = &line[start + OPEN_MARKER.len()..];

    let mut path_override = None;
    let mut rest = after;
    if let Some(separator) = after.chars().next() {
        let suffix = &after[separator.len_utf8()..];
        if let Some(dir) = suffix.strip_prefix(PATH_ANNOTATION) {
            path_override = (!dir.is_empty()).then(|| dir.to_string());
            rest = "";
        }
    }

    let prefix_is_quote = prefix
        .chars()
        .all(|c| c == ' ' || c == '\t' || c == '>');
    if !rest.is_empty() || !prefix_is_quote {
        return None;
    }

    Some(Opener {
        prefix: prefix.to_string(),
        path_override,
    })
}

/// Drops the first `count` characters of `line`.
///
/// Lines shorter than `count` become empty.
fn strip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

/// State of an open block while its body is collected.
struct OpenBlock<'a> {
    opener: &'a str,
    prefix: String,
    closer: String,
    path_override: Option<String>,
    lines: Vec<&'a str>,
}

impl OpenBlock<'_> {
    fn finish(self) -> DiagramBlock {
        let prefix_len = self.prefix.chars().count();
        let body = self
            .lines
            .iter()
            .map(|line| strip_chars(line, prefix_len).to_string())
            .collect();
        DiagramBlock::new(self.prefix, body, self.path_override)
    }
}

/// Splits `lines` into plain lines and diagram blocks, in document order.
///
/// A block still open when the input ends is returned as plain lines,
/// opener included, so no content is lost.
pub fn scan<I, S>(lines: I) -> Vec<Segment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<S> = lines.into_iter().collect();
    let mut segments = Vec::with_capacity(lines.len());
    let mut open: Option<OpenBlock<'_>> = None;

    for line in &lines {
        let line = line.as_ref();

        if let Some(block) = open.as_mut() {
            if line == block.closer {
                if let Some(block) = open.take() {
                    debug!(lines = block.lines.len(); "Diagram block closed");
                    segments.push(Segment::Diagram(block.finish()));
                }
            } else {
                block.lines.push(line);
            }
            continue;
        }

        match parse_opener(line) {
            Some(opener) => {
                debug!(prefix = opener.prefix; "Diagram block opened");
                open = Some(OpenBlock {
                    opener: line,
                    closer: format!("{}{CLOSE_MARKER}", opener.prefix),
                    prefix: opener.prefix,
                    path_override: opener.path_override,
                    lines: Vec::new(),
                });
            }
            None => segments.push(Segment::Line(line.to_string())),
        }
    }

    if let Some(block) = open {
        warn!(lines = block.lines.len(); "Unterminated diagram block, keeping it as text");
        segments.push(Segment::Line(block.opener.to_string()));
        segments.extend(block.lines.iter().map(|l| Segment::Line(l.to_string())));
    }

    segments
}
