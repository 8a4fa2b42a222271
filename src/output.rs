use crate::style::{BlockTag, CharTag};

/// A run of text sharing one block tag and one char tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub block_tag: BlockTag,
    pub char_tag: CharTag,
}

/// A table-of-contents label and the output position of its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading text, indented four spaces per level below 1.
    pub label: String,
    /// Character offset into the segment stream when the heading closed.
    pub position: usize,
}

/// Finished parse output: segments and TOC, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub segments: Vec<TextSegment>,
    pub toc: Vec<TocEntry>,
}

impl RenderedDocument {
    /// Visible text: all segment texts concatenated.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Length of the visible text in characters.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Converts a character offset into a 1-based line and 0-based column.
    ///
    /// Offsets past the end resolve to the end of the text.
    pub fn line_column(&self, position: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 0;
        for ch in self.segments.iter().flat_map(|s| s.text.chars()).take(position) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    /// TOC position in the `line.column` form used by text widgets.
    pub fn text_index(&self, entry: &TocEntry) -> String {
        let (line, column) = self.line_column(entry.position);
        format!("{line}.{column}")
    }
}

/// Append-only segment stream that tracks what positional lookups need.
#[derive(Debug, Default)]
pub(crate) struct SegmentStream {
    segments: Vec<TextSegment>,
    len: usize,
    last_line: String,
}

impl SegmentStream {
    pub fn push(&mut self, text: impl Into<String>, block_tag: BlockTag, char_tag: CharTag) {
        let text = text.into();
        self.len += text.chars().count();
        match text.rfind('\n') {
            Some(i) => {
                self.last_line.clear();
                self.last_line.push_str(&text[i + 1..]);
            }
            None => self.last_line.push_str(&text),
        }
        self.segments.push(TextSegment {
            text,
            block_tag,
            char_tag,
        });
    }

    /// Position just past the last emitted character.
    pub fn end(&self) -> usize {
        self.len
    }

    /// Text after the last newline emitted so far.
    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    pub fn into_segments(self) -> Vec<TextSegment> {
        self.segments
    }
}
