use log::{debug, trace, warn};

use crate::error::{IncompleteParse, StructuralError};
use crate::event::{Attributes, ClassMarker, Element, MarkupEvent, is_simple_list};
use crate::output::{RenderedDocument, SegmentStream, TocEntry};
use crate::style::{BlockTag, CharTag};

/// Parse a complete event sequence.
///
/// Stops at the first structural error; the error carries the output
/// produced up to that point.
pub fn parse_events<I>(events: I) -> Result<RenderedDocument, IncompleteParse>
where
    I: IntoIterator<Item = MarkupEvent>,
{
    let mut parser = MarkupParser::new();
    for event in events {
        if let Err(error) = parser.handle_event(event) {
            return Err(IncompleteParse {
                error,
                partial: parser.into_partial(),
            });
        }
    }
    parser.finish()
}

#[derive(Debug, Default)]
struct ParseState {
    // Output is live only inside the main content
    show: bool,
    // Inside a heading permalink anchor
    hdrlink: bool,
    indent_level: usize,
    in_pre: bool,

    // Section number taken from the top-level heading, e.g. "25.5."
    heading_prefix: String,
    // Set on <h1> until its first text run has been seen
    capture_prefix: bool,
    heading_accumulator: String,
    open_heading: Option<u8>,

    nested_definition_list: bool,
    simple_list: bool,
    /// Whether the last tag seen was an open tag.
    prev_tag_opened: Option<bool>,

    block_tag: BlockTag,
    char_tag: CharTag,
}

/// Streaming parser turning markup events into styled segments and a TOC.
///
/// Feed events in document order, then call [`MarkupParser::finish`].
/// Tags and classes outside the recognized set are ignored.
#[derive(Debug, Default)]
pub struct MarkupParser {
    state: ParseState,
    out: SegmentStream,
    toc: Vec<TocEntry>,
}

impl MarkupParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: MarkupEvent) -> Result<(), StructuralError> {
        match event {
            MarkupEvent::Open { name, attrs } => {
                self.open_tag(&name, &attrs);
                Ok(())
            }
            MarkupEvent::Close { name } => self.close_tag(&name),
            MarkupEvent::Text(data) => {
                self.text(&data);
                Ok(())
            }
        }
    }

    pub fn open_tag(&mut self, name: &str, attrs: &Attributes) {
        let class = attrs.class();
        let marker = ClassMarker::parse(class);
        let state = &mut self.state;

        let separator = match (Element::from_name(name), marker) {
            // Main content starts
            (Element::Div, Some(ClassMarker::Section)) => {
                state.show = true;
                Some("")
            }
            // Navigation sidebar, main content is over
            (Element::Div, Some(ClassMarker::SphinxSidebar)) => {
                state.show = false;
                Some("")
            }
            (Element::P, _) => {
                Some(if state.prev_tag_opened == Some(false) {
                    paragraph_separator(self.out.last_line())
                } else {
                    ""
                })
            }
            (Element::Span, Some(ClassMarker::Pre)) => {
                state.char_tag = CharTag::Preformatted;
                Some("")
            }
            (Element::Span, Some(ClassMarker::VersionModified)) | (Element::Em, _) => {
                state.char_tag = CharTag::Emphasis;
                Some("")
            }
            (Element::Ul | Element::Ol, _) => {
                state.simple_list = is_simple_list(class);
                state.indent_level += 1;
                state.block_tag = BlockTag::indent(state.indent_level);
                Some(if state.simple_list { "\n" } else { "" })
            }
            (Element::Dl, _) => {
                if state.indent_level > 0 {
                    state.nested_definition_list = true;
                }
                Some("")
            }
            (Element::Li, _) => Some(if state.simple_list { "\n* " } else { "\n\n* " }),
            (Element::Dt, _) => {
                let nested = std::mem::take(&mut state.nested_definition_list);
                Some(if nested { "\n" } else { "\n\n" })
            }
            (Element::Dd, _) => {
                state.indent_level += 1;
                state.block_tag = BlockTag::indent(state.indent_level);
                Some("\n")
            }
            (Element::Pre, _) => {
                state.in_pre = true;
                if state.show {
                    self.out.push("\n\n", BlockTag::Normal, CharTag::None);
                }
                state.block_tag = BlockTag::PreBlock;
                Some("")
            }
            (Element::A, Some(ClassMarker::HeaderLink)) => {
                state.hdrlink = true;
                Some("")
            }
            (Element::Heading(level), _) => {
                if level == 1 {
                    state.heading_accumulator.clear();
                    state.capture_prefix = true;
                } else if state.show {
                    state.heading_accumulator.clear();
                    self.out.push("\n\n", BlockTag::Normal, CharTag::None);
                }
                state.block_tag = BlockTag::Heading(level);
                state.open_heading = Some(level);
                Some("")
            }
            (element, _) => {
                trace!("ignoring <{name}> ({element:?}, class {class:?})");
                None
            }
        };

        if let Some(separator) = separator {
            if state.show {
                self.out.push(separator, state.block_tag, state.char_tag);
            }
        }
        state.prev_tag_opened = Some(true);
    }

    pub fn close_tag(&mut self, name: &str) -> Result<(), StructuralError> {
        let state = &mut self.state;
        let mut result = Ok(());

        match Element::from_name(name) {
            Element::Heading(level) => {
                if state.indent_level != 0 {
                    let error = StructuralError::HeadingInsideNesting {
                        level,
                        depth: state.indent_level,
                    };
                    warn!("{error}");
                    result = Err(error);
                }
                if state.show {
                    let indent = "    ".repeat(usize::from(level - 1));
                    self.toc.push(TocEntry {
                        label: format!("{indent}{}", state.heading_accumulator),
                        position: self.out.end(),
                    });
                }
                state.block_tag = BlockTag::Normal;
                state.open_heading = None;
                state.capture_prefix = false;
            }
            Element::Span | Element::Em => state.char_tag = CharTag::None,
            Element::A => state.hdrlink = false,
            Element::Pre => {
                state.in_pre = false;
                state.block_tag = BlockTag::Normal;
            }
            Element::Ul | Element::Ol | Element::Dd => {
                if state.indent_level == 0 {
                    debug!("</{name}> without a matching open tag");
                }
                state.indent_level = state.indent_level.saturating_sub(1);
                state.block_tag = BlockTag::indent(state.indent_level);
            }
            element => trace!("ignoring </{name}> ({element:?})"),
        }

        state.prev_tag_opened = Some(false);
        result
    }

    pub fn text(&mut self, data: &str) {
        let state = &mut self.state;
        if !state.show || state.hdrlink {
            return;
        }

        let collapsed = if state.in_pre {
            data.to_string()
        } else {
            data.replace('\n', " ")
        };

        let text = match state.block_tag.heading_level() {
            Some(level) => {
                if level == 1 && state.capture_prefix {
                    state.heading_prefix = heading_prefix(&collapsed).to_string();
                    state.capture_prefix = false;
                }
                let stripped = strip_heading_prefix(&collapsed, &state.heading_prefix);
                state.heading_accumulator.push_str(stripped.trim());
                stripped.to_string()
            }
            None => collapsed,
        };

        self.out.push(text, state.block_tag, state.char_tag);
    }

    /// Current list/definition nesting depth.
    pub fn indent_level(&self) -> usize {
        self.state.indent_level
    }

    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Ends the parse, reporting anything left open.
    pub fn finish(self) -> Result<RenderedDocument, IncompleteParse> {
        let state = &self.state;
        let error = if let Some(level) = state.open_heading {
            Some(StructuralError::UnclosedHeading { level })
        } else if state.in_pre {
            Some(StructuralError::UnclosedPreformatted)
        } else if state.indent_level != 0 {
            Some(StructuralError::UnclosedNesting {
                depth: state.indent_level,
            })
        } else {
            None
        };

        let document = self.into_partial();
        match error {
            Some(error) => {
                warn!("{error}");
                Err(IncompleteParse {
                    error,
                    partial: document,
                })
            }
            None => {
                debug!(
                    "parsed {} segments, {} toc entries",
                    document.segments.len(),
                    document.toc.len()
                );
                Ok(document)
            }
        }
    }

    /// Output produced so far, without checking for unclosed tags.
    pub fn into_partial(self) -> RenderedDocument {
        RenderedDocument {
            segments: self.out.into_segments(),
            toc: self.toc,
        }
    }
}

/// Separator for a paragraph that follows a closed block.
fn paragraph_separator(last_line: &str) -> &'static str {
    if last_line.trim().is_empty() {
        "\n"
    } else {
        "\n\n"
    }
}

/// Leading token of a heading, up to the first space. Empty if there is no space.
pub fn heading_prefix(text: &str) -> &str {
    text.find(' ').map_or("", |i| &text[..i])
}

/// Removes a section-number prefix from heading text.
pub fn strip_heading_prefix<'a>(text: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return text;
    }
    text.strip_prefix(prefix).unwrap_or(text)
}
