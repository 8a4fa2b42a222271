use std::cell::RefCell;
use std::fs;
use std::path::Path;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::TokenizerResult;
use log::{debug, trace, warn};

use crate::error::{Error, IncompleteParse, StructuralError};
use crate::event::{Attributes, MarkupEvent};
use crate::output::RenderedDocument;
use crate::parser::MarkupParser;

/// Tokenize an HTML page and render it.
pub fn render_html(html: &str) -> Result<RenderedDocument, IncompleteParse> {
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    let tokenizer = Tokenizer::new(ParserSink::default(), TokenizerOpts::default());
    // The sink never asks for a script pause; resume if one shows up anyway
    while let TokenizerResult::Script(()) = tokenizer.feed(&input) {
        warn!("tokenizer paused for a script; resuming");
    }
    tokenizer.end();

    tokenizer.sink.take_result()
}

/// Read an HTML file and render it.
pub fn render_file(path: &Path) -> Result<RenderedDocument, Error> {
    let html = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("rendering {} ({} bytes)", path.display(), html.len());
    Ok(render_html(&html)?)
}

/// Feeds tokenizer output straight into a [`MarkupParser`].
///
/// The tokenizer splits character data at newlines and entities; runs are
/// joined here so the parser sees one text event between two tags.
#[derive(Default)]
struct ParserSink {
    parser: RefCell<MarkupParser>,
    pending_text: RefCell<String>,
    error: RefCell<Option<StructuralError>>,
}

impl ParserSink {
    fn dispatch(&self, event: MarkupEvent) {
        // Events after a structural error are dropped.
        if self.error.borrow().is_some() {
            return;
        }
        if let Err(error) = self.parser.borrow_mut().handle_event(event) {
            *self.error.borrow_mut() = Some(error);
        }
    }

    fn flush_text(&self) {
        let text = std::mem::take(&mut *self.pending_text.borrow_mut());
        if !text.is_empty() {
            self.dispatch(MarkupEvent::Text(text));
        }
    }

    fn take_result(&self) -> Result<RenderedDocument, IncompleteParse> {
        self.flush_text();
        let parser = self.parser.take();
        match self.error.take() {
            Some(error) => Err(IncompleteParse {
                error,
                partial: parser.into_partial(),
            }),
            None => parser.finish(),
        }
    }
}

impl TokenSink for ParserSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.pending_text.borrow_mut().push_str(&text),
            Token::TagToken(tag) => {
                self.flush_text();
                for event in tag_events(tag) {
                    self.dispatch(event);
                }
            }
            Token::EOFToken => self.flush_text(),
            Token::ParseError(err) => trace!("tokenizer: {err}"),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn tag_events(tag: Tag) -> Vec<MarkupEvent> {
    let name = tag.name.to_string();
    match tag.kind {
        TagKind::StartTag => {
            let attrs = Attributes::from_pairs(
                tag.attrs
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string())),
            );
            let mut events = vec![MarkupEvent::Open {
                name: name.clone(),
                attrs,
            }];
            if tag.self_closing {
                events.push(MarkupEvent::Close { name });
            }
            events
        }
        TagKind::EndTag => vec![MarkupEvent::Close { name }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::output::TocEntry;
    use crate::style::{BlockTag, CharTag};

    #[test]
    fn section_heading_and_paragraph() {
        let doc =
            render_html("<div class=\"section\"><h1>25. Intro</h1><p>Hello\nworld</p></div>")
                .unwrap();

        assert_eq!(
            doc.toc,
            vec![TocEntry {
                label: "Intro".to_string(),
                position: 6,
            }]
        );
        assert_eq!(doc.text(), " Intro\n\nHello world");
    }

    #[test]
    fn split_character_runs_are_joined() {
        let doc = render_html("<div class=\"section\"><pre>line1\nline2</pre></div>").unwrap();
        let pre = doc
            .segments
            .iter()
            .find(|s| s.text == "line1\nline2")
            .expect("pre text in one segment");
        assert_eq!(pre.block_tag, BlockTag::PreBlock);
    }

    #[test]
    fn script_tag_does_not_stop_the_feed() {
        let doc = render_html(
            "<div class=\"section\"><p>a</p><script>var x = 1;</script><p>b</p></div>",
        )
        .unwrap();
        assert!(doc.text().starts_with('a'));
        assert!(doc.text().ends_with('b'));
    }

    #[test]
    fn entities_are_decoded() {
        let doc = render_html("<div class=\"section\"><p>a &lt; b &amp;&amp; c</p></div>").unwrap();
        assert_eq!(doc.text(), "a < b && c");
    }

    #[test]
    fn permalink_glyph_is_dropped() {
        let html = concat!(
            "<div class=\"section\" id=\"idle\">",
            "<h1>25.5. IDLE<a class=\"headerlink\" href=\"#idle\" title=\"Permalink\">\u{b6}</a></h1>",
            "<div class=\"section\" id=\"menus\">",
            "<h2>25.5.1. Menus<a class=\"headerlink\" href=\"#menus\">&para;</a></h2>",
            "</div></div>"
        );
        let doc = render_html(html).unwrap();

        assert!(!doc.text().contains('\u{b6}'));
        let labels: Vec<&str> = doc.toc.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["IDLE", "    1. Menus"]);
    }

    #[test]
    fn sidebar_markup_is_skipped() {
        let html = concat!(
            "<div class=\"section\"><p>Body</p></div>",
            "<div class=\"sphinxsidebar\"><h3>Table of Contents</h3>",
            "<ul><li><a href=\"#\">IDLE</a><ul><li>Menus</li></ul></li></ul></div>"
        );
        let doc = render_html(html).unwrap();
        assert_eq!(doc.text(), "Body");
        assert!(doc.toc.is_empty());
    }

    #[test]
    fn inline_code_span() {
        let doc = render_html(
            "<div class=\"section\"><p>Run <code><span class=\"pre\">idle</span></code> now</p></div>",
        )
        .unwrap();
        let code = doc.segments.iter().find(|s| s.text == "idle").unwrap();
        assert_eq!(code.char_tag, CharTag::Preformatted);
        let after = doc.segments.iter().find(|s| s.text == " now").unwrap();
        assert_eq!(after.char_tag, CharTag::None);
    }

    #[test]
    fn self_closing_tags_open_and_close() {
        let doc = render_html("<div class=\"section\"><p>x<em/>y</p></div>").unwrap();
        let y = doc.segments.iter().find(|s| s.text == "y").unwrap();
        assert_eq!(y.char_tag, CharTag::None);
    }

    #[test]
    fn unterminated_list_returns_partial_output() {
        let err = render_html("<div class=\"section\"><ul><li>dangling").unwrap_err();
        assert_eq!(err.error, StructuralError::UnclosedNesting { depth: 1 });
        assert!(err.partial.text().ends_with("dangling"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = render_file(Path::new("/nonexistent/help.html")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
