//! Render Sphinx-generated help pages into styled text segments and a
//! table of contents.
//!
//! The input is a narrow HTML subset: headings, paragraphs, definition
//! lists, bulleted and numbered lists, preformatted blocks, inline emphasis
//! and permalink anchors. Tags and classes outside that subset are ignored,
//! so unexpected markup degrades the output instead of failing the parse.

mod config;
mod error;
mod event;
mod html;
mod output;
mod parser;
mod style;
mod typst;

pub use config::{ColorConfig, Config, FontConfig, LayoutConfig};
pub use error::{ConfigError, Error, IncompleteParse, StructuralError};
pub use event::{Attributes, ClassMarker, Element, MarkupEvent};
pub use html::{render_file, render_html};
pub use output::{RenderedDocument, TextSegment, TocEntry};
pub use parser::{MarkupParser, heading_prefix, parse_events, strip_heading_prefix};
pub use style::{
    BlockTag, CharTag, FontFamily, FontSize, MAX_FONT_SIZE, MAX_INDENT, MIN_FONT_SIZE,
    StyleTable, VisualStyle, block_scale, char_scale,
};

/// Convert an HTML help page to Typst markup using default config.
pub fn html_to_typst(html: &str) -> Result<String, IncompleteParse> {
    html_to_typst_with_config(html, &Config::compiled_default())
}

/// Convert an HTML help page to Typst markup with custom config.
pub fn html_to_typst_with_config(html: &str, config: &Config) -> Result<String, IncompleteParse> {
    let doc = render_html(html)?;
    Ok(typst::document_to_typst(&doc, config))
}

/// Convert rendered output to Typst markup.
pub fn document_to_typst(doc: &RenderedDocument, config: &Config) -> String {
    typst::document_to_typst(doc, config)
}

/// Convert a table of contents to a nested Typst list.
pub fn toc_to_typst(toc: &[TocEntry]) -> String {
    typst::toc_to_typst(toc)
}
