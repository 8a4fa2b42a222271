use std::fmt;

/// Deepest indentation level with its own margin; deeper nesting shares it.
pub const MAX_INDENT: u8 = 4;

pub const MIN_FONT_SIZE: u32 = 6;
pub const MAX_FONT_SIZE: u32 = 100;

/// Block-level style of a segment. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTag {
    #[default]
    Normal,
    /// Nesting depth `1..=MAX_INDENT` inside lists and definition bodies.
    Indent(u8),
    PreBlock,
    /// Heading level `1..=3`.
    Heading(u8),
}

impl BlockTag {
    /// Block tag for a list/definition nesting depth.
    pub fn indent(level: usize) -> Self {
        match level {
            0 => BlockTag::Normal,
            n => BlockTag::Indent(n.min(MAX_INDENT as usize) as u8),
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockTag::Heading(level) => Some(level),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockTag::Normal => "",
            BlockTag::Indent(1) => "l1",
            BlockTag::Indent(2) => "l2",
            BlockTag::Indent(3) => "l3",
            BlockTag::Indent(_) => "l4",
            BlockTag::PreBlock => "preblock",
            BlockTag::Heading(1) => "h1",
            BlockTag::Heading(2) => "h2",
            BlockTag::Heading(_) => "h3",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character-level style, independent of the block tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharTag {
    #[default]
    None,
    /// Inline code.
    Preformatted,
    Emphasis,
}

impl CharTag {
    pub fn name(self) -> &'static str {
        match self {
            CharTag::None => "",
            CharTag::Preformatted => "pre",
            CharTag::Emphasis => "em",
        }
    }
}

impl fmt::Display for CharTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base font size, always within `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontSize(u32);

impl FontSize {
    pub fn new(size: u32) -> Self {
        FontSize(size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn larger(self) -> Self {
        FontSize::new(self.0 + 1)
    }

    pub fn smaller(self) -> Self {
        FontSize::new(self.0.saturating_sub(1))
    }

    /// Size for a styled run, truncated like the widget fonts are.
    pub fn scaled(self, ratio: f64) -> u32 {
        (self.0 as f64 * ratio) as u32
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize(10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Proportional,
    Fixed,
}

/// Styles that carry their own font, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontTag {
    PreBlock,
    Pre,
    H3,
    H2,
    H1,
    Em,
}

impl FontTag {
    fn ratio(self) -> f64 {
        match self {
            FontTag::H1 => 1.6,
            FontTag::H2 => 1.4,
            FontTag::H3 => 1.2,
            FontTag::Em => 1.0,
            FontTag::Pre => 1.0,
            FontTag::PreBlock => 0.9,
        }
    }

    fn family(self) -> FontFamily {
        match self {
            FontTag::Pre | FontTag::PreBlock => FontFamily::Fixed,
            _ => FontFamily::Proportional,
        }
    }
}

/// Ratio applied to the base font size for a block tag, if it sets a font.
pub fn block_scale(tag: BlockTag) -> Option<f64> {
    block_font(tag).map(FontTag::ratio)
}

/// Ratio applied to the base font size for a char tag, if it sets a font.
pub fn char_scale(tag: CharTag) -> Option<f64> {
    char_font(tag).map(FontTag::ratio)
}

fn block_font(tag: BlockTag) -> Option<FontTag> {
    match tag {
        BlockTag::PreBlock => Some(FontTag::PreBlock),
        BlockTag::Heading(1) => Some(FontTag::H1),
        BlockTag::Heading(2) => Some(FontTag::H2),
        BlockTag::Heading(_) => Some(FontTag::H3),
        BlockTag::Normal | BlockTag::Indent(_) => None,
    }
}

fn char_font(tag: CharTag) -> Option<FontTag> {
    match tag {
        CharTag::Preformatted => Some(FontTag::Pre),
        CharTag::Emphasis => Some(FontTag::Em),
        CharTag::None => None,
    }
}

/// Resolved visual attributes for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualStyle {
    pub family: FontFamily,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub background: Option<String>,
    /// Left margin of the first display line.
    pub first_margin: u32,
    /// Left margin of wrapped continuation lines.
    pub wrap_margin: u32,
}

/// Maps block/char tag pairs to visual attributes for a base font size.
#[derive(Debug, Clone)]
pub struct StyleTable {
    pub base: FontSize,
    pub indent_step: u32,
    pub preblock_margin: u32,
    pub inline_code_background: String,
    pub preblock_background: String,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            base: FontSize::default(),
            indent_step: 25,
            preblock_margin: 25,
            inline_code_background: "#f6f6ff".to_string(),
            preblock_background: "#eeffcc".to_string(),
        }
    }
}

impl StyleTable {
    pub fn with_base(mut self, base: FontSize) -> Self {
        self.base = base;
        self
    }

    pub fn resolve(&self, block: BlockTag, ch: CharTag) -> VisualStyle {
        let font = match (block_font(block), char_font(ch)) {
            (Some(b), Some(c)) => Some(if precedence(b) <= precedence(c) { b } else { c }),
            (b, c) => b.or(c),
        };

        let (family, size) = match font {
            Some(tag) => (tag.family(), self.base.scaled(tag.ratio())),
            None => (FontFamily::Proportional, self.base.get()),
        };

        let background = match (block, ch) {
            (BlockTag::PreBlock, _) => Some(self.preblock_background.clone()),
            (_, CharTag::Preformatted) => Some(self.inline_code_background.clone()),
            _ => None,
        };

        let (first_margin, wrap_margin) = match block {
            BlockTag::Indent(level) => {
                let margin = self.indent_step * level as u32;
                (margin, margin)
            }
            BlockTag::PreBlock => (self.preblock_margin, 0),
            _ => (0, 0),
        };

        VisualStyle {
            family,
            size,
            bold: matches!(font, Some(FontTag::H1 | FontTag::H2 | FontTag::H3)),
            italic: font == Some(FontTag::Em),
            background,
            first_margin,
            wrap_margin,
        }
    }
}

fn precedence(tag: FontTag) -> u8 {
    tag as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, BlockTag::Normal)]
    #[case(1, BlockTag::Indent(1))]
    #[case(4, BlockTag::Indent(4))]
    #[case(7, BlockTag::Indent(4))]
    fn indent_levels_cap_at_max(#[case] level: usize, #[case] expected: BlockTag) {
        assert_eq!(BlockTag::indent(level), expected);
    }

    #[test]
    fn font_size_clamps() {
        assert_eq!(FontSize::new(2).get(), MIN_FONT_SIZE);
        assert_eq!(FontSize::new(500).get(), MAX_FONT_SIZE);
        assert_eq!(FontSize::new(MAX_FONT_SIZE).larger().get(), MAX_FONT_SIZE);
        assert_eq!(FontSize::new(MIN_FONT_SIZE).smaller().get(), MIN_FONT_SIZE);
        assert_eq!(FontSize::new(12).larger().get(), 13);
    }

    #[rstest]
    #[case(BlockTag::Heading(1), 16)]
    #[case(BlockTag::Heading(2), 14)]
    #[case(BlockTag::Heading(3), 12)]
    #[case(BlockTag::PreBlock, 9)]
    #[case(BlockTag::Normal, 10)]
    #[case(BlockTag::Indent(2), 10)]
    fn block_sizes_scale_from_base(#[case] block: BlockTag, #[case] size: u32) {
        let table = StyleTable::default();
        assert_eq!(table.resolve(block, CharTag::None).size, size);
    }

    #[test]
    fn scale_ratios() {
        assert_eq!(block_scale(BlockTag::Heading(1)), Some(1.6));
        assert_eq!(block_scale(BlockTag::Indent(3)), None);
        assert_eq!(char_scale(CharTag::Emphasis), Some(1.0));
        assert_eq!(char_scale(CharTag::Preformatted), Some(1.0));
        assert_eq!(char_scale(CharTag::None), None);
    }

    #[test]
    fn inline_code_inside_heading_uses_fixed_font() {
        let table = StyleTable::default().with_base(FontSize::new(20));
        let style = table.resolve(BlockTag::Heading(1), CharTag::Preformatted);
        assert_eq!(style.family, FontFamily::Fixed);
        assert_eq!(style.size, 20);
        assert!(!style.bold);
        assert_eq!(style.background.as_deref(), Some("#f6f6ff"));
    }

    #[test]
    fn emphasis_inside_heading_keeps_heading_font() {
        let style = StyleTable::default().resolve(BlockTag::Heading(2), CharTag::Emphasis);
        assert!(style.bold);
        assert!(!style.italic);
        assert_eq!(style.size, 14);
    }

    #[test]
    fn margins() {
        let table = StyleTable::default();
        let indented = table.resolve(BlockTag::Indent(3), CharTag::None);
        assert_eq!((indented.first_margin, indented.wrap_margin), (75, 75));

        let pre = table.resolve(BlockTag::PreBlock, CharTag::Preformatted);
        assert_eq!((pre.first_margin, pre.wrap_margin), (25, 0));
        assert_eq!(pre.background.as_deref(), Some("#eeffcc"));
    }

    #[test]
    fn tag_names() {
        assert_eq!(BlockTag::Indent(2).to_string(), "l2");
        assert_eq!(BlockTag::Heading(3).name(), "h3");
        assert_eq!(CharTag::Emphasis.to_string(), "em");
        assert_eq!(BlockTag::Normal.name(), "");
    }
}
