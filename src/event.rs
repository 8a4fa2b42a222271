/// One markup event from the tokenizer, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Open { name: String, attrs: Attributes },
    Close { name: String },
    Text(String),
}

impl MarkupEvent {
    pub fn open(name: impl Into<String>) -> Self {
        MarkupEvent::Open {
            name: name.into(),
            attrs: Attributes::default(),
        }
    }

    pub fn open_with_class(name: impl Into<String>, class: impl Into<String>) -> Self {
        MarkupEvent::Open {
            name: name.into(),
            attrs: Attributes::from_pairs([("class", class)]),
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        MarkupEvent::Close { name: name.into() }
    }

    pub fn text(data: impl Into<String>) -> Self {
        MarkupEvent::Text(data.into())
    }
}

/// Attributes of an open tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of the last `class` attribute, or `""`.
    pub fn class(&self) -> &str {
        self.0
            .iter()
            .rev()
            .find(|(name, _)| name == "class")
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

/// The tags the parser reacts to. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Div,
    P,
    Span,
    Em,
    Ul,
    Ol,
    Li,
    Dl,
    Dt,
    Dd,
    Pre,
    A,
    Heading(u8),
    Other,
}

impl Element {
    pub fn from_name(name: &str) -> Self {
        match name {
            "div" => Element::Div,
            "p" => Element::P,
            "span" => Element::Span,
            "em" => Element::Em,
            "ul" => Element::Ul,
            "ol" => Element::Ol,
            "li" => Element::Li,
            "dl" => Element::Dl,
            "dt" => Element::Dt,
            "dd" => Element::Dd,
            "pre" => Element::Pre,
            "a" => Element::A,
            "h1" => Element::Heading(1),
            "h2" => Element::Heading(2),
            "h3" => Element::Heading(3),
            _ => Element::Other,
        }
    }
}

/// Recognized `class` values. The whole attribute value must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMarker {
    /// Start of the main content.
    Section,
    /// Side navigation; ends the main content.
    SphinxSidebar,
    /// Inline code span.
    Pre,
    /// "New in version"/"Changed in version" annotation.
    VersionModified,
    /// Permalink anchor generated next to each heading.
    HeaderLink,
}

impl ClassMarker {
    pub fn parse(class: &str) -> Option<Self> {
        match class {
            "section" => Some(ClassMarker::Section),
            "sphinxsidebar" => Some(ClassMarker::SphinxSidebar),
            "pre" => Some(ClassMarker::Pre),
            "versionmodified" => Some(ClassMarker::VersionModified),
            "headerlink" => Some(ClassMarker::HeaderLink),
            _ => None,
        }
    }
}

/// Lists carrying this class token are rendered without blank lines between items.
pub const SIMPLE_LIST_CLASS: &str = "simple";

pub fn is_simple_list(class: &str) -> bool {
    class.split_whitespace().any(|token| token == SIMPLE_LIST_CLASS)
}
