use std::path::PathBuf;

use thiserror::Error;

use crate::output::RenderedDocument;

/// Nesting in the input that was opened but never properly closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("<h{level}> closed inside {depth} level(s) of list or definition nesting")]
    HeadingInsideNesting { level: u8, depth: usize },

    #[error("input ended with {depth} unclosed list or definition level(s)")]
    UnclosedNesting { depth: usize },

    #[error("input ended inside a <pre> block")]
    UnclosedPreformatted,

    #[error("input ended inside an <h{level}> heading")]
    UnclosedHeading { level: u8 },
}

/// A parse that stopped on a structural error. `partial` is still usable.
#[derive(Debug, Error)]
#[error("incomplete document: {error}")]
pub struct IncompleteParse {
    #[source]
    pub error: StructuralError,
    pub partial: RenderedDocument,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Incomplete(#[from] IncompleteParse),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
