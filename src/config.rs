use serde::Deserialize;
use std::fs;
use std::path::Path;

use log::{error, warn};

use crate::error::ConfigError;
use crate::style::{FontSize, StyleTable};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub colors: ColorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Base size for normal text; clamped when the style table is built.
    pub size: u32,
    /// Proportional font families, first available wins.
    pub normal: Vec<String>,
    /// Fixed-width font families, first available wins.
    pub fixed: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: FontSize::default().get(),
            normal: vec![
                "DejaVu Sans".to_string(),
                "Arial".to_string(),
                "Helvetica".to_string(),
            ],
            fixed: vec!["DejaVu Sans Mono".to_string(), "Courier New".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub indent_step: u32,
    pub preblock_margin: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            indent_step: 25,
            preblock_margin: 25,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub inline_code: String,
    pub preblock: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            inline_code: "#f6f6ff".to_string(),
            preblock: "#eeffcc".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        // build.rs rejects a bundled file that does not match `Config`
        match toml::from_str(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                error!("bundled default_config.toml is invalid: {e}");
                Self::default()
            }
        }
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return the bundled defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using defaults");
                Self::compiled_default()
            }
        }
    }

    pub fn style_table(&self) -> StyleTable {
        StyleTable {
            base: FontSize::new(self.font.size),
            indent_step: self.layout.indent_step,
            preblock_margin: self.layout.preblock_margin,
            inline_code_background: self.colors.inline_code.clone(),
            preblock_background: self.colors.preblock.clone(),
        }
    }
}
