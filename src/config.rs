//! TOML settings file for the command line
//!
//! Every key is optional; missing keys keep the builder defaults.
//!
//! ```toml
//! [layout]
//! default_width = 800
//! default_height = 600
//!
//! [svg]
//! font_family = "Roboto, sans-serif"
//! pretty_print = false
//! debug = ["grid"]
//!
//! [lint]
//! strict = true
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::{DebugModes, UnknownDebugMode};
use crate::RenderConfig;

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid [svg] debug setting: {0}")]
    DebugMode(#[from] UnknownDebugMode),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub svg: SvgSettings,
    pub lint: LintSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    pub default_width: Option<f64>,
    pub default_height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgSettings {
    pub font_family: Option<String>,
    pub pretty_print: Option<bool>,
    pub debug: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintSettings {
    pub strict: Option<bool>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply these settings on top of `base`
    pub fn apply(&self, base: RenderConfig) -> Result<RenderConfig, ConfigError> {
        let mut config = base;

        let layout = &mut config.layout;
        if let Some(width) = self.layout.default_width {
            layout.default_width = width;
        }
        if let Some(height) = self.layout.default_height {
            layout.default_height = height;
        }

        let svg = &mut config.svg;
        if let Some(family) = &self.svg.font_family {
            svg.font_family = family.clone();
        }
        if let Some(pretty) = self.svg.pretty_print {
            svg.pretty_print = pretty;
        }
        if let Some(names) = &self.svg.debug {
            svg.debug = DebugModes::from_names(names)?;
        }

        if let Some(strict) = self.lint.strict {
            config.strict = strict;
        }
        Ok(config)
    }

    /// The render configuration these settings describe
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        self.apply(RenderConfig::default())
    }
}
