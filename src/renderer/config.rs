//! Configuration for SVG rendering

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Font family set on the root element
    pub font_family: String,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Overlays drawn on top of the scene
    pub debug: DebugModes,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            font_family: "Roboto, sans-serif".to_string(),
            pretty_print: true,
            debug: DebugModes::none(),
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root font family
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the debug overlays
    pub fn with_debug(mut self, debug: DebugModes) -> Self {
        self.debug = debug;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown debug mode '{0}', expected one of: labels, colors, grid, boxes, markers, all")]
pub struct UnknownDebugMode(pub String);

/// Which debug overlays to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugModes {
    pub labels: bool,
    pub colors: bool,
    pub grid: bool,
    pub boxes: bool,
    pub markers: bool,
}

impl DebugModes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            labels: true,
            colors: true,
            grid: true,
            boxes: true,
            markers: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }

    /// Enable a mode by name; `all` enables every mode
    pub fn enable(&mut self, mode: &str) -> Result<(), UnknownDebugMode> {
        match mode.trim() {
            "labels" => self.labels = true,
            "colors" => self.colors = true,
            "grid" => self.grid = true,
            "boxes" => self.boxes = true,
            "markers" => self.markers = true,
            "all" => *self = Self::all(),
            other => return Err(UnknownDebugMode(other.to_string())),
        }
        Ok(())
    }

    /// Build from a list of mode names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownDebugMode> {
        let mut modes = Self::none();
        for name in names {
            modes.enable(name.as_ref())?;
        }
        Ok(modes)
    }
}

/// Parses a comma-separated list such as `labels,grid`
impl FromStr for DebugModes {
    type Err = UnknownDebugMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = s.split(',').filter(|n| !n.trim().is_empty()).collect();
        Self::from_names(&names)
    }
}

impl fmt::Display for DebugModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.labels, "labels"),
            (self.colors, "colors"),
            (self.grid, "grid"),
            (self.boxes, "boxes"),
            (self.markers, "markers"),
        ];
        let enabled: Vec<&str> = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&enabled.join(","))
    }
}
