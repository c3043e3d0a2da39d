//! StagScribe - a human-readable scene language that compiles to SVG
//!
//! This library provides the parser, resolver, layout engine, linter and
//! SVG renderer for the StagScribe language. The pipeline runs
//! parse → resolve → lint → layout → render.
//!
//! # Example
//!
//! ```rust
//! use stagscribe::convert;
//!
//! let out = convert("canvas 800 by 600\nrect \"Box\" 200 by 100\n  at center\n  fill red\n").unwrap();
//! assert!(out.svg.contains(r##"fill="#FF0000""##));
//! assert!(out.diagnostics.is_empty());
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod lint;
pub mod parser;
pub mod renderer;
pub mod resolver;
pub mod scene;
pub mod value;

pub use error::ParseError;
pub use layout::{resolve_layout, BoxMap, LayoutConfig, ResolvedBox};
pub use lint::{check, has_errors, Diagnostic, Severity};
pub use parser::{parse, Document};
pub use renderer::{render_svg, DebugModes, SvgConfig};
pub use resolver::{resolve, ResolveError};
pub use scene::Scene;
pub use value::{Value, ValueError};

use std::time::Instant;

use log::debug;
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while evaluating variables, templates or loops
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// A size that cannot be converted to pixels
    #[error("layout error: {0}")]
    Value(#[from] ValueError),

    /// Lint errors in strict mode
    #[error("Lint errors found:\n{}", format_diagnostics(.0))]
    Lint(Vec<Diagnostic>),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

impl RenderError {
    /// Format the error with source context. Parse and resolve errors get
    /// ariadne reports pointing into `source`.
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RenderError::Resolve(e) => e.format(source, filename),
            RenderError::Value(_) | RenderError::Lint(_) => self.to_string(),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Lint errors stop the conversion
    pub strict: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            svg: SvgConfig::default(),
            strict: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set whether lint errors block rendering
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Output of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub svg: String,
    /// Every lint finding, including those that did not block rendering
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert source to SVG with default configuration
pub fn convert(source: &str) -> Result<Conversion, RenderError> {
    convert_with_config(source, &RenderConfig::default())
}

/// Convert source to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use stagscribe::{convert_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_strict(false)
///     .with_svg(SvgConfig::default().with_pretty_print(false));
///
/// // Two canvases is a lint error, tolerated outside strict mode
/// let out = convert_with_config("canvas 10 by 10\ncanvas 20 by 20\n", &config).unwrap();
/// assert!(out.svg.contains(r#"width="10""#));
/// assert_eq!(out.diagnostics.len(), 1);
/// ```
pub fn convert_with_config(source: &str, config: &RenderConfig) -> Result<Conversion, RenderError> {
    let started = Instant::now();

    let doc = parse(source)?;
    let parsed = started.elapsed();

    let scene = resolve(&doc)?;
    let resolved = started.elapsed();

    let diagnostics = lint::check(&scene);
    if config.strict && has_errors(&diagnostics) {
        return Err(RenderError::Lint(diagnostics));
    }

    let boxes = resolve_layout(&scene, &config.layout)?;
    let laid_out = started.elapsed();

    let svg = render_svg(&scene, &boxes, &config.svg);

    debug!(
        statements = doc.statements.len(),
        diagnostics = diagnostics.len(),
        parse_us = parsed.as_micros() as u64,
        resolve_us = (resolved - parsed).as_micros() as u64,
        layout_us = (laid_out - resolved).as_micros() as u64,
        total_us = started.elapsed().as_micros() as u64;
        "Converted document"
    );

    Ok(Conversion { svg, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_end_to_end() {
        let out = convert("canvas 800 by 600\nrect \"Box\" 200 by 100\n  at center\n  fill red\n").unwrap();
        assert!(out.svg.contains(r##"<rect x="300" y="250" width="200" height="100" fill="#FF0000"/>"##));
    }

    #[test]
    fn test_parse_error() {
        let err = convert("rect \"A\" 10 by\n").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn test_resolve_error_formats_with_source() {
        let source = "canvas 10 by 10\nrect \"A\" w by 10\n";
        let err = convert(source).unwrap_err();
        assert!(matches!(err, RenderError::Resolve(ResolveError::UndefinedVariable { .. })));
        let report = err.format(source, "scene.stag");
        assert!(report.contains("scene.stag"));
    }

    #[test]
    fn test_strict_lint_blocks_rendering() {
        let err = convert("canvas 10 by 10\nrect \"A\" 1 by 1 below \"Ghost\"\n").unwrap_err();
        match err {
            RenderError::Lint(diagnostics) => {
                assert_eq!(diagnostics[0].message, "Referenced element \"Ghost\" not found");
            }
            other => panic!("expected lint error, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_lint_keeps_diagnostics() {
        let config = RenderConfig::new().with_strict(false);
        let out = convert_with_config("rect \"A\" 1 by 1 below \"Ghost\"\n", &config).unwrap();
        assert!(out.svg.contains(r#"<rect x="0" y="0" width="1" height="1"/>"#));
        assert!(has_errors(&out.diagnostics));
    }

    #[test]
    fn test_relative_canvas_is_value_error() {
        let config = RenderConfig::new().with_strict(false);
        let err = convert_with_config("canvas 50% by 100\n", &config).unwrap_err();
        assert!(matches!(err, RenderError::Value(ValueError::PercentWithoutContainer)));
    }
}
