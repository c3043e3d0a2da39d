//! Lint engine for catching scene mistakes before rendering.
//!
//! Runs on the resolved scene and checks four rule groups: document
//! structure, element references, colour values, and style hints.
//! Diagnostics come back sorted errors first, then warnings, then info.

use std::collections::HashSet;
use std::fmt;

use crate::color::resolve_color;
use crate::parser::ast::{ElementKind, Paint};
use crate::scene::{Scene, SceneElement};

/// How serious a diagnostic is. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule group that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Structure,
    References,
    Colors,
    Style,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Structure => write!(f, "structure"),
            Rule::References => write!(f, "references"),
            Rule::Colors => write!(f, "colors"),
            Rule::Style => write!(f, "style"),
        }
    }
}

/// A lint finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub rule: Rule,
}

impl Diagnostic {
    /// A document-level diagnostic with no location
    pub fn new(severity: Severity, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            line: None,
            column: None,
            rule,
        }
    }

    /// A diagnostic located at `el`
    fn at(el: &SceneElement, severity: Severity, rule: Rule, message: impl Into<String>) -> Self {
        // Elements built outside the parser have no location
        let located = el.location.line > 0;
        Self {
            line: located.then_some(el.location.line),
            column: located.then_some(el.location.column),
            ..Self::new(severity, rule, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        write!(f, " [{}]: {}", self.rule, self.message)
    }
}

/// Whether any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Run every rule over `scene`
pub fn check(scene: &Scene) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_structure(scene, &mut diagnostics);
    check_references(scene, &mut diagnostics);
    check_colors(scene, &mut diagnostics);
    check_style(scene, &mut diagnostics);

    diagnostics.sort_by_key(|d| d.severity);
    diagnostics
}

fn check_structure(scene: &Scene, out: &mut Vec<Diagnostic>) {
    let Some(first) = scene.elements.first() else {
        out.push(Diagnostic::new(
            Severity::Error,
            Rule::Structure,
            "Document has no elements",
        ));
        return;
    };

    let canvases: Vec<&SceneElement> = scene.elements.iter().filter(|el| el.is_canvas()).collect();
    match canvases.as_slice() {
        [] => out.push(Diagnostic::new(
            Severity::Warning,
            Rule::Structure,
            "No canvas element, default size will be used",
        )),
        [_] => {}
        [_, second, ..] => out.push(Diagnostic::at(
            second,
            Severity::Error,
            Rule::Structure,
            "Multiple canvas elements found, only one is allowed",
        )),
    }

    if let Some(canvas) = canvases.first() {
        if !first.is_canvas() {
            out.push(Diagnostic::at(
                canvas,
                Severity::Warning,
                Rule::Structure,
                "Canvas should be the first element",
            ));
        }
    }

    let mut seen = HashSet::new();
    for el in scene.walk() {
        if let Some(name) = &el.name {
            if !seen.insert(name.as_str()) {
                out.push(Diagnostic::at(
                    el,
                    Severity::Error,
                    Rule::Structure,
                    format!("Duplicate element name: \"{}\"", name),
                ));
            }
        }
    }
}

fn check_references(scene: &Scene, out: &mut Vec<Diagnostic>) {
    let names: HashSet<&str> = scene.walk().filter_map(|el| el.name.as_deref()).collect();

    for el in scene.walk() {
        let Some(position) = &el.position else {
            continue;
        };
        for reference in position.references() {
            if !names.contains(reference) {
                out.push(Diagnostic::at(
                    el,
                    Severity::Error,
                    Rule::References,
                    format!("Referenced element \"{}\" not found", reference),
                ));
            }
        }
    }
}

fn check_colors(scene: &Scene, out: &mut Vec<Diagnostic>) {
    for el in scene.walk() {
        let mut colors: Vec<(&str, &str)> = Vec::new();
        match &el.fill {
            Some(Paint::Solid(c)) => colors.push((c.as_str(), "fill")),
            Some(Paint::Gradient(g)) => {
                colors.push((g.from.as_str(), "fill"));
                colors.push((g.to.as_str(), "fill"));
            }
            None => {}
        }
        if let Some(c) = &el.background {
            colors.push((c.as_str(), "background"));
        }
        if let Some(c) = el.stroke.as_ref().and_then(|s| s.color.as_ref()) {
            colors.push((c.as_str(), "stroke color"));
        }
        if let Some(c) = el.text.as_ref().and_then(|t| t.color.as_ref()) {
            colors.push((c.as_str(), "text color"));
        }

        for (color, prop) in colors {
            if !is_known_color(color) {
                out.push(Diagnostic::at(
                    el,
                    Severity::Error,
                    Rule::Colors,
                    format!("Unknown color \"{}\" in {}", color, prop),
                ));
            }
        }
    }
}

/// Hex and rgb values were already checked when parsed
fn is_known_color(color: &str) -> bool {
    color.starts_with('#')
        || color.starts_with("rgb")
        || color == "none"
        || resolve_color(color).is_some()
}

fn check_style(scene: &Scene, out: &mut Vec<Diagnostic>) {
    for el in scene.walk() {
        let unnamed = || el.name.as_deref().unwrap_or("unnamed");
        let hint = match el.kind {
            ElementKind::Canvas if el.width.is_none() || el.height.is_none() => Some((
                Severity::Warning,
                "Canvas should have explicit width and height".to_string(),
            )),
            ElementKind::Rectangle if el.width.is_none() && el.height.is_none() => Some((
                Severity::Warning,
                format!("Element \"{}\" has no dimensions", el.display_name()),
            )),
            ElementKind::Circle if el.radius.is_none() => Some((
                Severity::Warning,
                format!("Circle \"{}\" has no radius", unnamed()),
            )),
            ElementKind::Text if el.text.as_ref().and_then(|t| t.size).is_none() => Some((
                Severity::Info,
                format!("Text \"{}\" has no explicit size", unnamed()),
            )),
            ElementKind::Gear if el.teeth.is_none() || el.module.is_none() => Some((
                Severity::Warning,
                format!("Gear \"{}\" needs both teeth and module", unnamed()),
            )),
            _ => None,
        };
        if let Some((severity, message)) = hint {
            out.push(Diagnostic::at(el, severity, Rule::Style, message));
        }
    }
}
