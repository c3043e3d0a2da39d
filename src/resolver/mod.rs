//! Resolution of variables, palettes, templates and loops
//!
//! The resolver walks a parsed [`Document`] in order and produces a
//! [`Scene`] that contains only elements. Every expression is evaluated to
//! a [`Value`] and every color reference to a canonical string.
//!
//! Template bodies and loop bodies are cloned before they are modified, so
//! placed instances never share state with their definition or each other.

mod error;
mod expr;

pub use error::{ResolveError, MAX_LOOP_DEPTH, MAX_LOOP_ITERATIONS};
pub use expr::{evaluate, Scope};

use std::collections::HashMap;

use log::{debug, trace};

use crate::color::resolve_color;
use crate::parser::ast::*;
use crate::scene::{Scene, SceneElement};
use crate::value::{format_number, Value};

/// Resolve a document with a fresh resolver
pub fn resolve(doc: &Document) -> Result<Scene, ResolveError> {
    Resolver::new().resolve(doc)
}

/// Resolution state for one document
#[derive(Debug, Default)]
pub struct Resolver {
    variables: Scope,
    colors: HashMap<String, String>,
    templates: HashMap<String, Vec<Element>>,
    loop_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(mut self, doc: &Document) -> Result<Scene, ResolveError> {
        let mut elements = Vec::new();
        self.statements(&doc.statements, &mut elements)?;
        debug!(
            elements = elements.len(),
            variables = self.variables.len(),
            templates = self.templates.len();
            "Resolved document"
        );
        Ok(Scene::new(elements))
    }

    fn statements(
        &mut self,
        statements: &[Spanned<Statement>],
        out: &mut Vec<SceneElement>,
    ) -> Result<(), ResolveError> {
        for stmt in statements {
            let span = &stmt.span;
            match &stmt.node {
                Statement::Assign { name, expr } => {
                    let value = evaluate(expr, &self.variables, span)?;
                    self.variables.insert(name.clone(), value);
                }
                Statement::Colors(entries) => {
                    for entry in entries {
                        let color = match &entry.color {
                            ColorRef::Literal(c) => c.clone(),
                            // Not a CSS name: an earlier palette entry, or kept as written
                            ColorRef::Var(name) => {
                                self.colors.get(name).cloned().unwrap_or_else(|| name.clone())
                            }
                        };
                        self.colors.insert(entry.name.clone(), color);
                    }
                }
                Statement::Define { name, body } => {
                    self.templates.insert(name.clone(), body.clone());
                }
                Statement::Place(place) => out.push(self.place(place, span)?),
                Statement::For(for_loop) => self.unroll(for_loop, span, out)?,
                Statement::Element(el) => out.push(self.element(el)?),
            }
        }
        Ok(())
    }

    fn place(&self, place: &PlaceStatement, span: &Span) -> Result<SceneElement, ResolveError> {
        let body = self.templates.get(&place.template).cloned().ok_or_else(|| {
            ResolveError::UnknownTemplate {
                name: place.template.clone(),
                span: span.clone(),
            }
        })?;

        let factor = place
            .scale
            .as_ref()
            .map(|e| evaluate(e, &self.variables, span))
            .transpose()?
            .map(|v| v.number);

        let mut root = match <[Element; 1]>::try_from(body) {
            Ok([mut el]) => {
                if let Some(name) = &place.instance {
                    el.name = Some(name.clone());
                }
                if let Some(position) = &place.position {
                    el.position = Some(position.clone());
                }
                apply_overrides(&mut el, &place.overrides);
                if let Some(factor) = factor {
                    scale(&mut el, factor);
                }
                el
            }
            Err(body) => {
                let mut group = Element::new(ElementKind::Group);
                group.name = place.instance.clone();
                group.position = place.position.clone();
                group.span = span.clone();
                group.location = body.first().map(|el| el.location).unwrap_or_default();
                group.children = body;
                apply_overrides(&mut group, &place.overrides);
                if let Some(factor) = factor {
                    for child in &mut group.children {
                        scale(child, factor);
                    }
                }
                group
            }
        };
        if let Some(rotate) = &place.rotate {
            root.rotate = Some(rotate.clone());
        }

        trace!(template = place.template.as_str(); "Placed template");
        self.element(&root)
    }

    fn unroll(
        &mut self,
        for_loop: &ForLoop,
        span: &Span,
        out: &mut Vec<SceneElement>,
    ) -> Result<(), ResolveError> {
        if self.loop_depth >= MAX_LOOP_DEPTH {
            return Err(ResolveError::LoopDepth { span: span.clone() });
        }

        let start = self.loop_bound(&for_loop.start, "from", span)?;
        let end = self.loop_bound(&for_loop.end, "to", span)?;
        let step = match &for_loop.step {
            Some(step) => self.loop_bound(step, "step", span)?,
            None if end >= start => 1.0,
            None => -1.0,
        };

        if step == 0.0 {
            return Err(ResolveError::ZeroStep { span: span.clone() });
        }
        if step > 0.0 && end < start {
            return Err(ResolveError::PositiveStepBackwards { span: span.clone() });
        }
        if step < 0.0 && end > start {
            return Err(ResolveError::NegativeStepForwards { span: span.clone() });
        }

        // `0 to 0.3 step 0.1` runs 4 times despite float error in the span
        const TOLERANCE: f64 = 1e-9;
        let count = ((end - start).abs() / step.abs() + TOLERANCE).floor() as usize;
        let count = count.saturating_add(1);
        if count > MAX_LOOP_ITERATIONS {
            return Err(ResolveError::TooManyIterations {
                count,
                span: span.clone(),
            });
        }
        trace!(var = for_loop.var.as_str(), iterations = count; "Unrolling loop");

        let shadowed = self.variables.get(&for_loop.var).copied();
        self.loop_depth += 1;
        let result = self.iterate(for_loop, start, step, count, out);
        self.loop_depth -= 1;
        match shadowed {
            Some(value) => {
                self.variables.insert(for_loop.var.clone(), value);
            }
            None => {
                self.variables.remove(&for_loop.var);
            }
        }
        result
    }

    fn iterate(
        &mut self,
        for_loop: &ForLoop,
        start: f64,
        step: f64,
        count: usize,
        out: &mut Vec<SceneElement>,
    ) -> Result<(), ResolveError> {
        for k in 0..count {
            let i = start + k as f64 * step;
            self.variables
                .insert(for_loop.var.clone(), Value::number(i));
            let mut body = for_loop.body.clone();
            interpolate_statements(&mut body, &self.variables);
            self.statements(&body, out)?;
        }
        Ok(())
    }

    fn loop_bound(
        &self,
        expr: &Expr,
        bound: &'static str,
        span: &Span,
    ) -> Result<f64, ResolveError> {
        let value = evaluate(expr, &self.variables, span)?;
        if !value.is_unitless() {
            return Err(ResolveError::LoopBoundUnit {
                bound,
                span: span.clone(),
            });
        }
        Ok(value.number)
    }

    fn element(&self, el: &Element) -> Result<SceneElement, ResolveError> {
        let span = &el.span;
        let quantity = |q: &Option<Expr>| -> Result<Option<Value>, ResolveError> {
            q.as_ref()
                .map(|e| evaluate(e, &self.variables, span))
                .transpose()
        };

        let children = el
            .children
            .iter()
            .map(|child| self.element(child))
            .collect::<Result<Vec<_>, _>>()?;

        let points = match &el.points {
            Some(points) => Some(
                points
                    .iter()
                    .map(|p| self.point(p, span))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(SceneElement {
            kind: el.kind,
            name: el.name.clone(),
            position: el
                .position
                .as_ref()
                .map(|p| self.position(p, span))
                .transpose()?,
            children,
            width: quantity(&el.width)?,
            height: quantity(&el.height)?,
            radius: quantity(&el.radius)?,
            fill: el.fill.as_ref().map(|p| self.paint(p, span)).transpose()?,
            stroke: el
                .stroke
                .as_ref()
                .map(|s| self.stroke(s, span))
                .transpose()?,
            opacity: quantity(&el.opacity)?,
            rounded: quantity(&el.rounded)?,
            rotate: quantity(&el.rotate)?,
            background: el
                .background
                .as_ref()
                .map(|c| self.color(c, span))
                .transpose()?,
            teeth: el.teeth,
            module: el.module,
            text: el
                .text
                .as_ref()
                .map(|t| self.text_style(t, span))
                .transpose()?,
            line_from: el
                .line_from
                .as_ref()
                .map(|p| self.point(p, span))
                .transpose()?,
            line_to: el
                .line_to
                .as_ref()
                .map(|p| self.point(p, span))
                .transpose()?,
            points,
            path_data: el.path_data.clone(),
            src: el.src.clone(),
            span: span.clone(),
            location: el.location,
        })
    }

    fn point(&self, (x, y): &Point<Expr>, span: &Span) -> Result<Point<Value>, ResolveError> {
        Ok((
            evaluate(x, &self.variables, span)?,
            evaluate(y, &self.variables, span)?,
        ))
    }

    fn position(
        &self,
        pos: &Position<Expr>,
        span: &Span,
    ) -> Result<Position<Value>, ResolveError> {
        let eval = |q: &Option<Expr>| {
            q.as_ref()
                .map(|e| evaluate(e, &self.variables, span))
                .transpose()
        };
        Ok(Position {
            x: eval(&pos.x)?,
            y: eval(&pos.y)?,
            anchor: pos.anchor,
            relation: pos.relation,
            reference: pos.reference.clone(),
            ref_anchor: pos.ref_anchor,
            gap: eval(&pos.gap)?,
            wall: pos.wall,
            mesh: pos.mesh.clone(),
        })
    }

    fn color(&self, color: &ColorRef, span: &Span) -> Result<String, ResolveError> {
        match color {
            ColorRef::Literal(c) => Ok(c.clone()),
            ColorRef::Var(name) => self
                .colors
                .get(name)
                .cloned()
                .or_else(|| resolve_color(name))
                .ok_or_else(|| ResolveError::UndefinedColor {
                    name: name.clone(),
                    span: span.clone(),
                }),
        }
    }

    fn paint(&self, paint: &Paint<ColorRef>, span: &Span) -> Result<Paint<String>, ResolveError> {
        Ok(match paint {
            Paint::Solid(c) => Paint::Solid(self.color(c, span)?),
            Paint::Gradient(g) => Paint::Gradient(GradientFill {
                from: self.color(&g.from, span)?,
                to: self.color(&g.to, span)?,
                direction: g.direction,
            }),
        })
    }

    fn stroke(
        &self,
        stroke: &Stroke<Expr, ColorRef>,
        span: &Span,
    ) -> Result<Stroke<Value, String>, ResolveError> {
        Ok(Stroke {
            color: stroke
                .color
                .as_ref()
                .map(|c| self.color(c, span))
                .transpose()?,
            width: stroke
                .width
                .as_ref()
                .map(|e| evaluate(e, &self.variables, span))
                .transpose()?,
            dash: stroke.dash,
        })
    }

    fn text_style(
        &self,
        style: &TextStyle<Expr, ColorRef>,
        span: &Span,
    ) -> Result<TextStyle<Value, String>, ResolveError> {
        Ok(TextStyle {
            font: style.font.clone(),
            size: style
                .size
                .as_ref()
                .map(|e| evaluate(e, &self.variables, span))
                .transpose()?,
            color: style
                .color
                .as_ref()
                .map(|c| self.color(c, span))
                .transpose()?,
            weight: style.weight,
            style: style.style,
            align: style.align,
        })
    }
}

/// Replace the element's fields that a placement overrides
fn apply_overrides(el: &mut Element, overrides: &PlaceOverrides) {
    if let Some(fill) = &overrides.fill {
        el.fill = Some(fill.clone());
    }
    if let Some(stroke) = &overrides.stroke {
        el.stroke = Some(stroke.clone());
    }
    if let Some(width) = &overrides.width {
        el.width = Some(width.clone());
    }
    if let Some(height) = &overrides.height {
        el.height = Some(height.clone());
    }
    if let Some(background) = &overrides.background {
        el.background = Some(background.clone());
    }
}

/// Multiply width, height and radius by `factor`, keeping their units
fn scale(el: &mut Element, factor: f64) {
    for field in [&mut el.width, &mut el.height, &mut el.radius] {
        if let Some(expr) = field.take() {
            *field = Some(Expr::binary(BinaryOp::Mul, expr, Expr::literal(factor)));
        }
    }
}

fn interpolate_statements(statements: &mut [Spanned<Statement>], scope: &Scope) {
    for stmt in statements {
        match &mut stmt.node {
            Statement::Element(el) => interpolate_element(el, scope),
            Statement::Place(place) => {
                if let Some(name) = &mut place.instance {
                    *name = interpolate(name, scope);
                }
                if let Some(position) = &mut place.position {
                    interpolate_position(position, scope);
                }
            }
            Statement::For(inner) => interpolate_statements(&mut inner.body, scope),
            Statement::Assign { .. } | Statement::Colors(_) | Statement::Define { .. } => {}
        }
    }
}

fn interpolate_element(el: &mut Element, scope: &Scope) {
    if let Some(name) = &mut el.name {
        *name = interpolate(name, scope);
    }
    if let Some(position) = &mut el.position {
        interpolate_position(position, scope);
    }
    for child in &mut el.children {
        interpolate_element(child, scope);
    }
}

fn interpolate_position(position: &mut Position<Expr>, scope: &Scope) {
    for reference in [&mut position.reference, &mut position.mesh] {
        if let Some(r) = reference {
            *r = interpolate(r, scope);
        }
    }
}

/// Substitute `{name}` with the variable's number. Unknown names stay as written.
fn interpolate(text: &str, scope: &Scope) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let len = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..len];
        if name.is_empty() || !after[len..].starts_with('}') {
            out.push('{');
            rest = after;
            continue;
        }
        match scope.get(name) {
            Some(value) => out.push_str(&format_number(value.number)),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[len + 1..];
    }
    out.push_str(rest);
    out
}
