//! Property merging for elements and placements
//!
//! Grammar productions yield one [`Prop`] per property. A pending record
//! applies them in declaration order (inline first, then body lines), so a
//! later property overwrites an earlier one field by field.

use crate::parser::ast::*;

/// A single parsed property
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    /// `W by H`
    Dimensions(Expr, Expr),
    Width(Expr),
    Height(Expr),
    Radius(Expr),
    Fill(Paint<ColorRef>),
    Stroke {
        color: ColorRef,
        width: Option<Expr>,
    },
    Dash(Dash),
    Background(ColorRef),
    Opacity(Expr),
    Rounded(Expr),
    Rotate(Expr),
    Scale(Expr),
    Font(String),
    TextSize(Expr),
    TextColor(ColorRef),
    Weight(FontWeight),
    Italic,
    Align(TextAlign),
    Points(Vec<Point<Expr>>),
    LineFrom(Point<Expr>),
    LineTo(Point<Expr>),
    PathData(String),
    Src(String),
    Teeth(u32),
    Module(f64),
    Position(Position<Expr>),
}

impl Prop {
    /// Keyword that introduces this property, for error messages
    pub fn keyword(&self) -> &'static str {
        match self {
            Prop::Dimensions(..) => "by",
            Prop::Width(_) => "width",
            Prop::Height(_) => "height",
            Prop::Radius(_) => "radius",
            Prop::Fill(_) => "fill",
            Prop::Stroke { .. } => "stroke",
            Prop::Dash(Dash::Dashed) => "dashed",
            Prop::Dash(Dash::Dotted) => "dotted",
            Prop::Background(_) => "background",
            Prop::Opacity(_) => "opacity",
            Prop::Rounded(_) => "rounded",
            Prop::Rotate(_) => "rotate",
            Prop::Scale(_) => "scale",
            Prop::Font(_) => "font",
            Prop::TextSize(_) => "size",
            Prop::TextColor(_) => "color",
            Prop::Weight(_) => "weight",
            Prop::Italic => "italic",
            Prop::Align(_) => "align",
            Prop::Points(_) => "points",
            Prop::LineFrom(_) => "from",
            Prop::LineTo(_) => "to",
            Prop::PathData(_) => "d",
            Prop::Src(_) => "src",
            Prop::Teeth(_) => "teeth",
            Prop::Module(_) => "module",
            Prop::Position(_) => "position",
        }
    }
}

/// An element under construction
#[derive(Debug)]
pub struct PendingElement {
    element: Element,
}

impl PendingElement {
    pub fn new(kind: ElementKind, name: Option<String>) -> Self {
        let mut element = Element::new(kind);
        element.name = name;
        Self { element }
    }

    fn text_style(&mut self) -> &mut TextStyle<Expr, ColorRef> {
        self.element.text.get_or_insert_with(TextStyle::default)
    }

    fn stroke(&mut self) -> &mut Stroke<Expr, ColorRef> {
        self.element.stroke.get_or_insert_with(Stroke::default)
    }

    /// Apply a property, overwriting any earlier value for the same field
    pub fn apply(&mut self, prop: Prop) -> Result<(), String> {
        let el = &mut self.element;
        match prop {
            Prop::Dimensions(w, h) => {
                el.width = Some(w);
                el.height = Some(h);
            }
            Prop::Width(w) => el.width = Some(w),
            Prop::Height(h) => el.height = Some(h),
            Prop::Radius(r) => el.radius = Some(r),
            Prop::Fill(paint) => el.fill = Some(paint),
            Prop::Stroke { color, width } => {
                let stroke = self.stroke();
                stroke.color = Some(color);
                if width.is_some() {
                    stroke.width = width;
                }
            }
            Prop::Dash(dash) => self.stroke().dash = Some(dash),
            Prop::Background(c) => el.background = Some(c),
            Prop::Opacity(e) => el.opacity = Some(e),
            Prop::Rounded(e) => el.rounded = Some(e),
            Prop::Rotate(e) => el.rotate = Some(e),
            Prop::Font(f) => self.text_style().font = Some(f),
            Prop::TextSize(e) => self.text_style().size = Some(e),
            Prop::TextColor(c) => self.text_style().color = Some(c),
            Prop::Weight(w) => self.text_style().weight = Some(w),
            Prop::Italic => self.text_style().style = Some(FontStyle::Italic),
            Prop::Align(a) => self.text_style().align = Some(a),
            Prop::Points(p) => el.points = Some(p),
            Prop::LineFrom(p) => el.line_from = Some(p),
            Prop::LineTo(p) => el.line_to = Some(p),
            Prop::PathData(d) => el.path_data = Some(d),
            Prop::Src(s) => el.src = Some(s),
            Prop::Teeth(t) => el.teeth = Some(t),
            Prop::Module(m) => el.module = Some(m),
            Prop::Position(p) => el.position = Some(p),
            Prop::Scale(_) => {
                return Err("'scale' can only be used in a place statement".to_string())
            }
        }
        Ok(())
    }

    pub fn add_child(&mut self, child: Element) {
        self.element.children.push(child);
    }

    pub fn finish(self, span: Span) -> Element {
        let mut element = self.element;
        element.span = span;
        element
    }
}

/// A `place` statement under construction
#[derive(Debug)]
pub struct PendingPlacement {
    statement: PlaceStatement,
}

impl PendingPlacement {
    pub fn new(template: String, instance: Option<String>) -> Self {
        Self {
            statement: PlaceStatement {
                template,
                instance,
                overrides: PlaceOverrides::default(),
                position: None,
                scale: None,
                rotate: None,
            },
        }
    }

    pub fn apply(&mut self, prop: Prop) -> Result<(), String> {
        let stmt = &mut self.statement;
        let overrides = &mut stmt.overrides;
        match prop {
            Prop::Position(p) => stmt.position = Some(p),
            Prop::Scale(e) => stmt.scale = Some(e),
            Prop::Rotate(e) => stmt.rotate = Some(e),
            Prop::Fill(paint) => overrides.fill = Some(paint),
            Prop::Stroke { color, width } => {
                let stroke = overrides.stroke.get_or_insert_with(Stroke::default);
                stroke.color = Some(color);
                if width.is_some() {
                    stroke.width = width;
                }
            }
            Prop::Dash(dash) => {
                overrides.stroke.get_or_insert_with(Stroke::default).dash = Some(dash);
            }
            Prop::Dimensions(w, h) => {
                overrides.width = Some(w);
                overrides.height = Some(h);
            }
            Prop::Width(w) => overrides.width = Some(w),
            Prop::Height(h) => overrides.height = Some(h),
            Prop::Background(c) => overrides.background = Some(c),
            other => {
                return Err(format!(
                    "'{}' cannot be used in a place statement",
                    other.keyword()
                ))
            }
        }
        Ok(())
    }

    pub fn finish(self) -> PlaceStatement {
        self.statement
    }
}
