//! Abstract Syntax Tree types for the StagScribe language
//!
//! The element model is generic over its quantity type `Q` and color type
//! `C`. The parser produces `Element<Expr, ColorRef>`; the resolver rewrites
//! it into `Element<Value, String>` (see [`crate::scene`]).

use std::fmt;

use crate::value::Value;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// 1-based line and column of an element's first token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute the location of a byte offset in `source`
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        })
    }
}

/// Arithmetic over values with units
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Negate(Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn literal(number: f64) -> Self {
        Expr::Literal(Value::number(number))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// A color as written in source: either already canonical, or the name of
/// a palette variable to be looked up during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    Literal(String),
    Var(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GradientDirection {
    #[default]
    Vertical,
}

/// Two-stop linear gradient
#[derive(Debug, Clone, PartialEq)]
pub struct GradientFill<C> {
    pub from: C,
    pub to: C,
    pub direction: GradientDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint<C> {
    Solid(C),
    Gradient(GradientFill<C>),
}

impl<C> Paint<C> {
    pub fn solid(&self) -> Option<&C> {
        match self {
            Paint::Solid(c) => Some(c),
            Paint::Gradient(_) => None,
        }
    }

    pub fn gradient(&self) -> Option<&GradientFill<C>> {
        match self {
            Paint::Gradient(g) => Some(g),
            Paint::Solid(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Named anchor within a container or reference box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Fraction of the free space (container minus element) along x and y
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Anchor::Center => (0.5, 0.5),
            Anchor::Top => (0.5, 0.0),
            Anchor::Bottom => (0.5, 1.0),
            Anchor::Left => (0.0, 0.5),
            Anchor::Right => (1.0, 0.5),
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::TopLeft => "top left",
            Anchor::TopRight => "top right",
            Anchor::BottomLeft => "bottom left",
            Anchor::BottomRight => "bottom right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Above,
    Below,
    LeftOf,
    RightOf,
    Inside,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Above => "above",
            Relation::Below => "below",
            Relation::LeftOf => "left of",
            Relation::RightOf => "right of",
            Relation::Inside => "inside",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    North,
    South,
    East,
    West,
}

impl Wall {
    /// The container anchor a wall placement maps to
    pub fn anchor(self) -> Anchor {
        match self {
            Wall::North => Anchor::Top,
            Wall::South => Anchor::Bottom,
            Wall::East => Anchor::Right,
            Wall::West => Anchor::Left,
        }
    }
}

/// Where an element goes. Usually only one mode is populated; a relation
/// may carry a secondary anchor within its reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Position<Q> {
    pub x: Option<Q>,
    pub y: Option<Q>,
    pub anchor: Option<Anchor>,
    pub relation: Option<Relation>,
    pub reference: Option<String>,
    pub ref_anchor: Option<Anchor>,
    pub gap: Option<Q>,
    pub wall: Option<Wall>,
    /// Name of the drive gear this gear meshes with
    pub mesh: Option<String>,
}

impl<Q> Default for Position<Q> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            anchor: None,
            relation: None,
            reference: None,
            ref_anchor: None,
            gap: None,
            wall: None,
            mesh: None,
        }
    }
}

impl<Q> Position<Q> {
    pub fn at(x: Q, y: Q) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn anchored(anchor: Anchor, reference: Option<String>) -> Self {
        Self {
            anchor: Some(anchor),
            reference,
            ..Self::default()
        }
    }

    pub fn relative(relation: Relation, reference: impl Into<String>) -> Self {
        Self {
            relation: Some(relation),
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// Names of other elements this position depends on
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.reference.as_deref().into_iter().chain(self.mesh.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke<Q, C> {
    pub color: Option<C>,
    pub width: Option<Q>,
    pub dash: Option<Dash>,
}

impl<Q, C> Default for Stroke<Q, C> {
    fn default() -> Self {
        Self {
            color: None,
            width: None,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Light,
}

impl FontWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
            FontWeight::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<Q, C> {
    pub font: Option<String>,
    pub size: Option<Q>,
    pub color: Option<C>,
    pub weight: Option<FontWeight>,
    pub style: Option<FontStyle>,
    pub align: Option<TextAlign>,
}

impl<Q, C> Default for TextStyle<Q, C> {
    fn default() -> Self {
        Self {
            font: None,
            size: None,
            color: None,
            weight: None,
            style: None,
            align: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// The fixed element vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Canvas,
    Rectangle,
    Circle,
    Ellipse,
    Line,
    Path,
    Polygon,
    Text,
    Group,
    Image,
    Gear,
    Arc,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Canvas => "canvas",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Path => "path",
            ElementKind::Polygon => "polygon",
            ElementKind::Text => "text",
            ElementKind::Group => "group",
            ElementKind::Image => "image",
            ElementKind::Gear => "gear",
            ElementKind::Arc => "arc",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Point<Q> = (Q, Q);

/// A node of the scene tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element<Q = Expr, C = ColorRef> {
    pub kind: ElementKind,
    pub name: Option<String>,
    pub position: Option<Position<Q>>,
    pub children: Vec<Element<Q, C>>,

    pub width: Option<Q>,
    pub height: Option<Q>,
    pub radius: Option<Q>,

    pub fill: Option<Paint<C>>,
    pub stroke: Option<Stroke<Q, C>>,
    pub opacity: Option<Q>,
    pub rounded: Option<Q>,
    pub rotate: Option<Q>,
    pub background: Option<C>,

    pub teeth: Option<u32>,
    pub module: Option<f64>,

    pub text: Option<TextStyle<Q, C>>,

    pub line_from: Option<Point<Q>>,
    pub line_to: Option<Point<Q>>,
    pub points: Option<Vec<Point<Q>>>,
    pub path_data: Option<String>,
    pub src: Option<String>,

    pub span: Span,
    pub location: Location,
}

impl<Q, C> Element<Q, C> {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            name: None,
            position: None,
            children: Vec::new(),
            width: None,
            height: None,
            radius: None,
            fill: None,
            stroke: None,
            opacity: None,
            rounded: None,
            rotate: None,
            background: None,
            teeth: None,
            module: None,
            text: None,
            line_from: None,
            line_to: None,
            points: None,
            path_data: None,
            src: None,
            span: 0..0,
            location: Location::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_canvas(&self) -> bool {
        self.kind == ElementKind::Canvas
    }

    /// Name for messages: the element's name, or its kind
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// One `name is color` entry of a `colors:` block
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    pub name: String,
    pub color: ColorRef,
}

/// Replacements a placement applies wholesale to the template's root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceOverrides {
    pub fill: Option<Paint<ColorRef>>,
    pub stroke: Option<Stroke<Expr, ColorRef>>,
    pub width: Option<Expr>,
    pub height: Option<Expr>,
    pub background: Option<ColorRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceStatement {
    pub template: String,
    pub instance: Option<String>,
    pub overrides: PlaceOverrides,
    pub position: Option<Position<Expr>>,
    pub scale: Option<Expr>,
    pub rotate: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub var: String,
    pub start: Expr,
    pub end: Expr,
    pub step: Option<Expr>,
    pub body: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Element(Element),
    /// `name is expr`
    Assign { name: String, expr: Expr },
    /// `colors:` palette block
    Colors(Vec<ColorAssignment>),
    /// `define name:` template block
    Define { name: String, body: Vec<Element> },
    Place(PlaceStatement),
    For(ForLoop),
}

/// A parsed source file, before resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub statements: Vec<Spanned<Statement>>,
}

impl Document {
    /// Top-level element statements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.statements.iter().filter_map(|s| match &s.node {
            Statement::Element(el) => Some(el),
            _ => None,
        })
    }
}
