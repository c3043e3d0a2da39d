//! Core types for the layout engine

use indexmap::IndexMap;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute bounding box of an element, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees assigned by layout (meshed gears)
    pub rotation: Option<f64>,
}

impl ResolvedBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: None,
        }
    }

    /// Create a zero-sized box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

impl Default for ResolvedBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// Boxes keyed by element name, in the order elements were laid out.
///
/// Unnamed elements are keyed `__element_<n>`; the canvas is keyed by its
/// name or `__canvas`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxMap(IndexMap<String, ResolvedBox>);

impl BoxMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, bounds: ResolvedBox) {
        self.0.insert(key.into(), bounds);
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedBox> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ResolvedBox> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedBox)> {
        self.0.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
