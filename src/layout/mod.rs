//! Layout engine for computing element boxes
//!
//! This module takes a resolved [`Scene`] and assigns every element an
//! absolute pixel box. Elements are visited in document order, parents
//! before children, so a relative position can only refer to an element
//! laid out earlier.
//!
//! Position rules, first match wins:
//!
//! 1. `at X Y` centres the element on that point
//! 2. `mesh with "G"` places a gear beside its drive gear
//! 3. a relation (`below "A"`, ...) to an existing reference
//! 4. an anchor within an existing reference, else within the container
//! 5. a wall, as the matching container anchor
//! 6. the container origin
//!
//! A reference that names no laid-out element falls through to the next
//! rule; the linter reports it.

pub mod config;
pub mod gear;
pub mod types;

pub use config::LayoutConfig;
pub use gear::GearGeometry;
pub use types::{BoxMap, Point, ResolvedBox};

use std::collections::HashMap;

use log::{debug, trace};

use crate::parser::ast::{Anchor, ElementKind, Position, Relation};
use crate::scene::{Scene, SceneElement};
use crate::value::{Value, ValueError};

/// Box key of an unnamed canvas, or of the page when there is no canvas
pub const CANVAS_KEY: &str = "__canvas";

/// Box key of an element: its name, or `__element_<counter>`
pub fn element_key(el: &SceneElement, counter: usize) -> String {
    el.name
        .clone()
        .unwrap_or_else(|| format!("__element_{}", counter))
}

/// Box key of a canvas element
pub fn canvas_key(canvas: &SceneElement) -> String {
    canvas
        .name
        .clone()
        .unwrap_or_else(|| CANVAS_KEY.to_string())
}

/// Box key of the page: the first canvas, or [`CANVAS_KEY`]
pub fn page_key(scene: &Scene) -> String {
    scene
        .canvas()
        .map_or_else(|| CANVAS_KEY.to_string(), canvas_key)
}

/// Compute boxes for every element of `scene`.
///
/// The page box is always recorded first, under the canvas key, even when
/// the document has no canvas and the configured default size is used.
pub fn resolve_layout(scene: &Scene, config: &LayoutConfig) -> Result<BoxMap, ValueError> {
    let canvas = scene.canvas();
    let dimension = |v: Option<Value>, fallback: f64| -> Result<f64, ValueError> {
        v.map(|v| v.to_pixels(None)).transpose().map(|px| px.unwrap_or(fallback))
    };
    let width = dimension(canvas.and_then(|c| c.width), config.default_width)?;
    let height = dimension(canvas.and_then(|c| c.height), config.default_height)?;

    let mut engine = LayoutEngine::default();
    let page = ResolvedBox::new(0.0, 0.0, width, height);
    engine.boxes.insert(page_key(scene), page);

    for el in scene.elements.iter().filter(|el| !el.is_canvas()) {
        engine.element(el, &page)?;
    }

    debug!(boxes = engine.boxes.len(), width = width, height = height; "Layout complete");
    Ok(engine.boxes)
}

#[derive(Debug, Default)]
struct LayoutEngine {
    boxes: BoxMap,
    /// Geometry of every sized gear laid out so far, by key
    gears: HashMap<String, GearGeometry>,
    counter: usize,
}

impl LayoutEngine {
    fn element(&mut self, el: &SceneElement, container: &ResolvedBox) -> Result<(), ValueError> {
        let key = element_key(el, self.counter);
        self.counter += 1;

        let (width, height) = element_size(el, container);
        let bounds = match &el.position {
            Some(pos) => self.position(el, pos, width, height, container)?,
            None => ResolvedBox::new(container.x, container.y, width, height),
        };

        trace!(
            key = key.as_str(),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height;
            "Laid out element"
        );

        if let Some(geometry) = gear_geometry(el) {
            self.gears.insert(key.clone(), geometry);
        }
        self.boxes.insert(key, bounds);

        for child in &el.children {
            self.element(child, &bounds)?;
        }
        Ok(())
    }

    fn position(
        &mut self,
        el: &SceneElement,
        pos: &Position<Value>,
        w: f64,
        h: f64,
        container: &ResolvedBox,
    ) -> Result<ResolvedBox, ValueError> {
        if let (Some(x), Some(y)) = (pos.x, pos.y) {
            let cx = x.to_pixels_in(container.width);
            let cy = y.to_pixels_in(container.height);
            return Ok(ResolvedBox::new(cx - w / 2.0, cy - h / 2.0, w, h));
        }

        if let Some(drive) = &pos.mesh {
            if let Some(bounds) = self.mesh(el, drive, w, h) {
                return Ok(bounds);
            }
        }

        if let (Some(relation), Some(reference)) = (pos.relation, &pos.reference) {
            if let Some(target) = self.boxes.get(reference).copied() {
                return relative(relation, pos, w, h, &target);
            }
        }

        if let Some(anchor) = pos.anchor {
            let target = pos
                .reference
                .as_deref()
                .and_then(|r| self.boxes.get(r))
                .unwrap_or(container);
            return Ok(anchored_in(anchor, w, h, target));
        }

        if let Some(wall) = pos.wall {
            return Ok(anchored_in(wall.anchor(), w, h, container));
        }

        Ok(ResolvedBox::new(container.x, container.y, w, h))
    }

    /// Place a driven gear to the right of its drive gear, teeth interleaved.
    /// Its rotation is the mesh offset added to the drive gear's rotation.
    fn mesh(&mut self, el: &SceneElement, drive: &str, w: f64, h: f64) -> Option<ResolvedBox> {
        let driven = gear_geometry(el)?;
        let driver = *self.gears.get(drive)?;
        let drive_box = self.boxes.get_mut(drive)?;
        let drive_rotation = *drive_box.rotation.get_or_insert(0.0);

        let center = drive_box.center();
        let cx = center.x + driver.center_distance(&driven);
        Some(ResolvedBox {
            x: cx - w / 2.0,
            y: center.y - h / 2.0,
            width: w,
            height: h,
            rotation: Some((drive_rotation + driven.mesh_rotation()).rem_euclid(360.0)),
        })
    }
}

fn gear_geometry(el: &SceneElement) -> Option<GearGeometry> {
    match (el.kind, el.teeth, el.module) {
        (ElementKind::Gear, Some(teeth), Some(module)) => Some(GearGeometry::new(teeth, module)),
        _ => None,
    }
}

fn element_size(el: &SceneElement, container: &ResolvedBox) -> (f64, f64) {
    if let Some(gear) = gear_geometry(el) {
        let side = gear.box_side();
        return (side, side);
    }
    if el.kind == ElementKind::Circle {
        if let Some(radius) = el.radius {
            let r = radius.to_pixels_in(container.min_side());
            return (2.0 * r, 2.0 * r);
        }
    }
    let w = el.width.map_or(0.0, |v| v.to_pixels_in(container.width));
    let h = el.height.map_or(0.0, |v| v.to_pixels_in(container.height));
    (w, h)
}

/// Position a `w`×`h` element at `anchor` within `target`
fn anchored_in(anchor: Anchor, w: f64, h: f64, target: &ResolvedBox) -> ResolvedBox {
    let (fx, fy) = anchor.fractions();
    ResolvedBox::new(
        target.x + fx * (target.width - w),
        target.y + fy * (target.height - h),
        w,
        h,
    )
}

fn relative(
    relation: Relation,
    pos: &Position<Value>,
    w: f64,
    h: f64,
    target: &ResolvedBox,
) -> Result<ResolvedBox, ValueError> {
    let gap = pos
        .gap
        .map(|g| g.to_pixels(None))
        .transpose()?
        .unwrap_or(0.0);
    let center = target.center();

    let (x, y) = match relation {
        Relation::Below => (center.x - w / 2.0, target.bottom() + gap),
        Relation::Above => (center.x - w / 2.0, target.y - h - gap),
        Relation::RightOf => (target.right() + gap, center.y - h / 2.0),
        Relation::LeftOf => (target.x - w - gap, center.y - h / 2.0),
        Relation::Inside => {
            return Ok(anchored_in(
                pos.ref_anchor.unwrap_or(Anchor::Center),
                w,
                h,
                target,
            ))
        }
    };
    Ok(ResolvedBox::new(x, y, w, h))
}
