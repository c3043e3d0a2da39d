//! The resolved scene: elements only, with concrete values and colors

use std::fmt;

use crate::parser::ast::{Dash, Element, ElementKind, Paint, Position};
use crate::value::Value;

/// An element after resolution. Quantities are [`Value`]s and colors are
/// canonical strings (`#RRGGBB`, `rgb(...)`, `none`, or an unrecognised
/// literal kept as written).
pub type SceneElement = Element<Value, String>;

/// Output of the resolver and input to layout, lint and rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub elements: Vec<SceneElement>,
}

impl Scene {
    pub fn new(elements: Vec<SceneElement>) -> Self {
        Self { elements }
    }

    /// The first canvas element, if any
    pub fn canvas(&self) -> Option<&SceneElement> {
        self.elements.iter().find(|el| el.is_canvas())
    }

    /// Every element, parents before children
    pub fn walk(&self) -> impl Iterator<Item = &SceneElement> {
        let mut stack: Vec<&SceneElement> = self.elements.iter().rev().collect();
        std::iter::from_fn(move || {
            let el = stack.pop()?;
            stack.extend(el.children.iter().rev());
            Some(el)
        })
    }

    pub fn find(&self, name: &str) -> Option<&SceneElement> {
        self.walk().find(|el| el.name.as_deref() == Some(name))
    }

    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.walk().filter(|el| el.kind == kind).count()
    }
}

/// Indented outline of the scene tree, one element per line followed by
/// its set fields
impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document ({} elements)", self.elements.len())?;
        for el in &self.elements {
            write_element(f, el, 2)?;
        }
        Ok(())
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, el: &SceneElement, indent: usize) -> fmt::Result {
    let pad = " ".repeat(indent);
    match &el.name {
        Some(name) => writeln!(f, "{}{} \"{}\"", pad, el.kind, name)?,
        None => writeln!(f, "{}{}", pad, el.kind)?,
    }

    let mut field = |label: &str, value: String| writeln!(f, "{}  {}: {}", pad, label, value);
    if let Some(v) = el.width {
        field("width", v.to_string())?;
    }
    if let Some(v) = el.height {
        field("height", v.to_string())?;
    }
    if let Some(v) = el.radius {
        field("radius", v.to_string())?;
    }
    match &el.fill {
        Some(Paint::Solid(c)) => field("fill", c.clone())?,
        Some(Paint::Gradient(g)) => field("fill", format!("gradient {} to {}", g.from, g.to))?,
        None => {}
    }
    if let Some(c) = &el.background {
        field("background", c.clone())?;
    }
    if let Some(stroke) = &el.stroke {
        let mut parts: Vec<String> = stroke.color.iter().cloned().collect();
        parts.extend(stroke.width.map(|w| w.to_string()));
        parts.extend(stroke.dash.map(|d| match d {
            Dash::Dashed => "dashed".to_string(),
            Dash::Dotted => "dotted".to_string(),
        }));
        field("stroke", parts.join(" "))?;
    }
    if let Some(position) = &el.position {
        field("position", describe_position(position))?;
    }
    if let Some(v) = el.rounded {
        field("rounded", v.to_string())?;
    }
    if let (Some(teeth), Some(module)) = (el.teeth, el.module) {
        field("gear", format!("{} teeth, module {}", teeth, module))?;
    }
    if let Some(size) = el.text.as_ref().and_then(|t| t.size) {
        field("text size", size.to_string())?;
    }

    for child in &el.children {
        write_element(f, child, indent + 2)?;
    }
    Ok(())
}

fn describe_position(pos: &Position<Value>) -> String {
    if let (Some(x), Some(y)) = (pos.x, pos.y) {
        return format!("at {} {}", x, y);
    }
    if let Some(drive) = &pos.mesh {
        return format!("mesh with \"{}\"", drive);
    }
    if let (Some(relation), Some(reference)) = (pos.relation, &pos.reference) {
        let mut text = format!("{} \"{}\"", relation.as_str(), reference);
        if let Some(anchor) = pos.ref_anchor {
            text.push_str(&format!(" at {}", anchor.as_str()));
        }
        if let Some(gap) = pos.gap {
            text.push_str(&format!(" with gap {}", gap));
        }
        return text;
    }
    if let Some(anchor) = pos.anchor {
        return match &pos.reference {
            Some(reference) => format!("at {} of \"{}\"", anchor.as_str(), reference),
            None => format!("at {}", anchor.as_str()),
        };
    }
    match pos.wall {
        Some(wall) => format!("on the {} wall", format!("{:?}", wall).to_lowercase()),
        None => "unset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        let mut group = SceneElement::new(ElementKind::Group).with_name("G");
        group
            .children
            .push(SceneElement::new(ElementKind::Rectangle).with_name("A"));
        Scene::new(vec![
            SceneElement::new(ElementKind::Canvas),
            group,
            SceneElement::new(ElementKind::Circle).with_name("B"),
        ])
    }

    #[test]
    fn test_walk_is_preorder() {
        let names: Vec<_> = scene().walk().map(|el| el.display_name().to_string()).collect();
        assert_eq!(names, vec!["canvas", "G", "A", "B"]);
    }

    #[test]
    fn test_outline() {
        let doc = crate::parser::parse(
            "canvas 800 by 600\ngroup \"G\"\n  rect \"Box\" 200 by 100 at center fill red\n  circle radius 5 below \"Box\" with gap 1 cm\n",
        )
        .unwrap();
        let scene = crate::resolver::resolve(&doc).unwrap();
        assert_eq!(
            scene.to_string(),
            "Document (2 elements)\n  canvas\n    width: 800\n    height: 600\n  group \"G\"\n    rectangle \"Box\"\n      width: 200\n      height: 100\n      fill: #FF0000\n      position: at center\n    circle\n      radius: 5\n      position: below \"Box\" with gap 1 cm\n"
        );
    }

    #[test]
    fn test_find_and_canvas() {
        let scene = scene();
        assert!(scene.canvas().is_some());
        assert_eq!(scene.find("A").map(|el| el.kind), Some(ElementKind::Rectangle));
        assert!(scene.find("missing").is_none());
        assert_eq!(scene.count_kind(ElementKind::Rectangle), 1);
    }
}
