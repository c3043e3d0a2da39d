//! Element to SVG node mapping

use std::f64::consts::PI;

use crate::layout::{GearGeometry, ResolvedBox};
use crate::parser::ast::{Dash, ElementKind, FontStyle, Paint, TextAlign, TextStyle};
use crate::scene::SceneElement;
use crate::value::Value;

use super::svg::{fmt_num, Attrs};

/// What one scene element becomes in the output
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A self-closing primitive such as `rect` or `path`
    Shape(&'static str, Attrs),
    /// A `<g>` wrapping the element's children
    Group(Attrs),
    /// A `<text>` node and its content
    Text(Attrs, String),
}

/// Boxes an element is drawn against
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub bounds: ResolvedBox,
    pub page: ResolvedBox,
}

/// Map an element to its SVG node. `fill` overrides the element's own
/// solid fill; gradients arrive here as a `url(#...)` reference.
pub fn render_node(el: &SceneElement, frame: Frame, fill: Option<&str>) -> Node {
    let b = frame.bounds;
    let center = b.center();

    match el.kind {
        ElementKind::Rectangle => {
            let mut attrs = box_attrs(&b);
            if let Some(rounded) = el.rounded {
                let r = fmt_num(rounded.to_pixels_in(b.min_side()));
                attrs.set("rx", r.clone()).set("ry", r);
            }
            attrs.extend(style_attrs(el, &b, fill));
            if let Some(rotate) = el.rotate {
                attrs.set("transform", rotation(rotate.number, &b));
            }
            Node::Shape("rect", attrs)
        }
        ElementKind::Circle => {
            let r = b.width / 2.0;
            let mut attrs = Attrs::new()
                .with("cx", fmt_num(b.x + r))
                .with("cy", fmt_num(b.y + r))
                .with("r", fmt_num(r));
            attrs.extend(style_attrs(el, &b, fill));
            Node::Shape("circle", attrs)
        }
        ElementKind::Ellipse => {
            let mut attrs = Attrs::new()
                .with("cx", fmt_num(center.x))
                .with("cy", fmt_num(center.y))
                .with("rx", fmt_num(b.width / 2.0))
                .with("ry", fmt_num(b.height / 2.0));
            attrs.extend(style_attrs(el, &b, fill));
            Node::Shape("ellipse", attrs)
        }
        ElementKind::Line => {
            let page = frame.page;
            let (x1, y1) = el
                .line_from
                .map_or((b.x, b.y), |p| page_point(p, &page));
            let (x2, y2) = el
                .line_to
                .map_or((b.right(), b.bottom()), |p| page_point(p, &page));
            let mut attrs = Attrs::new()
                .with("x1", fmt_num(x1))
                .with("y1", fmt_num(y1))
                .with("x2", fmt_num(x2))
                .with("y2", fmt_num(y2));
            attrs.extend(style_attrs(el, &b, fill));
            if !attrs.contains("fill") {
                attrs.set("fill", "none");
            }
            Node::Shape("line", attrs)
        }
        ElementKind::Path => {
            let mut attrs = Attrs::new();
            if let Some(d) = &el.path_data {
                attrs.set("d", d.as_str());
            }
            attrs.extend(style_attrs(el, &b, fill));
            Node::Shape("path", attrs)
        }
        ElementKind::Polygon => {
            let mut attrs = Attrs::new();
            if let Some(points) = &el.points {
                let list = points
                    .iter()
                    .map(|&p| {
                        let (x, y) = page_point(p, &frame.page);
                        format!("{},{}", fmt_num(x), fmt_num(y))
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                attrs.set("points", list);
            }
            attrs.extend(style_attrs(el, &b, fill));
            Node::Shape("polygon", attrs)
        }
        ElementKind::Image => {
            let mut attrs = box_attrs(&b);
            if let Some(src) = &el.src {
                attrs.set("href", src.as_str());
            }
            Node::Shape("image", attrs)
        }
        ElementKind::Text => {
            let mut attrs = Attrs::new()
                .with("x", fmt_num(center.x))
                .with("y", fmt_num(center.y))
                .with("text-anchor", "middle")
                .with("dominant-baseline", "central");
            if let Some(style) = &el.text {
                attrs.extend(text_attrs(style, &b));
            }
            let mut style = style_attrs(el, &b, fill);
            if attrs.contains("fill") {
                style.remove("fill");
            }
            attrs.extend(style);
            Node::Text(attrs, el.name.clone().unwrap_or_default())
        }
        ElementKind::Gear => match (el.teeth, el.module) {
            (Some(teeth), Some(module)) => {
                let mut attrs =
                    Attrs::new().with("d", gear_path_data(center.x, center.y, teeth, module));
                attrs.extend(style_attrs(el, &b, fill));
                let angle = b.rotation.or(el.rotate.map(|r| r.number));
                if let Some(angle) = angle {
                    attrs.set("transform", rotation(angle, &b));
                }
                Node::Shape("path", attrs)
            }
            _ => group(el, &b, fill),
        },
        ElementKind::Group | ElementKind::Arc | ElementKind::Canvas => group(el, &b, fill),
    }
}

fn group(el: &SceneElement, b: &ResolvedBox, fill: Option<&str>) -> Node {
    let mut attrs = Attrs::new();
    if let Some(rotate) = el.rotate {
        attrs.set("transform", rotation(rotate.number, b));
    }
    attrs.extend(style_attrs(el, b, fill));
    Node::Group(attrs)
}

fn box_attrs(b: &ResolvedBox) -> Attrs {
    Attrs::new()
        .with("x", fmt_num(b.x))
        .with("y", fmt_num(b.y))
        .with("width", fmt_num(b.width))
        .with("height", fmt_num(b.height))
}

/// Rotation about the box centre
fn rotation(angle: f64, b: &ResolvedBox) -> String {
    let c = b.center();
    format!("rotate({},{},{})", fmt_num(angle), fmt_num(c.x), fmt_num(c.y))
}

fn page_point((x, y): (Value, Value), page: &ResolvedBox) -> (f64, f64) {
    (x.to_pixels_in(page.width), y.to_pixels_in(page.height))
}

/// Fill, opacity and stroke attributes shared by every primitive
pub fn style_attrs(el: &SceneElement, b: &ResolvedBox, fill: Option<&str>) -> Attrs {
    let mut attrs = Attrs::new();

    let solid = el.fill.as_ref().and_then(Paint::solid).map(String::as_str);
    if let Some(fill) = fill.or(solid) {
        attrs.set("fill", fill);
    }
    if let Some(opacity) = el.opacity {
        attrs.set("opacity", fmt_num(opacity.to_pixels_in(1.0)));
    }
    if let Some(stroke) = &el.stroke {
        if let Some(color) = &stroke.color {
            attrs.set("stroke", color.as_str());
        }
        if let Some(width) = stroke.width {
            attrs.set("stroke-width", fmt_num(width.to_pixels_in(b.min_side())));
        }
        match stroke.dash {
            Some(Dash::Dashed) => {
                attrs.set("stroke-dasharray", "8,4");
            }
            Some(Dash::Dotted) => {
                attrs.set("stroke-dasharray", "2,2");
            }
            None => {}
        }
    }
    attrs
}

fn text_attrs(style: &TextStyle<Value, String>, b: &ResolvedBox) -> Attrs {
    let mut attrs = Attrs::new();
    if let Some(size) = style.size {
        attrs.set("font-size", fmt_num(size.to_pixels_in(b.min_side())));
    }
    if let Some(color) = &style.color {
        attrs.set("fill", color.as_str());
    }
    if let Some(weight) = style.weight {
        attrs.set("font-weight", weight.as_str());
    }
    if style.style == Some(FontStyle::Italic) {
        attrs.set("font-style", "italic");
    }
    if let Some(font) = &style.font {
        attrs.set("font-family", font.as_str());
    }
    if let Some(align) = style.align {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        attrs.set("text-anchor", anchor);
    }
    attrs
}

/// Closed outline of a spur gear centred on (`cx`, `cy`).
///
/// Each tooth spans one angular pitch: a root arc in, two flank lines up
/// to the tip, a tip arc, two flank lines down, and a root arc out.
pub fn gear_path_data(cx: f64, cy: f64, teeth: u32, module: f64) -> String {
    let gear = GearGeometry::new(teeth, module);
    let root = gear.root_radius();
    let pitch = gear.pitch_radius();
    let outer = gear.outer_radius();
    let step = 2.0 * PI / f64::from(teeth.max(1));

    let at = |r: f64, a: f64| format!("{} {}", fmt_num(cx + r * a.cos()), fmt_num(cy + r * a.sin()));
    let arc = |r: f64, a: f64| format!(" A {} {} 0 0 1 {}", fmt_num(r), fmt_num(r), at(r, a));
    let line = |r: f64, a: f64| format!(" L {}", at(r, a));

    let mut d = format!("M {}", at(root, 0.0));
    for i in 0..teeth.max(1) {
        let a = f64::from(i) * step;
        d.push_str(&arc(root, a + 0.25 * step));
        d.push_str(&line(pitch, a + 0.3 * step));
        d.push_str(&line(outer, a + 0.375 * step));
        d.push_str(&arc(outer, a + 0.625 * step));
        d.push_str(&line(pitch, a + 0.7 * step));
        d.push_str(&line(root, a + 0.75 * step));
        d.push_str(&arc(root, a + step));
    }
    d.push_str(" Z");
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Stroke;
    use crate::value::Unit;
    use pretty_assertions::assert_eq;

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
        Frame {
            bounds: ResolvedBox::new(x, y, w, h),
            page: ResolvedBox::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    fn shape(node: Node) -> (&'static str, Attrs) {
        match node {
            Node::Shape(tag, attrs) => (tag, attrs),
            other => panic!("expected a shape, got {:?}", other),
        }
    }

    #[test]
    fn test_rect_attributes() {
        let mut el = SceneElement::new(ElementKind::Rectangle);
        el.fill = Some(Paint::Solid("#FF0000".to_string()));
        el.rounded = Some(Value::number(4.0));
        el.rotate = Some(Value::number(45.0));

        let (tag, attrs) = shape(render_node(&el, frame(300.0, 250.0, 200.0, 100.0), None));
        assert_eq!(tag, "rect");
        assert_eq!(attrs.get("x"), Some("300"));
        assert_eq!(attrs.get("height"), Some("100"));
        assert_eq!(attrs.get("rx"), Some("4"));
        assert_eq!(attrs.get("fill"), Some("#FF0000"));
        assert_eq!(attrs.get("transform"), Some("rotate(45,400,300)"));
    }

    #[test]
    fn test_gradient_fill_overrides_solid() {
        let mut el = SceneElement::new(ElementKind::Circle);
        el.fill = Some(Paint::Solid("#FF0000".to_string()));
        let (_, attrs) = shape(render_node(&el, frame(0.0, 0.0, 20.0, 20.0), Some("url(#grad_0)")));
        assert_eq!(attrs.get("fill"), Some("url(#grad_0)"));
        assert_eq!(attrs.get("r"), Some("10"));
        assert_eq!(attrs.get("cx"), Some("10"));
    }

    #[test]
    fn test_stroke_resolves_against_box() {
        let mut el = SceneElement::new(ElementKind::Ellipse);
        el.stroke = Some(Stroke {
            color: Some("#000000".to_string()),
            width: Some(Value::with_unit(10.0, Unit::Percent)),
            dash: Some(Dash::Dotted),
        });
        el.opacity = Some(Value::with_unit(50.0, Unit::Percent));
        let (_, attrs) = shape(render_node(&el, frame(0.0, 0.0, 40.0, 20.0), None));
        assert_eq!(attrs.get("stroke-width"), Some("2"));
        assert_eq!(attrs.get("stroke-dasharray"), Some("2,2"));
        assert_eq!(attrs.get("opacity"), Some("0.50"));
    }

    #[test]
    fn test_line_defaults_to_box_diagonal() {
        let el = SceneElement::new(ElementKind::Line);
        let (_, attrs) = shape(render_node(&el, frame(10.0, 20.0, 30.0, 40.0), None));
        assert_eq!(attrs.get("x1"), Some("10"));
        assert_eq!(attrs.get("y2"), Some("60"));
        assert_eq!(attrs.get("fill"), Some("none"));
    }

    #[test]
    fn test_line_endpoints_resolve_against_page() {
        let mut el = SceneElement::new(ElementKind::Line);
        el.line_from = Some((Value::number(0.0), Value::with_unit(50.0, Unit::Percent)));
        el.line_to = Some((Value::with_unit(100.0, Unit::Percent), Value::number(5.0)));
        let (_, attrs) = shape(render_node(&el, frame(0.0, 0.0, 0.0, 0.0), None));
        assert_eq!(attrs.get("y1"), Some("300"));
        assert_eq!(attrs.get("x2"), Some("800"));
    }

    #[test]
    fn test_text_color_beats_fill() {
        let mut el = SceneElement::new(ElementKind::Text).with_name("Hello");
        el.fill = Some(Paint::Solid("#FF0000".to_string()));
        el.text = Some(TextStyle {
            color: Some("#0000FF".to_string()),
            size: Some(Value::number(24.0)),
            align: Some(TextAlign::Left),
            ..TextStyle::default()
        });
        match render_node(&el, frame(0.0, 0.0, 100.0, 50.0), None) {
            Node::Text(attrs, content) => {
                assert_eq!(content, "Hello");
                assert_eq!(attrs.get("fill"), Some("#0000FF"));
                assert_eq!(attrs.get("font-size"), Some("24"));
                assert_eq!(attrs.get("text-anchor"), Some("start"));
                assert_eq!(attrs.get("x"), Some("50"));
                assert_eq!(attrs.get("dominant-baseline"), Some("central"));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_gear_path_shape() {
        let d = gear_path_data(100.0, 100.0, 6, 10.0);
        assert!(d.starts_with("M "));
        assert!(d.ends_with('Z'));
        assert_eq!(d.matches(" A ").count(), 18);
        assert_eq!(d.matches(" L ").count(), 24);
    }

    #[test]
    fn test_gear_uses_layout_rotation() {
        let mut el = SceneElement::new(ElementKind::Gear);
        el.teeth = Some(12);
        el.module = Some(10.0);
        let mut f = frame(0.0, 0.0, 140.0, 140.0);
        f.bounds.rotation = Some(170.0);
        let (tag, attrs) = shape(render_node(&el, f, None));
        assert_eq!(tag, "path");
        assert_eq!(attrs.get("transform"), Some("rotate(170,70,70)"));
    }

    #[test]
    fn test_group_and_arc_render_as_g() {
        for kind in [ElementKind::Group, ElementKind::Arc] {
            let node = render_node(&SceneElement::new(kind), frame(0.0, 0.0, 1.0, 1.0), None);
            assert_eq!(node, Node::Group(Attrs::new()));
        }
    }
}
