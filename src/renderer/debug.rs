//! Debug overlays drawn on top of a rendered scene
//!
//! Each mode adds one `<g class="debug-...">` layer. Layers stack in a fixed
//! order so labels always end up on top.

use crate::layout::{element_key, BoxMap, ResolvedBox};
use crate::parser::ast::ElementKind;
use crate::scene::{Scene, SceneElement};

use super::config::DebugModes;
use super::svg::{fmt_num, Attrs, SvgBuilder};

/// Kelly's 22 colours of maximum contrast
pub const KELLY_COLORS: [&str; 22] = [
    "#F2F3F4", "#222222", "#F3C300", "#875692", "#F38400", "#A1CAF1", "#BE0032", "#C2B280",
    "#848482", "#008856", "#E68FAC", "#0067A5", "#F99379", "#604E97", "#F6A600", "#B3446C",
    "#DCD300", "#882D17", "#8DB600", "#654522", "#E25822", "#2B3D26",
];

const GRID_STEP: usize = 50;
const MARKER_ARM: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 10.0;

/// A non-canvas element as the overlays see it
struct Entry {
    key: String,
    kind: ElementKind,
}

impl Entry {
    fn label(&self) -> String {
        if self.key.starts_with("__element_") {
            format!("[{}]", self.kind)
        } else {
            self.key.clone()
        }
    }
}

fn flatten(scene: &Scene) -> Vec<Entry> {
    fn visit(el: &SceneElement, out: &mut Vec<Entry>) {
        out.push(Entry {
            key: element_key(el, out.len()),
            kind: el.kind,
        });
        for child in &el.children {
            visit(child, out);
        }
    }

    let mut out = Vec::new();
    for el in scene.elements.iter().filter(|el| !el.is_canvas()) {
        visit(el, &mut out);
    }
    out
}

/// Append the enabled overlays to `builder`
pub fn apply_overlays(
    builder: &mut SvgBuilder,
    scene: &Scene,
    boxes: &BoxMap,
    page: &ResolvedBox,
    modes: DebugModes,
) {
    let entries = flatten(scene);
    let visible = || placed(&entries, boxes);

    if modes.grid {
        add_grid(builder, page.width, page.height);
    }

    if modes.colors {
        builder.start_group(&Attrs::new().with("class", "debug-colors"));
        for (i, _, b) in visible().filter(|(_, _, b)| !b.is_zero()) {
            let attrs = rect_attrs(b)
                .with("fill", KELLY_COLORS[i % KELLY_COLORS.len()])
                .with("opacity", "0.25");
            builder.add_element("rect", &attrs);
        }
        builder.end_group();
    }

    if modes.boxes {
        builder.start_group(&Attrs::new().with("class", "debug-boxes"));
        for (i, _, b) in visible().filter(|(_, _, b)| !b.is_zero()) {
            let attrs = rect_attrs(b)
                .with("fill", "none")
                .with("stroke", KELLY_COLORS[i % KELLY_COLORS.len()])
                .with("stroke-width", "1.5")
                .with("stroke-dasharray", "6,3");
            builder.add_element("rect", &attrs);
        }
        builder.end_group();
    }

    if modes.markers {
        builder.start_group(&Attrs::new().with("class", "debug-markers"));
        for (_, _, b) in visible() {
            let (x, y) = (b.x, b.y);
            builder.add_element("line", &marker(x - MARKER_ARM, y, x + MARKER_ARM, y));
            builder.add_element("line", &marker(x, y - MARKER_ARM, x, y + MARKER_ARM));
        }
        builder.end_group();
    }

    if modes.labels {
        builder.start_group(&Attrs::new().with("class", "debug-labels"));
        for (_, entry, b) in visible() {
            let text = entry.label();
            // ~6px per monospace character at size 10
            let w = text.chars().count() as f64 * 6.0 + 6.0;
            let h = LABEL_FONT_SIZE + 4.0;
            let c = b.center();

            let pill = Attrs::new()
                .with("x", fmt_num(c.x - w / 2.0))
                .with("y", fmt_num(c.y - h / 2.0))
                .with("width", fmt_num(w))
                .with("height", fmt_num(h))
                .with("fill", "black")
                .with("opacity", "0.75")
                .with("rx", "2");
            builder.add_element("rect", &pill);

            let label = Attrs::new()
                .with("x", fmt_num(c.x))
                .with("y", fmt_num(c.y + LABEL_FONT_SIZE / 2.0 - 1.0))
                .with("text-anchor", "middle")
                .with("font-size", fmt_num(LABEL_FONT_SIZE))
                .with("font-family", "monospace")
                .with("fill", "white");
            builder.add_text(&label, &text);
        }
        builder.end_group();
    }
}

/// Entries that have a box, with their pre-order index
fn placed<'a>(
    entries: &'a [Entry],
    boxes: &'a BoxMap,
) -> impl Iterator<Item = (usize, &'a Entry, &'a ResolvedBox)> + 'a {
    entries
        .iter()
        .enumerate()
        .filter_map(move |(i, e)| boxes.get(&e.key).map(|b| (i, e, b)))
}

fn add_grid(builder: &mut SvgBuilder, width: f64, height: f64) {
    builder.start_group(
        &Attrs::new()
            .with("class", "debug-grid")
            .with("opacity", "0.4"),
    );

    let label = |x: f64, y: f64| {
        Attrs::new()
            .with("x", fmt_num(x))
            .with("y", fmt_num(y))
            .with("font-size", "8")
            .with("font-family", "monospace")
            .with("fill", "#666666")
    };

    for x in (0..).step_by(GRID_STEP).map(|x| x as f64).take_while(|&x| x <= width) {
        builder.add_element("line", &grid_line(x, 0.0, x, height));
        builder.add_text(&label(x + 2.0, 10.0), &fmt_num(x));
    }
    for y in (0..).step_by(GRID_STEP).map(|y| y as f64).take_while(|&y| y <= height) {
        builder.add_element("line", &grid_line(0.0, y, width, y));
        builder.add_text(&label(2.0, y - 2.0), &fmt_num(y));
    }

    builder.end_group();
}

fn rect_attrs(b: &ResolvedBox) -> Attrs {
    Attrs::new()
        .with("x", fmt_num(b.x))
        .with("y", fmt_num(b.y))
        .with("width", fmt_num(b.width))
        .with("height", fmt_num(b.height))
}

fn line_attrs(x1: f64, y1: f64, x2: f64, y2: f64) -> Attrs {
    Attrs::new()
        .with("x1", fmt_num(x1))
        .with("y1", fmt_num(y1))
        .with("x2", fmt_num(x2))
        .with("y2", fmt_num(y2))
}

fn grid_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Attrs {
    line_attrs(x1, y1, x2, y2)
        .with("stroke", "#999999")
        .with("stroke-width", "0.5")
}

fn marker(x1: f64, y1: f64, x2: f64, y2: f64) -> Attrs {
    line_attrs(x1, y1, x2, y2)
        .with("stroke", "#FF0000")
        .with("stroke-width", "1.5")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{resolve_layout, LayoutConfig};
    use crate::parser::parse;
    use crate::resolver::resolve;

    fn overlay(source: &str, modes: &str) -> String {
        let scene = resolve(&parse(source).unwrap()).unwrap();
        let boxes = resolve_layout(&scene, &LayoutConfig::default()).unwrap();
        let page = boxes.iter().next().map(|(_, b)| *b).unwrap();
        let mut builder = SvgBuilder::new(false);
        apply_overlays(&mut builder, &scene, &boxes, &page, modes.parse().unwrap());
        builder.build(&Attrs::new())
    }

    #[test]
    fn test_no_modes_adds_nothing() {
        let svg = overlay("canvas 100 by 100\nrect \"A\" 10 by 10\n", "");
        assert!(!svg.contains("debug-"));
    }

    #[test]
    fn test_grid_covers_canvas() {
        let svg = overlay("canvas 100 by 60\n", "grid");
        assert!(svg.contains(r#"<g class="debug-grid" opacity="0.4">"#));
        // x = 0, 50, 100 and y = 0, 50
        assert_eq!(svg.matches("<line").count(), 5);
        assert!(svg.contains(
            r##"<line x1="50" y1="0" x2="50" y2="60" stroke="#999999" stroke-width="0.5"/>"##
        ));
        assert!(svg.contains(
            r##"<text x="2" y="48" font-size="8" font-family="monospace" fill="#666666">50</text>"##
        ));
    }

    #[test]
    fn test_colors_use_kelly_palette_and_skip_empty_boxes() {
        let svg = overlay(
            "canvas 200 by 200\nrect \"A\" 10 by 10\ngroup \"Empty\"\nrect \"B\" 10 by 10\n",
            "colors",
        );
        assert!(svg.contains(r##"fill="#F2F3F4" opacity="0.25""##));
        assert!(svg.contains(r##"fill="#875692" opacity="0.25""##));
        assert_eq!(svg.matches("<rect").count(), 2);
    }

    #[test]
    fn test_boxes_and_markers() {
        let svg = overlay("canvas 200 by 200\nrect \"A\" 20 by 20 at 50 50\n", "boxes,markers");
        assert!(svg.contains(r#"stroke-dasharray="6,3""#));
        assert!(svg.contains(r##"<line x1="34" y1="40" x2="46" y2="40" stroke="#FF0000" stroke-width="1.5"/>"##));
    }

    #[test]
    fn test_labels_name_unnamed_elements_by_kind() {
        let svg = overlay("canvas 200 by 200\nrect \"Desk\" 20 by 20\ncircle radius 5\n", "labels");
        assert!(svg.contains(">Desk</text>"));
        assert!(svg.contains(">[circle]</text>"));
        assert!(!svg.contains(">__canvas"));
    }

    #[test]
    fn test_all_layers_in_order() {
        let svg = overlay("canvas 100 by 100\nrect \"A\" 10 by 10\n", "all");
        let order: Vec<usize> = ["debug-grid", "debug-colors", "debug-boxes", "debug-markers", "debug-labels"]
            .iter()
            .map(|class| svg.find(class).unwrap())
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }
}
