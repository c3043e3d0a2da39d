//! SVG renderer for generating output from a laid-out scene
//!
//! This module walks the resolved [`Scene`] alongside its [`BoxMap`] and
//! produces an SVG string. Rendering never fails: an element without a box
//! is drawn in a zero-sized box at the origin.

pub mod config;
pub mod debug;
pub mod shapes;
pub mod svg;

pub use config::{DebugModes, SvgConfig, UnknownDebugMode};
pub use shapes::gear_path_data;

use log::debug;

use crate::layout::{element_key, page_key, BoxMap, LayoutConfig, ResolvedBox};
use crate::parser::ast::Paint;
use crate::scene::{Scene, SceneElement};

use shapes::{render_node, Frame, Node};
use svg::{Attrs, SvgBuilder};

/// Render a laid-out scene to an SVG document
pub fn render_svg(scene: &Scene, boxes: &BoxMap, config: &SvgConfig) -> String {
    let page = boxes.get(&page_key(scene)).copied().unwrap_or_else(|| {
        let defaults = LayoutConfig::default();
        ResolvedBox::new(0.0, 0.0, defaults.default_width, defaults.default_height)
    });

    let mut emitter = Emitter {
        builder: SvgBuilder::new(config.pretty_print),
        boxes,
        page,
        counter: 0,
        gradients: 0,
    };

    if let Some(background) = scene.canvas().and_then(|c| c.background.as_deref()) {
        let attrs = Attrs::new()
            .with("width", "100%")
            .with("height", "100%")
            .with("fill", background);
        emitter.builder.add_element("rect", &attrs);
    }

    for el in scene.elements.iter().filter(|el| !el.is_canvas()) {
        emitter.element(el);
    }

    debug!(
        elements = emitter.counter,
        gradients = emitter.gradients,
        overlays = config.debug.to_string().as_str();
        "Rendered SVG"
    );

    let mut builder = emitter.builder;
    if !config.debug.is_empty() {
        debug::apply_overlays(&mut builder, scene, boxes, &page, config.debug);
    }

    let (width, height) = (page.width as i64, page.height as i64);
    let root = Attrs::new()
        .with("width", width.to_string())
        .with("height", height.to_string())
        .with("viewBox", format!("0 0 {} {}", width, height))
        .with("font-family", config.font_family.as_str());
    builder.build(&root)
}

struct Emitter<'a> {
    builder: SvgBuilder,
    boxes: &'a BoxMap,
    page: ResolvedBox,
    /// Pre-order index of the next element; matches layout's key counter
    counter: usize,
    gradients: usize,
}

impl Emitter<'_> {
    fn element(&mut self, el: &SceneElement) {
        let key = element_key(el, self.counter);
        self.counter += 1;
        let bounds = self.boxes.get(&key).copied().unwrap_or_default();

        let fill = el
            .fill
            .as_ref()
            .and_then(Paint::gradient)
            .map(|gradient| {
                let id = format!("grad_{}", self.gradients);
                self.gradients += 1;
                self.builder
                    .add_linear_gradient(&id, &gradient.from, &gradient.to);
                format!("url(#{})", id)
            });

        let frame = Frame {
            bounds,
            page: self.page,
        };
        match render_node(el, frame, fill.as_deref()) {
            Node::Group(attrs) => {
                self.builder.start_group(&attrs);
                self.children(el);
                self.builder.end_group();
            }
            Node::Shape(tag, attrs) => {
                self.builder.add_element(tag, &attrs);
                self.children(el);
            }
            Node::Text(attrs, content) => {
                self.builder.add_text(&attrs, &content);
                self.children(el);
            }
        }
    }

    /// Children of a primitive follow it as siblings; only groups nest
    fn children(&mut self, el: &SceneElement) {
        for child in &el.children {
            self.element(child);
        }
    }
}
