//! Integration tests for the StagScribe pipeline

use pretty_assertions::assert_eq;
use stagscribe::{
    convert, convert_with_config, parse, resolve, resolve_layout, LayoutConfig, RenderConfig,
    RenderError, ResolvedBox, SvgConfig,
};

fn compact() -> RenderConfig {
    RenderConfig::new().with_svg(SvgConfig::new().with_pretty_print(false))
}

fn svg(source: &str) -> String {
    convert_with_config(source, &compact())
        .expect("Should convert")
        .svg
}

fn boxes(source: &str) -> stagscribe::BoxMap {
    let doc = parse(source).expect("Should parse");
    let scene = resolve(&doc).expect("Should resolve");
    resolve_layout(&scene, &LayoutConfig::default()).expect("Should lay out")
}

fn bounds(source: &str, key: &str) -> ResolvedBox {
    boxes(source)
        .get(key)
        .copied()
        .unwrap_or_else(|| panic!("no box for {}", key))
}

/// Every `d` attribute of the `<path>` elements in `svg`
fn path_data(svg: &str) -> Vec<&str> {
    svg.split("<path d=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect()
}

#[test]
fn test_end_to_end_scenario() {
    let source = "canvas 800 by 600\nrect \"Box\" 200 by 100\n  at center\n  fill red\n";

    let map = boxes(source);
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.get("__canvas").copied(),
        Some(ResolvedBox::new(0.0, 0.0, 800.0, 600.0))
    );
    assert_eq!(
        map.get("Box").copied(),
        Some(ResolvedBox::new(300.0, 250.0, 200.0, 100.0))
    );

    let out = convert(source).expect("Should convert");
    assert!(out.diagnostics.is_empty());
    assert!(out
        .svg
        .contains(r##"<rect x="300" y="250" width="200" height="100" fill="#FF0000"/>"##));
}

#[test]
fn test_below_with_gap() {
    let source = "canvas 800 by 600\nrect \"A\" 200 by 100 at center\nrect \"B\" 200 by 50 below \"A\" with gap 20\n";
    let b = bounds(source, "B");
    assert_eq!((b.x, b.y), (300.0, 370.0));
}

#[test]
fn test_variables_feed_layout() {
    let source = "side is 200\nspacing is side / 10\ncanvas 800 by 600\nrect \"A\" side by side / 2\n  at center\nrect \"B\" side by 50\n  below \"A\" with gap spacing\n";
    assert_eq!(
        bounds(source, "A"),
        ResolvedBox::new(300.0, 250.0, 200.0, 100.0)
    );
    assert_eq!(bounds(source, "B").y, 370.0);
}

#[test]
fn test_templates_render_independent_instances() {
    let out = svg(
        "canvas 400 by 200\ndefine desk:\n  rect 100 by 50\n    fill tan\nplace desk \"D1\" at 100 100\nplace desk \"D2\" at 300 100\n  fill red\n",
    );
    assert!(out.contains(r##"<rect x="50" y="75" width="100" height="50" fill="#D2B48C"/>"##));
    assert!(out.contains(r##"<rect x="250" y="75" width="100" height="50" fill="#FF0000"/>"##));
}

#[test]
fn test_loops_render_in_order() {
    let out = svg("canvas 400 by 100\nfor i from 0 to 3\n  rect \"Box_{i}\" 50 by 50\n    at i * 100 + 50 50\n");
    let xs: Vec<&str> = out
        .split("<rect x=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect();
    assert_eq!(xs, vec!["25", "125", "225", "325"]);
}

#[test]
fn test_meshed_gears() {
    let out = svg(
        "canvas 800 by 400\ngear \"Drive\"\n  teeth 12\n  module 10\n  at 200 200\ngear \"Driven\"\n  teeth 18\n  module 10\n  mesh with \"Drive\"\n",
    );
    assert!(out.contains(r#"transform="rotate(0,200,200)""#));
    assert!(out.contains(r#"transform="rotate(170,350,200)""#));
    assert_eq!(path_data(&out).len(), 2);
}

#[test]
fn test_gear_chain_rotations_accumulate() {
    let out = svg(
        "canvas 800 by 400\ngear \"G1\" teeth 12 module 10 at 150 200\ngear \"G2\" teeth 18 module 10 mesh with \"G1\"\ngear \"G3\" teeth 10 module 10 mesh with \"G2\"\n",
    );
    assert!(out.contains(r#"transform="rotate(0,150,200)""#));
    assert!(out.contains(r#"transform="rotate(170,300,200)""#));
    assert!(out.contains(r#"transform="rotate(332,440,200)""#));
}

#[test]
fn test_placements_inside_loops() {
    let source = "canvas 400 by 100\ndefine table:\n  rect 80 by 40\nfor i from 1 to 3\n  place table \"T{i}\" at i * 100 50\nrect \"Under\" 10 by 10 below \"T2\"\n";
    let map = boxes(source);
    let xs: Vec<f64> = ["T1", "T2", "T3"]
        .iter()
        .map(|key| map.get(key).map(|b| b.x).unwrap_or_else(|| panic!("no box for {}", key)))
        .collect();
    assert_eq!(xs, vec![60.0, 160.0, 260.0]);
    assert_eq!(bounds(source, "Under"), ResolvedBox::new(195.0, 70.0, 10.0, 10.0));

    let out = convert(source).expect("Should convert");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
}

#[test]
fn test_huge_loop_bounds_terminate() {
    let doc = parse("for i from 100000000000000000 to 100000000000001000\n  rect\n").expect("Should parse");
    let scene = resolve(&doc).expect("Should resolve");
    assert!(scene.elements.len() <= 1010);
}

#[test]
fn test_gear_outline_has_seven_segments_per_tooth() {
    let out = svg("canvas 200 by 200\ngear \"G\" teeth 6 module 10 at center\n");
    let paths = path_data(&out);
    assert_eq!(paths.len(), 1);
    let d = paths[0];
    assert!(d.starts_with("M "));
    assert!(d.ends_with(" Z"));
    assert_eq!(d.matches(" A ").count(), 18);
    assert_eq!(d.matches(" L ").count(), 24);
}

#[test]
fn test_gradient_fill_references_defs() {
    let out = svg("canvas 100 by 100\nrect \"A\" 10 by 10 fill gradient red to blue\n");
    assert!(out.contains(r#"<linearGradient id="grad_0""#));
    assert!(out.contains(r##"stop-color="#FF0000""##));
    assert!(out.contains(r##"stop-color="#0000FF""##));
    assert!(out.contains(r#"fill="url(#grad_0)""#));
}

#[test]
fn test_palette_colors_resolve_before_render() {
    let out = svg("colors:\n  wall is beige\ncanvas 100 by 100\n  background wall\nrect \"A\" 10 by 10 fill wall\n");
    assert!(out.contains(r##"<rect width="100%" height="100%" fill="#F5F5DC"/>"##));
    assert!(out.contains(r##"fill="#F5F5DC"/>"##));
}

#[test]
fn test_page_size_from_layout_config() {
    let config = compact()
        .with_layout(LayoutConfig::new().with_canvas_size(320.0, 240.0))
        .with_strict(false);
    let out = convert_with_config("rect \"A\" 10 by 10\n", &config).expect("Should convert");
    assert!(out.svg.contains(r#"width="320" height="240" viewBox="0 0 320 240""#));
    assert_eq!(out.diagnostics.len(), 1);
}

#[test]
fn test_error_stages() {
    assert!(matches!(
        convert("rect \"A\" 10 by\n"),
        Err(RenderError::Parse(_))
    ));
    assert!(matches!(
        convert("for i from 0 to 20000\n  rect\n"),
        Err(RenderError::Resolve(_))
    ));
    assert!(matches!(
        convert("canvas 10 by 10\ncanvas 10 by 10\n"),
        Err(RenderError::Lint(_))
    ));
}
