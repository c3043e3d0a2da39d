//! SVG regression tests
//!
//! Small scenes whose full output is pinned, so changes to attribute order,
//! number formatting or indentation show up as snapshot diffs.

use pretty_assertions::assert_eq;
use stagscribe::{convert, convert_with_config, RenderConfig, SvgConfig};

fn compact(source: &str) -> String {
    let config = RenderConfig::new().with_svg(SvgConfig::new().with_pretty_print(false));
    convert_with_config(source, &config)
        .expect("Should convert")
        .svg
}

#[test]
fn test_mixed_shapes_snapshot() {
    let source = "\
canvas 200 by 100
  background white
rect \"A\" 40 by 20 at 50 50
  fill blue
  rounded 4
circle \"B\" radius 10 right of \"A\" with gap 10
group \"G\"
  ellipse \"E\" 20 by 10 at 150 50
";
    let out = convert(source).expect("Should convert");
    insta::assert_snapshot!(out.svg, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100" font-family="Roboto, sans-serif">
      <rect width="100%" height="100%" fill="#FFFFFF"/>
      <rect x="30" y="40" width="40" height="20" rx="4" ry="4" fill="#0000FF"/>
      <circle cx="90" cy="50" r="10"/>
      <g>
        <ellipse cx="150" cy="50" rx="10" ry="5"/>
      </g>
    </svg>
    "###);
}

#[test]
fn test_page_coordinate_shapes() {
    let out = compact(
        "canvas 200 by 100\npolygon \"Tri\"\n  points (0, 0) (50%, 0) (25%, 100%)\n  fill navy\nline \"L\" from 0 0 to 100 50 dashed\n",
    );
    assert!(out.contains(r##"<polygon points="0,0 100,0 50,100" fill="#000080"/>"##));
    assert!(out.contains(
        r#"<line x1="0" y1="0" x2="100" y2="50" stroke-dasharray="8,4" fill="none"/>"#
    ));
}

#[test]
fn test_fractional_values_use_two_decimals() {
    let out = compact("canvas 100 by 100\nrect \"A\" 10 by 10 at 33.5 20\n  opacity 0.5\n");
    assert!(out.contains(r#"<rect x="28.50" y="15" width="10" height="10" opacity="0.50"/>"#));
}

#[test]
fn test_text_output() {
    let out = compact("canvas 200 by 50\ntext \"Hello <World>\" 200 by 50\n  size 18 bold color navy\n  at center\n");
    assert_eq!(
        out,
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="50" viewBox="0 0 200 50" font-family="Roboto, sans-serif">"#,
            r##"<text x="100" y="25" text-anchor="middle" dominant-baseline="central" font-size="18" fill="#000080" font-weight="bold">Hello &lt;World&gt;</text>"##,
            "</svg>",
        )
    );
}
