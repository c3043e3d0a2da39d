//! Integration tests for the linter and strict conversion

use pretty_assertions::assert_eq;
use stagscribe::lint::Rule;
use stagscribe::{
    check, convert, convert_with_config, has_errors, parse, resolve, RenderConfig, RenderError,
    Severity,
};

fn lint(source: &str) -> Vec<stagscribe::Diagnostic> {
    check(&resolve(&parse(source).expect("Should parse")).expect("Should resolve"))
}

const FLOOR_PLAN: &str = "\
canvas 600 by 400
  background white
colors:
  oak is tan
define desk:
  rect 120 by 60
    fill oak
rect \"Room\" 500 by 300
  at center
  stroke black
place desk \"Desk\" at 150 120
rect \"Door\" 60 by 10 on the south wall
text \"Label\" 100 by 20
  size 14
  below \"Room\" with gap 10
";

#[test]
fn test_clean_floor_plan() {
    let diagnostics = lint(FLOOR_PLAN);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics);

    let out = convert(FLOOR_PLAN).expect("Should convert");
    assert!(out.diagnostics.is_empty());
    assert!(out.svg.contains(">Label</text>"));
}

#[test]
fn test_findings_in_every_rule_group() {
    let diagnostics = lint(
        "colors:\n  haze is mauvish\nrect \"A\" 10 by 10 fill gradient red to haze\ncanvas 100 by 100\nrect \"A\" 10 by 10 below \"Missing\"\ncircle \"Dot\"\n",
    );
    let rules: Vec<Rule> = diagnostics.iter().map(|d| d.rule).collect();
    assert!(rules.contains(&Rule::Structure));
    assert!(rules.contains(&Rule::References));
    assert!(rules.contains(&Rule::Colors));
    assert!(rules.contains(&Rule::Style));

    let severities: Vec<Severity> = diagnostics.iter().map(|d| d.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort();
    assert_eq!(severities, sorted);
}

#[test]
fn test_diagnostics_carry_source_locations() {
    let diagnostics = lint("canvas 100 by 100\ngroup \"G\"\n  rect \"Inner\" 5 by 5 above \"Nowhere\"\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "error:3:3 [references]: Referenced element \"Nowhere\" not found"
    );
}

#[test]
fn test_loop_generated_duplicates() {
    let diagnostics = lint("canvas 100 by 100\nfor i from 0 to 2\n  rect \"Same\" 5 by 5\n");
    let duplicates = diagnostics
        .iter()
        .filter(|d| d.message == "Duplicate element name: \"Same\"")
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn test_warnings_do_not_block_strict_mode() {
    let out = convert("rect \"A\" 10 by 10\n").expect("Warnings should not block");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_strict_and_lenient_conversion() {
    let source = "colors:\n  glow is ultraviolet\ncanvas 100 by 100\nrect \"A\" 10 by 10 fill glow\n";

    match convert(source) {
        Err(RenderError::Lint(diagnostics)) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].message, "Unknown color \"ultraviolet\" in fill");
        }
        other => panic!("expected lint failure, got {:?}", other),
    }

    let lenient = RenderConfig::new().with_strict(false);
    let out = convert_with_config(source, &lenient).expect("Lenient mode should render");
    assert!(has_errors(&out.diagnostics));
    assert!(out.svg.contains(r#"fill="ultraviolet""#));
}
