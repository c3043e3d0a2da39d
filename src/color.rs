//! Color names and literal color resolution
//!
//! Named colors are parsed with the `color` crate and written back as
//! uppercase `#RRGGBB`, so output never depends on SVG viewers knowing
//! CSS names.

use std::str::FromStr;

use ::color::{DynamicColor, Srgb};

/// Parse a CSS color name to uppercase `#RRGGBB`
fn named_hex(name: &str) -> Option<String> {
    let parsed = DynamicColor::from_str(name).ok()?;
    let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
    Some(format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b))
}

fn is_valid_hex(s: &str) -> bool {
    matches!(s.len() - 1, 3 | 6) && DynamicColor::from_str(s).is_ok()
}

/// Resolve a color literal to its canonical form.
///
/// Named colors (case-insensitive, spaces ignored so `light gray` works)
/// become uppercase `#RRGGBB`; hex literals are validated and lowercased;
/// `none`/`transparent` become `none`; `rgb(...)` passes through.
pub fn resolve_color(color: &str) -> Option<String> {
    let trimmed = color.trim();
    if trimmed.starts_with('#') {
        return is_valid_hex(trimmed).then(|| trimmed.to_ascii_lowercase());
    }
    if trimmed.starts_with("rgb(") && trimmed.ends_with(')') {
        return Some(trimmed.to_string());
    }
    let key: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match key.as_str() {
        "none" | "transparent" => Some("none".to_string()),
        // Bare CSS names only
        name if name.chars().all(|c| c.is_ascii_alphabetic()) => named_hex(name),
        _ => None,
    }
}

/// True if `word` is a color name (named or friendly multi-word alias)
pub fn is_color_keyword(word: &str) -> bool {
    !word.starts_with('#') && !word.starts_with("rgb(") && resolve_color(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_css_name_set() {
        assert_eq!(resolve_color("rebeccapurple").as_deref(), Some("#663399"));
        assert_eq!(resolve_color("lightgoldenrodyellow").as_deref(), Some("#FAFAD2"));
        assert_eq!(resolve_color("darkslategrey").as_deref(), Some("#2F4F4F"));
        assert_eq!(resolve_color("hsl(0, 100%, 50%)"), None);
        assert_eq!(resolve_color(""), None);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(resolve_color("red").as_deref(), Some("#FF0000"));
        assert_eq!(resolve_color("Red").as_deref(), Some("#FF0000"));
        assert_eq!(resolve_color("WHITE").as_deref(), Some("#FFFFFF"));
        assert_eq!(resolve_color("beige").as_deref(), Some("#F5F5DC"));
    }

    #[test]
    fn test_friendly_aliases() {
        assert_eq!(resolve_color("light gray").as_deref(), Some("#D3D3D3"));
        assert_eq!(resolve_color("dark gray").as_deref(), Some("#A9A9A9"));
        assert_eq!(resolve_color("sky blue").as_deref(), Some("#87CEEB"));
        assert_eq!(resolve_color("light blue").as_deref(), Some("#ADD8E6"));
    }

    #[test]
    fn test_hex() {
        assert_eq!(resolve_color("#FF0000").as_deref(), Some("#ff0000"));
        assert_eq!(resolve_color("#F00").as_deref(), Some("#f00"));
        assert_eq!(resolve_color("#ZZZZZZ"), None);
        assert_eq!(resolve_color("#FFFF"), None);
    }

    #[test]
    fn test_special_values() {
        assert_eq!(resolve_color("none").as_deref(), Some("none"));
        assert_eq!(resolve_color("transparent").as_deref(), Some("none"));
        assert_eq!(
            resolve_color("rgb(255,0,0)").as_deref(),
            Some("rgb(255,0,0)")
        );
        assert_eq!(resolve_color("unicorn"), None);
    }

    #[test]
    fn test_is_color_keyword() {
        assert!(is_color_keyword("red"));
        assert!(is_color_keyword("skyblue"));
        assert!(is_color_keyword("light gray"));
        assert!(!is_color_keyword("unicorn"));
        assert!(!is_color_keyword("#fff"));
    }
}
