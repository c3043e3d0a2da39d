//! SVG document assembly

/// Ordered attribute list. Setting an existing key replaces its value in
/// place, so attribute order stays stable in the output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    /// Builder form of [`Attrs::set`]
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| *k != key);
    }

    /// Merge `other` into `self`, later values winning
    pub fn extend(&mut self, other: Attrs) {
        for (key, value) in other.0 {
            self.set(key, value);
        }
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!(r#" {}="{}""#, k, escape_xml(v)))
            .collect()
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    pretty_print: bool,
    defs: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    pub fn new(pretty_print: bool) -> Self {
        Self {
            pretty_print,
            defs: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    fn indent_str(&self) -> String {
        if self.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Register a two-stop vertical gradient
    pub fn add_linear_gradient(&mut self, id: &str, from: &str, to: &str) {
        self.defs.push(format!(
            r#"<linearGradient{}><stop{}/><stop{}/></linearGradient>"#,
            Attrs::new()
                .with("id", id)
                .with("x1", "0%")
                .with("y1", "0%")
                .with("x2", "0%")
                .with("y2", "100%")
                .render(),
            Attrs::new()
                .with("offset", "0%")
                .with("stop-color", from)
                .render(),
            Attrs::new()
                .with("offset", "100%")
                .with("stop-color", to)
                .render(),
        ));
    }

    /// Add an empty element such as `<rect .../>`
    pub fn add_element(&mut self, tag: &str, attrs: &Attrs) {
        self.elements.push(format!(
            "{}<{}{}/>",
            self.indent_str(),
            tag,
            attrs.render()
        ));
    }

    /// Add a text element with escaped content
    pub fn add_text(&mut self, attrs: &Attrs, content: &str) {
        self.elements.push(format!(
            "{}<text{}>{}</text>",
            self.indent_str(),
            attrs.render(),
            escape_xml(content)
        ));
    }

    /// Open a group; children added until [`SvgBuilder::end_group`] nest inside
    pub fn start_group(&mut self, attrs: &Attrs) {
        self.elements
            .push(format!("{}<g{}>", self.indent_str(), attrs.render()));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string under a root carrying `root` attributes
    pub fn build(self, root: &Attrs) -> String {
        let nl = self.newline();
        let pad = if self.pretty_print { "  " } else { "" };

        let mut svg = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        svg.push('\n');

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"{}>"#,
            root.render()
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(pad);
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(pad);
                svg.push_str(pad);
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(pad);
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Format a number for SVG output: integers bare, otherwise two decimals
pub fn fmt_num(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(300.0), "300");
        assert_eq!(fmt_num(-4.0), "-4");
        assert_eq!(fmt_num(2.5), "2.50");
        assert_eq!(fmt_num(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_attrs_replace_in_place() {
        let mut attrs = Attrs::new().with("x", "1").with("fill", "red").with("y", "2");
        attrs.set("fill", "blue");
        attrs.set("stroke", "black");
        assert_eq!(
            attrs.render(),
            r#" x="1" fill="blue" y="2" stroke="black""#
        );
        attrs.remove("x");
        assert!(!attrs.contains("x"));
        assert_eq!(attrs.get("fill"), Some("blue"));
    }

    #[test]
    fn test_build_compact() {
        let mut builder = SvgBuilder::new(false);
        builder.add_linear_gradient("grad_0", "#FF0000", "#0000FF");
        builder.start_group(&Attrs::new());
        builder.add_element("rect", &Attrs::new().with("width", "10"));
        builder.end_group();
        let svg = builder.build(&Attrs::new().with("width", "100"));

        insta::assert_snapshot!(svg, @r###"
        <?xml version="1.0" encoding="UTF-8"?>
        <svg xmlns="http://www.w3.org/2000/svg" width="100"><defs><linearGradient id="grad_0" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="#FF0000"/><stop offset="100%" stop-color="#0000FF"/></linearGradient></defs><g><rect width="10"/></g></svg>
        "###);
    }

    #[test]
    fn test_build_pretty_indents_groups() {
        let mut builder = SvgBuilder::new(true);
        builder.start_group(&Attrs::new().with("class", "outer"));
        builder.add_text(&Attrs::new().with("x", "5"), "A & B");
        builder.end_group();
        let svg = builder.build(&Attrs::new());

        assert_eq!(
            svg,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\">\n  <g class=\"outer\">\n    <text x=\"5\">A &amp; B</text>\n  </g>\n</svg>"
        );
    }
}
