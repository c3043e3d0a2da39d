//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Canvas width when the document's canvas gives none
    pub default_width: f64,

    /// Canvas height when the document's canvas gives none
    pub default_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_width: 800.0,
            default_height: 600.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback canvas size
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.default_width, 800.0);
        assert_eq!(config.default_height, 600.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new().with_canvas_size(1024.0, 768.0);
        assert_eq!(config.default_width, 1024.0);
        assert_eq!(config.default_height, 768.0);
    }
}
