//! Highlighter configuration

/// Highlighter configuration options
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    /// Class carried by every marker element
    pub marker_class: String,

    /// Class of the inner element wrapping only the root of a variant
    pub root_class: String,

    /// Attribute holding the attributed root word
    pub word_attribute: String,

    /// Classes of injected UI that must never be treated as page content
    pub overlay_classes: Vec<String>,

    /// Elements whose content is never scanned
    pub skip_tags: Vec<String>,

    /// Highlight color used until a preference arrives
    pub default_color: String,

    /// Tooltip text on variant markers
    pub marker_title: String,

    /// Compiled-size ceiling for the word pattern (bytes)
    pub regex_size_limit: usize,
}

impl HighlightConfig {
    /// Whether a class name belongs to a marker or an overlay
    pub fn is_reserved_class(&self, class: &str) -> bool {
        class == self.marker_class || self.overlay_classes.iter().any(|c| c == class)
    }

    /// Whether a tag's subtree is excluded from scanning
    pub fn skips_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            marker_class: "lv-highlighted-word".to_string(),
            root_class: "lv-root-highlight".to_string(),
            word_attribute: "data-word".to_string(),
            overlay_classes: vec![
                "lv-tooltip".to_string(),
                "lv-translation-button".to_string(),
            ],
            skip_tags: ["script", "style", "noscript", "iframe", "object", "embed"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_color: "#ffeb3b".to_string(),
            marker_title: "Click to view translation".to_string(),
            regex_size_limit: 64 * 1024 * 1024, // 64MB
        }
    }
}
