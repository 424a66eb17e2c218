//! Pagination configuration: geometry, chrome text and the setter surface

mod command;
mod geometry;

pub use command::{ConfigCommand, ContentMargins, Margins};
pub use geometry::{
    ChromeText, GeometryConfig, PageSize, PaperSize, DEFAULT_PAGE_PLACEHOLDER, MIN_CONTENT_AREA,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid metric {name}: {value}")]
    InvalidMetric { name: &'static str, value: f32 },
    #[error("Page placeholder must not be empty")]
    EmptyPlaceholder,
}

/// Complete configuration read at the start of every measurement pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    pub geometry: GeometryConfig,
    pub chrome: ChromeText,
}

impl PaginationConfig {
    /// Load a configuration from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject metrics that cannot describe a page
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.geometry.metrics() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMetric { name, value });
            }
        }
        if self.chrome.page_placeholder.is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        Ok(())
    }

    /// Produce the configuration that results from a setter command
    pub fn apply(&self, command: &ConfigCommand) -> Self {
        let mut next = self.clone();
        command.apply_to(&mut next);
        next
    }

    /// `--rm-*` custom properties the host writes onto the editor root
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let g = &self.geometry;
        let content_height =
            g.page_height - g.content_margin_top - g.content_margin_bottom - g.margin_top - g.margin_bottom;
        vec![
            ("--rm-page-content-height", px(content_height)),
            ("--rm-page-height", px(g.page_height)),
            ("--rm-page-header-height", px(g.header_height)),
            ("--rm-page-footer-height", px(g.footer_height)),
            ("--rm-max-content-child-height", px(content_height - 10.0)),
            ("--rm-margin-top", px(g.margin_top)),
            ("--rm-margin-bottom", px(g.margin_bottom)),
            ("--rm-margin-left", px(g.margin_left)),
            ("--rm-margin-right", px(g.margin_right)),
            ("--rm-content-margin-top", px(g.content_margin_top)),
            ("--rm-content-margin-bottom", px(g.content_margin_bottom)),
            ("--rm-page-gap-border-color", g.gap_border_color.clone()),
            ("--rm-page-width", px(g.page_width)),
        ]
    }
}

/// Format a pixel length the way CSS expects it
pub(crate) fn px(value: f32) -> String {
    format!("{}px", value)
}

/// Rules the overlay depends on: page numbering counters, hiding the trailing
/// breaker's gap and header, and region placement.
///
/// Numbering starts at 1 on the first header and steps on every unit header,
/// so a footer reads the page it closes and a unit header the page it opens.
/// The hidden trailing header does not count.
pub const PAGINATION_STYLESHEET: &str = "\
.rm-with-pagination { counter-reset: page-number 1; }
.rm-with-pagination .rm-first-page-header { counter-reset: page-number 1; }
.rm-with-pagination .rm-page-header { counter-increment: page-number; }
.rm-with-pagination .rm-page-number::before { content: counter(page-number); }
.rm-with-pagination .rm-page-break:last-child .rm-pagination-gap { display: none; }
.rm-with-pagination .rm-page-break:last-child .rm-page-header { display: none; }
.rm-with-pagination .rm-pagination-gap { border-top: 1px solid; border-bottom: 1px solid; border-color: var(--rm-page-gap-border-color); }
.rm-with-pagination .rm-page-header-left, .rm-with-pagination .rm-page-footer-left { float: left; margin-left: var(--rm-margin-left); }
.rm-with-pagination .rm-page-header-right, .rm-with-pagination .rm-page-footer-right { float: right; margin-right: var(--rm-margin-right); }
.rm-with-pagination .rm-first-page-header { display: inline-flex; justify-content: space-between; width: 100%; }
.rm-with-pagination .rm-page-header, .rm-with-pagination .rm-first-page-header { margin-bottom: var(--rm-content-margin-top) !important; margin-top: var(--rm-margin-top) !important; }
.rm-with-pagination .rm-page-footer { margin-top: var(--rm-content-margin-bottom) !important; margin-bottom: var(--rm-margin-bottom) !important; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::render::{build_overlay, OverlayElement, OverlayNode, FIRST_HEADER_CLASS};

    const REGIONS: [&str; 3] = ["rm-page-footer", "rm-page-header", FIRST_HEADER_CLASS];

    /// Value a stylesheet rule assigns `property` for elements carrying `class`
    fn counter_rule(property: &str, class: &str) -> Option<i32> {
        PAGINATION_STYLESHEET.lines().find_map(|line| {
            let (selectors, body) = line.split_once('{')?;
            let targets_class = selectors
                .split(',')
                .filter_map(|s| s.split_whitespace().last())
                .any(|s| s.strip_prefix('.') == Some(class));
            let (_, value) = body.split_once(&format!("{}:", property))?;
            if !targets_class {
                return None;
            }
            let mut words = value
                .trim_end_matches(|c: char| c == '}' || c == ';' || c.is_whitespace())
                .split_whitespace();
            let default = if property == "counter-reset" { 0 } else { 1 };
            match (words.next(), words.next()) {
                (Some("page-number"), Some(n)) => n.parse().ok(),
                (Some("page-number"), None) => Some(default),
                _ => None,
            }
        })
    }

    /// Evaluate the page-number counter over `element` in document order,
    /// recording the value each marker would display
    fn number(
        element: &OverlayElement,
        trailing: bool,
        counter: &mut i32,
        region: &'static str,
        out: &mut Vec<(&'static str, i32)>,
    ) {
        // The trailing unit's header is display: none and never counts
        if trailing && element.has_class("rm-page-header") {
            return;
        }
        for class in &element.classes {
            if let Some(value) = counter_rule("counter-reset", class) {
                *counter = value;
            }
            if let Some(step) = counter_rule("counter-increment", class) {
                *counter += step;
            }
        }
        let region = element
            .classes
            .iter()
            .copied()
            .find(|c| REGIONS.contains(c))
            .unwrap_or(region);
        for node in &element.children {
            match node {
                OverlayNode::Element(child) => number(child, trailing, counter, region, out),
                OverlayNode::PageNumber => out.push((region, *counter)),
                OverlayNode::Text(_) => {}
            }
        }
    }

    fn displayed_numbers(fragments: &[&OverlayElement]) -> Vec<(&'static str, i32)> {
        let mut counter = counter_rule("counter-reset", "rm-with-pagination").unwrap();
        let mut out = Vec::new();
        for fragment in fragments {
            if fragment.has_class(FIRST_HEADER_CLASS) {
                number(fragment, false, &mut counter, "", &mut out);
                continue;
            }
            let units: Vec<_> = fragment.elements().collect();
            for (i, unit) in units.iter().enumerate() {
                number(unit, i + 1 == units.len(), &mut counter, "", &mut out);
            }
        }
        out
    }

    #[test]
    fn test_counter_steps_on_headers_only() {
        assert_eq!(counter_rule("counter-increment", "rm-page-header"), Some(1));
        assert_eq!(counter_rule("counter-increment", "rm-page-footer"), None);
        assert_eq!(counter_rule("counter-increment", FIRST_HEADER_CLASS), None);
        assert_eq!(counter_rule("counter-reset", FIRST_HEADER_CLASS), Some(1));
    }

    #[test]
    fn test_page_numbers_in_headers_and_footers() {
        let mut config = PaginationConfig::default();
        config.chrome.header_right = "H{page}".to_string();
        let overlay = build_overlay(&Document::new(), &config, 3);

        let expected = vec![
            ("rm-page-footer", 1),
            ("rm-page-header", 2),
            ("rm-page-footer", 2),
            ("rm-page-header", 3),
            ("rm-page-footer", 3),
            (FIRST_HEADER_CLASS, 1),
        ];
        assert_eq!(displayed_numbers(&overlay.in_insertion_order()), expected);

        // A host that puts the first header ahead still numbers correctly
        let mut reversed = displayed_numbers(&[&overlay.first_header, &overlay.pages]);
        reversed.rotate_left(1);
        assert_eq!(reversed, expected);
    }

    #[test]
    fn test_from_json_partial() {
        let config = PaginationConfig::from_json(
            r#"{"geometry": {"pageHeight": 1000, "pageGap": 20}, "chrome": {"headerRight": "Draft"}}"#,
        )
        .unwrap();
        assert_eq!(config.geometry.page_height, 1000.0);
        assert_eq!(config.geometry.page_gap, 20.0);
        assert_eq!(config.geometry.header_height, 30.0);
        assert_eq!(config.chrome.header_right, "Draft");
        assert_eq!(config.chrome.footer_right, "{page}");
    }

    #[test]
    fn test_from_json_rejects_negative_metric() {
        let err = PaginationConfig::from_json(r#"{"geometry": {"marginTop": -4}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidMetric { name: "marginTop", .. }
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            PaginationConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_empty_placeholder_rejected() {
        let mut config = PaginationConfig::default();
        config.chrome.page_placeholder.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPlaceholder)));
    }

    #[test]
    fn test_css_variables() {
        let vars = PaginationConfig::default().css_variables();
        let lookup = |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(lookup("--rm-page-content-height").as_deref(), Some("740px"));
        assert_eq!(lookup("--rm-max-content-child-height").as_deref(), Some("730px"));
        assert_eq!(lookup("--rm-page-width").as_deref(), Some("789px"));
        assert_eq!(lookup("--rm-page-gap-border-color").as_deref(), Some("#e5e5e5"));
    }
}
