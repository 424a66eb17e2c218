//! Measured render tree, as posted by the host adapter after a layout pass

use crate::Rect;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One rendered element with its border box in viewport coordinates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedElement {
    pub tag: String,
    pub attributes: FxHashMap<String, String>,
    pub classes: Vec<String>,
    pub bounds: Rect,
    pub children: Vec<RenderedElement>,
}

impl RenderedElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_child(mut self, child: RenderedElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// First descendant (depth-first, excluding self) matching `pred`
    pub fn find_descendant(&self, pred: &impl Fn(&RenderedElement) -> bool) -> Option<&RenderedElement> {
        for child in &self.children {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }
}

/// The host element as measured after the browser's layout pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSnapshot {
    /// Whether the host element is attached to a live document
    pub attached: bool,
    pub client_width: f32,
    pub scroll_height: f32,
    /// The host (editor root) element; its children are the top-level nodes
    pub root: RenderedElement,
}

impl RenderSnapshot {
    /// Geometry reads are only meaningful for an attached, laid-out host
    pub fn is_measurable(&self) -> bool {
        self.attached && self.client_width > 0.0 && self.scroll_height.is_finite()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
