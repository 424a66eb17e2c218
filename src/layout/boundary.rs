//! Content boundary resolution
//!
//! The overlay and the hidden header/footer containers live in the same
//! rendered tree as the flowing content, so "where does the content end" has
//! to skip them explicitly.

use super::snapshot::{RenderSnapshot, RenderedElement};
use crate::document::{RegionKind, DATA_TYPE_ATTR};
use crate::render::{BREAKER_CLASS, FIRST_HEADER_CLASS, PAGINATION_ATTR};

/// Whether a top-level rendered element is overlay chrome
pub fn is_overlay_element(element: &RenderedElement) -> bool {
    element.has_attr(PAGINATION_ATTR) || element.has_class(FIRST_HEADER_CLASS)
}

/// Whether a top-level rendered element is flowing body content
pub fn is_content_element(element: &RenderedElement) -> bool {
    let is_region = element
        .attr(DATA_TYPE_ATTR)
        .and_then(RegionKind::from_data_type)
        .is_some();
    !is_region && !is_overlay_element(element)
}

/// Measured extents of content and overlay in one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBoundary {
    /// Page-break units in the rendered overlay; `None` when no overlay is attached
    pub rendered_pages: Option<usize>,
    /// Bottom edge of the last rendered breaker bar
    pub last_breaker_bottom: Option<f32>,
    /// Bottom edge of the last body content element
    pub last_content_bottom: Option<f32>,
    /// Minimum host height that keeps the last breaker inside the host
    pub host_min_height: Option<f32>,
}

impl ContentBoundary {
    pub fn resolve(snapshot: &RenderSnapshot) -> Self {
        let root = &snapshot.root;

        let overlay = root.children.iter().find(|e| e.has_attr(PAGINATION_ATTR));
        let last_content = root.children.iter().rev().find(|e| is_content_element(e));

        let last_breaker = overlay
            .and_then(|o| o.children.last())
            .and_then(|unit| unit.find_descendant(&|e: &RenderedElement| e.has_class(BREAKER_CLASS)));

        let boundary = Self {
            rendered_pages: overlay.map(|o| o.children.len()),
            last_breaker_bottom: last_breaker.map(|b| b.bounds.bottom()),
            last_content_bottom: last_content.map(|c| c.bounds.bottom()),
            host_min_height: last_breaker.map(|b| b.bounds.bottom() - root.bounds.y),
        };
        log::trace!("resolved content boundary {:?}", boundary);
        boundary
    }
}
