//! Measurement: render snapshots, content boundaries and page count estimation

mod boundary;
mod estimator;
mod snapshot;

pub use boundary::{is_content_element, is_overlay_element, ContentBoundary};
pub use estimator::{
    estimate, estimate_from_scroll_height, Hysteresis, Measurement, PageEstimate, MAX_PAGE_COUNT,
};
pub use snapshot::{RenderSnapshot, RenderedElement};
