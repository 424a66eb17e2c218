//! Render output: overlay tree, markup and diff protocol

mod diff;
mod html;
mod overlay;

pub use diff::{DiffEngine, RenderDiff, RenderPatch};
pub use html::escape_text;
pub use overlay::{
    build_overlay, substitute_placeholder, OverlayBuilder, OverlayElement, OverlayNode,
    OverlayTree, BREAKER_CLASS, FIRST_HEADER_CLASS, PAGE_BREAK_CLASS, PAGE_NUMBER_CLASS,
    PAGINATION_ATTR,
};
