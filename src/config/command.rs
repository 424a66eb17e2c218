//! Setter commands

use super::{PageSize, PaginationConfig};
use serde::{Deserialize, Serialize};

/// Outer page margins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Margins between the running header/footer and the content area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentMargins {
    pub top: f32,
    pub bottom: f32,
}

/// A configuration update. Each one produces a new [`PaginationConfig`] and
/// is followed by a marked transition so the overlay is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ConfigCommand {
    UpdatePageBreakBackground { color: String },
    UpdatePageSize { size: PageSize },
    UpdatePageHeight { height: f32 },
    UpdatePageWidth { width: f32 },
    UpdatePageGap { gap: f32 },
    UpdateMargins { margins: Margins },
    UpdateContentMargins { margins: ContentMargins },
    UpdateHeaderHeight { height: f32 },
    UpdateFooterHeight { height: f32 },
    UpdateHeaderContent { left: String, right: String },
    UpdateFooterContent { left: String, right: String },
}

impl ConfigCommand {
    pub(crate) fn apply_to(&self, config: &mut PaginationConfig) {
        let g = &mut config.geometry;
        match self {
            ConfigCommand::UpdatePageBreakBackground { color } => {
                g.gap_background = color.clone();
            }
            ConfigCommand::UpdatePageSize { size } => {
                g.page_height = size.page_height;
                g.page_width = size.page_width;
                g.margin_top = size.margin_top;
                g.margin_bottom = size.margin_bottom;
                g.margin_left = size.margin_left;
                g.margin_right = size.margin_right;
            }
            ConfigCommand::UpdatePageHeight { height } => g.page_height = *height,
            ConfigCommand::UpdatePageWidth { width } => g.page_width = *width,
            ConfigCommand::UpdatePageGap { gap } => g.page_gap = *gap,
            ConfigCommand::UpdateMargins { margins } => {
                g.margin_top = margins.top;
                g.margin_bottom = margins.bottom;
                g.margin_left = margins.left;
                g.margin_right = margins.right;
            }
            ConfigCommand::UpdateContentMargins { margins } => {
                g.content_margin_top = margins.top;
                g.content_margin_bottom = margins.bottom;
            }
            ConfigCommand::UpdateHeaderHeight { height } => g.header_height = *height,
            ConfigCommand::UpdateFooterHeight { height } => g.footer_height = *height,
            ConfigCommand::UpdateHeaderContent { left, right } => {
                config.chrome.header_left = left.clone();
                config.chrome.header_right = right.clone();
            }
            ConfigCommand::UpdateFooterContent { left, right } => {
                config.chrome.footer_left = left.clone();
                config.chrome.footer_right = right.clone();
            }
        }
    }
}
