//! Page geometry and static chrome text

use serde::{Deserialize, Serialize};

/// Smallest content area a page may report, in pixels
pub const MIN_CONTENT_AREA: f32 = 1.0;

/// Default page-number placeholder token
pub const DEFAULT_PAGE_PLACEHOLDER: &str = "{page}";

/// Page metrics consumed by measurement and overlay construction.
///
/// Replaced wholesale by setter commands, never patched field by field
/// while a measurement pass is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeometryConfig {
    pub page_height: f32,
    pub page_width: f32,
    pub page_gap: f32,
    pub page_gap_border_size: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub content_margin_top: f32,
    pub content_margin_bottom: f32,
    pub gap_background: String,
    pub gap_border_color: String,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            page_height: 800.0,
            page_width: 789.0,
            page_gap: 50.0,
            page_gap_border_size: 1.0,
            header_height: 30.0,
            footer_height: 30.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 50.0,
            margin_right: 50.0,
            content_margin_top: 10.0,
            content_margin_bottom: 10.0,
            gap_background: "#ffffff".to_string(),
            gap_border_color: "#e5e5e5".to_string(),
        }
    }
}

impl GeometryConfig {
    /// Space above the content area on every page
    pub fn header_allowance(&self) -> f32 {
        self.header_height + self.content_margin_top + self.margin_top
    }

    /// Space below the content area on every page
    pub fn footer_allowance(&self) -> f32 {
        self.footer_height + self.content_margin_bottom + self.margin_bottom
    }

    /// Vertical space per page available to flowing content.
    ///
    /// Never below [`MIN_CONTENT_AREA`], so a geometry whose allowances eat the
    /// whole page still yields a finite, positive page count.
    pub fn content_area_height(&self) -> f32 {
        let raw = self.page_height - self.header_allowance() - self.footer_allowance();
        if raw.is_finite() && raw >= MIN_CONTENT_AREA {
            raw
        } else {
            log::warn!(
                "content area {} px is not usable for page height {} px, clamping to {} px",
                raw,
                self.page_height,
                MIN_CONTENT_AREA
            );
            MIN_CONTENT_AREA
        }
    }

    /// Distance between the same point on two consecutive pages
    pub fn page_pitch(&self) -> f32 {
        (self.page_height + self.page_gap).max(MIN_CONTENT_AREA)
    }

    /// Height of a full breaker bar (footer, gap and header regions)
    pub fn breaker_height(&self) -> f32 {
        self.footer_allowance() + self.page_gap + self.header_allowance()
    }

    /// Numeric fields with their serialized names, for validation
    pub(crate) fn metrics(&self) -> [(&'static str, f32); 12] {
        [
            ("pageHeight", self.page_height),
            ("pageWidth", self.page_width),
            ("pageGap", self.page_gap),
            ("pageGapBorderSize", self.page_gap_border_size),
            ("headerHeight", self.header_height),
            ("footerHeight", self.footer_height),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
            ("contentMarginTop", self.content_margin_top),
            ("contentMarginBottom", self.content_margin_bottom),
        ]
    }
}

/// Static running header/footer strings used when the document carries no
/// header or footer node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromeText {
    pub header_left: String,
    pub header_right: String,
    pub footer_left: String,
    pub footer_right: String,
    pub page_placeholder: String,
}

impl Default for ChromeText {
    fn default() -> Self {
        Self {
            header_left: String::new(),
            header_right: String::new(),
            footer_left: String::new(),
            footer_right: DEFAULT_PAGE_PLACEHOLDER.to_string(),
            page_placeholder: DEFAULT_PAGE_PLACEHOLDER.to_string(),
        }
    }
}

/// Page size and outer margins, as set by `updatePageSize`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSize {
    pub page_height: f32,
    pub page_width: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

/// CSS pixels per inch
const PX_PER_INCH: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Portrait dimensions as (width, height) in millimetres
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
        }
    }

    /// Screen page size at 96 DPI with one-inch margins
    pub fn page_size(self) -> PageSize {
        let (w, h) = self.dimensions_mm();
        let to_px = |mm: f32| (mm / MM_PER_INCH * PX_PER_INCH).round();
        PageSize {
            page_height: to_px(h),
            page_width: to_px(w),
            margin_top: PX_PER_INCH,
            margin_bottom: PX_PER_INCH,
            margin_left: PX_PER_INCH,
            margin_right: PX_PER_INCH,
        }
    }
}
