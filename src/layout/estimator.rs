//! Page count estimation from measured geometry
//!
//! The estimator compares where the content actually ends with where the last
//! rendered breaker bar ends:
//!
//! ```text
//! gap = last_content_bottom - last_breaker_bottom
//!
//!   gap > 0              grow by ceil(gap / content_area)
//!   to < gap < from      dead zone, keep the count
//!   gap < to             shrink by floor(gap / page_pitch) (a negative step)
//!   otherwise            keep the count
//! ```
//!
//! The dead zone absorbs sub-pixel differences when content sits right at a
//! page boundary, so one pass can never undo what the previous pass did.

use super::boundary::ContentBoundary;
use super::snapshot::RenderSnapshot;
use crate::config::GeometryConfig;

/// Upper bound on pages produced by a single estimate
pub const MAX_PAGE_COUNT: usize = 10_000;

/// The band of non-positive gaps in which the page count is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    /// Upper edge, just below zero (one header height)
    pub from: f32,
    /// Lower edge, roughly one page below `from`
    pub to: f32,
}

impl Hysteresis {
    pub fn for_geometry(geometry: &GeometryConfig) -> Self {
        let from = -geometry.header_height.max(0.0);
        let to = -(geometry.page_height - from.abs());
        Self {
            from,
            to: to.min(from),
        }
    }

    /// Whether `gap` lies strictly inside the dead zone
    pub fn holds(&self, gap: f32) -> bool {
        gap > self.to && gap < self.from
    }
}

fn clamp_count(count: i64) -> usize {
    if count > MAX_PAGE_COUNT as i64 {
        log::warn!("estimated {} pages, capping at {}", count, MAX_PAGE_COUNT);
        MAX_PAGE_COUNT
    } else {
        count.max(1) as usize
    }
}

/// New page count from the last content bottom and last breaker bottom.
///
/// Non-finite measurements leave `current` unchanged.
pub fn estimate(
    content_bottom: f32,
    breaker_bottom: f32,
    current: usize,
    geometry: &GeometryConfig,
) -> usize {
    let gap = content_bottom - breaker_bottom;
    if !gap.is_finite() {
        return current.max(1);
    }
    let current = current as i64;

    if gap > 0.0 {
        let added = (gap / geometry.content_area_height()).ceil() as i64;
        return clamp_count(current + added);
    }

    let band = Hysteresis::for_geometry(geometry);
    if band.holds(gap) {
        return clamp_count(current);
    }
    if gap < band.to {
        let removed = (gap / geometry.page_pitch()).floor() as i64;
        return clamp_count(current + removed);
    }
    clamp_count(current)
}

/// First-measurement estimate when no overlay is rendered yet
pub fn estimate_from_scroll_height(scroll_height: f32, geometry: &GeometryConfig) -> usize {
    if !scroll_height.is_finite() || scroll_height <= 0.0 {
        return 1;
    }
    clamp_count((scroll_height / geometry.content_area_height()).ceil() as i64)
}

/// Outcome of estimating a page count from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEstimate {
    /// Host not attached or not laid out; try again on the next tick
    Deferred,
    /// No overlay rendered; estimated from the host's scroll height
    Fallback(usize),
    /// Estimated against a rendered overlay of `rendered` pages
    Measured { rendered: usize, count: usize },
}

impl PageEstimate {
    pub fn count(&self) -> Option<usize> {
        match *self {
            PageEstimate::Deferred => None,
            PageEstimate::Fallback(count) | PageEstimate::Measured { count, .. } => Some(count),
        }
    }
}

/// A resolved boundary together with the estimate derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub boundary: ContentBoundary,
    pub estimate: PageEstimate,
}

impl Measurement {
    pub fn take(snapshot: &RenderSnapshot, geometry: &GeometryConfig) -> Self {
        if !snapshot.is_measurable() {
            log::debug!(
                "host not measurable (attached: {}, width: {}), deferring",
                snapshot.attached,
                snapshot.client_width
            );
            return Self {
                boundary: ContentBoundary::default(),
                estimate: PageEstimate::Deferred,
            };
        }

        let boundary = ContentBoundary::resolve(snapshot);
        let estimate = match boundary.rendered_pages {
            None => PageEstimate::Fallback(estimate_from_scroll_height(
                snapshot.scroll_height,
                geometry,
            )),
            Some(rendered) => {
                let count = match (boundary.last_content_bottom, boundary.last_breaker_bottom) {
                    (Some(content), Some(breaker)) => {
                        estimate(content, breaker, rendered, geometry)
                    }
                    _ => 1,
                };
                PageEstimate::Measured { rendered, count }
            }
        };
        log::debug!("measured {:?}", estimate);

        Self { boundary, estimate }
    }
}
