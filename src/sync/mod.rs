//! Resync controller
//!
//! Keeps the installed overlay consistent with the document and the host's
//! measured geometry. Two kinds of signals drive it: document transitions and
//! out-of-band reflow observations (font or image loads, viewport resizes).
//!
//! ```text
//!   Stable ──trigger──▶ Measuring ──no change──▶ Stable
//!                          │  ▲
//!                 change   │  └── snapshot not measurable or stale (deferred)
//!                          ▼
//!                     Reconciling ──overlay installed──▶ Stable
//! ```

use crate::config::PaginationConfig;
use crate::document::Document;
use crate::editing::{Transaction, TransitionResult};
use crate::layout::{Measurement, PageEstimate, RenderSnapshot};
use crate::render::{OverlayBuilder, OverlayTree};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResyncState {
    #[default]
    Stable,
    /// Waiting for a usable measurement
    Measuring,
    /// Building and installing a new overlay
    Reconciling,
}

/// What woke the controller up
#[derive(Debug, Clone, Copy)]
pub enum Trigger<'a> {
    /// A document transition was applied
    Transition(&'a TransitionResult),
    /// The host reported a layout change the document cannot see
    ExternalReflow,
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ResyncOutcome {
    /// Installed overlay still matches
    Stable,
    /// No usable measurement; nothing was installed
    Deferred,
    /// A new overlay was installed. For reflow triggers `resync` carries the
    /// marker-only transaction the caller must dispatch.
    Rebuilt {
        page_count: usize,
        resync: Option<Transaction>,
    },
}

/// Inputs of the installed overlay, compared on every pass
#[derive(Debug, Clone)]
struct InstalledBuild {
    page_count: usize,
    config: PaginationConfig,
    header_text: Option<String>,
    footer_text: Option<String>,
    overlay: OverlayTree,
}

impl InstalledBuild {
    fn new(doc: &Document, config: &PaginationConfig, page_count: usize) -> Self {
        Self {
            page_count,
            config: config.clone(),
            header_text: doc.header_text(),
            footer_text: doc.footer_text(),
            overlay: OverlayBuilder::new(doc, config).build(page_count),
        }
    }

    fn is_current(&self, doc: &Document, config: &PaginationConfig) -> bool {
        self.config == *config
            && self.header_text == doc.header_text()
            && self.footer_text == doc.footer_text()
    }
}

#[derive(Debug, Default)]
pub struct ResyncController {
    state: ResyncState,
    installed: Option<InstalledBuild>,
    /// A forcing marker arrived and has not been honored yet
    pending_rebuild: bool,
    host_min_height: Option<f32>,
    rebuilds: u64,
}

impl ResyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ResyncState {
        self.state
    }

    pub fn page_count(&self) -> usize {
        self.installed.as_ref().map_or(1, |b| b.page_count)
    }

    pub fn overlay(&self) -> Option<&OverlayTree> {
        self.installed.as_ref().map(|b| &b.overlay)
    }

    pub fn has_pending_rebuild(&self) -> bool {
        self.pending_rebuild
    }

    /// Host height measured against the installed overlay
    pub fn host_min_height(&self) -> Option<f32> {
        self.host_min_height
    }

    /// Number of overlays installed so far
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Install the initial single-page overlay, before anything is rendered
    pub fn init(&mut self, doc: &Document, config: &PaginationConfig) -> &OverlayTree {
        self.state = ResyncState::Stable;
        self.install(doc, config, 1)
    }

    pub fn on_transition(
        &mut self,
        result: &TransitionResult,
        doc: &Document,
        config: &PaginationConfig,
        snapshot: Option<&RenderSnapshot>,
    ) -> ResyncOutcome {
        self.reconcile(Trigger::Transition(result), doc, config, snapshot)
    }

    pub fn on_external_reflow(
        &mut self,
        doc: &Document,
        config: &PaginationConfig,
        snapshot: &RenderSnapshot,
    ) -> ResyncOutcome {
        self.reconcile(Trigger::ExternalReflow, doc, config, Some(snapshot))
    }

    /// Run one measuring pass and rebuild the overlay if anything it depends on moved
    pub fn reconcile(
        &mut self,
        trigger: Trigger<'_>,
        doc: &Document,
        config: &PaginationConfig,
        snapshot: Option<&RenderSnapshot>,
    ) -> ResyncOutcome {
        self.state = ResyncState::Measuring;
        if let Trigger::Transition(result) = trigger {
            if result.forces_rebuild() {
                self.pending_rebuild = true;
            }
        }

        let Some(snapshot) = snapshot else {
            log::debug!("no snapshot observed yet, deferring");
            return ResyncOutcome::Deferred;
        };
        let measurement = Measurement::take(snapshot, &config.geometry);
        let installed_count = self.installed.as_ref().map(|b| b.page_count);

        let count = match measurement.estimate {
            PageEstimate::Deferred => return ResyncOutcome::Deferred,
            PageEstimate::Measured { rendered, .. }
                if installed_count.is_some_and(|installed| installed != rendered) =>
            {
                log::debug!(
                    "snapshot shows {} page(s) but {:?} are installed, deferring",
                    rendered,
                    installed_count
                );
                return ResyncOutcome::Deferred;
            }
            PageEstimate::Fallback(count) => count,
            PageEstimate::Measured { count, .. } => {
                self.host_min_height = measurement.boundary.host_min_height;
                count
            }
        };

        let unchanged = self
            .installed
            .as_ref()
            .is_some_and(|b| b.page_count == count && b.is_current(doc, config));
        if unchanged && !self.pending_rebuild {
            self.state = ResyncState::Stable;
            return ResyncOutcome::Stable;
        }

        self.state = ResyncState::Reconciling;
        log::info!(
            "rebuilding overlay: {:?} -> {} page(s){}",
            installed_count,
            count,
            if self.pending_rebuild { " (forced)" } else { "" }
        );
        self.install(doc, config, count);

        let resync = match trigger {
            Trigger::ExternalReflow => Some(Transaction::resync()),
            Trigger::Transition(_) => None,
        };
        self.state = ResyncState::Stable;
        ResyncOutcome::Rebuilt {
            page_count: count,
            resync,
        }
    }

    fn install(&mut self, doc: &Document, config: &PaginationConfig, page_count: usize) -> &OverlayTree {
        self.pending_rebuild = false;
        self.rebuilds += 1;
        &self
            .installed
            .insert(InstalledBuild::new(doc, config, page_count))
            .overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::MarkerKey;
    use crate::layout::RenderedElement;
    use crate::render::{BREAKER_CLASS, PAGINATION_ATTR};
    use crate::Rect;

    /// Host with `rendered` page-break units and body content ending at `content_bottom`
    fn snapshot(rendered: Option<usize>, content_bottom: f32) -> RenderSnapshot {
        let mut root = RenderedElement::new("div").with_bounds(Rect::new(0.0, 0.0, 789.0, 0.0));
        if let Some(pages) = rendered {
            let mut overlay = RenderedElement::new("div").with_attr(PAGINATION_ATTR, "true");
            for i in 0..pages {
                let bottom = 800.0 + i as f32 * 850.0;
                overlay = overlay.with_child(
                    RenderedElement::new("div").with_class("rm-page-break").with_child(
                        RenderedElement::new("div")
                            .with_class(BREAKER_CLASS)
                            .with_bounds(Rect::new(0.0, bottom - 60.0, 789.0, 60.0)),
                    ),
                );
            }
            root = root.with_child(overlay);
        }
        root = root.with_child(
            RenderedElement::new("p").with_bounds(Rect::new(0.0, content_bottom - 20.0, 689.0, 20.0)),
        );
        RenderSnapshot {
            attached: true,
            client_width: 789.0,
            scroll_height: content_bottom,
            root,
        }
    }

    fn setup() -> (ResyncController, Document, PaginationConfig) {
        let doc = Document::new();
        let config = PaginationConfig::default();
        let mut controller = ResyncController::new();
        controller.init(&doc, &config);
        (controller, doc, config)
    }

    #[test]
    fn test_init_installs_one_page() {
        let (controller, _, _) = setup();
        assert_eq!(controller.page_count(), 1);
        assert_eq!(controller.overlay().map(OverlayTree::page_count), Some(1));
        assert_eq!(controller.state(), ResyncState::Stable);
        assert_eq!(controller.rebuilds(), 1);
    }

    #[test]
    fn test_unchanged_measurement_is_stable() {
        let (mut controller, doc, config) = setup();
        let outcome = controller.on_external_reflow(&doc, &config, &snapshot(Some(1), 700.0));
        assert_eq!(outcome, ResyncOutcome::Stable);
        assert_eq!(controller.state(), ResyncState::Stable);
        assert_eq!(controller.host_min_height(), Some(800.0));
        assert_eq!(controller.rebuilds(), 1);
    }

    #[test]
    fn test_reflow_growth_rebuilds_with_resync() {
        let (mut controller, doc, config) = setup();
        let outcome = controller.on_external_reflow(&doc, &config, &snapshot(Some(1), 1000.0));
        match outcome {
            ResyncOutcome::Rebuilt { page_count, resync } => {
                assert_eq!(page_count, 2);
                let resync = resync.expect("reflow rebuild synthesizes a transition");
                assert!(!resync.has_steps());
                assert!(resync.has_marker(MarkerKey::PageCount));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(controller.page_count(), 2);
        assert_eq!(controller.state(), ResyncState::Stable);
    }

    #[test]
    fn test_synthesized_resync_does_not_recurse() {
        let (mut controller, mut doc, config) = setup();
        let stale = snapshot(Some(1), 1000.0);
        let resync = match controller.on_external_reflow(&doc, &config, &stale) {
            ResyncOutcome::Rebuilt { resync: Some(tx), .. } => tx,
            other => panic!("unexpected outcome {:?}", other),
        };

        let result = doc.apply(&resync);
        assert!(!result.doc_changed);
        let outcome = controller.on_transition(&result, &doc, &config, Some(&stale));
        assert_eq!(outcome, ResyncOutcome::Deferred);
        assert_eq!(controller.rebuilds(), 2);

        // Once the host renders the new overlay the loop settles
        let fresh = snapshot(Some(2), 1000.0);
        let outcome = controller.on_external_reflow(&doc, &config, &fresh);
        assert_eq!(outcome, ResyncOutcome::Stable);
    }

    #[test]
    fn test_transition_rebuild_has_no_resync() {
        let (mut controller, mut doc, config) = setup();
        let result = doc.apply(&doc.set_header_content("Draft v1"));
        let outcome = controller.on_transition(&result, &doc, &config, Some(&snapshot(Some(1), 700.0)));
        assert_eq!(
            outcome,
            ResyncOutcome::Rebuilt {
                page_count: 1,
                resync: None
            }
        );
        let header = controller
            .overlay()
            .and_then(|o| o.first_header.find_class("rm-first-page-header-right"))
            .map(|e| e.text_content());
        assert_eq!(header.as_deref(), Some("Draft v1"));
    }

    #[test]
    fn test_forced_marker_rebuilds_even_without_delta() {
        let (mut controller, mut doc, config) = setup();
        let tx = doc.set_header_content("Same");
        let result = doc.apply(&tx);
        controller.on_transition(&result, &doc, &config, Some(&snapshot(Some(1), 700.0)));
        let rebuilds = controller.rebuilds();

        let result = doc.apply(&doc.set_header_content("Same"));
        let outcome = controller.on_transition(&result, &doc, &config, Some(&snapshot(Some(1), 700.0)));
        assert!(matches!(outcome, ResyncOutcome::Rebuilt { page_count: 1, .. }));
        assert_eq!(controller.rebuilds(), rebuilds + 1);
    }

    #[test]
    fn test_config_change_rebuilds() {
        let (mut controller, doc, config) = setup();
        let mut changed = config.clone();
        changed.geometry.page_gap = 20.0;
        let outcome = controller.on_external_reflow(&doc, &changed, &snapshot(Some(1), 700.0));
        assert!(matches!(outcome, ResyncOutcome::Rebuilt { page_count: 1, .. }));
    }

    #[test]
    fn test_unmeasurable_host_defers_and_keeps_pending() {
        let (mut controller, mut doc, config) = setup();
        let result = doc.apply(&doc.set_footer_content("Footer"));
        let detached = RenderSnapshot::default();
        let outcome = controller.on_transition(&result, &doc, &config, Some(&detached));
        assert_eq!(outcome, ResyncOutcome::Deferred);
        assert_eq!(controller.state(), ResyncState::Measuring);
        assert!(controller.has_pending_rebuild());

        let outcome = controller.on_external_reflow(&doc, &config, &snapshot(Some(1), 700.0));
        assert!(matches!(outcome, ResyncOutcome::Rebuilt { page_count: 1, .. }));
        assert!(!controller.has_pending_rebuild());
    }

    #[test]
    fn test_missing_snapshot_defers() {
        let (mut controller, mut doc, config) = setup();
        let result = doc.apply(&Transaction::resync());
        assert_eq!(
            controller.on_transition(&result, &doc, &config, None),
            ResyncOutcome::Deferred
        );
    }

    #[test]
    fn test_no_overlay_falls_back_to_scroll_height() {
        let (mut controller, doc, config) = setup();
        let outcome = controller.on_external_reflow(&doc, &config, &snapshot(None, 2000.0));
        assert!(matches!(outcome, ResyncOutcome::Rebuilt { page_count: 3, .. }));
    }
}
