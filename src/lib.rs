//! Page Overlay: pagination layout engine for flowing rich-text editors
//!
//! This crate turns a continuously flowing document into a paged presentation
//! without owning the document's layout:
//! - Page count estimation from measured geometry, with a hysteresis band so
//!   content sitting on a page boundary never oscillates
//! - A deterministic overlay of page-break units (spacers, running headers and
//!   footers, page numbers) rebuilt only when something it depends on moved
//! - A resync loop bridging document transitions and host reflow observations
//! - Singleton header/footer nodes holding the authoritative running text

pub mod config;
pub mod document;
pub mod editing;
pub mod layout;
pub mod render;
pub mod sync;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use config::{ChromeText, ConfigCommand, ConfigError, GeometryConfig, PaginationConfig, PaperSize};
pub use document::{Block, BlockKind, Document, RegionKind, RegionNode};
pub use editing::{MarkerKey, Step, Transaction, TransitionResult};
pub use layout::{ContentBoundary, Measurement, PageEstimate, RenderSnapshot, RenderedElement};
pub use render::{OverlayBuilder, OverlayTree, RenderDiff, RenderPatch};
pub use sync::{ResyncController, ResyncOutcome, ResyncState};

use render::DiffEngine;
use serde::{Deserialize, Serialize};

/// Border box of a rendered element, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// The paginator state combining all components
pub struct Paginator {
    pub document: Document,
    config: PaginationConfig,
    controller: ResyncController,
    diff_engine: DiffEngine,
    /// Last snapshot posted by the host
    snapshot: Option<RenderSnapshot>,
    /// Installed overlay not yet handed to the host
    overlay_dirty: bool,
}

impl Paginator {
    /// Create a paginator over an empty document
    pub fn new(config: PaginationConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    pub fn with_document(document: Document, config: PaginationConfig) -> Self {
        let mut controller = ResyncController::new();
        controller.init(&document, &config);
        Self {
            document,
            config,
            controller,
            diff_engine: DiffEngine::new(),
            snapshot: None,
            overlay_dirty: true,
        }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn page_count(&self) -> usize {
        self.controller.page_count()
    }

    pub fn state(&self) -> ResyncState {
        self.controller.state()
    }

    pub fn overlay(&self) -> Option<&OverlayTree> {
        self.controller.overlay()
    }

    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        self.config.css_variables()
    }

    pub fn host_min_height(&self) -> Option<f32> {
        self.controller.host_min_height()
    }

    /// Number of overlays installed since creation
    pub fn rebuilds(&self) -> u64 {
        self.controller.rebuilds()
    }

    /// Everything the host needs that it has not been sent yet
    pub fn pending_diff(&mut self) -> Option<RenderDiff> {
        let overlay = if self.overlay_dirty {
            self.controller.overlay()
        } else {
            None
        };
        let diff = self.diff_engine.compute_diff(
            self.document.version(),
            overlay,
            self.config.css_variables(),
            self.controller.host_min_height(),
        );
        self.overlay_dirty = false;
        diff.has_patches().then_some(diff)
    }

    /// Apply a transaction and reconcile against the last observed snapshot
    pub fn dispatch(&mut self, tx: &Transaction) -> Option<RenderDiff> {
        let result = self.document.apply(tx);
        let outcome = self.controller.on_transition(
            &result,
            &self.document,
            &self.config,
            self.snapshot.as_ref(),
        );
        self.finish(outcome)
    }

    /// Handle a host reflow observation
    pub fn on_external_reflow(&mut self, snapshot: RenderSnapshot) -> Option<RenderDiff> {
        let snapshot = self.snapshot.insert(snapshot);
        let outcome = self
            .controller
            .on_external_reflow(&self.document, &self.config, snapshot);

        if let ResyncOutcome::Rebuilt {
            resync: Some(tx), ..
        } = &outcome
        {
            // Let the document observe the rebuild; the stale snapshot keeps
            // the controller from measuring again.
            let result = self.document.apply(tx);
            let follow = self.controller.on_transition(
                &result,
                &self.document,
                &self.config,
                self.snapshot.as_ref(),
            );
            log::debug!("resync transition settled as {:?}", follow);
        }
        self.finish(outcome)
    }

    /// Apply a setter command; replaces the configuration wholesale
    pub fn apply_command(
        &mut self,
        command: &ConfigCommand,
    ) -> Result<Option<RenderDiff>, ConfigError> {
        self.set_config(self.config.apply(command))
    }

    /// Install a new configuration; a rejected one leaves the current in place
    pub fn set_config(
        &mut self,
        config: PaginationConfig,
    ) -> Result<Option<RenderDiff>, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self.dispatch(&Transaction::new().with_marker(MarkerKey::Config)))
    }

    pub fn set_header_content(&mut self, text: &str) -> Option<RenderDiff> {
        let tx = self.document.set_header_content(text);
        self.dispatch(&tx)
    }

    pub fn set_footer_content(&mut self, text: &str) -> Option<RenderDiff> {
        let tx = self.document.set_footer_content(text);
        self.dispatch(&tx)
    }

    fn finish(&mut self, outcome: ResyncOutcome) -> Option<RenderDiff> {
        if let ResyncOutcome::Rebuilt { .. } = outcome {
            self.overlay_dirty = true;
        }
        self.pending_diff()
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}
