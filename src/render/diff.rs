//! Render diff protocol for incremental host updates

use crate::render::OverlayTree;

/// A single patch operation for the host adapter
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPatch {
    /// Swap the whole overlay (first-page header and page-break units)
    ReplaceOverlay { overlay: OverlayTree },
    /// Stretch the editable host so the last breaker stays inside it
    SetHostMinHeight { height: f32 },
    /// Set CSS custom properties on the host element
    UpdateCssVariables {
        variables: Vec<(&'static str, String)>,
    },
}

/// Complete render diff to send to the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderDiff {
    pub version: u64,
    pub patches: Vec<RenderPatch>,
}

impl RenderDiff {
    /// Create empty diff
    pub fn new(version: u64) -> Self {
        Self {
            version,
            patches: Vec::new(),
        }
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: RenderPatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// The overlay carried by this diff, if any
    pub fn overlay(&self) -> Option<&OverlayTree> {
        self.patches.iter().find_map(|patch| match patch {
            RenderPatch::ReplaceOverlay { overlay } => Some(overlay),
            _ => None,
        })
    }
}

/// Diff engine that remembers what the host was last told
#[derive(Debug, Default)]
pub struct DiffEngine {
    previous_version: u64,
    css_variables: Vec<(&'static str, String)>,
    host_min_height: Option<f32>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_version(&self) -> u64 {
        self.previous_version
    }

    /// Compute the patches needed to bring the host up to date.
    ///
    /// Variables go first so a replaced overlay is laid out with the new
    /// values; the host height follows the overlay.
    pub fn compute_diff(
        &mut self,
        version: u64,
        overlay: Option<&OverlayTree>,
        css_variables: Vec<(&'static str, String)>,
        host_min_height: Option<f32>,
    ) -> RenderDiff {
        let mut diff = RenderDiff::new(version);

        if css_variables != self.css_variables {
            diff.add_patch(RenderPatch::UpdateCssVariables {
                variables: css_variables.clone(),
            });
            self.css_variables = css_variables;
        }

        if let Some(overlay) = overlay {
            diff.add_patch(RenderPatch::ReplaceOverlay {
                overlay: overlay.clone(),
            });
        }

        if let Some(height) = host_min_height {
            if self.host_min_height != Some(height) {
                diff.add_patch(RenderPatch::SetHostMinHeight { height });
                self.host_min_height = Some(height);
            }
        }

        self.previous_version = version;
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaginationConfig;
    use crate::document::Document;
    use crate::render::build_overlay;

    #[test]
    fn test_render_diff() {
        let mut diff = RenderDiff::new(1);
        assert!(!diff.has_patches());

        diff.add_patch(RenderPatch::SetHostMinHeight { height: 800.0 });
        assert!(diff.has_patches());
        assert_eq!(diff.patch_count(), 1);
        assert!(diff.overlay().is_none());
    }

    #[test]
    fn test_engine_skips_unchanged_state() {
        let config = PaginationConfig::default();
        let overlay = build_overlay(&Document::new(), &config, 1);
        let mut engine = DiffEngine::new();

        let diff = engine.compute_diff(1, Some(&overlay), config.css_variables(), Some(800.0));
        assert_eq!(diff.patch_count(), 3);
        assert!(matches!(diff.patches[0], RenderPatch::UpdateCssVariables { .. }));
        assert_eq!(diff.overlay(), Some(&overlay));
        assert_eq!(
            diff.patches[2],
            RenderPatch::SetHostMinHeight { height: 800.0 }
        );

        let diff = engine.compute_diff(2, None, config.css_variables(), Some(800.0));
        assert!(!diff.has_patches());
        assert_eq!(engine.previous_version(), 2);

        let diff = engine.compute_diff(3, None, config.css_variables(), Some(1650.0));
        assert_eq!(
            diff.patches,
            vec![RenderPatch::SetHostMinHeight { height: 1650.0 }]
        );
    }
}
