//! WASM bindings for the host adapter
//!
//! Structured values cross the boundary as JSON strings: the adapter posts
//! render snapshots and setter commands, and receives patch batches back.

use crate::config::{ConfigCommand, PaginationConfig, PAGINATION_STYLESHEET};
use crate::layout::RenderSnapshot;
use crate::render::{RenderDiff, RenderPatch};
use crate::Paginator;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed paginator wrapper
#[wasm_bindgen]
pub struct WasmPaginator {
    paginator: Paginator,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator with default geometry
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            paginator: Paginator::default(),
        }
    }

    /// Create a paginator from a JSON configuration; missing fields take defaults
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmPaginator, JsValue> {
        let config = PaginationConfig::from_json(config_json).map_err(js_error)?;
        Ok(Self {
            paginator: Paginator::new(config),
        })
    }

    /// Patches not yet sent, as JSON (`null` when there are none)
    #[wasm_bindgen(js_name = pendingPatches)]
    pub fn pending_patches(&mut self) -> String {
        patches_json(self.paginator.pending_diff())
    }

    /// Report a host reflow; `snapshot_json` is a serialized render snapshot
    #[wasm_bindgen(js_name = onExternalReflow)]
    pub fn on_external_reflow(&mut self, snapshot_json: &str) -> Result<String, JsValue> {
        let snapshot = RenderSnapshot::from_json(snapshot_json).map_err(js_error)?;
        Ok(patches_json(self.paginator.on_external_reflow(snapshot)))
    }

    /// Apply a setter command such as `{"command": "updatePageGap", "gap": 20}`
    #[wasm_bindgen(js_name = applyCommand)]
    pub fn apply_command(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: ConfigCommand = serde_json::from_str(command_json).map_err(js_error)?;
        let diff = self.paginator.apply_command(&command).map_err(js_error)?;
        Ok(patches_json(diff))
    }

    #[wasm_bindgen(js_name = setHeaderContent)]
    pub fn set_header_content(&mut self, text: &str) -> String {
        patches_json(self.paginator.set_header_content(text))
    }

    #[wasm_bindgen(js_name = setFooterContent)]
    pub fn set_footer_content(&mut self, text: &str) -> String {
        patches_json(self.paginator.set_footer_content(text))
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.paginator.page_count()
    }

    #[wasm_bindgen(js_name = getHeaderText)]
    pub fn get_header_text(&self) -> Option<String> {
        self.paginator.document.header_text()
    }

    #[wasm_bindgen(js_name = getFooterText)]
    pub fn get_footer_text(&self) -> Option<String> {
        self.paginator.document.footer_text()
    }

    /// Markup of the installed overlay as a JSON array, in insertion order
    #[wasm_bindgen(js_name = getOverlayFragments)]
    pub fn get_overlay_fragments(&self) -> String {
        let fragments = self
            .paginator
            .overlay()
            .map(|o| o.fragments())
            .unwrap_or_default();
        serde_json::to_string(&fragments).unwrap_or_default()
    }

    /// Markup of the hidden header node, for persisting the document
    #[wasm_bindgen(js_name = getHeaderNodeHtml)]
    pub fn get_header_node_html(&self) -> Option<String> {
        self.paginator.document.header().map(|h| h.to_html())
    }

    #[wasm_bindgen(js_name = getFooterNodeHtml)]
    pub fn get_footer_node_html(&self) -> Option<String> {
        self.paginator.document.footer().map(|f| f.to_html())
    }

    #[wasm_bindgen(js_name = getHostMinHeight)]
    pub fn get_host_min_height(&self) -> Option<f32> {
        self.paginator.host_min_height()
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> String {
        serde_json::to_string(self.paginator.config()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = getStylesheet)]
    pub fn get_stylesheet() -> String {
        PAGINATION_STYLESHEET.to_string()
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable patch for JS
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PatchData {
    /// `fragments` go ahead of the content in the order given: the
    /// page-break container, then the first-page header
    #[serde(rename_all = "camelCase")]
    ReplaceOverlay {
        page_count: usize,
        fragments: Vec<String>,
    },
    SetHostMinHeight { height: f32 },
    UpdateCssVariables { variables: Vec<(String, String)> },
}

impl From<&RenderPatch> for PatchData {
    fn from(patch: &RenderPatch) -> Self {
        match patch {
            RenderPatch::ReplaceOverlay { overlay } => PatchData::ReplaceOverlay {
                page_count: overlay.page_count(),
                fragments: overlay.fragments(),
            },
            RenderPatch::SetHostMinHeight { height } => {
                PatchData::SetHostMinHeight { height: *height }
            }
            RenderPatch::UpdateCssVariables { variables } => PatchData::UpdateCssVariables {
                variables: variables
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
            },
        }
    }
}

/// Serializable patch batch for JS
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBatch {
    pub version: u64,
    pub patches: Vec<PatchData>,
}

impl From<&RenderDiff> for PatchBatch {
    fn from(diff: &RenderDiff) -> Self {
        Self {
            version: diff.version,
            patches: diff.patches.iter().map(PatchData::from).collect(),
        }
    }
}

fn patches_json(diff: Option<RenderDiff>) -> String {
    match diff {
        Some(diff) => serde_json::to_string(&PatchBatch::from(&diff)).unwrap_or_else(|e| {
            log::error!("failed to serialize patches: {}", e);
            "null".to_string()
        }),
        None => "null".to_string(),
    }
}
