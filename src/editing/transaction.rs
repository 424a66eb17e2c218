//! Transactions and transition results

use crate::document::NodeKind;
use smallvec::SmallVec;

/// Annotation keys carried by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKey {
    /// Page count changed out of band; notification only
    PageCount,
    /// Header or footer content was replaced
    HeaderFooter,
    /// Configuration was replaced by a setter command
    Config,
}

impl MarkerKey {
    /// Whether this marker forces an overlay rebuild regardless of measurements
    pub fn forces_rebuild(self) -> bool {
        matches!(self, MarkerKey::HeaderFooter | MarkerKey::Config)
    }
}

/// A synchronization marker attached to a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMarker {
    pub key: MarkerKey,
    /// Milliseconds since the epoch when the marker was set
    pub stamp: u64,
}

impl SyncMarker {
    pub fn new(key: MarkerKey) -> Self {
        Self {
            key,
            stamp: current_timestamp(),
        }
    }
}

/// A single change to the top-level node sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Insert a node before `index` (`index == len` appends)
    Insert { index: usize, node: NodeKind },
    /// Replace the node at `index`
    Replace { index: usize, node: NodeKind },
    /// Remove the node at `index`
    Remove { index: usize },
    /// Replace the text of the body block at `index`
    SetText { index: usize, text: String },
}

/// An atomic state transition: zero or more steps plus annotations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub steps: Vec<Step>,
    pub markers: SmallVec<[SyncMarker; 2]>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transaction that changes nothing and only announces an out-of-band
    /// page count change
    pub fn resync() -> Self {
        Self::new().with_marker(MarkerKey::PageCount)
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_marker(mut self, key: MarkerKey) -> Self {
        self.markers.push(SyncMarker::new(key));
        self
    }

    pub fn marker(&self, key: MarkerKey) -> Option<&SyncMarker> {
        self.markers.iter().find(|m| m.key == key)
    }

    pub fn has_marker(&self, key: MarkerKey) -> bool {
        self.marker(key).is_some()
    }

    /// Whether any marker requires a rebuild
    pub fn forces_rebuild(&self) -> bool {
        self.markers.iter().any(|m| m.key.forces_rebuild())
    }

    /// Whether the transaction carries document changes
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }
}

/// Result of applying a transaction to a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionResult {
    /// Document version after the transition
    pub version: u64,
    /// Whether the node sequence changed
    pub doc_changed: bool,
    /// Markers carried over from the transaction
    pub markers: SmallVec<[SyncMarker; 2]>,
}

impl TransitionResult {
    pub fn forces_rebuild(&self) -> bool {
        self.markers.iter().any(|m| m.key.forces_rebuild())
    }

    pub fn has_marker(&self, key: MarkerKey) -> bool {
        self.markers.iter().any(|m| m.key == key)
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
