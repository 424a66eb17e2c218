//! Editing model: transactions and their annotations

mod transaction;

pub use transaction::{
    current_timestamp, MarkerKey, Step, SyncMarker, Transaction, TransitionResult,
};
