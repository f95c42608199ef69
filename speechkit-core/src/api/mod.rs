//! Handle-level operations.
//!
//! Every function here takes the [`HandleTableManager`] to operate on and
//! speaks only in [`Handle`]s, which is what the C layer forwards. Required
//! input handles that do not resolve for their role are reported as
//! `InvalidArgument` before any object is built.

pub mod config;
pub mod conversation;
pub mod create;
pub mod properties;

pub use config::*;
pub use conversation::*;
pub use create::*;
pub use properties::*;

use std::sync::Arc;

use crate::error::{Result, SpeechKitError};
use crate::handles::{Handle, HandleTable, HandleTableManager, TableSnapshot};

/// Resolve a required input handle, mapping any lookup failure to
/// `InvalidArgument`.
pub(crate) fn require<T>(table: &HandleTable<T>, handle: Handle) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    table.resolve(handle).map_err(|_| {
        SpeechKitError::invalid_argument(format!("{handle} is not a valid {} handle", table.kind()))
    })
}

/// Counters for every live table.
pub fn handle_tables_snapshot(tables: &HandleTableManager) -> Vec<TableSnapshot> {
    tables.snapshot()
}

/// Drop every table and every object they track. Returns the number of
/// handles released.
pub fn term(tables: &HandleTableManager) -> usize {
    tables.term()
}
