//! Descriptor implemented by every persisted record type.

use serde::Serialize;

use crate::result::AppResult;
use crate::types::column::Column;
use crate::types::value::FieldValue;

/// A row type stored in one table.
///
/// The descriptor is all the generic repository engine needs: where the
/// rows live, what their columns are, and which values an insert writes.
pub trait Entity: Serialize + Send + Sync + Unpin + 'static {
    /// The table's column enumeration.
    type Column: Column;

    /// Table name.
    const TABLE: &'static str;

    /// Human-readable name used in messages, e.g. `"Facility"`.
    const LABEL: &'static str;

    /// Every writable column with this record's value, in column order.
    /// Storage-assigned columns (`id`, `created_at`, `updated_at`) are omitted.
    fn insert_values(&self) -> Vec<(Self::Column, FieldValue)>;

    /// Domain checks run before the record is written.
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }
}
