//! `SET` clause generation for partial updates.
//!
//! A partial update touches only the fields the client sent. The builder turns
//! the ordered changes into `"col"=$1, "col2"=$2, ...` and returns the values in
//! the same order, ready for positional binding.
//!
//! The caller owns the rest of the statement:
//!
//! ```ignore
//! let set = sql_for_partial_update(&changes, &columns)?;
//! let sql = format!(
//!     "UPDATE companies SET {} WHERE handle = ${}",
//!     set.clause,
//!     set.next_placeholder(),
//! );
//! // bind set.values, then the handle
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::field_map::{ColumnMap, FieldMap};
use crate::value::FieldValue;
use tokio_postgres::types::ToSql;

/// The `SET` fragment of an update statement and its parameters.
///
/// `values[i]` binds to placeholder `$i+1` in `clause`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub clause: String,
    pub values: Vec<FieldValue>,
}

impl PartialUpdate {
    /// Number of placeholders used by the clause.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first placeholder free for the caller's WHERE clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Values as parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}

/// Build the `SET` clause for the fields present in `data`.
///
/// Column names come from `columns`, falling back to the field name. Fails
/// with [`JoblyError::BadRequest`] when `data` is empty.
pub fn sql_for_partial_update(data: &FieldMap, columns: &ColumnMap) -> JoblyResult<PartialUpdate> {
    if data.is_empty() {
        return Err(JoblyError::bad_request("No data"));
    }

    let clause = data
        .keys()
        .enumerate()
        .map(|(idx, field)| format!("\"{}\"=${}", columns.resolve(field), idx + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let values = data.values().cloned().collect();

    Ok(PartialUpdate { clause, values })
}
