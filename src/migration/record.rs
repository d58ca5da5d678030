//! `LedgerEntry` - rows of the migration ledger table

use crate::executor::StoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Layouts accepted when reading `applied_at` back as text
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// One applied migration as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Id of the applied migration
    pub id: String,

    /// Migration name at the time it was applied
    pub name: String,

    /// When the `up` operation completed
    pub applied_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, applied_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            applied_at,
        }
    }

    /// Build an entry from a ledger row
    ///
    /// Expected column order: `id`, `name`, `applied_at::text`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if a column has the wrong type or the timestamp
    /// cannot be parsed.
    pub fn from_row(row: &may_postgres::Row) -> Result<Self, StoreError> {
        let id: String = row
            .try_get(0)
            .map_err(|e| StoreError::Parse(format!("ledger column 'id': {e}")))?;
        let name: String = row
            .try_get(1)
            .map_err(|e| StoreError::Parse(format!("ledger column 'name': {e}")))?;
        let applied_at: String = row
            .try_get(2)
            .map_err(|e| StoreError::Parse(format!("ledger column 'applied_at': {e}")))?;

        Ok(Self {
            id,
            name,
            applied_at: parse_timestamp(&applied_at)?,
        })
    }
}

/// Parse a `TIMESTAMP` rendered as text; the value is taken as UTC
///
/// # Errors
///
/// Returns `StoreError::Parse` when none of the accepted layouts match.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            StoreError::Parse(format!("Failed to parse timestamp '{value}': unrecognized format"))
        })
}
