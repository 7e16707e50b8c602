use serde::Serialize;

use super::result_set::ResultSet;

/// Outcome of [`Statement::run`](crate::Statement::run).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_rowid: Option<i64>,
}

impl RunResult {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_changes(mut self, changes: u64) -> Self {
        self.changes = Some(changes);
        self
    }

    #[must_use]
    pub fn with_last_insert_rowid(mut self, rowid: i64) -> Self {
        self.last_insert_rowid = Some(rowid);
        self
    }
}

/// Envelope returned by `Database::sql` and `exec`.
///
/// Read-returning statements fill `rows`; mutations carry whatever the
/// driver reported in `changes` / `last_insert_rowid`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<ResultSet>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_rowid: Option<i64>,
}

impl SqlResult {
    #[must_use]
    pub fn from_rows(rows: ResultSet) -> Self {
        Self {
            rows: Some(rows),
            success: true,
            ..Self::default()
        }
    }

    /// Rows of a read-returning statement; empty for mutations.
    #[must_use]
    pub fn rows(&self) -> &[crate::results::CustomDbRow] {
        self.rows.as_ref().map_or(&[], |rs| rs.results.as_slice())
    }
}

impl From<RunResult> for SqlResult {
    fn from(run: RunResult) -> Self {
        Self {
            rows: None,
            success: run.success,
            changes: run.changes,
            last_insert_rowid: run.last_insert_rowid,
        }
    }
}
