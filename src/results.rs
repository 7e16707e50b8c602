//! Rows, row lists, and the success envelopes returned by statements.

mod envelope;
mod result_set;
mod row;

pub use envelope::{RunResult, SqlResult};
pub use result_set::ResultSet;
pub use row::CustomDbRow;
