//! Common imports.
//!
//! ```rust
//! use sql_connector::prelude::*;
//! ```

pub use crate::any::AnyConnector;
pub use crate::config::DatabaseConfig;
pub use crate::connector::Connector;
pub use crate::database::{Database, DatabaseGuard, create_database};
pub use crate::error::SqlConnectorError;
pub use crate::registry::{ConnectorName, create_connector};
pub use crate::results::{CustomDbRow, ResultSet, RunResult, SqlResult};
pub use crate::sql_template;
pub use crate::statement::Statement;
pub use crate::template::SqlTemplate;
pub use crate::types::{Dialect, RowValues};
