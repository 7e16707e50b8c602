//! Tagged-template SQL compiler.
//!
//! A template is the two-list form of a tagged template literal: `N` literal
//! fragments and `N - 1` interpolated values. Every interpolation becomes a
//! positional `?` placeholder, except one wrapped as `{value}`, which is
//! spliced into the SQL text verbatim (useful for identifiers).
//!
//! ```rust
//! use sql_connector::prelude::*;
//!
//! let table = "users";
//! let id = 5;
//! let compiled = sql_template!("SELECT * FROM {", table, "} WHERE id = ", id, "")
//!     .compile()
//!     .unwrap();
//! assert_eq!(compiled.sql, "SELECT * FROM users WHERE id = ?");
//! assert_eq!(compiled.params, vec![RowValues::Int(5)]);
//! ```

use crate::error::SqlConnectorError;
use crate::types::RowValues;

/// Literal fragments and the values interpolated between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlTemplate {
    fragments: Vec<String>,
    values: Vec<RowValues>,
}

/// Positional-placeholder SQL plus the values bound to its `?` sites.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<RowValues>,
}

impl SqlTemplate {
    /// Pair fragments with values. Arity is checked by [`SqlTemplate::compile`].
    pub fn new<F, V>(fragments: F, values: V) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<RowValues>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A template with no interpolations.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            fragments: vec![sql.into()],
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    /// Compile into SQL with `?` placeholders and the ordered parameter list.
    ///
    /// # Errors
    /// Returns [`SqlConnectorError::InvalidInvocation`] when the fragment count
    /// is not exactly one more than the value count.
    pub fn compile(&self) -> Result<CompiledSql, SqlConnectorError> {
        let Some(first) = self.fragments.first() else {
            return Err(SqlConnectorError::InvalidInvocation(
                "template has no literal fragments".into(),
            ));
        };
        if self.fragments.len() != self.values.len() + 1 {
            return Err(SqlConnectorError::InvalidInvocation(format!(
                "expected {} values for {} fragments, got {}",
                self.fragments.len() - 1,
                self.fragments.len(),
                self.values.len()
            )));
        }

        let mut sql = first.clone();
        let mut params = Vec::with_capacity(self.values.len());
        for (fragment, value) in self.fragments[1..].iter().zip(&self.values) {
            if sql.ends_with('{') && fragment.starts_with('}') {
                sql.pop();
                sql.push_str(&value.to_string());
                sql.push_str(&fragment[1..]);
                continue;
            }
            sql.push('?');
            sql.push_str(fragment);
            params.push(value.clone());
        }

        Ok(CompiledSql {
            sql: sql.trim().to_string(),
            params,
        })
    }
}

impl From<&str> for SqlTemplate {
    fn from(sql: &str) -> Self {
        SqlTemplate::raw(sql)
    }
}

impl From<String> for SqlTemplate {
    fn from(sql: String) -> Self {
        SqlTemplate::raw(sql)
    }
}

/// Incremental template construction with an explicit splice flag per site.
///
/// ```rust
/// use sql_connector::SqlTemplate;
///
/// let compiled = SqlTemplate::builder()
///     .sql("SELECT name FROM ")
///     .splice("users")
///     .sql(" WHERE id = ")
///     .bind(7)
///     .build()
///     .compile()
///     .unwrap();
/// assert_eq!(compiled.sql, "SELECT name FROM users WHERE id = ?");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    fragments: Vec<String>,
    values: Vec<RowValues>,
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self {
            fragments: vec![String::new()],
            values: Vec::new(),
        }
    }
}

impl TemplateBuilder {
    /// Append literal SQL text to the current fragment.
    #[must_use]
    pub fn sql(mut self, text: &str) -> Self {
        self.current().push_str(text);
        self
    }

    /// Interpolate a value as a `?` parameter.
    #[must_use]
    pub fn bind(mut self, value: impl Into<RowValues>) -> Self {
        self.values.push(value.into());
        self.fragments.push(String::new());
        self
    }

    /// Interpolate a value directly into the SQL text.
    #[must_use]
    pub fn splice(mut self, value: impl Into<RowValues>) -> Self {
        self.current().push('{');
        self.values.push(value.into());
        self.fragments.push("}".to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> SqlTemplate {
        SqlTemplate {
            fragments: self.fragments,
            values: self.values,
        }
    }

    fn current(&mut self) -> &mut String {
        if self.fragments.is_empty() {
            self.fragments.push(String::new());
        }
        let last = self.fragments.len() - 1;
        &mut self.fragments[last]
    }
}

/// Build a [`SqlTemplate`] from alternating literal fragments and values.
///
/// The argument list always starts and ends with a string literal, exactly
/// like the pieces of a tagged template literal:
///
/// ```rust
/// use sql_connector::sql_template;
///
/// let id = 5;
/// let tpl = sql_template!("SELECT * FROM t WHERE id = ", id, "");
/// assert_eq!(tpl.compile().unwrap().sql, "SELECT * FROM t WHERE id = ?");
/// ```
#[macro_export]
macro_rules! sql_template {
    ($first:literal $(, $value:expr, $fragment:literal)* $(,)?) => {
        $crate::template::SqlTemplate::new(
            [$first $(, $fragment)*],
            ::std::vec::Vec::<$crate::types::RowValues>::from([
                $($crate::types::RowValues::from($value)),*
            ]),
        )
    };
}
