//! SQL builder for patient scans.
//!
//! Translates a [`PatientFilter`] and [`SortSpec`] into WHERE and ORDER BY
//! clauses with positional parameters.

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ToSql};

use crate::types::{PatientFilter, SortDirection, SortField, SortSpec, format_timestamp};

/// Name of the SQL function that folds text to lowercase.
///
/// SQLite's own `LIKE` and `lower()` only fold ASCII.
pub const FOLD_FUNCTION: &str = "fold_case";

/// Registers [`FOLD_FUNCTION`] on a connection.
///
/// Folding uses Rust's Unicode lowercase mapping, the same one applied to
/// the search term, so both sides of a name match agree.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold_case(&v)))
        },
    )
}

/// Lowercases text with the Unicode mapping.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }

    fn as_sql(&self) -> &dyn ToSql {
        match self {
            SqlParam::String(s) => s,
            SqlParam::Integer(i) => i,
        }
    }
}

impl SqlFragment {
    /// Adds a parameter and returns its placeholder.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns the parameters in a form rusqlite can bind.
    pub fn bind(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(SqlParam::as_sql).collect()
    }
}

/// Builds the WHERE clause for a filter. Empty when no filter is active.
pub fn build_where(filter: &PatientFilter) -> SqlFragment {
    let mut conditions = Vec::new();
    let mut fragment = SqlFragment::default();

    if let Some(name) = filter.name_term() {
        let placeholder = fragment.add_param(SqlParam::string(format!(
            "%{}%",
            escape_like(&fold_case(name))
        )));
        conditions.push(format!(
            "({f}(first_name) LIKE {p} ESCAPE '\\' OR {f}(last_name) LIKE {p} ESCAPE '\\')",
            f = FOLD_FUNCTION,
            p = placeholder
        ));
    }

    if let Some(number) = filter.document_number_term() {
        let placeholder = fragment.add_param(SqlParam::string(number));
        conditions.push(format!("document_number = {}", placeholder));
    }

    if let Some(from) = filter.created_from {
        let placeholder = fragment.add_param(SqlParam::string(format_timestamp(&from)));
        conditions.push(format!("created_at >= {}", placeholder));
    }

    if let Some(to) = filter.created_to {
        let placeholder = fragment.add_param(SqlParam::string(format_timestamp(&to)));
        conditions.push(format!("created_at <= {}", placeholder));
    }

    if !conditions.is_empty() {
        fragment.sql = format!("WHERE {}", conditions.join(" AND "));
    }
    fragment
}

/// Builds the ORDER BY clause. Ties always break on id so pages are stable.
pub fn build_order_by(sort: SortSpec) -> String {
    let dir = match sort.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    match sort.field {
        SortField::Id => format!("ORDER BY patient_id {}", dir),
        SortField::FirstName => format!("ORDER BY first_name {dir}, patient_id {dir}"),
        SortField::CreatedAt => format!("ORDER BY created_at {dir}, patient_id {dir}"),
    }
}

/// Builds `LIMIT ... OFFSET ...`, appending its parameters to `fragment`.
///
/// SQLite needs a LIMIT before an OFFSET, so an unbounded scan uses `-1`.
pub fn build_limit(fragment: &mut SqlFragment, offset: i64, limit: Option<i64>) -> String {
    let limit_placeholder = fragment.add_param(SqlParam::integer(limit.unwrap_or(-1)));
    let offset_placeholder = fragment.add_param(SqlParam::integer(offset.max(0)));
    format!("LIMIT {} OFFSET {}", limit_placeholder, offset_placeholder)
}

/// Escapes special characters for LIKE patterns.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
