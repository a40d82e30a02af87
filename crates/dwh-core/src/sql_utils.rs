//! SQL quoting utilities
//!
//! Helpers for embedding identifiers and configuration values into
//! generated statements.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard. Needed for table names such
/// as `time` that collide with type keywords.
///
/// # Examples
/// ```
/// use dwh_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("time"), r#""time""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
///
/// # Examples
/// ```
/// use dwh_core::sql_utils::escape_sql_string;
/// assert_eq!(escape_sql_string("s3://bucket/o'brien"), "s3://bucket/o''brien");
/// ```
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Collapse a statement onto one line for compact log output.
pub fn single_line(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
