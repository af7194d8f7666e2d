//! Single-table reads built from a validated `TableQuery`.
//!
//! Identifiers are double-quoted, operators come from a closed set, and
//! every filter value and the limit are bound as parameters.

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Map, Number, Value};

use switchyard_core::errors::SwitchyardResult;
use switchyard_core::plan::TableQuery;

use crate::to_storage_err;

/// Build the SQL text and its bound parameters.
pub fn build_sql(query: &TableQuery) -> SwitchyardResult<(String, Vec<SqlValue>)> {
    let columns = match &query.columns {
        Some(cols) if !cols.is_empty() => cols
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "*".to_string(),
    };

    let mut sql = format!("SELECT {columns} FROM {}", quote_ident(&query.table));
    let mut bound = Vec::with_capacity(query.filters.len() + 1);

    let mut clauses = Vec::with_capacity(query.filters.len());
    for filter in &query.filters {
        let op = sql_operator(&filter.operator)?;
        bound.push(to_sql_value(&filter.value));
        clauses.push(format!(
            "{} {op} ?{}",
            quote_ident(&filter.column),
            bound.len()
        ));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    match &query.sort {
        Some(sort) => sql.push_str(&format!(
            " ORDER BY {} {}, rowid ASC",
            quote_ident(&sort.column),
            sort.direction.as_sql()
        )),
        None => sql.push_str(" ORDER BY rowid ASC"),
    }

    if let Some(limit) = query.limit {
        bound.push(SqlValue::Integer(limit as i64));
        sql.push_str(&format!(" LIMIT ?{}", bound.len()));
    }

    Ok((sql, bound))
}

/// Run the query and return each row as a JSON object keyed by column.
pub fn run_table_query(
    conn: &Connection,
    query: &TableQuery,
) -> SwitchyardResult<Vec<Map<String, Value>>> {
    let (sql, bound) = build_sql(query)?;
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(format!("{sql}: {e}")))?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut rows = stmt
        .query(params_from_iter(bound.iter()))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(|e| to_storage_err(e.to_string()))? {
        let mut obj = Map::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let cell = row
                .get_ref(i)
                .map_err(|e| to_storage_err(e.to_string()))?;
            obj.insert(name.clone(), from_sql_value(cell));
        }
        out.push(obj);
    }
    Ok(out)
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// SQLite's `LIKE` is already case-insensitive for ASCII, so `ILIKE` maps onto it.
fn sql_operator(operator: &str) -> SwitchyardResult<&'static str> {
    match operator.trim().to_ascii_uppercase().as_str() {
        "=" => Ok("="),
        "<" => Ok("<"),
        ">" => Ok(">"),
        "<=" => Ok("<="),
        ">=" => Ok(">="),
        "LIKE" | "ILIKE" => Ok("LIKE"),
        other => Err(to_storage_err(format!("unsupported operator '{other}'"))),
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}
