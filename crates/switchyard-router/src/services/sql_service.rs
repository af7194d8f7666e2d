//! SQL-only service: a closed request grammar compiled to a `TableQuery`.
//!
//! `all products|suppliers|categories`, `suppliers: <text>`,
//! `categories: <text>`, `products: <text>`, each with an optional trailing
//! `limit <n>`. Anything else is a product-name search.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info};

use switchyard_core::constants::strip_prefix_ignore_case;
use switchyard_core::errors::SwitchyardResult;
use switchyard_core::plan::TableQuery;
use switchyard_core::traits::{CancellationToken, IRelationalStore};
use switchyard_planning::PlanValidator;

static TRAILING_LIMIT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\blimit\s+(\d+)\s*$").ok());

/// `(prefix, table, column searched with ILIKE)`.
const SEARCH_FORMS: &[(&str, &str, &str)] = &[
    ("suppliers:", "suppliers", "suppliername"),
    ("categories:", "productcategory", "color"),
    ("products:", "products", "productname"),
];

const LISTINGS: &[(&str, &str)] = &[
    ("all products", "products"),
    ("all suppliers", "suppliers"),
    ("all categories", "productcategory"),
];

/// Compile request text into an unvalidated table query.
pub fn parse_sql_request(text: &str) -> TableQuery {
    let (body, limit) = split_limit(text.trim());
    let lower = body.to_lowercase();

    if let Some((_, table)) = LISTINGS.iter().find(|(form, _)| lower == *form) {
        return TableQuery::all(table).limit(limit);
    }

    for (prefix, table, column) in SEARCH_FORMS {
        if let Some(term) = strip_prefix_ignore_case(body, prefix) {
            return TableQuery::all(table)
                .filter(column, "ILIKE", json!(format!("%{}%", term.trim())))
                .limit(limit);
        }
    }

    TableQuery::all("products")
        .filter("productname", "ILIKE", json!(format!("%{body}%")))
        .limit(limit)
}

fn split_limit(text: &str) -> (&str, Option<usize>) {
    let Some(caps) = TRAILING_LIMIT_RE.as_ref().and_then(|re| re.captures(text)) else {
        return (text, None);
    };
    let (Some(whole), Some(n)) = (caps.get(0), caps.get(1)) else {
        return (text, None);
    };
    (text[..whole.start()].trim_end(), n.as_str().parse().ok())
}

pub struct SqlQueryService {
    store: Arc<dyn IRelationalStore>,
    validator: Arc<PlanValidator>,
}

impl SqlQueryService {
    pub fn new(store: Arc<dyn IRelationalStore>, validator: Arc<PlanValidator>) -> Self {
        Self { store, validator }
    }

    /// Rows as a JSON array of column-keyed objects.
    pub async fn dispatch(&self, text: &str, cancel: &CancellationToken) -> SwitchyardResult<Value> {
        cancel.check()?;
        let query = self.validator.validate_table_query(&parse_sql_request(text))?;
        debug!(table = %query.table, filters = query.filters.len(), "sql query validated");

        let rows = cancel.run_until_cancelled(self.store.query_table(&query)).await??;
        info!(table = %query.table, rows = rows.len(), "sql dispatch");
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}
