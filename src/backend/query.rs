//! PostgREST-style row queries.
//!
//! A [`Query`] is a plain value describing what to read from a table; the
//! client turns it into URL parameters with [`Query::to_params`]:
//!
//! | Builder | Parameter |
//! |---|---|
//! | `Query::select("*")` | `select=*` |
//! | `.eq("category", "Digital")` | `category=eq.Digital` |
//! | `.order_desc("createdAt")` | `order=createdAt.desc` |
//! | `.limit(5)` | `limit=5` |

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    columns: String,
    filters: Vec<(String, String)>,
    /// Sort column, descending.
    order: Option<String>,
    limit: Option<usize>,
}

impl Query {
    /// Start a query returning `columns` (`"*"` for every column).
    pub fn select(columns: &str) -> Self {
        Self {
            columns: columns.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Keep only rows whose `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Render as query-string pairs. Values are not percent-encoded here; the
    /// URL builder does that.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(column) = &self.order {
            params.push(("order".to_string(), format!("{column}.desc")));
        }
        if let Some(n) = self.limit {
            params.push(("limit".to_string(), n.to_string()));
        }
        params
    }
}
