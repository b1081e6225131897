pub mod memory;
pub mod postgrest;

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, String),
    /// Case-insensitive substring match.
    Contains(String, String),
    Gte(String, f64),
    Lte(String, f64),
    NotIn(String, Vec<String>),
}

/// A row selection against one table of the data service.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<Filter>,
    /// Inclusive `(first, last)` row positions.
    pub range: Option<(u64, u64)>,
}

impl Query {
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filters: Vec::new(),
            range: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn contains(mut self, column: &str, needle: impl Into<String>) -> Self {
        self.filters
            .push(Filter::Contains(column.to_string(), needle.into()));
        self
    }

    pub fn gte(mut self, column: &str, value: f64) -> Self {
        self.filters.push(Filter::Gte(column.to_string(), value));
        self
    }

    pub fn lte(mut self, column: &str, value: f64) -> Self {
        self.filters.push(Filter::Lte(column.to_string(), value));
        self
    }

    pub fn not_in(mut self, column: &str, values: &[&str]) -> Self {
        self.filters.push(Filter::NotIn(
            column.to_string(),
            values.iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    pub fn range(mut self, first: u64, last: u64) -> Self {
        self.range = Some((first, last));
        self
    }
}

/// A write rejected by a uniqueness or exclusion constraint in the data
/// service.
#[derive(Debug, thiserror::Error)]
#[error("write conflict on {table}: {detail}")]
pub struct WriteConflict {
    pub table: String,
    pub detail: String,
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, query: &Query) -> anyhow::Result<Vec<Value>>;

    /// Inserts one row and returns the stored representation.
    async fn insert(&self, table: &str, row: Value) -> anyhow::Result<Vec<Value>>;

    /// Applies `changes` to every row the query matches and returns them.
    async fn update(&self, query: &Query, changes: Value) -> anyhow::Result<Vec<Value>>;
}
