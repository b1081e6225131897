use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{DataStore, Filter, Query};

/// In-process table store with the same filter semantics as the hosted
/// service. Used for local runs without data-service credentials and in tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .map(|t| t.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Missing or null columns never match, as with SQL NULL comparisons.
fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(col, expected) => {
            row.get(col).and_then(as_text).as_deref() == Some(expected.as_str())
        }
        Filter::Contains(col, needle) => {
            let needle = needle.to_lowercase();
            match row.get(col) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(as_text)
                    .any(|s| s.to_lowercase().contains(&needle)),
                Some(v) => as_text(v).is_some_and(|s| s.to_lowercase().contains(&needle)),
                None => false,
            }
        }
        Filter::Gte(col, min) => row.get(col).and_then(Value::as_f64).is_some_and(|v| v >= *min),
        Filter::Lte(col, max) => row.get(col).and_then(Value::as_f64).is_some_and(|v| v <= *max),
        Filter::NotIn(col, values) => row
            .get(col)
            .and_then(as_text)
            .is_some_and(|v| !values.contains(&v)),
    }
}

fn matches_all(row: &Value, query: &Query) -> bool {
    query.filters.iter().all(|f| matches(row, f))
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, query: &Query) -> anyhow::Result<Vec<Value>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;

        let hits = tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| matches_all(r, query)).cloned());

        let Some(hits) = hits else {
            return Ok(Vec::new());
        };

        Ok(match query.range {
            Some((first, last)) => hits
                .skip(first as usize)
                .take((last.saturating_sub(first) + 1) as usize)
                .collect(),
            None => hits.collect(),
        })
    }

    async fn insert(&self, table: &str, row: Value) -> anyhow::Result<Vec<Value>> {
        anyhow::ensure!(row.is_object(), "rows must be JSON objects");
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(vec![row])
    }

    async fn update(&self, query: &Query, changes: Value) -> anyhow::Result<Vec<Value>> {
        let Value::Object(changes) = changes else {
            anyhow::bail!("changes must be a JSON object");
        };
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;

        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&query.table) {
            for row in rows.iter_mut().filter(|r| matches_all(r, query)) {
                if let Value::Object(fields) = row {
                    for (k, v) in &changes {
                        fields.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }
}
