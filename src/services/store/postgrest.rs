use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use super::{DataStore, Filter, Query, WriteConflict};

/// Client for a hosted PostgREST endpoint (Supabase `/rest/v1`).
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(resp: reqwest::Response, table: &str) -> anyhow::Result<Vec<Value>> {
        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse data service response for {table}"))?;

        if status == reqwest::StatusCode::CONFLICT {
            return Err(WriteConflict {
                table: table.to_string(),
                detail: data.to_string(),
            }
            .into());
        }
        if !status.is_success() {
            anyhow::bail!("data service error on {table} ({status}): {data}");
        }

        match data {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            row @ Value::Object(_) => Ok(vec![row]),
            other => anyhow::bail!("unexpected data service payload for {table}: {other}"),
        }
    }
}

/// Escapes LIKE metacharacters and drops `*`, which PostgREST treats as `%`.
fn like_literal(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '*' => {}
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(col, v) => (col.clone(), format!("eq.{v}")),
        Filter::Contains(col, needle) => (col.clone(), format!("ilike.*{}*", like_literal(needle))),
        Filter::Gte(col, v) => (col.clone(), format!("gte.{v}")),
        Filter::Lte(col, v) => (col.clone(), format!("lte.{v}")),
        Filter::NotIn(col, values) => {
            let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
            (col.clone(), format!("not.in.({})", quoted.join(",")))
        }
    }
}

fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query.filters.iter().map(filter_param).collect();
    if let Some((first, last)) = query.range {
        params.push(("offset".to_string(), first.to_string()));
        params.push(("limit".to_string(), (last.saturating_sub(first) + 1).to_string()));
    }
    params
}

#[async_trait]
impl DataStore for PostgrestStore {
    async fn select(&self, query: &Query) -> anyhow::Result<Vec<Value>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query_params(query));

        let resp = self
            .request(reqwest::Method::GET, &query.table)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("failed to query {}", query.table))?;

        Self::rows(resp, &query.table).await
    }

    async fn insert(&self, table: &str, row: Value) -> anyhow::Result<Vec<Value>> {
        let resp = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .with_context(|| format!("failed to insert into {table}"))?;

        Self::rows(resp, table).await
    }

    async fn update(&self, query: &Query, changes: Value) -> anyhow::Result<Vec<Value>> {
        let resp = self
            .request(reqwest::Method::PATCH, &query.table)
            .header("Prefer", "return=representation")
            .query(&query_params(query))
            .json(&changes)
            .send()
            .await
            .with_context(|| format!("failed to update {}", query.table))?;

        Self::rows(resp, &query.table).await
    }
}
