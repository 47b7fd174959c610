//! Table and RPC access over the hosted REST API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use voyage_core::Row;
use voyage_storage::{DataClient, Query, Result, StorageError};

use crate::http::{Endpoint, build_client, check, transport};

const RETURN_REPRESENTATION: (&str, &str) = ("Prefer", "return=representation");

pub struct RestClient {
    http: Client,
    endpoint: Endpoint,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            endpoint: Endpoint::new(base_url, api_key),
        })
    }

    fn table_url(&self, table: &str) -> String {
        self.endpoint.url(&format!("rest/v1/{table}"))
    }

    async fn rows(response: reqwest::Response) -> Result<Vec<Row>> {
        let response = check(response).await?;
        response.json::<Vec<Row>>().await.map_err(transport)
    }
}

/// Query-string form of a [`Query`]: `col=eq.value`, `order=col.desc`, `limit=n`
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", filter_value(value))));
    }
    if let Some(order) = &query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

#[async_trait]
impl DataClient for RestClient {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        debug!("GET {table} {:?}", query.filters);
        let request = self
            .http
            .get(self.table_url(table))
            .query(&query_params(query));
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row> {
        let request = self
            .http
            .post(self.table_url(table))
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&[row]);
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::InvalidRow(format!("insert into {table} returned no row")))
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>> {
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&id_filter(id))
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1)
            .json(&patch);
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<bool> {
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&id_filter(id))
            .header(RETURN_REPRESENTATION.0, RETURN_REPRESENTATION.1);
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        Ok(!Self::rows(response).await?.is_empty())
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        let request = self
            .http
            .post(self.endpoint.url(&format!("rest/v1/rpc/{function}")))
            .json(&args);
        let response = self
            .endpoint
            .authorize(request)
            .send()
            .await
            .map_err(transport)?;
        let response = check(response).await?;
        response.json::<Value>().await.map_err(transport)
    }
}
