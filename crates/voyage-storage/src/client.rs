//! Data client contract
//!
//! Table-style CRUD plus remote functions, mirroring what the hosted
//! backend offers. Rows are loose JSON objects; typing happens in
//! `voyage_core::normalize`.

use async_trait::async_trait;
use serde_json::Value;
use voyage_core::Row;

use crate::Result;

/// Equality filters, ordering and limit for `select`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column = value` predicate
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a row satisfies every filter
    pub fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Access to a table-oriented data store
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Rows of `table` matching `query`
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>>;

    /// Insert a row and return it as stored (with generated columns)
    async fn insert(&self, table: &str, row: Row) -> Result<Row>;

    /// Merge `patch` into the row with `id`; `None` when no row matched
    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>>;

    /// Delete the row with `id`; `false` when no row matched
    async fn delete(&self, table: &str, id: &str) -> Result<bool>;

    /// Call a server-side function
    async fn rpc(&self, function: &str, args: Value) -> Result<Value>;
}
