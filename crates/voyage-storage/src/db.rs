//! Local SQLite data store
//!
//! Development stand-in for the hosted backend. Each collection is a table
//! keeping the full row as JSON next to the few columns we filter and sort
//! on. Implements the same [`DataClient`] contract, including the
//! `generate_unique_slug` function.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use voyage_core::{Collection, Row, slug};

use crate::client::{DataClient, Query};
use crate::{Result, StorageError};

pub const GENERATE_UNIQUE_SLUG: &str = "generate_unique_slug";

/// Slug used when a title has no usable characters
const FALLBACK_SLUG: &str = "package";

#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open (or create) the database. `None` uses the platform data dir.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => Self::default_path(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Opened local store at {}", path.display());

        Ok(store)
    }

    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "voyage", "voyage") {
            dirs.data_dir().join("voyage.db")
        } else {
            PathBuf::from("~/.voyage/voyage.db")
        }
    }

    async fn migrate(&self) -> Result<()> {
        for collection in Collection::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    slug TEXT NOT NULL UNIQUE,
                    status TEXT NOT NULL,
                    created_ns INTEGER NOT NULL,
                    updated_ns INTEGER NOT NULL,
                    data TEXT NOT NULL
                )",
                collection.table()
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn table(name: &str) -> Result<&'static str> {
        Collection::from_table(name)
            .map(Collection::table)
            .ok_or_else(|| StorageError::UnknownTable(name.to_string()))
    }

    async fn slug_exists(&self, table: &str, slug: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE slug = ?"))
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn generate_unique_slug(&self, args: &Value) -> Result<Value> {
        let (Some(title), Some(table)) = (
            args.get("title_text").and_then(Value::as_str),
            args.get("table_name").and_then(Value::as_str),
        ) else {
            return Err(StorageError::UnsupportedQuery(format!(
                "{GENERATE_UNIQUE_SLUG} requires title_text and table_name"
            )));
        };
        let table = Self::table(table)?;

        let mut base = slug::slugify(title);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        let mut attempt = 1;
        loop {
            let candidate = slug::candidate(&base, attempt);
            if !self.slug_exists(table, &candidate).await? {
                debug!("Resolved slug {candidate} for {table}");
                return Ok(Value::String(candidate));
            }
            attempt += 1;
        }
    }
}

/// The indexed columns derived from a row
struct Columns {
    id: String,
    slug: String,
    status: String,
    created_ns: i64,
    updated_ns: i64,
}

impl Columns {
    fn from_row(row: &Row) -> Result<Self> {
        let id = match row.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(StorageError::InvalidRow("id is required".into())),
        };
        let slug = match row.get("slug") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(StorageError::InvalidRow("slug is required".into())),
        };
        let status = row
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("draft")
            .to_string();

        Ok(Self {
            id,
            slug,
            status,
            created_ns: timestamp_ns(row, "created_at")?,
            updated_ns: timestamp_ns(row, "updated_at")?,
        })
    }
}

fn timestamp_ns(row: &Row, key: &str) -> Result<i64> {
    let raw = row
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| StorageError::InvalidRow(format!("{key} is required")))?;
    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|e| StorageError::InvalidRow(format!("{key}: {e}")))?;
    Ok(parsed.unix_timestamp_nanos() as i64)
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| StorageError::Other(anyhow::anyhow!("Failed to format timestamp: {}", e)))
}

fn sort_column(column: &str) -> Result<&'static str> {
    match column {
        "created_at" => Ok("created_ns"),
        "updated_at" => Ok("updated_ns"),
        "slug" => Ok("slug"),
        other => Err(StorageError::UnsupportedQuery(format!(
            "cannot order by {other}"
        ))),
    }
}

#[async_trait]
impl DataClient for LocalStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let table = Self::table(table)?;

        // Indexed columns go to SQL, anything else is matched on the JSON row
        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        let mut residual = Query::new();
        for (column, value) in &query.filters {
            match (column.as_str(), value.as_str()) {
                ("id" | "slug" | "status", Some(s)) => {
                    clauses.push(format!("{column} = ?"));
                    binds.push(s.to_string());
                }
                _ => residual = residual.eq(column.clone(), value.clone()),
            }
        }

        let mut sql = format!("SELECT data FROM {table}");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        match &query.order {
            Some(order) => {
                let direction = if order.descending { "DESC" } else { "ASC" };
                sql.push_str(&format!(
                    " ORDER BY {} {direction}, rowid {direction}",
                    sort_column(&order.column)?
                ));
            }
            None => sql.push_str(" ORDER BY rowid"),
        }

        let mut statement = sqlx::query_scalar::<_, String>(&sql);
        for bind in &binds {
            statement = statement.bind(bind.as_str());
        }
        let raw_rows = statement.fetch_all(&self.pool).await?;

        let mut rows = Vec::new();
        for data in raw_rows {
            if query.limit.is_some_and(|limit| rows.len() >= limit) {
                break;
            }
            let row: Row = serde_json::from_str(&data)?;
            if residual.matches(&row) {
                rows.push(row);
            }
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        let table = Self::table(table)?;

        let now = now_rfc3339()?;
        row.entry("id")
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(now.clone()));
        row.entry("updated_at")
            .or_insert_with(|| Value::String(now.clone()));
        row.entry("status")
            .or_insert_with(|| Value::String("draft".to_string()));

        let columns = Columns::from_row(&row)?;
        let data = serde_json::to_string(&row)?;

        sqlx::query(&format!(
            "INSERT INTO {table} (id, slug, status, created_ns, updated_ns, data)
             VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(columns.id.as_str())
        .bind(columns.slug.as_str())
        .bind(columns.status.as_str())
        .bind(columns.created_ns)
        .bind(columns.updated_ns)
        .bind(data.as_str())
        .execute(&self.pool)
        .await?;

        debug!("Inserted {} into {table}", columns.id);
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>> {
        let table = Self::table(table)?;
        let mut tx = self.pool.begin().await?;

        let existing: Option<String> =
            sqlx::query_scalar(&format!("SELECT data FROM {table} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut row: Row = serde_json::from_str(&existing)?;
        for (key, value) in patch {
            if key != "id" {
                row.insert(key, value);
            }
        }

        let columns = Columns::from_row(&row)?;
        let data = serde_json::to_string(&row)?;

        sqlx::query(&format!(
            "UPDATE {table}
             SET slug = ?, status = ?, created_ns = ?, updated_ns = ?, data = ?
             WHERE id = ?"
        ))
        .bind(columns.slug.as_str())
        .bind(columns.status.as_str())
        .bind(columns.created_ns)
        .bind(columns.updated_ns)
        .bind(data.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<bool> {
        let table = Self::table(table)?;
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        match function {
            GENERATE_UNIQUE_SLUG => self.generate_unique_slug(&args).await,
            other => Err(StorageError::UnknownFunction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn create_test_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(Some(dir.path().join("test.db"))).await.unwrap();
        (dir, store)
    }

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_insert_fills_generated_columns() {
        let (_dir, store) = create_test_store().await;
        let inserted = store
            .insert("travel_packages", row(json!({ "title": "Bali", "slug": "bali" })))
            .await
            .unwrap();
        assert!(inserted["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(inserted["status"], "draft");
        assert_eq!(inserted["created_at"], inserted["updated_at"]);
    }

    #[tokio::test]
    async fn test_select_filters_and_order() {
        let (_dir, store) = create_test_store().await;
        for (slug, status, created) in [
            ("a", "published", "2025-01-01T00:00:00Z"),
            ("b", "draft", "2025-01-02T00:00:00Z"),
            ("c", "published", "2025-01-03T00:00:00Z"),
        ] {
            store
                .insert(
                    "travel_packages",
                    row(json!({
                        "slug": slug,
                        "status": status,
                        "created_at": created,
                        "updated_at": created,
                        "location": "Bali"
                    })),
                )
                .await
                .unwrap();
        }

        let newest_first = store
            .select("travel_packages", &Query::new().order_by("created_at", true))
            .await
            .unwrap();
        let slugs: Vec<_> = newest_first.iter().map(|r| r["slug"].clone()).collect();
        assert_eq!(slugs, vec![json!("c"), json!("b"), json!("a")]);

        let published = store
            .select(
                "travel_packages",
                &Query::new().eq("status", "published").eq("location", "Bali").limit(1),
            )
            .await
            .unwrap();
        assert_eq!(published.len(), 1);

        let capped = store
            .select("travel_packages", &Query::new().limit(0))
            .await
            .unwrap();
        assert!(capped.is_empty());

        let none = store
            .select("travel_packages", &Query::new().eq("slug", "b").eq("status", "published"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let (_dir, store) = create_test_store().await;
        store
            .insert("discovery_packages", row(json!({ "slug": "same" })))
            .await
            .unwrap();
        store
            .insert("travel_packages", row(json!({ "slug": "same" })))
            .await
            .unwrap();
        assert_eq!(
            store.select("travel_packages", &Query::new()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_dir, store) = create_test_store().await;
        let inserted = store
            .insert(
                "discovery_packages",
                row(json!({ "id": "p1", "slug": "p1", "price": "$10" })),
            )
            .await
            .unwrap();
        assert_eq!(inserted["id"], "p1");

        let updated = store
            .update("discovery_packages", "p1", row(json!({ "status": "published", "id": "hijack" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["status"], "published");
        assert_eq!(updated["id"], "p1");
        assert_eq!(updated["price"], "$10");

        assert!(
            store
                .update("discovery_packages", "missing", Row::new())
                .await
                .unwrap()
                .is_none()
        );

        assert!(store.delete("discovery_packages", "p1").await.unwrap());
        assert!(!store.delete("discovery_packages", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let (_dir, store) = create_test_store().await;
        store
            .insert("travel_packages", row(json!({ "slug": "dup" })))
            .await
            .unwrap();
        let err = store
            .insert("travel_packages", row(json!({ "slug": "dup" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
    }

    #[tokio::test]
    async fn test_generate_unique_slug() {
        let (_dir, store) = create_test_store().await;
        let args = json!({ "title_text": "Cape Town!", "table_name": "travel_packages" });

        let first = store.rpc(GENERATE_UNIQUE_SLUG, args.clone()).await.unwrap();
        assert_eq!(first, "cape-town");
        store
            .insert("travel_packages", row(json!({ "slug": "cape-town" })))
            .await
            .unwrap();

        let second = store.rpc(GENERATE_UNIQUE_SLUG, args).await.unwrap();
        assert_eq!(second, "cape-town-2");

        let other_table = store
            .rpc(
                GENERATE_UNIQUE_SLUG,
                json!({ "title_text": "Cape Town!", "table_name": "discovery_packages" }),
            )
            .await
            .unwrap();
        assert_eq!(other_table, "cape-town");

        let blank = store
            .rpc(
                GENERATE_UNIQUE_SLUG,
                json!({ "title_text": "???", "table_name": "travel_packages" }),
            )
            .await
            .unwrap();
        assert_eq!(blank, "package");
    }

    #[tokio::test]
    async fn test_unknown_table_and_function() {
        let (_dir, store) = create_test_store().await;
        assert!(matches!(
            store.select("admin_users", &Query::new()).await,
            Err(StorageError::UnknownTable(_))
        ));
        assert!(matches!(
            store.rpc("drop_everything", json!({})).await,
            Err(StorageError::UnknownFunction(_))
        ));
    }
}
