use crate::{
    errors::GeoError,
    providers::db::storage::SpatialStorage,
    types::{GeneratedQuery, ResultRow},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow},
    types::Decimal,
    Column, Row, TypeInfo, ValueRef,
};
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::OnceCell;
use tracing::{debug, info};

pub mod sql;

/// Connection settings for the PostGIS database.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PostgisSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PostgisSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "geospatial_ai".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

/// A provider for a PostgreSQL database with the PostGIS extension.
///
/// The pool is created lazily on first use. A failed connection attempt leaves the
/// cell empty, so the next call tries again. Clones share the same pool.
#[derive(Clone)]
pub struct PostgisProvider {
    settings: PostgisSettings,
    pool: Arc<OnceCell<PgPool>>,
}

impl fmt::Debug for PostgisProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgisProvider")
            .field("host", &self.settings.host)
            .field("port", &self.settings.port)
            .field("database", &self.settings.name)
            .field("connected", &self.pool.initialized())
            .finish()
    }
}

impl PostgisProvider {
    pub fn new(settings: PostgisSettings) -> Self {
        Self {
            settings,
            pool: Arc::new(OnceCell::new()),
        }
    }

    async fn pool(&self) -> Result<&PgPool, GeoError> {
        self.pool
            .get_or_try_init(|| async {
                let options = PgConnectOptions::new()
                    .host(&self.settings.host)
                    .port(self.settings.port)
                    .database(&self.settings.name)
                    .username(&self.settings.user)
                    .password(&self.settings.password);
                info!(
                    "Connecting to PostGIS at {}:{}/{}",
                    self.settings.host, self.settings.port, self.settings.name
                );
                PgPoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(Duration::from_secs(self.settings.acquire_timeout_secs))
                    .connect_with(options)
                    .await
                    .map_err(|e| GeoError::StorageConnection(e.to_string()))
            })
            .await
    }
}

#[async_trait]
impl SpatialStorage for PostgisProvider {
    fn name(&self) -> &str {
        "PostGIS"
    }

    async fn check_connection(&self) -> String {
        let pool = match self.pool().await {
            Ok(pool) => pool,
            Err(e) => return format!("unhealthy: {e}"),
        };
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
            Ok(_) => "healthy".to_string(),
            Err(e) => format!("unhealthy: {e}"),
        }
    }

    async fn execute_query(&self, query: &GeneratedQuery) -> Result<Vec<ResultRow>, GeoError> {
        let pool = self.pool().await?;
        debug!(sql = %query.sql, params = ?query.params, "--> Executing spatial query");

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut statement = sqlx::query(&query.sql);
        for param in &query.params {
            statement = statement.bind(param);
        }
        let rows = statement.fetch_all(&mut *tx).await?;
        tx.rollback().await?;

        debug!("<-- Query returned {} rows", rows.len());
        rows.iter().map(row_to_json).collect()
    }

    async fn initialize_schema(&self) -> Result<(), GeoError> {
        let pool = self.pool().await?;
        for statement in sql::SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("PostGIS schema initialized.");
        Ok(())
    }
}

/// Converts a database row into a JSON object, column by column.
fn row_to_json(row: &PgRow) -> Result<ResultRow, GeoError> {
    let mut map = ResultRow::new();
    for column in row.columns() {
        let idx = column.ordinal();
        let value = column_to_json(row, idx, column.type_info().name())?;
        map.insert(column.name().to_string(), value);
    }
    parse_geometry(&mut map);
    Ok(map)
}

fn column_to_json(row: &PgRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }
    let value = match type_name {
        "INT2" => Value::from(row.try_get::<i16, _>(idx)?),
        "INT4" => Value::from(row.try_get::<i32, _>(idx)?),
        "INT8" => Value::from(row.try_get::<i64, _>(idx)?),
        "FLOAT4" => Value::from(f64::from(row.try_get::<f32, _>(idx)?)),
        "FLOAT8" => Value::from(row.try_get::<f64, _>(idx)?),
        "NUMERIC" => row
            .try_get::<Decimal, _>(idx)?
            .to_string()
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        "BOOL" => Value::Bool(row.try_get::<bool, _>(idx)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
            Value::String(row.try_get::<String, _>(idx)?)
        }
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx)?,
        "TIMESTAMPTZ" => Value::String(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        "TIMESTAMP" => Value::String(row.try_get::<NaiveDateTime, _>(idx)?.to_string()),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        _ => Value::Null,
    };
    Ok(value)
}

/// Replaces a textual `geometry` value with its parsed JSON when it is valid JSON.
pub fn parse_geometry(row: &mut ResultRow) {
    let parsed = match row.get("geometry") {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text).ok(),
        _ => None,
    };
    if let Some(geometry) = parsed {
        row.insert("geometry".to_string(), geometry);
    }
}
