//! Database operations for `prompt_discovery_results`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const SELECT_COLUMNS: &str = "id, public_id, session_token, website, keyword, brand_name, \
     industry, location, prompts, clusters, extracted_keywords, top_competitors, source, meta, \
     created_at";

/// A row from the `prompt_discovery_results` table.
///
/// The JSON columns hold the camelCase response fragments as returned to
/// the client.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResultRow {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "id")]
    pub public_id: Uuid,
    pub session_token: String,
    pub website: Option<String>,
    pub keyword: Option<String>,
    pub brand_name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub prompts: Value,
    pub clusters: Value,
    pub extracted_keywords: Value,
    pub top_competitors: Value,
    pub source: Option<Value>,
    pub meta: Value,
    pub created_at: DateTime<Utc>,
}

/// Values for a new result row.
#[derive(Debug, Clone, Default)]
pub struct NewDiscoveryResult {
    pub session_token: String,
    pub website: Option<String>,
    pub keyword: Option<String>,
    pub brand_name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub prompts: Value,
    pub clusters: Value,
    pub extracted_keywords: Value,
    pub top_competitors: Value,
    pub source: Option<Value>,
    pub meta: Value,
}

/// Inserts one finished discovery run and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_discovery_result(
    pool: &PgPool,
    new: &NewDiscoveryResult,
) -> Result<DiscoveryResultRow, DbError> {
    let sql = format!(
        "INSERT INTO prompt_discovery_results \
         (public_id, session_token, website, keyword, brand_name, industry, location, \
          prompts, clusters, extracted_keywords, top_competitors, source, meta) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {SELECT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, DiscoveryResultRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(&new.session_token)
        .bind(&new.website)
        .bind(&new.keyword)
        .bind(&new.brand_name)
        .bind(&new.industry)
        .bind(&new.location)
        .bind(&new.prompts)
        .bind(&new.clusters)
        .bind(&new.extracted_keywords)
        .bind(&new.top_competitors)
        .bind(&new.source)
        .bind(&new.meta)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Fetches one row by its public id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_discovery_result(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<DiscoveryResultRow, DbError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM prompt_discovery_results WHERE public_id = $1");
    sqlx::query_as::<_, DiscoveryResultRow>(&sql)
        .bind(public_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Lists the newest rows for a session, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_discovery_results_by_session(
    pool: &PgPool,
    session_token: &str,
    limit: i64,
) -> Result<Vec<DiscoveryResultRow>, DbError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM prompt_discovery_results \
         WHERE session_token = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    );
    let rows = sqlx::query_as::<_, DiscoveryResultRow>(&sql)
        .bind(session_token)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
