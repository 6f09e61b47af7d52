use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool};

use crate::{
    db::HistoryRepository,
    error::{AppError, AppResult},
    models::HistoryEntry,
    services::history::{append_and_trim, MAX_HISTORY_LEN},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    title: String,
    description: String,
    cast_members: Vec<String>,
    duration: String,
    year: i32,
    poster_url: String,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        HistoryEntry {
            title: row.title,
            description: row.description,
            cast: row.cast_members,
            duration: row.duration,
            year: row.year,
            poster_url: row.poster_url,
            created_at: row.created_at,
        }
    }
}

/// History store backed by Postgres
///
/// Writes take a row lock on the owning user for the length of the
/// transaction, so two recommendations for the same user are applied one after
/// the other and neither batch is lost.
#[derive(Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locks the user row, failing if the user is unknown or deleted
    async fn lock_user(conn: &mut PgConnection, user_id: &str) -> AppResult<()> {
        let found: Option<String> = sqlx::query_scalar(
            r#"
            SELECT id FROM users
            WHERE id = $1 AND NOT is_deleted
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        found
            .map(|_| ())
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))
    }

    async fn insert_entries(
        conn: &mut PgConnection,
        user_id: &str,
        entries: &[HistoryEntry],
    ) -> AppResult<()> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO recommendation_history
                    (user_id, title, description, cast_members, duration, year, poster_url, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(user_id)
            .bind(&entry.title)
            .bind(&entry.description)
            .bind(&entry.cast)
            .bind(&entry.duration)
            .bind(entry.year)
            .bind(&entry.poster_url)
            .bind(entry.created_at)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    async fn fetch_entries(conn: &mut PgConnection, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT title, description, cast_members, duration, year, poster_url, created_at
            FROM recommendation_history
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}

#[async_trait::async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn load_history(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let mut conn = self.pool.acquire().await?;

        let exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 AND NOT is_deleted")
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

        if exists.is_none() {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        Self::fetch_entries(&mut conn, user_id).await
    }

    async fn save_history(&self, user_id: &str, history: Vec<HistoryEntry>) -> AppResult<()> {
        let history = append_and_trim(Vec::new(), history);
        let mut tx = self.pool.begin().await?;

        Self::lock_user(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM recommendation_history WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        Self::insert_entries(&mut tx, user_id, &history).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn append_history(
        &self,
        user_id: &str,
        entries: Vec<HistoryEntry>,
    ) -> AppResult<Vec<HistoryEntry>> {
        let mut tx = self.pool.begin().await?;

        Self::lock_user(&mut tx, user_id).await?;
        Self::insert_entries(&mut tx, user_id, &entries).await?;

        let trimmed = sqlx::query(
            r#"
            DELETE FROM recommendation_history
            WHERE user_id = $1
              AND id NOT IN (
                  SELECT id FROM recommendation_history
                  WHERE user_id = $1
                  ORDER BY id DESC
                  LIMIT $2
              )
            "#,
        )
        .bind(user_id)
        .bind(MAX_HISTORY_LEN as i64)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let history = Self::fetch_entries(&mut tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            appended = entries.len(),
            evicted = trimmed,
            total = history.len(),
            "History updated"
        );

        Ok(history)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
