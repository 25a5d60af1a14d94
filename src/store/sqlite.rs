// SQLite sample store. Quantity samples and sleep intervals live in
// separate tables (mirroring the source's quantity/category split);
// permissions back the authorization gate.

use crate::error::AccessError;
use crate::models::{MetricKind, SleepInterval, SleepStage, Window};
use crate::store::HealthStore;
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct SqliteHealthStore {
    pool: SqlitePool,
}

impl SqliteHealthStore {
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quantity_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                value REAL NOT NULL,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_quantity_kind_start ON quantity_samples(kind, start_ms)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sleep_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stage INTEGER NOT NULL,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sleep_start ON sleep_samples(start_ms)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS permissions (scope TEXT PRIMARY KEY, granted INTEGER NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mark a scope granted or revoked. A scope with no row counts as
    /// not granted.
    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "set_permission"))]
    pub async fn set_permission(&self, scope: MetricKind, granted: bool) -> anyhow::Result<()> {
        sqlx::query("INSERT OR REPLACE INTO permissions (scope, granted) VALUES ($1, $2)")
            .bind(scope.key())
            .bind(granted as i64)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn grant_all(&self) -> anyhow::Result<()> {
        for kind in MetricKind::ALL {
            self.set_permission(kind, true).await?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "insert_quantity"))]
    pub async fn insert_quantity(
        &self,
        kind: MetricKind,
        value: f64,
        start_ms: i64,
        end_ms: i64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO quantity_samples (kind, value, start_ms, end_ms) VALUES ($1, $2, $3, $4)",
        )
        .bind(kind.key())
        .bind(value)
        .bind(start_ms)
        .bind(end_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "insert_sleep"))]
    pub async fn insert_sleep(
        &self,
        stage: SleepStage,
        start_ms: i64,
        end_ms: i64,
    ) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO sleep_samples (stage, start_ms, end_ms) VALUES ($1, $2, $3)")
            .bind(stage.code())
            .bind(start_ms)
            .bind(end_ms)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HealthStore for SqliteHealthStore {
    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "request_access"))]
    async fn request_access(&self, scopes: &[MetricKind]) -> Result<(), AccessError> {
        let rows = sqlx::query("SELECT scope FROM permissions WHERE granted = 1")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AccessError::Unavailable(e.to_string()))?;
        let granted: Vec<String> = rows
            .iter()
            .map(|r| r.get::<String, _>("scope"))
            .collect();
        let missing: Vec<&str> = scopes
            .iter()
            .map(|s| s.key())
            .filter(|k| !granted.iter().any(|g| g == k))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AccessError::Denied {
                cause: Some(format!("scopes not granted: {}", missing.join(", "))),
            })
        }
    }

    // Window filters use the sample start time (strict start): a sample
    // belongs to [start_ms, end_ms) iff its start falls inside.
    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "sum_in_window"))]
    async fn sum_in_window(
        &self,
        kind: MetricKind,
        window: Window,
    ) -> anyhow::Result<Option<f64>> {
        let row = sqlx::query(
            "SELECT SUM(value) AS total FROM quantity_samples WHERE kind = $1 AND start_ms >= $2 AND start_ms < $3",
        )
        .bind(kind.key())
        .bind(window.start_ms)
        .bind(window.end_ms)
        .fetch_one(&self.pool)
        .await?;
        // SUM over zero rows is NULL
        Ok(row.get::<Option<f64>, _>("total"))
    }

    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "latest_in_window"))]
    async fn latest_in_window(
        &self,
        kind: MetricKind,
        window: Window,
    ) -> anyhow::Result<Option<f64>> {
        let row = sqlx::query(
            "SELECT value FROM quantity_samples WHERE kind = $1 AND start_ms >= $2 AND start_ms < $3 ORDER BY start_ms DESC LIMIT 1",
        )
        .bind(kind.key())
        .bind(window.start_ms)
        .bind(window.end_ms)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.get::<f64, _>("value")))
    }

    #[instrument(skip(self), fields(repo = "sqlite_store", operation = "sleep_samples_in_window"))]
    async fn sleep_samples_in_window(
        &self,
        window: Window,
    ) -> anyhow::Result<Vec<SleepInterval>> {
        let rows = sqlx::query(
            "SELECT stage, start_ms, end_ms FROM sleep_samples WHERE start_ms >= $1 AND start_ms < $2",
        )
        .bind(window.start_ms)
        .bind(window.end_ms)
        .fetch_all(&self.pool)
        .await?;
        let mut intervals = Vec::with_capacity(rows.len());
        for r in rows {
            let code = r.get::<i64, _>("stage");
            let Some(stage) = SleepStage::from_code(code) else {
                tracing::warn!(stage = code, "unknown sleep stage code, skipping sample");
                continue;
            };
            intervals.push(SleepInterval {
                stage,
                start_ms: r.get::<i64, _>("start_ms"),
                end_ms: r.get::<i64, _>("end_ms"),
            });
        }
        Ok(intervals)
    }
}
