//! Process-wide database handle.
//!
//! The pool is created lazily on the first `acquire()`. Concurrent first
//! callers all await the same in-flight connection attempt, so a process never
//! opens more than one pool. `shutdown()` closes the pool and resets the handle
//! so the next `acquire()` reconnects (used by tooling and tests). A connect
//! still in flight during `shutdown()` is closed by its caller once it lands.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("DATABASE_URL is not set")]
    MissingUrl,

    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub struct Database {
    url: String,
    max_connections: u32,
    pool: RwLock<Arc<OnceCell<PgPool>>>,
    connect_attempts: AtomicUsize,
}

impl Database {
    pub fn new(url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            url: url.into(),
            max_connections,
            pool: RwLock::new(Arc::new(OnceCell::new())),
            connect_attempts: AtomicUsize::new(0),
        }
    }

    /// Wrap an already-connected pool (tests, tooling).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            url: String::new(),
            max_connections: pool.options().get_max_connections(),
            pool: RwLock::new(Arc::new(OnceCell::new_with(Some(pool)))),
            connect_attempts: AtomicUsize::new(0),
        }
    }

    /// Get the shared pool, connecting on first use.
    ///
    /// A connect that completes after `shutdown()` swapped the handle belongs
    /// to nobody: that pool is closed here and the caller retries against the
    /// fresh handle.
    pub async fn acquire(&self) -> Result<PgPool, DatabaseError> {
        loop {
            let cell = self.pool.read().await.clone();
            let pool = cell.get_or_try_init(|| self.connect()).await?.clone();

            let current = Arc::ptr_eq(&cell, &*self.pool.read().await);
            if current {
                return Ok(pool);
            }
            pool.close().await;
            debug!("Closed pool that finished connecting after shutdown");
        }
    }

    /// Close the pool. The next `acquire()` opens a fresh one.
    pub async fn shutdown(&self) {
        let previous = {
            let mut guard = self.pool.write().await;
            std::mem::replace(&mut *guard, Arc::new(OnceCell::new()))
        };
        if let Some(pool) = previous.get() {
            pool.close().await;
            info!("Database pool closed");
        }
    }

    /// Run embedded migrations against the shared pool.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let pool = self.acquire().await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(())
    }

    /// Number of connection attempts made so far.
    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<PgPool, DatabaseError> {
        if self.url.trim().is_empty() {
            return Err(DatabaseError::MissingUrl);
        }
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        debug!(max_connections = self.max_connections, "Connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.url)
            .await
            .map_err(DatabaseError::Connect)?;
        info!("Database connected");
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_url_fails_at_first_acquire() {
        let db = Database::new("", 1);
        let err = db.acquire().await.unwrap_err();
        assert!(matches!(err, DatabaseError::MissingUrl));
        assert_eq!(db.connect_attempts(), 0);
    }

    #[tokio::test]
    async fn shutdown_without_connection_is_a_no_op() {
        let db = Database::new("postgres://localhost/none", 1);
        db.shutdown().await;
        assert_eq!(db.connect_attempts(), 0);
    }
}
