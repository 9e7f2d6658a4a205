// SPDX-License-Identifier: Apache-2.0

use crate::config::ServerConfig;
use crate::ServerError;
use mdverse_query::{register_search_functions, verify_schema};
use rusqlite::{Connection, InterruptHandle, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

pub(crate) fn open_readonly(path: &Path) -> Result<Connection, ServerError> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| ServerError::Database(format!("open {}: {e}", path.display())))
}

pub(crate) fn apply_readonly_pragmas(
    conn: &Connection,
    cache_kib: i64,
    mmap_bytes: i64,
) -> Result<(), ServerError> {
    conn.execute_batch(&format!(
        "PRAGMA query_only=ON; PRAGMA journal_mode=OFF; PRAGMA synchronous=OFF; PRAGMA temp_store=MEMORY; PRAGMA cache_size=-{}; PRAGMA mmap_size={};",
        cache_kib, mmap_bytes,
    ))
    .map_err(|e| ServerError::Database(e.to_string()))
}

/// Shared between a blocking query and the task awaiting it.
#[derive(Default)]
struct QueryGuard {
    handle: Option<InterruptHandle>,
    cancelled: bool,
}

/// Read-only handle on the catalog database with a small pool of idle connections.
pub struct CatalogDb {
    path: PathBuf,
    cache_kib: i64,
    mmap_bytes: i64,
    sql_timeout: Duration,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
}

impl CatalogDb {
    /// Opens the database and checks that every catalog table is present.
    pub fn open(cfg: &ServerConfig) -> Result<Arc<Self>, ServerError> {
        let db = Self {
            path: cfg.db_path.clone(),
            cache_kib: cfg.sqlite_pragma_cache_kib,
            mmap_bytes: cfg.sqlite_pragma_mmap_bytes,
            sql_timeout: cfg.sql_timeout,
            max_idle: cfg.max_idle_connections.max(1),
            idle: Mutex::new(Vec::new()),
        };
        let conn = db.connect()?;
        verify_schema(&conn)?;
        db.checkin(conn);
        Ok(Arc::new(db))
    }

    fn connect(&self) -> Result<Connection, ServerError> {
        let conn = open_readonly(&self.path)?;
        apply_readonly_pragmas(&conn, self.cache_kib, self.mmap_bytes)?;
        register_search_functions(&conn)?;
        Ok(conn)
    }

    fn checkout(&self) -> Result<Connection, ServerError> {
        let pooled = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match pooled {
            Some(conn) => Ok(conn),
            None => self.connect(),
        }
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }

    /// Runs `f` on a pooled connection on the current thread.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, ServerError>
    where
        E: Into<ServerError>,
    {
        let conn = self.checkout()?;
        let out = f(&conn);
        self.checkin(conn);
        out.map_err(Into::into)
    }

    /// Runs `f` with its connection's interrupt handle published in `guard`.
    /// A connection whose query was cancelled is closed instead of pooled.
    fn with_guarded_connection<T, E>(
        &self,
        guard: &Mutex<QueryGuard>,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, ServerError>
    where
        E: Into<ServerError>,
    {
        let conn = self.checkout()?;
        {
            let mut g = guard.lock().unwrap_or_else(PoisonError::into_inner);
            if g.cancelled {
                drop(g);
                self.checkin(conn);
                return Err(ServerError::Timeout(self.sql_timeout));
            }
            g.handle = Some(conn.get_interrupt_handle());
        }
        let out = f(&conn);
        let cancelled = {
            let mut g = guard.lock().unwrap_or_else(PoisonError::into_inner);
            g.handle = None;
            g.cancelled
        };
        if !cancelled {
            self.checkin(conn);
        }
        out.map_err(Into::into)
    }

    /// Runs `f` on the blocking pool, bounded by the configured SQL timeout.
    /// On timeout the running statement is interrupted.
    pub async fn run<T, E, F>(self: &Arc<Self>, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ServerError> + Send + 'static,
    {
        let db = Arc::clone(self);
        let guard = Arc::new(Mutex::new(QueryGuard::default()));
        let task_guard = Arc::clone(&guard);
        let task =
            tokio::task::spawn_blocking(move || db.with_guarded_connection(&task_guard, f));
        match timeout(self.sql_timeout, task).await {
            Err(_) => {
                let mut g = guard.lock().unwrap_or_else(PoisonError::into_inner);
                g.cancelled = true;
                if let Some(handle) = g.handle.take() {
                    handle.interrupt();
                }
                warn!(
                    timeout_ms = self.sql_timeout.as_millis() as u64,
                    "query timed out, interrupted"
                );
                Err(ServerError::Timeout(self.sql_timeout))
            }
            Ok(Err(join)) => Err(ServerError::Internal(join.to_string())),
            Ok(Ok(result)) => result,
        }
    }
}
