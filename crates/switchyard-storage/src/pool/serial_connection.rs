//! Single connection behind `tokio::sync::Mutex`.
//! Every statement is serialized through it.

use rusqlite::Connection;
use tokio::sync::Mutex;

use switchyard_core::errors::SwitchyardResult;

/// A single SQLite connection protected by an async mutex.
pub struct SerialConnection {
    conn: Mutex<Connection>,
}

impl SerialConnection {
    /// Wrap an already configured and migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Acquire the lock and execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> SwitchyardResult<T>
    where
        F: FnOnce(&Connection) -> SwitchyardResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }
}
