// crates/reservation-db/src/db.rs

use std::io::{self, Write};

use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{DatabaseError, Result};

/// Opens single connections to the reservation database.
///
/// Each call to [`Database::connect`] returns a fresh, caller-owned
/// connection. There is no pool and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Database {
    config: DatabaseConfig,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Shorthand for `Database::new(DatabaseConfig::from_env())`.
    pub fn from_env() -> Self {
        Self::new(DatabaseConfig::from_env())
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Open a connection and switch its session to UTF-8 client encoding.
    pub async fn connect(&self) -> Result<PgConnection> {
        let descriptor = self.config.descriptor();
        debug!(%descriptor, username = self.config.username(), "opening database connection");

        let mut conn = PgConnection::connect_with(&self.config.connect_options())
            .await
            .map_err(DatabaseError::Open)
            .inspect_err(|err| log_failure(&descriptor, err))?;

        sqlx::query("SET client_encoding TO 'UTF8'")
            .execute(&mut conn)
            .await
            .map_err(DatabaseError::Session)
            .inspect_err(|err| log_failure(&descriptor, err))?;

        info!(%descriptor, "database connection established");
        Ok(conn)
    }

    /// Like [`Database::connect`], but a failure is printed to stdout as
    /// `Connection error: <message>` and turned into `None`.
    pub async fn connect_or_report(&self) -> Option<PgConnection> {
        self.connect_reporting_to(&mut io::stdout()).await
    }

    /// [`Database::connect_or_report`] with the diagnostic sent to `out`.
    pub async fn connect_reporting_to<W: Write>(&self, out: &mut W) -> Option<PgConnection> {
        match self.connect().await {
            Ok(conn) => Some(conn),
            Err(err) => {
                // Write errors are ignored.
                let _ = writeln!(out, "Connection error: {err}");
                let _ = out.flush();
                None
            }
        }
    }
}

fn log_failure(descriptor: &str, err: &DatabaseError) {
    warn!(descriptor, stage = err.stage(), error = %err, "database connection failed");
}

/// Current `client_encoding` of the session, e.g. `UTF8`.
pub async fn client_encoding(conn: &mut PgConnection) -> Result<String> {
    sqlx::query_scalar::<_, String>("SHOW client_encoding")
        .fetch_one(conn)
        .await
        .map_err(DatabaseError::Session)
}

/// Round-trip a trivial query to prove the connection is usable.
pub async fn ping(conn: &mut PgConnection) -> Result<()> {
    let one: i32 = sqlx::query_scalar("SELECT 1")
        .fetch_one(conn)
        .await
        .map_err(DatabaseError::Session)?;
    debug!(result = one, "ping succeeded");
    Ok(())
}
