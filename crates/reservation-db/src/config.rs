// crates/reservation-db/src/config.rs

use std::fmt;

use serde::{Serialize, Serializer};
use sqlx::postgres::PgConnectOptions;

pub const HOST_VAR: &str = "DB_HOST";
pub const NAME_VAR: &str = "DB_NAME";
pub const USER_VAR: &str = "DB_USER";
pub const PASSWORD_VAR: &str = "DB_PASSWORD";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE_NAME: &str = "reservation_db";
pub const DEFAULT_USERNAME: &str = "reservation_user";
pub const DEFAULT_PASSWORD: &str = "secure_password";

const REDACTED: &str = "********";

/// Connection parameters for the reservation database.
///
/// Resolved once, usually through [`DatabaseConfig::from_env`], and then
/// handed to [`crate::Database::new`]. Nothing reads the environment after
/// that point.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    host: String,
    database_name: String,
    username: String,
    #[serde(serialize_with = "redact")]
    password: String,
}

impl DatabaseConfig {
    pub fn new(
        host: impl Into<String>,
        database_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            database_name: database_name.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads `DB_HOST`, `DB_NAME`, `DB_USER` and `DB_PASSWORD`.
    ///
    /// A variable that is present wins even when empty. Missing variables,
    /// and values that are not valid Unicode, fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same resolution as [`DatabaseConfig::from_env`] over an arbitrary
    /// key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            host: resolve(HOST_VAR, DEFAULT_HOST),
            database_name: resolve(NAME_VAR, DEFAULT_DATABASE_NAME),
            username: resolve(USER_VAR, DEFAULT_USERNAME),
            password: resolve(PASSWORD_VAR, DEFAULT_PASSWORD),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = database_name.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// `pgsql:host=<host>;dbname=<database_name>`. Carries no credentials,
    /// so it is safe to log.
    pub fn descriptor(&self) -> String {
        format!("pgsql:host={};dbname={}", self.host, self.database_name)
    }

    /// Driver options for this target. Port and TLS mode stay at the
    /// driver defaults (`PGPORT`/`PGSSLMODE` if set, otherwise 5432/prefer).
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .database(&self.database_name)
            .username(&self.username)
            .password(&self.password)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOST,
            DEFAULT_DATABASE_NAME,
            DEFAULT_USERNAME,
            DEFAULT_PASSWORD,
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

fn redact<S: Serializer>(_: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}
