// crates/reservation-db/src/error.rs

use thiserror::Error;

/// Failure raised while opening a connection or preparing its session.
///
/// The `Display` form is the driver's own message, so callers can prefix
/// it however they like (`Connection error: ...` in the reporting path).
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error(transparent)]
    Open(sqlx::Error),

    #[error(transparent)]
    Session(sqlx::Error),
}

impl DatabaseError {
    /// Which step of connecting failed, as recorded in log events.
    pub fn stage(&self) -> &'static str {
        match self {
            DatabaseError::Open(_) => "open",
            DatabaseError::Session(_) => "session",
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
