use std::env;

use anyhow::Result;
use reservation_db::{db, Database, DatabaseConfig, DatabaseError};
use tokio::runtime::Runtime;

fn unreachable_database() -> Database {
    Database::new(DatabaseConfig::default().with_host("nope.invalid"))
}

#[test]
fn unreachable_host_is_a_typed_error() -> Result<()> {
    let rt = Runtime::new()?;
    let outcome = rt.block_on(unreachable_database().connect());

    match outcome {
        Err(err @ DatabaseError::Open(_)) => {
            assert_eq!(err.stage(), "open");
            assert!(!err.to_string().is_empty());
        }
        Err(other) => panic!("expected open failure, got {other:?}"),
        Ok(_) => panic!("connecting to nope.invalid should fail"),
    }
    Ok(())
}

#[test]
fn unreachable_host_reports_and_returns_none() -> Result<()> {
    let rt = Runtime::new()?;
    let mut out = Vec::new();

    let database = unreachable_database();

    let conn = rt.block_on(database.connect_reporting_to(&mut out));
    let driver_error = match rt.block_on(database.connect()) {
        Err(err) => err,
        Ok(_) => panic!("connecting to nope.invalid should fail"),
    };

    assert!(conn.is_none());
    let printed = String::from_utf8(out)?;
    assert_eq!(printed, format!("Connection error: {driver_error}\n"));
    Ok(())
}

#[test]
fn error_chain_does_not_repeat_driver_message() -> Result<()> {
    let rt = Runtime::new()?;
    let err = match rt.block_on(unreachable_database().connect()) {
        Err(err) => anyhow::Error::from(err).context("failed to connect"),
        Ok(_) => panic!("connecting to nope.invalid should fail"),
    };

    let links: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();
    assert!(links.len() >= 2, "chain: {links:?}");
    for pair in links.windows(2) {
        assert_ne!(pair[0], pair[1], "chain: {links:?}");
    }
    assert_eq!(links[0], "failed to connect");
    Ok(())
}

#[test]
fn wrong_password_reports_instead_of_failing() -> Result<()> {
    if env::var("RESERVATION_TEST_DATABASE").is_err() {
        eprintln!(
            "Skipping wrong_password_reports_instead_of_failing because RESERVATION_TEST_DATABASE is not set"
        );
        return Ok(());
    }

    let rt = Runtime::new()?;
    let database = Database::new(DatabaseConfig::from_env().with_password("definitely-not-it"));
    let mut out = Vec::new();

    let conn = rt.block_on(database.connect_reporting_to(&mut out));

    assert!(conn.is_none());
    assert!(String::from_utf8(out)?.contains("Connection error"));
    Ok(())
}

#[test]
fn live_connection_uses_utf8() -> Result<()> {
    if env::var("RESERVATION_TEST_DATABASE").is_err() {
        eprintln!(
            "Skipping live_connection_uses_utf8 because RESERVATION_TEST_DATABASE is not set"
        );
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(async move {
        let database = Database::from_env();
        let mut conn = database.connect().await?;

        db::ping(&mut conn).await?;
        assert_eq!(db::client_encoding(&mut conn).await?, "UTF8");

        let mut second = database.connect().await?;
        db::ping(&mut second).await?;

        Ok(())
    })
}

#[test]
fn instances_from_same_environment_are_equal_and_independent() {
    let first = Database::new(DatabaseConfig::from_lookup(|_| None));
    let second = Database::new(DatabaseConfig::from_lookup(|_| None));

    assert_eq!(first.config(), second.config());

    let retargeted = Database::new(first.config().clone().with_host("elsewhere"));
    assert_eq!(retargeted.config().host(), "elsewhere");
    assert_eq!(first.config().host(), "localhost");
    assert_eq!(second.config().host(), "localhost");
}

#[test]
fn serialized_config_redacts_password() -> Result<()> {
    let config = DatabaseConfig::default().with_password("s3cr3t-value");
    let value = serde_json::to_value(&config)?;

    assert_eq!(value["host"], "localhost");
    assert_eq!(value["database_name"], "reservation_db");
    assert_eq!(value["username"], "reservation_user");
    assert_eq!(value["password"], "********");
    assert!(!value.to_string().contains("s3cr3t-value"));
    Ok(())
}
