use async_trait::async_trait;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Executor, Row};

use crate::domain::error::ProcessGrepError;
use crate::domain::process::ProcessRow;
use crate::infrastructure::connection_target::ConnectionTarget;

/// One open connection to a target server.
#[async_trait]
pub trait ProcessSession: Send {
    /// Run the read-only process SELECT and decode the result rows.
    async fn fetch_processes(&mut self, select: &str) -> Result<Vec<ProcessRow>, ProcessGrepError>;

    /// Issue a single KILL statement.
    async fn execute_kill(&mut self, statement: &str) -> Result<(), ProcessGrepError>;
}

/// Opens sessions for targets. The grep run opens one session per target,
/// uses it to completion and drops it before the next target.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn ProcessSession>, ProcessGrepError>;
}

#[derive(Debug, Default)]
pub struct MySqlSessionFactory;

#[async_trait]
impl SessionFactory for MySqlSessionFactory {
    async fn open(
        &self,
        target: &ConnectionTarget,
    ) -> Result<Box<dyn ProcessSession>, ProcessGrepError> {
        let connection = MySqlConnection::connect_with(&target.connect_options())
            .await
            .map_err(|source| ProcessGrepError::ConnectionFailed {
                target: target.label(),
                source: Box::new(source),
            })?;
        Ok(Box::new(MySqlProcessSession {
            target_label: target.label(),
            connection,
        }))
    }
}

pub struct MySqlProcessSession {
    target_label: String,
    connection: MySqlConnection,
}

#[async_trait]
impl ProcessSession for MySqlProcessSession {
    async fn fetch_processes(&mut self, select: &str) -> Result<Vec<ProcessRow>, ProcessGrepError> {
        let rows = self
            .connection
            .fetch_all(select)
            .await
            .map_err(|source| ProcessGrepError::QueryFailed {
                target: self.target_label.clone(),
                source: Box::new(source),
            })?;
        Ok(rows.iter().map(decode_process_row).collect())
    }

    async fn execute_kill(&mut self, statement: &str) -> Result<(), ProcessGrepError> {
        self.connection
            .execute(statement)
            .await
            .map_err(|source| ProcessGrepError::QueryFailed {
                target: self.target_label.clone(),
                source: Box::new(source),
            })?;
        Ok(())
    }
}

// Columns arrive in ProcessField::ALL order; decoding is defensive about
// the concrete integer widths the server reports for Id and Time.
fn decode_process_row(row: &MySqlRow) -> ProcessRow {
    ProcessRow {
        id: decode_unsigned(row, 0),
        user: decode_text(row, 1).unwrap_or_default(),
        host: decode_text(row, 2).unwrap_or_default(),
        db: decode_text(row, 3),
        command: decode_text(row, 4).unwrap_or_default(),
        time: decode_signed(row, 5),
        state: decode_text(row, 6),
        info: decode_text(row, 7),
    }
}

fn decode_unsigned(row: &MySqlRow, index: usize) -> u64 {
    row.try_get::<u64, _>(index)
        .or_else(|_| row.try_get::<i64, _>(index).map(|value| value as u64))
        .unwrap_or_default()
}

fn decode_signed(row: &MySqlRow, index: usize) -> i64 {
    row.try_get::<i64, _>(index)
        .or_else(|_| row.try_get::<i32, _>(index).map(i64::from))
        .or_else(|_| row.try_get::<u64, _>(index).map(|value| value as i64))
        .unwrap_or_default()
}

fn decode_text(row: &MySqlRow, index: usize) -> Option<String> {
    row.try_get::<Option<String>, _>(index)
        .ok()
        .flatten()
        .or_else(|| {
            row.try_get::<Option<Vec<u8>>, _>(index)
                .ok()
                .flatten()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        })
}
