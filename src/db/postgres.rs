//! PostgreSQL driver implementation.
//!
//! Implements the [`Driver`] and [`DriverConnection`] traits on top of the
//! blocking `postgres` crate. One connection, no pool: the engine owns a
//! single live connection and every statement blocks until the server
//! responds.

use crate::db::{Driver, DriverConnection, Executed, Row, Value};
use crate::dsn::ResolvedConnectionParams;
use crate::error::{QuillError, Result};
use postgres::types::ToSql;
use postgres::{Client, Config, NoTls, SimpleQueryMessage};
use tracing::debug;

/// Driver opening blocking PostgreSQL connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver;

impl PostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for PostgresDriver {
    fn connect(&self, params: &ResolvedConnectionParams) -> Result<Box<dyn DriverConnection>> {
        // Port stays textual through resolution; this is where a bad
        // value surfaces.
        let port: u16 = params.port.parse().map_err(|_| {
            QuillError::connection(format!("Invalid port '{}': must be a number", params.port))
        })?;

        let mut config = Config::new();
        config
            .host(&params.host)
            .port(port)
            .user(&params.user)
            .dbname(&params.dbname);
        if !params.password.is_empty() {
            config.password(&params.password);
        }

        debug!(
            host = %params.host,
            port = %params.port,
            dbname = %params.dbname,
            user = %params.user,
            "opening connection"
        );

        let client = config
            .connect(NoTls)
            .map_err(|e| map_connection_error(e, params))?;

        Ok(Box::new(PostgresConnection { client }))
    }
}

/// A live blocking connection to a PostgreSQL server.
struct PostgresConnection {
    client: Client,
}

impl DriverConnection for PostgresConnection {
    fn execute(&mut self, sql: &str, params: &[&str]) -> Result<Executed> {
        if params.is_empty() {
            self.execute_simple(sql)
        } else {
            self.execute_prepared(sql, params)
        }
    }
}

impl PostgresConnection {
    /// Executes arbitrary statement text through the simple-query
    /// protocol. Results arrive in text format, and the row description
    /// tells row-returning statements apart from DDL/DML.
    fn execute_simple(&mut self, sql: &str) -> Result<Executed> {
        let messages = self
            .client
            .simple_query(sql)
            .map_err(|e| QuillError::query(format_query_error(e)))?;

        let mut description = None;
        let mut rows: Vec<Row> = Vec::new();
        let mut completed = None;

        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    description = Some(columns.iter().map(|c| c.name().to_string()).collect());
                }
                SimpleQueryMessage::Row(row) => {
                    rows.push(
                        (0..row.len())
                            .map(|i| Value::from(row.get(i).map(str::to_string)))
                            .collect(),
                    );
                }
                SimpleQueryMessage::CommandComplete(count) => {
                    // For multi-statement text the last command wins.
                    completed = Some(count);
                }
                _ => {}
            }
        }

        let status = synthesize_status(sql, completed.unwrap_or(rows.len() as u64));

        Ok(Executed {
            description,
            rows,
            status,
        })
    }

    /// Executes a parameterized statement through the extended protocol.
    /// Column metadata comes from the prepared statement, so a zero-row
    /// result still carries its description.
    fn execute_prepared(&mut self, sql: &str, params: &[&str]) -> Result<Executed> {
        let statement = self
            .client
            .prepare(sql)
            .map_err(|e| QuillError::query(format_query_error(e)))?;

        let description = Some(
            statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        );

        let bound: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();

        let fetched = self
            .client
            .query(&statement, &bound)
            .map_err(|e| QuillError::query(format_query_error(e)))?;

        let rows: Vec<Row> = fetched.iter().map(convert_row).collect();
        let status = synthesize_status(sql, rows.len() as u64);

        Ok(Executed {
            description,
            rows,
            status,
        })
    }
}

/// Converts a typed row to its textual representation.
fn convert_row(row: &postgres::Row) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_().name()))
        .collect()
}

/// Converts a single column value from a typed row to a `Value`.
fn convert_value(row: &postgres::Row, index: usize, type_name: &str) -> Value {
    match type_name {
        "bool" => row
            .try_get::<_, Option<bool>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        "int2" => row
            .try_get::<_, Option<i16>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        "int4" => row
            .try_get::<_, Option<i32>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        "int8" => row
            .try_get::<_, Option<i64>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        "float4" => row
            .try_get::<_, Option<f32>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        "float8" => row
            .try_get::<_, Option<f64>>(index)
            .ok()
            .flatten()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),

        // Everything else is fetched as text.
        _ => row
            .try_get::<_, Option<String>>(index)
            .ok()
            .flatten()
            .map(Value::Text)
            .unwrap_or(Value::Null),
    }
}

/// Rebuilds a psql-style command tag from the statement's leading keyword
/// and the completion count reported by the driver.
fn synthesize_status(sql: &str, count: u64) -> String {
    let mut words = sql.split_whitespace();
    let first = match words.next() {
        Some(w) => w.to_uppercase(),
        None => return String::new(),
    };

    match first.as_str() {
        "SELECT" | "UPDATE" | "DELETE" | "COPY" | "FETCH" | "MOVE" => {
            format!("{first} {count}")
        }
        "INSERT" => format!("INSERT 0 {count}"),
        "CREATE" | "DROP" | "ALTER" | "TRUNCATE" => match words.next() {
            Some(second) => format!("{first} {}", second.to_uppercase()),
            None => first,
        },
        _ => first,
    }
}

/// Maps connection errors to user-facing messages.
fn map_connection_error(error: postgres::Error, params: &ResolvedConnectionParams) -> QuillError {
    let error_str = error.to_string().to_lowercase();
    let detail = error
        .as_db_error()
        .map(|db| db.message().to_lowercase())
        .unwrap_or_default();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        QuillError::connection(format!(
            "Cannot connect to {}:{}. Check that the server is running.",
            params.host, params.port
        ))
    } else if error_str.contains("authentication failed") || detail.contains("authentication failed")
    {
        QuillError::connection(format!(
            "Authentication failed for user '{}'. Check your credentials.",
            params.user
        ))
    } else if detail.contains("does not exist") && detail.contains("database") {
        QuillError::connection(format!("Database '{}' does not exist.", params.dbname))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        QuillError::connection(format!(
            "Connection to {}:{} timed out. The server may be overloaded or unreachable.",
            params.host, params.port
        ))
    } else {
        QuillError::connection(error.to_string())
    }
}

/// Formats a server error, keeping DETAIL and HINT lines when present.
fn format_query_error(error: postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => {
            let mut result = String::from("ERROR: ");
            result.push_str(db_error.message());

            if let Some(detail) = db_error.detail() {
                result.push_str("\n  DETAIL: ");
                result.push_str(detail);
            }

            if let Some(hint) = db_error.hint() {
                result.push_str("\n  HINT: ");
                result.push_str(hint);
            }

            result
        }
        None => error.to_string(),
    }
}
