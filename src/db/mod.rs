//! Database driver abstraction for the Quill execution engine.
//!
//! Provides a trait-based interface over the underlying driver so the
//! engine can be exercised against an in-memory mock as well as a live
//! PostgreSQL server.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDriver, MockDriver};
pub use postgres::PostgresDriver;
pub use types::{Executed, ResultEntry, Row, Value};

use crate::dsn::ResolvedConnectionParams;
use crate::error::Result;

/// Opens connections from resolved connection parameters.
///
/// The engine keeps its driver for the lifetime of the session: a
/// database-switch command goes back through it to open the replacement
/// connection.
pub trait Driver: Send {
    /// Opens a live connection. Connections operate in auto-commit mode:
    /// each statement is its own implicit transaction.
    fn connect(&self, params: &ResolvedConnectionParams) -> Result<Box<dyn DriverConnection>>;
}

/// A live connection executing one statement at a time.
///
/// Not safe for concurrent use; the caller serializes access. Statement
/// resources are scoped to each call and released on every exit path.
pub trait DriverConnection: Send {
    /// Executes one statement, optionally with textual parameters, and
    /// reports the raw outcome. The presence of a column description in
    /// the outcome distinguishes row-returning statements from the rest.
    fn execute(&mut self, sql: &str, params: &[&str]) -> Result<Executed>;
}
