//! pgquill — the execution engine of the Quill interactive PostgreSQL
//! client.
//!
//! This crate owns the connection to the server and nothing else:
//! it resolves a connection descriptor into concrete parameters, keeps
//! exactly one live connection, classifies each submitted statement
//! (database switch, meta-command, plain SQL), and normalizes every
//! outcome into a uniform [`ResultEntry`] shape for the presentation
//! layer to render.
//!
//! ```no_run
//! use pgquill::{ConnectionDefaults, Engine};
//!
//! # fn main() -> pgquill::Result<()> {
//! let defaults = ConnectionDefaults::from_env();
//! let mut engine = Engine::connect("postgres://localhost/mydb", &defaults)?;
//! for entry in engine.execute("SELECT 1")? {
//!     println!("{:?}", entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod db;
pub mod dsn;
pub mod engine;
pub mod error;
pub mod logging;

mod queries;

pub use commands::{BuiltinCommands, Dispatch, MetaCommands, NoCommands};
pub use config::ConnectionDefaults;
pub use db::{Driver, DriverConnection, Executed, ResultEntry, Row, Value};
pub use dsn::{resolve, ResolvedConnectionParams};
pub use engine::{DatabaseInfo, Engine, Session};
pub use error::{QuillError, Result};
