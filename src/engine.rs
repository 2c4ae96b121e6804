//! The execution engine: one live connection, statement classification,
//! and result normalization.
//!
//! The engine owns a single [`Session`] and is meant for serialized use
//! by one caller (an interactive loop): exactly one statement is in
//! flight at a time, and the calling thread blocks until the server
//! responds. Switching databases replaces the session's connection handle
//! in place and is not atomic with respect to a concurrent caller; the
//! engine documents that requirement rather than locking around it.

use crate::commands::{BuiltinCommands, Dispatch, MetaCommands};
use crate::config::ConnectionDefaults;
use crate::db::{Driver, DriverConnection, PostgresDriver, ResultEntry, Value};
use crate::dsn::{self, ResolvedConnectionParams};
use crate::error::{QuillError, Result};
use crate::queries;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The live connection plus its current identity fields.
///
/// A database switch replaces `conn` and `dbname` in place;
/// user/password/host/port carry over unchanged.
pub struct Session {
    /// Name of the currently connected database.
    pub dbname: String,
    /// Connected user.
    pub user: String,
    password: String,
    /// Server host.
    pub host: String,
    /// Server port, textual.
    pub port: String,
    conn: Box<dyn DriverConnection>,
}

/// One database's row from the server catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub name: String,
    pub owner: String,
    pub encoding: String,
    pub collate: String,
    pub ctype: String,
}

/// The execution engine.
pub struct Engine {
    session: Session,
    driver: Box<dyn Driver>,
    commands: Box<dyn MetaCommands>,
}

impl Engine {
    /// Opens an engine against a PostgreSQL server with the built-in
    /// meta-commands.
    pub fn connect(descriptor: &str, defaults: &ConnectionDefaults) -> Result<Self> {
        Self::open(
            descriptor,
            defaults,
            Box::new(PostgresDriver::new()),
            Box::new(BuiltinCommands::new()),
        )
    }

    /// Opens an engine with an explicit driver and meta-command
    /// dispatcher. Resolves the descriptor against the defaults, then
    /// opens the initial connection; a failed connection attempt is fatal
    /// to construction.
    pub fn open(
        descriptor: &str,
        defaults: &ConnectionDefaults,
        driver: Box<dyn Driver>,
        commands: Box<dyn MetaCommands>,
    ) -> Result<Self> {
        let params = dsn::resolve(descriptor, defaults);
        let conn = driver.connect(&params)?;

        info!(dbname = %params.dbname, user = %params.user, host = %params.host, "session opened");

        let ResolvedConnectionParams {
            dbname,
            user,
            password,
            host,
            port,
        } = params;

        Ok(Self {
            session: Session {
                dbname,
                user,
                password,
                host,
                port,
                conn,
            },
            driver,
            commands,
        })
    }

    /// Name of the currently connected database.
    pub fn dbname(&self) -> &str {
        &self.session.dbname
    }

    /// Connected user.
    pub fn user(&self) -> &str {
        &self.session.user
    }

    /// Server host.
    pub fn host(&self) -> &str {
        &self.session.host
    }

    /// Server port.
    pub fn port(&self) -> &str {
        &self.session.port
    }

    /// Executes one submitted statement and returns its normalized
    /// results.
    ///
    /// Classification happens in strict order: empty input, database
    /// switch (`\c` or `use`), meta-command, plain SQL. Empty input never
    /// reaches the server. The text is trimmed and one trailing semicolon
    /// is stripped before classification, so `SELECT 1` and ` SELECT 1; `
    /// behave identically.
    pub fn execute(&mut self, input: &str) -> Result<Vec<ResultEntry>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(vec![ResultEntry::empty()]);
        }

        let sql = trimmed.strip_suffix(';').unwrap_or(trimmed);

        if is_switch_command(sql) {
            return self.switch_database(sql);
        }

        match self.commands.dispatch(self.session.conn.as_mut(), sql)? {
            Dispatch::Handled(entries) => return Ok(entries),
            Dispatch::NotRecognized => {}
        }

        debug!(sql, "executing statement");
        let executed = self.session.conn.execute(sql, &[])?;
        Ok(vec![executed.into()])
    }

    /// Switches the session to another database, reusing the current
    /// user, password, host, and port. Connects first and mutates the
    /// session only once the new connection exists; on failure the old
    /// connection and database name stay in place.
    fn switch_database(&mut self, sql: &str) -> Result<Vec<ResultEntry>> {
        let target = sql
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| QuillError::missing_argument("Database name missing."))?;

        let params = ResolvedConnectionParams {
            dbname: target.to_string(),
            user: self.session.user.clone(),
            password: self.session.password.clone(),
            host: self.session.host.clone(),
            port: self.session.port.clone(),
        };

        let conn = self.driver.connect(&params)?;
        // The old connection is released here.
        self.session.conn = conn;
        self.session.dbname = target.to_string();

        info!(dbname = %self.session.dbname, "switched database");

        Ok(vec![ResultEntry::status_only(format!(
            "You are now connected to database \"{}\" as user \"{}\"",
            self.session.dbname, self.session.user
        ))])
    }

    /// Names of the ordinary tables visible in the current search path,
    /// excluding system and catalog schemas, ordered by name.
    pub fn tables(&mut self) -> Result<Vec<String>> {
        let executed = self.session.conn.execute(queries::TABLES, &[])?;
        Ok(first_column(executed.rows))
    }

    /// Column names of the given table.
    pub fn columns(&mut self, table: &str) -> Result<Vec<String>> {
        let executed = self.session.conn.execute(queries::COLUMNS, &[table])?;
        Ok(first_column(executed.rows))
    }

    /// The union of column names across every visible table. Recomputed
    /// on each call; nothing is cached.
    pub fn all_columns(&mut self) -> Result<BTreeSet<String>> {
        let mut columns = BTreeSet::new();
        for table in self.tables()? {
            columns.extend(self.columns(&table)?);
        }
        Ok(columns)
    }

    /// Databases on the server with owner, encoding, and collation
    /// metadata, ordered by name.
    pub fn databases(&mut self) -> Result<Vec<DatabaseInfo>> {
        let executed = self.session.conn.execute(queries::DATABASES, &[])?;
        Ok(executed
            .rows
            .into_iter()
            .map(|row| {
                let mut fields = row.into_iter().map(|value| match value {
                    Value::Text(s) => s,
                    Value::Null => String::new(),
                });
                DatabaseInfo {
                    name: fields.next().unwrap_or_default(),
                    owner: fields.next().unwrap_or_default(),
                    encoding: fields.next().unwrap_or_default(),
                    collate: fields.next().unwrap_or_default(),
                    ctype: fields.next().unwrap_or_default(),
                }
            })
            .collect())
    }
}

/// True when the first whitespace-delimited token is the switch command:
/// `\c` exactly, or `use` in any case.
fn is_switch_command(sql: &str) -> bool {
    match sql.split_whitespace().next() {
        Some(token) => token == "\\c" || token.eq_ignore_ascii_case("use"),
        None => false,
    }
}

/// Extracts the first field of every row, skipping NULLs.
fn first_column(rows: Vec<crate::db::Row>) -> Vec<String> {
    rows.into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter_map(|value| match value {
            Value::Text(s) => Some(s),
            Value::Null => None,
        })
        .collect()
}
