//! Meta-command dispatch for the Quill execution engine.
//!
//! Meta-commands are client-side instructions recognized by their leading
//! token (`\dt`, `\l`, ...). The dispatcher reports recognition through a
//! tagged [`Dispatch`] outcome rather than a lookup failure, so unknown
//! tokens fall through to plain SQL execution without error-driven
//! control flow.

mod definitions;

pub use definitions::{CommandDef, COMMANDS};

use crate::db::{DriverConnection, ResultEntry, Value};
use crate::error::Result;
use crate::queries;
use tracing::debug;

/// Outcome of offering a statement to a meta-command dispatcher.
#[derive(Debug)]
pub enum Dispatch {
    /// The dispatcher recognized the command and produced its results.
    /// A composite command may produce several entries.
    Handled(Vec<ResultEntry>),
    /// Not a known meta-command; the engine executes the text as SQL.
    NotRecognized,
}

/// A meta-command dispatcher.
///
/// Given the current connection and the normalized statement text, either
/// handles the command (issuing whatever SQL it needs through the
/// supplied connection) or reports that the leading token is not one of
/// its commands.
pub trait MetaCommands: Send {
    fn dispatch(&self, conn: &mut dyn DriverConnection, input: &str) -> Result<Dispatch>;
}

/// A dispatcher that recognizes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommands;

impl MetaCommands for NoCommands {
    fn dispatch(&self, _conn: &mut dyn DriverConnection, _input: &str) -> Result<Dispatch> {
        Ok(Dispatch::NotRecognized)
    }
}

/// The built-in psql-style command table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCommands;

impl BuiltinCommands {
    pub fn new() -> Self {
        Self
    }
}

impl MetaCommands for BuiltinCommands {
    fn dispatch(&self, conn: &mut dyn DriverConnection, input: &str) -> Result<Dispatch> {
        let mut tokens = input.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(Dispatch::NotRecognized);
        };
        let argument = tokens.next();

        debug!(command, "dispatching meta-command");

        match command {
            "\\dt" => {
                let executed = conn.execute(queries::TABLES, &[])?;
                Ok(Dispatch::Handled(vec![executed.into()]))
            }
            "\\d" => match argument {
                Some(table) => {
                    let executed = conn.execute(queries::COLUMNS, &[table])?;
                    Ok(Dispatch::Handled(vec![executed.into()]))
                }
                // Bare \d lists tables, like psql.
                None => {
                    let executed = conn.execute(queries::TABLES, &[])?;
                    Ok(Dispatch::Handled(vec![executed.into()]))
                }
            },
            "\\l" => {
                let executed = conn.execute(queries::DATABASES, &[])?;
                Ok(Dispatch::Handled(vec![executed.into()]))
            }
            "\\?" => Ok(Dispatch::Handled(vec![help_entry()])),
            _ => Ok(Dispatch::NotRecognized),
        }
    }
}

/// Builds the `\?` listing from the command table.
fn help_entry() -> ResultEntry {
    let rows = COMMANDS
        .iter()
        .map(|def| {
            vec![
                Value::Text(def.usage.to_string()),
                Value::Text(def.description.to_string()),
            ]
        })
        .collect();

    ResultEntry::with_rows(
        rows,
        vec!["Command".to_string(), "Description".to_string()],
        format!("{} commands", COMMANDS.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Driver, Executed, MockDriver};
    use crate::dsn::ResolvedConnectionParams;
    use pretty_assertions::assert_eq;

    fn mock_connection(driver: &MockDriver) -> Box<dyn DriverConnection> {
        let params = ResolvedConnectionParams {
            dbname: "db".to_string(),
            user: "u".to_string(),
            password: String::new(),
            host: "h".to_string(),
            port: "5432".to_string(),
        };
        driver.connect(&params).unwrap()
    }

    #[test]
    fn test_list_tables_recognized() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);
        driver.push_response(Executed {
            description: Some(vec!["Name".to_string()]),
            rows: vec![vec![Value::from("users")], vec![Value::from("orders")]],
            status: "SELECT 2".to_string(),
        });

        let outcome = BuiltinCommands::new().dispatch(conn.as_mut(), "\\dt").unwrap();
        let Dispatch::Handled(entries) = outcome else {
            panic!("expected \\dt to be handled");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rows.as_ref().unwrap().len(), 2);
        assert_eq!(driver.executed()[0].1, queries::TABLES);
    }

    #[test]
    fn test_describe_table_passes_argument() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);
        driver.push_response(Executed {
            description: Some(vec!["column_name".to_string()]),
            rows: vec![vec![Value::from("id")]],
            status: "SELECT 1".to_string(),
        });

        let outcome = BuiltinCommands::new()
            .dispatch(conn.as_mut(), "\\d users")
            .unwrap();
        assert!(matches!(outcome, Dispatch::Handled(_)));
        assert_eq!(driver.executed()[0].2, vec!["users".to_string()]);
    }

    #[test]
    fn test_bare_describe_lists_tables() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);

        let outcome = BuiltinCommands::new().dispatch(conn.as_mut(), "\\d").unwrap();
        assert!(matches!(outcome, Dispatch::Handled(_)));
        assert_eq!(driver.executed()[0].1, queries::TABLES);
    }

    #[test]
    fn test_unknown_token_not_recognized() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);

        let outcome = BuiltinCommands::new()
            .dispatch(conn.as_mut(), "\\unknown arg")
            .unwrap();
        assert!(matches!(outcome, Dispatch::NotRecognized));
        // Nothing reached the connection.
        assert!(driver.executed().is_empty());
    }

    #[test]
    fn test_plain_sql_not_recognized() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);

        let outcome = BuiltinCommands::new()
            .dispatch(conn.as_mut(), "SELECT 1")
            .unwrap();
        assert!(matches!(outcome, Dispatch::NotRecognized));
    }

    #[test]
    fn test_help_lists_every_command() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);

        let outcome = BuiltinCommands::new().dispatch(conn.as_mut(), "\\?").unwrap();
        let Dispatch::Handled(entries) = outcome else {
            panic!("expected \\? to be handled");
        };
        assert_eq!(entries[0].rows.as_ref().unwrap().len(), COMMANDS.len());
    }

    #[test]
    fn test_no_commands_dispatcher() {
        let driver = MockDriver::new();
        let mut conn = mock_connection(&driver);

        let outcome = NoCommands.dispatch(conn.as_mut(), "\\dt").unwrap();
        assert!(matches!(outcome, Dispatch::NotRecognized));
    }
}
