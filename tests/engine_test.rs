//! End-to-end tests for the execution engine against the mock driver.

use pgquill::db::{FailingDriver, MockDriver};
use pgquill::{
    BuiltinCommands, ConnectionDefaults, Engine, Executed, NoCommands, QuillError, ResultEntry,
    Value,
};
use pretty_assertions::assert_eq;

fn defaults() -> ConnectionDefaults {
    ConnectionDefaults::new("fuser", "fpasswd", "fhost", "1234")
}

fn open_engine(driver: &MockDriver, descriptor: &str) -> Engine {
    Engine::open(
        descriptor,
        &defaults(),
        Box::new(driver.clone()),
        Box::new(BuiltinCommands::new()),
    )
    .unwrap()
}

#[test]
fn open_resolves_descriptor_before_connecting() {
    let driver = MockDriver::new();
    let engine = open_engine(&driver, "postgres://user:pw@host:5432/db");

    assert_eq!(engine.dbname(), "db");
    assert_eq!(engine.user(), "user");
    assert_eq!(engine.host(), "host");
    assert_eq!(engine.port(), "5432");

    let connects = driver.connects();
    assert_eq!(connects.len(), 1);
    assert_eq!(connects[0].dbname, "db");
    assert_eq!(connects[0].password, "pw");
}

#[test]
fn open_falls_back_to_defaults() {
    let driver = MockDriver::new();
    let engine = open_engine(&driver, "mydb");

    assert_eq!(engine.dbname(), "mydb");
    assert_eq!(engine.user(), "fuser");
    assert_eq!(engine.host(), "fhost");
    assert_eq!(engine.port(), "1234");
}

#[test]
fn open_propagates_connection_failure() {
    let result = Engine::open(
        "postgres://localhost/db",
        &defaults(),
        Box::new(FailingDriver),
        Box::new(NoCommands),
    );
    assert!(matches!(result, Err(QuillError::Connection(_))));
}

#[test]
fn empty_input_returns_one_absent_entry() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");

    for input in ["", "   ", "\n\t "] {
        let entries = engine.execute(input).unwrap();
        assert_eq!(entries, vec![ResultEntry::empty()]);
    }
    // No trip to the server.
    assert!(driver.executed().is_empty());
}

#[test]
fn select_returns_rows_and_headers() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");

    let entries = engine.execute("SELECT 1").unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.headers.as_ref().unwrap().len(), 1);
    assert_eq!(entry.rows.as_ref().unwrap().len(), 1);
    assert!(entry.status.is_some());
}

#[test]
fn ddl_returns_status_only() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_response(Executed {
        description: None,
        rows: vec![],
        status: "CREATE TABLE".to_string(),
    });

    let entries = engine.execute("CREATE TABLE t(x int)").unwrap();
    assert_eq!(entries, vec![ResultEntry::status_only("CREATE TABLE")]);
}

#[test]
fn trailing_semicolon_and_whitespace_do_not_change_classification() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");

    let plain = engine.execute("SELECT 1").unwrap();
    let decorated = engine.execute("  SELECT 1;  ").unwrap();
    assert_eq!(plain, decorated);

    let executed = driver.executed();
    assert_eq!(executed[0].1, "SELECT 1");
    assert_eq!(executed[1].1, "SELECT 1");
}

#[test]
fn switch_replaces_connection_and_dbname() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "postgres://user:pw@host:5432/db");

    let entries = engine.execute("\\c otherdb").unwrap();
    assert_eq!(
        entries,
        vec![ResultEntry::status_only(
            "You are now connected to database \"otherdb\" as user \"user\""
        )]
    );
    assert_eq!(engine.dbname(), "otherdb");
    // User, host, and port carry over.
    assert_eq!(engine.user(), "user");
    assert_eq!(engine.host(), "host");
    assert_eq!(engine.port(), "5432");

    let connects = driver.connects();
    assert_eq!(connects.len(), 2);
    assert_eq!(connects[1].dbname, "otherdb");
    assert_eq!(connects[1].user, "user");
    assert_eq!(connects[1].password, "pw");
    assert_eq!(connects[1].host, "host");
    assert_eq!(connects[1].port, "5432");

    // Subsequent statements run against the new database.
    engine.execute("SELECT 1").unwrap();
    let executed = driver.executed();
    assert_eq!(executed.last().unwrap().0, "otherdb");
}

#[test]
fn switch_accepts_word_form_case_insensitively() {
    for input in ["use otherdb", "USE otherdb", "Use otherdb;", "\\c otherdb ignored"] {
        let driver = MockDriver::new();
        let mut engine = open_engine(&driver, "db");
        engine.execute(input).unwrap();
        assert_eq!(engine.dbname(), "otherdb");
    }
}

#[test]
fn switch_without_target_leaves_session_unchanged() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");

    let result = engine.execute("\\c");
    match result {
        Err(QuillError::MissingArgument(msg)) => assert_eq!(msg, "Database name missing."),
        other => panic!("expected missing-argument error, got {other:?}"),
    }
    assert_eq!(engine.dbname(), "db");
    assert_eq!(driver.connects().len(), 1);
}

#[test]
fn failed_switch_keeps_old_session() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.refuse_database("forbidden");

    let result = engine.execute("\\c forbidden");
    assert!(matches!(result, Err(QuillError::Connection(_))));
    assert_eq!(engine.dbname(), "db");

    // The old connection still works.
    engine.execute("SELECT 1").unwrap();
    assert_eq!(driver.executed().last().unwrap().0, "db");
}

#[test]
fn query_error_propagates_and_session_survives() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_error("relation \"missing\" does not exist");

    let result = engine.execute("SELECT * FROM missing");
    match result {
        Err(QuillError::Query(msg)) => assert!(msg.contains("does not exist")),
        other => panic!("expected query error, got {other:?}"),
    }

    // The next valid statement succeeds on the same connection.
    let entries = engine.execute("SELECT 1").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(driver.connects().len(), 1);
}

#[test]
fn recognized_meta_command_is_handled() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_response(Executed {
        description: Some(vec!["Name".to_string()]),
        rows: vec![vec![Value::from("users")]],
        status: "SELECT 1".to_string(),
    });

    let entries = engine.execute("\\dt").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].rows,
        Some(vec![vec![Value::from("users")]])
    );
}

#[test]
fn unrecognized_meta_command_falls_through_to_sql() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_error("syntax error at or near \"\\\"");

    let result = engine.execute("\\nosuch");
    assert!(matches!(result, Err(QuillError::Query(_))));
    // The text reached the driver as plain SQL.
    assert_eq!(driver.executed()[0].1, "\\nosuch");
}

#[test]
fn tables_returns_first_column() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_response(Executed {
        description: Some(vec!["Name".to_string()]),
        rows: vec![vec![Value::from("orders")], vec![Value::from("users")]],
        status: "SELECT 2".to_string(),
    });

    let tables = engine.tables().unwrap();
    assert_eq!(tables, vec!["orders".to_string(), "users".to_string()]);
}

#[test]
fn all_columns_unions_per_table_results() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");

    // Table list, then one column set per table; "id" appears twice.
    driver.push_response(Executed {
        description: Some(vec!["Name".to_string()]),
        rows: vec![vec![Value::from("orders")], vec![Value::from("users")]],
        status: "SELECT 2".to_string(),
    });
    driver.push_response(Executed {
        description: Some(vec!["column_name".to_string()]),
        rows: vec![vec![Value::from("id")], vec![Value::from("total")]],
        status: "SELECT 2".to_string(),
    });
    driver.push_response(Executed {
        description: Some(vec!["column_name".to_string()]),
        rows: vec![vec![Value::from("id")], vec![Value::from("email")]],
        status: "SELECT 2".to_string(),
    });

    let columns = engine.all_columns().unwrap();
    let expected: Vec<&str> = vec!["email", "id", "total"];
    assert_eq!(columns.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn databases_maps_catalog_metadata() {
    let driver = MockDriver::new();
    let mut engine = open_engine(&driver, "db");
    driver.push_response(Executed {
        description: Some(vec![
            "Name".to_string(),
            "Owner".to_string(),
            "Encoding".to_string(),
            "Collate".to_string(),
            "Ctype".to_string(),
        ]),
        rows: vec![vec![
            Value::from("appdb"),
            Value::from("postgres"),
            Value::from("UTF8"),
            Value::from("en_US.UTF-8"),
            Value::from("en_US.UTF-8"),
        ]],
        status: "SELECT 1".to_string(),
    });

    let databases = engine.databases().unwrap();
    assert_eq!(databases.len(), 1);
    assert_eq!(databases[0].name, "appdb");
    assert_eq!(databases[0].owner, "postgres");
    assert_eq!(databases[0].encoding, "UTF8");
}
