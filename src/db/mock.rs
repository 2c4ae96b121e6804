//! Mock driver for testing.
//!
//! Provides an in-memory driver so the engine and the meta-command
//! dispatcher can be exercised without a running server. Connections and
//! executed statements are recorded for inspection, and responses can be
//! scripted ahead of time.

use crate::db::{Driver, DriverConnection, Executed, Value};
use crate::dsn::ResolvedConnectionParams;
use crate::error::{QuillError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    /// Parameters of every successful connect, in order.
    connects: Vec<ResolvedConnectionParams>,
    /// Database names that refuse connections.
    refused_databases: Vec<String>,
    /// Scripted responses, consumed front to back. When empty, a small
    /// heuristic answers instead.
    responses: VecDeque<std::result::Result<Executed, String>>,
    /// Every executed statement as (dbname, sql, params).
    executed: Vec<(String, String, Vec<String>)>,
}

/// A mock driver with scriptable responses and full call recording.
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next response.
    pub fn push_response(&self, executed: Executed) {
        self.state.lock().unwrap().responses.push_back(Ok(executed));
    }

    /// Scripts the next response as a query error.
    pub fn push_error(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Err(message.into()));
    }

    /// Makes future connects to the named database fail.
    pub fn refuse_database(&self, dbname: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .refused_databases
            .push(dbname.into());
    }

    /// Returns the parameters of every successful connect so far.
    pub fn connects(&self) -> Vec<ResolvedConnectionParams> {
        self.state.lock().unwrap().connects.clone()
    }

    /// Returns every executed statement as (dbname, sql, params).
    pub fn executed(&self) -> Vec<(String, String, Vec<String>)> {
        self.state.lock().unwrap().executed.clone()
    }
}

impl Driver for MockDriver {
    fn connect(&self, params: &ResolvedConnectionParams) -> Result<Box<dyn DriverConnection>> {
        let mut state = self.state.lock().unwrap();
        if state.refused_databases.contains(&params.dbname) {
            return Err(QuillError::connection(format!(
                "Database '{}' does not exist.",
                params.dbname
            )));
        }
        state.connects.push(params.clone());

        Ok(Box::new(MockConnection {
            dbname: params.dbname.clone(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    dbname: String,
    state: Arc<Mutex<MockState>>,
}

impl DriverConnection for MockConnection {
    fn execute(&mut self, sql: &str, params: &[&str]) -> Result<Executed> {
        let mut state = self.state.lock().unwrap();
        state.executed.push((
            self.dbname.clone(),
            sql.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));

        match state.responses.pop_front() {
            Some(Ok(executed)) => Ok(executed),
            Some(Err(message)) => Err(QuillError::query(message)),
            None => Ok(default_response(sql)),
        }
    }
}

/// Fallback behavior when no response is scripted: SELECT-looking
/// statements return one mock row, everything else a bare status.
fn default_response(sql: &str) -> Executed {
    let keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase();

    if keyword == "SELECT" {
        Executed {
            description: Some(vec!["result".to_string()]),
            rows: vec![vec![Value::Text(format!("mock result for: {sql}"))]],
            status: "SELECT 1".to_string(),
        }
    } else {
        Executed {
            description: None,
            rows: vec![],
            status: keyword,
        }
    }
}

/// A driver whose connects always fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDriver;

impl Driver for FailingDriver {
    fn connect(&self, params: &ResolvedConnectionParams) -> Result<Box<dyn DriverConnection>> {
        Err(QuillError::connection(format!(
            "Cannot connect to {}:{}. Check that the server is running.",
            params.host, params.port
        )))
    }
}
