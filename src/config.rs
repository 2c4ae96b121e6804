//! Connection defaults for the Quill execution engine.
//!
//! The engine never reads ambient state on its own: every default the
//! descriptor resolver may fall back to is passed in explicitly through
//! this record.

use serde::{Deserialize, Serialize};

/// Fallback values for fields a connection descriptor omits.
///
/// All fields are plain strings, port included. No format validation
/// happens here; a non-numeric port surfaces as a connection error when
/// the connection is actually opened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionDefaults {
    /// Default database user.
    pub user: String,

    /// Default password. Empty means "no password supplied".
    pub password: String,

    /// Default host.
    pub host: String,

    /// Default port, kept textual until connection-open time.
    pub port: String,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: "5432".to_string(),
        }
    }
}

impl ConnectionDefaults {
    /// Creates defaults from explicit values.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            port: port.into(),
        }
    }

    /// Applies the conventional libpq environment variables
    /// (`PGUSER`, `PGPASSWORD`, `PGHOST`, `PGPORT`) on top of the
    /// built-in defaults, returning the result.
    pub fn from_env() -> Self {
        let mut defaults = Self::default();
        defaults.apply_env_defaults();
        defaults
    }

    /// Overrides any field for which the corresponding `PG*` environment
    /// variable is set.
    pub fn apply_env_defaults(&mut self) {
        if let Ok(user) = std::env::var("PGUSER") {
            self.user = user;
        }
        if let Ok(password) = std::env::var("PGPASSWORD") {
            self.password = password;
        }
        if let Ok(host) = std::env::var("PGHOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("PGPORT") {
            self.port = port;
        }
    }

    /// Returns a display-safe string (no password) for logging.
    pub fn display_string(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}
