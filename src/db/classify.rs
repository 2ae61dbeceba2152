//! Connection error classification
//!
//! Maps a failed connect or ping to one of a fixed set of categories, using
//! the SQLSTATE code PostgreSQL attaches to server-reported errors. Errors
//! without a code (DNS failures, refused sockets, TLS problems) keep the
//! driver's own text.
//!
//! Only the initial connect flow classifies. Query and catalog failures
//! surface the raw driver message.

/// Where the failed connection was headed. Used to phrase the messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

/// Driver failure reduced to the parts classification looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverFailure {
    /// SQLSTATE code, present only when the server reported the error
    pub code: Option<String>,
    /// Server-side message text (without severity or code prefixes)
    pub message: Option<String>,
    /// Full driver error text
    pub raw: String,
}

impl From<&tokio_postgres::Error> for DriverFailure {
    fn from(err: &tokio_postgres::Error) -> Self {
        let db_err = err.as_db_error();
        Self {
            code: db_err.map(|e| e.code().code().to_string()),
            message: db_err.map(|e| e.message().to_string()),
            raw: driver_message(err),
        }
    }
}

/// Full text of a driver error.
///
/// The driver's own `Display` stops at `db error` or `error connecting to
/// server`. Server-reported errors become `SEVERITY: message` plus `DETAIL:`
/// and `HINT:` lines; anything else is the `source()` chain joined by `: `.
pub fn driver_message(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => server_message(db.severity(), db.message(), db.detail(), db.hint()),
        None => error_chain(err),
    }
}

fn server_message(
    severity: &str,
    message: &str,
    detail: Option<&str>,
    hint: Option<&str>,
) -> String {
    let mut text = format!("{}: {}", severity, message);
    if let Some(detail) = detail {
        text.push_str("\nDETAIL: ");
        text.push_str(detail);
    }
    if let Some(hint) = hint {
        text.push_str("\nHINT: ");
        text.push_str(hint);
    }
    text
}

/// `err` followed by each cause not already spelled out in the text.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// A classified connection failure. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// 28P01
    #[error("invalid password for user \"{user}\"")]
    InvalidPassword { user: String },

    /// 3D000
    #[error("database \"{database}\" does not exist")]
    DatabaseMissing { database: String },

    /// 08006
    #[error(
        "could not connect to {host}:{port}; check that the server is running and reachable"
    )]
    Unreachable { host: String, port: u16 },

    /// 08001
    #[error(
        "connection to {host}:{port} was refused; check that the server is running and accepting connections"
    )]
    Refused { host: String, port: u16 },

    /// 08003
    #[error("connection to {host}:{port} was lost; check that the server is still available")]
    Lost { host: String, port: u16 },

    /// Any other server-reported SQLSTATE; echoes the server's message
    #[error("{message}")]
    Backend { code: String, message: String },

    /// No SQLSTATE available; the driver's text unmodified
    #[error("{0}")]
    Other(String),
}

impl ConnectError {
    /// Classify a connect or ping failure against the target it was for.
    pub fn classify(failure: DriverFailure, target: &ConnectTarget) -> Self {
        let Some(code) = failure.code else {
            return ConnectError::Other(failure.raw);
        };

        match code.as_str() {
            "28P01" => ConnectError::InvalidPassword {
                user: target.user.clone(),
            },
            "3D000" => ConnectError::DatabaseMissing {
                database: target.database.clone(),
            },
            "08006" => ConnectError::Unreachable {
                host: target.host.clone(),
                port: target.port,
            },
            "08001" => ConnectError::Refused {
                host: target.host.clone(),
                port: target.port,
            },
            "08003" => ConnectError::Lost {
                host: target.host.clone(),
                port: target.port,
            },
            other => ConnectError::Backend {
                code: other.to_string(),
                message: failure.message.unwrap_or(failure.raw),
            },
        }
    }

    /// Short category label for display and logging.
    pub fn category(&self) -> &'static str {
        match self {
            ConnectError::InvalidPassword { .. } => "invalid-password",
            ConnectError::DatabaseMissing { .. } => "database-missing",
            ConnectError::Unreachable { .. } => "connection-unreachable",
            ConnectError::Refused { .. } => "connection-refused",
            ConnectError::Lost { .. } => "connection-lost",
            ConnectError::Backend { .. } => "backend",
            ConnectError::Other(_) => "generic",
        }
    }

    /// SQLSTATE the classification was based on, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            ConnectError::InvalidPassword { .. } => Some("28P01"),
            ConnectError::DatabaseMissing { .. } => Some("3D000"),
            ConnectError::Unreachable { .. } => Some("08006"),
            ConnectError::Refused { .. } => Some("08001"),
            ConnectError::Lost { .. } => Some("08003"),
            ConnectError::Backend { code, .. } => Some(code),
            ConnectError::Other(_) => None,
        }
    }
}
