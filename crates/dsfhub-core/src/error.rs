//! Error types for dsfhub-core

use thiserror::Error;

/// Result type alias using dsfhub-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation being performed against the hub when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    ReadAll,
    Update,
    Delete,
    Verify,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::ReadAll => write!(f, "read all"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::Verify => write!(f, "verify"),
        }
    }
}

/// The integration kind and, when known, the identifier a call was addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub kind: String,
    pub id: Option<String>,
}

impl Subject {
    pub fn new(kind: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            kind: kind.into(),
            id: id.map(str::to_string),
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} '{}'", self.kind, id),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Error taxonomy for the DSF Hub client
#[derive(Error, Debug)]
pub enum Error {
    /// Settings rejected at construction time
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A configuration could not be mapped into a kind payload
    #[error("Schema violation at '{field}': {message}")]
    SchemaViolation { field: String, message: String },

    /// Network failure, deadline expiry or cancellation
    #[error("Transport error during {operation} of {subject}: {message}")]
    Transport {
        subject: Subject,
        operation: Operation,
        message: String,
    },

    /// Response body did not parse as the expected envelope
    #[error("Malformed response during {operation} of {subject}: {reason}; body: {body}")]
    MalformedResponse {
        subject: Subject,
        operation: Operation,
        reason: String,
        body: String,
    },

    /// Envelope parsed but declared failure
    #[error("API error during {operation} of {subject} (HTTP {status}): {body}")]
    Api {
        subject: Subject,
        operation: Operation,
        status: u16,
        code: Option<i64>,
        body: String,
    },

    /// The addressed resource does not exist on the hub
    #[error("{subject} not found")]
    NotFound { subject: Subject },

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a schema violation for the field at `field`
    pub fn schema_violation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(subject: Subject, operation: Operation, message: impl Into<String>) -> Self {
        Self::Transport {
            subject,
            operation,
            message: message.into(),
        }
    }

    /// Create a malformed response error, keeping the raw body for diagnostics
    pub fn malformed_response(
        subject: Subject,
        operation: Operation,
        reason: impl Into<String>,
        body: &[u8],
    ) -> Self {
        Self::MalformedResponse {
            subject,
            operation,
            reason: reason.into(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Create an API error, keeping the raw body for diagnostics
    pub fn api(
        subject: Subject,
        operation: Operation,
        status: u16,
        code: Option<i64>,
        body: &[u8],
    ) -> Self {
        Self::Api {
            subject,
            operation,
            status,
            code,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Create a not found error
    pub fn not_found(subject: Subject) -> Self {
        Self::NotFound { subject }
    }

    /// Whether the error means the resource is absent on the hub
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
