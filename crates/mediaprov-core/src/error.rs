//! Error types module
//!
//! All failures surfaced by an operation are unified under [`AppError`]. Each
//! variant self-describes how it is presented to the caller through the
//! [`ErrorMetadata`] trait, so the HTTP layer never has to match on variants.

use std::io;

/// Level an error is logged at when it reaches the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: bad input, unknown names
    Debug,
    /// Upstream rejections and lost races
    Warn,
    /// Failures inside this service
    Error,
}

/// Presentation of an error to the caller
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable code such as `VALIDATION_ERROR`
    fn error_code(&self) -> &'static str;

    /// Whether resending the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to return to the caller
    fn client_message(&self) -> String;

    /// Whether details must never leave the process
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input. Never reaches an external call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A named resource whose absence is meaningful to the operation.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The control plane rejected the call.
    #[error("Media API call error: {code}: {message}")]
    Api { code: String, message: String },

    /// A create lost a race against a concurrent create of the same name.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The external service could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

/// How a variant is presented to callers
struct ErrorClass {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const VALIDATION: ErrorClass = ErrorClass {
    status: 400,
    code: "VALIDATION_ERROR",
    recoverable: false,
    action: Some("Fix the request body and resend it"),
    sensitive: false,
    level: LogLevel::Debug,
};

// Absent resources keep the 400 the functions have always answered with
const NOT_FOUND: ErrorClass = ErrorClass {
    status: 400,
    code: "NOT_FOUND",
    recoverable: false,
    action: Some("Verify the resource name exists"),
    sensitive: false,
    level: LogLevel::Debug,
};

const API: ErrorClass = ErrorClass {
    status: 400,
    code: "API_ERROR",
    recoverable: false,
    action: Some("Inspect the upstream error code and message"),
    sensitive: false,
    level: LogLevel::Warn,
};

const CONFLICT: ErrorClass = ErrorClass {
    status: 409,
    code: "CONFLICT",
    recoverable: true,
    action: Some("Resend the request; the resource may now exist"),
    sensitive: false,
    level: LogLevel::Warn,
};

const TRANSPORT: ErrorClass = ErrorClass {
    status: 400,
    code: "TRANSPORT_ERROR",
    recoverable: true,
    action: Some("Resend the request once the service is reachable"),
    sensitive: false,
    level: LogLevel::Warn,
};

const UNAUTHORIZED: ErrorClass = ErrorClass {
    status: 401,
    code: "UNAUTHORIZED",
    recoverable: false,
    action: Some("Pass a valid function key"),
    sensitive: false,
    level: LogLevel::Debug,
};

const INTERNAL: ErrorClass = ErrorClass {
    status: 500,
    code: "INTERNAL_ERROR",
    recoverable: true,
    action: Some("Resend the request later"),
    sensitive: true,
    level: LogLevel::Error,
};

impl AppError {
    fn class(&self) -> &'static ErrorClass {
        match self {
            AppError::Validation(_) => &VALIDATION,
            AppError::NotFound(_) => &NOT_FOUND,
            AppError::Api { .. } => &API,
            AppError::Conflict(_) => &CONFLICT,
            AppError::Transport(_) => &TRANSPORT,
            AppError::Unauthorized(_) => &UNAUTHORIZED,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => &INTERNAL,
        }
    }

    /// Variant name, exposed as `error_type` outside production
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::Api { .. } => "Api",
            AppError::Conflict(_) => "Conflict",
            AppError::Transport(_) => "Transport",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// The message followed by up to five `Caused by` lines from the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut lines = vec![self.to_string()];
        let mut cause = self.source();
        while let Some(err) = cause {
            if lines.len() > 5 {
                lines.push("  ... (truncated)".to_string());
                break;
            }
            lines.push(format!("  Caused by: {}", err));
            cause = err.source();
        }
        lines.join("\n")
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.class().status
    }

    fn error_code(&self) -> &'static str {
        self.class().code
    }

    fn is_recoverable(&self) -> bool {
        self.class().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.class().action
    }

    fn is_sensitive(&self) -> bool {
        self.class().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.class().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Api { code, message } => {
                format!("Media API call error: {}: {}", code, message)
            }
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Transport(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
        }
    }
}
