use std::fmt;

use serde_json::Value as JsonValue;

/// Closed classification of a failed request outcome.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// 4xx other than 401. Never retried.
    ClientError,
    /// 401. Never retried; fires the session hook.
    Unauthorized,
    /// 500 and above. Retryable.
    ServerError,
    /// Transport failure other than a deadline. Retryable.
    NetworkError,
    /// Per-attempt deadline exceeded. Retryable.
    TimeoutError,
    /// Success status whose body could not be decoded. Never retried.
    DecodeError,
    /// Request could not be built (bad header, bad URL). Never retried.
    InvalidRequest,
}

impl ErrorKind {
    /// Returns `true` when another attempt may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::ServerError | Self::NetworkError | Self::TimeoutError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ClientError => "client error",
            Self::Unauthorized => "unauthorized",
            Self::ServerError => "server error",
            Self::NetworkError => "network error",
            Self::TimeoutError => "timeout",
            Self::DecodeError => "decode error",
            Self::InvalidRequest => "invalid request",
        };
        f.write_str(name)
    }
}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-retryable 4xx response (401 excluded).
    #[error("client error {status}: {message}")]
    Client {
        status: u16,
        /// Machine-readable code from the error body, if any.
        code: Option<String>,
        message: String,
        /// Structured details from the error body, if any.
        details: Option<JsonValue>,
    },
    /// 401 response. The session hook has already been notified.
    #[error("unauthorized: {message}")]
    Unauthorized {
        code: Option<String>,
        message: String,
        details: Option<JsonValue>,
    },
    /// Status 500 or above, non-standard codes included.
    #[error("server error {status}: {message}")]
    Server {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<JsonValue>,
    },
    /// Connection refused, DNS failure, broken body stream and similar.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// The attempt did not finish before its deadline.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// A success status carried a body that is not valid for the expected type.
    #[error("decode error (status {status}): {message}")]
    Decode {
        status: u16,
        message: String,
        /// Raw body text as received.
        body: String,
    },
    /// The request was rejected before any I/O, e.g. an invalid header override.
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { .. } => ErrorKind::ClientError,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Server { .. } => ErrorKind::ServerError,
            Self::Network { .. } => ErrorKind::NetworkError,
            Self::Timeout { .. } => ErrorKind::TimeoutError,
            Self::Decode { .. } => ErrorKind::DecodeError,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// HTTP status that produced the error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Decode { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Network { .. } | Self::Timeout { .. } | Self::InvalidRequest { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Client { code, .. }
            | Self::Unauthorized { code, .. }
            | Self::Server { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Human-readable message without the kind prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            Self::Client { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::Server { message, .. }
            | Self::Network { message, .. }
            | Self::Decode { message, .. }
            | Self::InvalidRequest { message, .. } => message.clone(),
            Self::Timeout { timeout_ms } => format!("request timed out after {timeout_ms} ms"),
        }
    }

    pub fn details(&self) -> Option<&JsonValue> {
        match self {
            Self::Client { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::Server { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}
