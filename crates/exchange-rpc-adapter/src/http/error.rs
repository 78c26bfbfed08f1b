/*
[INPUT]:  Error sources (transport, JSON decoding, JSON-RPC error objects, config)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error taxonomy for the request pipeline
[UPDATE]: When adding new error sources or error kinds
*/

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Error families an endpoint can be configured to raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Generic betting/account API failure
    Api,
    /// Failure while logging in
    Login,
    /// Failure while keeping a session alive
    KeepAlive,
    /// Failure while logging out
    Logout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Api => "APIError",
            ErrorKind::Login => "LoginError",
            ErrorKind::KeepAlive => "KeepAliveError",
            ErrorKind::Logout => "LogoutError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an endpoint reports transport, decode and application failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Wrap every failure into the given kind
    Wrap(ErrorKind),
    /// Surface failures as their native error type
    Passthrough,
}

impl ErrorPolicy {
    /// Configured kind, if this policy wraps
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ErrorPolicy::Wrap(kind) => Some(*kind),
            ErrorPolicy::Passthrough => None,
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Wrap(ErrorKind::Api)
    }
}

/// Network-layer failure raised by a transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying HTTP client failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connect or read phase exceeded its budget
    #[error("request timed out: {0}")]
    Timeout(String),

    /// TLS handshake or identity failure
    #[error("TLS failure: {0}")]
    Tls(String),

    /// Certificate material could not be read
    #[error("failed to read certificate {path}: {source}")]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header name or value rejected by the HTTP client
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// I/O runtime driving the request could not be started
    #[error("failed to start I/O runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl TransportError {
    /// Check if the failure was a timeout in either phase
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Http(err) => err.is_timeout(),
            TransportError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Check if the failure happened while connecting
    pub fn is_connect(&self) -> bool {
        match self {
            TransportError::Http(err) => err.is_connect(),
            TransportError::Connect(_) => true,
            _ => false,
        }
    }
}

/// Error object embedded in a JSON-RPC response body
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationError {
    /// JSON-RPC error code
    pub code: Option<i64>,
    /// JSON-RPC error message
    pub message: Option<String>,
    /// Exchange error code, e.g. `INVALID_SESSION_INFORMATION`
    pub error_code: Option<String>,
    /// Raw `error` value as received
    pub raw: Value,
}

impl ApplicationError {
    /// Extract structured context from the `error` value of a response.
    ///
    /// The exchange nests its own code under `data.<SomeException>.errorCode`,
    /// so every object under `data` is searched.
    pub fn from_error_value(raw: &Value) -> Self {
        let code = raw.get("code").and_then(Value::as_i64);
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let error_code = raw
            .get("data")
            .and_then(Value::as_object)
            .and_then(|data| {
                data.values()
                    .find_map(|detail| detail.get("errorCode").and_then(Value::as_str))
            })
            .map(str::to_string);

        Self {
            code,
            message,
            error_code,
            raw: raw.clone(),
        }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error_code, self.code, &self.message) {
            (Some(error_code), _, _) => write!(f, "{error_code}"),
            (None, Some(code), Some(message)) => write!(f, "code {code}: {message}"),
            (None, Some(code), None) => write!(f, "code {code}"),
            (None, None, Some(message)) => write!(f, "{message}"),
            (None, None, None) => write!(f, "{}", self.raw),
        }
    }
}

impl std::error::Error for ApplicationError {}

/// Underlying reason of a wrapped failure
#[derive(Error, Debug)]
pub enum FailureCause {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Body decoded but carries no usable `result` or `error`
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A failure wrapped into an endpoint's configured error kind
#[derive(Debug)]
pub struct ApiFailure {
    pub kind: ErrorKind,
    /// RPC method being called, when known
    pub method: Option<String>,
    /// Params sent with the call, when known
    pub params: Option<Value>,
    pub cause: FailureCause,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(method) = &self.method {
            write!(f, " [{method}]")?;
        }
        if let Some(params) = &self.params {
            write!(f, " params: {params}")?;
        }
        write!(f, ": {}", self.cause)
    }
}

impl std::error::Error for ApiFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Body shapes the response processor cannot normalise
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("response body must be a JSON array or object, got {0}")]
    Unsupported(&'static str),

    #[error("response `result` is null")]
    NullResult,
}

/// Main error type for the request pipeline
#[derive(Error, Debug)]
pub enum EndpointError {
    /// Failure wrapped into the endpoint's error kind
    #[error(transparent)]
    Wrapped(Box<ApiFailure>),

    /// Transport failure on an endpoint that does not wrap
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Undecodable body on an endpoint that does not wrap
    #[error("invalid JSON in response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Application error on an endpoint that does not wrap
    #[error("application error: {0}")]
    Application(ApplicationError),

    /// Body decoded but is not a usable response
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Body shape rejected by the response processor
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Request params could not be serialized
    #[error("failed to serialize request: {0}")]
    Envelope(#[source] serde_json::Error),

    /// Element could not be hydrated into a typed resource
    #[error("failed to hydrate resource: {0}")]
    Hydration(#[source] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl EndpointError {
    /// Apply an endpoint's policy to a failure cause
    pub fn from_cause(
        policy: ErrorPolicy,
        method: Option<&str>,
        params: Option<Value>,
        cause: FailureCause,
    ) -> Self {
        match policy {
            ErrorPolicy::Wrap(kind) => EndpointError::Wrapped(Box::new(ApiFailure {
                kind,
                method: method.map(str::to_string),
                params,
                cause,
            })),
            ErrorPolicy::Passthrough => match cause {
                FailureCause::Transport(err) => EndpointError::Transport(err),
                FailureCause::Decode(err) => EndpointError::Decode(err),
                FailureCause::Application(err) => EndpointError::Application(err),
                FailureCause::InvalidResponse(reason) => EndpointError::InvalidResponse(reason),
            },
        }
    }

    /// Configured kind, when the failure was wrapped
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EndpointError::Wrapped(failure) => Some(failure.kind),
            _ => None,
        }
    }

    /// Embedded application error, wrapped or native
    pub fn application_error(&self) -> Option<&ApplicationError> {
        match self {
            EndpointError::Wrapped(failure) => match &failure.cause {
                FailureCause::Application(err) => Some(err),
                _ => None,
            },
            EndpointError::Application(err) => Some(err),
            _ => None,
        }
    }

    /// Underlying transport error, wrapped or native
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            EndpointError::Wrapped(failure) => match &failure.cause {
                FailureCause::Transport(err) => Some(err),
                _ => None,
            },
            EndpointError::Transport(err) => Some(err),
            _ => None,
        }
    }

    /// Check if the failure happened at the network layer
    pub fn is_transport(&self) -> bool {
        self.transport_error().is_some()
    }

    /// Check if the error is worth retrying by the caller.
    ///
    /// Only network and timeout failures qualify; certificate, TLS identity,
    /// header and runtime setup failures repeat on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.transport_error(),
            Some(TransportError::Http(_) | TransportError::Connect(_) | TransportError::Timeout(_))
        )
    }
}

/// Result type alias for endpoint operations
pub type Result<T> = std::result::Result<T, EndpointError>;
