use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodCallErrorCategory {
    UserActionRequired,
    TemporaryFailure,
    InternalFailure,
}

/// Failures raised by calls against the workspace server's method surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodCallError {
    /// Client-side gateway configuration problems: missing or blank
    /// credentials, malformed timeout values.
    #[error("gateway configuration invalid: {message}")]
    Config { message: String },
    #[error("workspace server rejected the credentials")]
    Auth,
    #[error("workspace server rate limit reached")]
    RateLimited,
    #[error("workspace server request timed out")]
    Timeout,
    /// Non-success HTTP status, carrying the server's own error message when
    /// the body was parseable.
    #[error("workspace server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("workspace server transport failed: {message}")]
    Transport { message: String },
    #[error("workspace server response could not be decoded: {message}")]
    InvalidResponse { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl MethodCallError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn category(&self) -> MethodCallErrorCategory {
        match self {
            Self::Config { .. } | Self::Auth => MethodCallErrorCategory::UserActionRequired,
            // 4xx means the request itself was rejected; retrying without a
            // change on the operator's side will not help.
            Self::Server { status, .. } if *status < 500 => {
                MethodCallErrorCategory::UserActionRequired
            }
            Self::RateLimited | Self::Timeout | Self::Server { .. } | Self::Transport { .. } => {
                MethodCallErrorCategory::TemporaryFailure
            }
            Self::InvalidResponse { .. } | Self::Internal { .. } => {
                MethodCallErrorCategory::InternalFailure
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("The workspace gateway is not configured correctly: {message}")
            }
            Self::Auth => {
                "The workspace server rejected the admin credentials.".to_string()
            }
            Self::RateLimited => {
                "The workspace server is rate limiting requests. Try again shortly.".to_string()
            }
            Self::Timeout => "The workspace server did not respond in time.".to_string(),
            Self::Server { message, .. } => {
                format!("The workspace server reported an error: {message}")
            }
            Self::Transport { message } => {
                format!("Could not reach the workspace server: {message}")
            }
            Self::InvalidResponse { message } => {
                format!("The workspace server sent an unexpected response: {message}")
            }
            Self::Internal { message } => {
                format!("An internal error occurred: {message}")
            }
        }
    }
}
