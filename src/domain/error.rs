use thiserror::Error;

/// Core domain errors
///
/// Every variant carries owned strings so a single outcome can be cloned out
/// to all waiters of a shared upstream fetch.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Validation error at '{path}': {message}")]
    Validation { path: String, message: String },

    #[error("Upstream error: {source_name} - {message}")]
    Upstream {
        source_name: String,
        message: String,
    },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn upstream(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure originated upstream (network, status, timeout or bad payload)
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Validation { .. })
    }
}
