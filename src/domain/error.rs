use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Unexpected redirect (HTTP {status}) to: {location}")]
    UnexpectedRedirect { status: u16, location: String },

    #[error("HTTP error: {message}")]
    Http { status: Option<u16>, message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Operation '{operation}' is not supported by MaxKB API {api_version}")]
    Unsupported {
        operation: String,
        api_version: String,
    },
}

impl DomainError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn unexpected_redirect(status: u16, location: impl Into<String>) -> Self {
        Self::UnexpectedRedirect {
            status,
            location: location.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status: Some(status),
            message: format!("HTTP {}: {}", status, body.into()),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            status: None,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            api_version: api_version.into(),
        }
    }

    /// Stable tag for the error class, used in caller-visible error objects
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::UnexpectedRedirect { .. } => "unexpected_redirect",
            Self::Http { .. } => "http",
            Self::Decode { .. } => "decode",
            Self::Validation { .. } => "validation",
            Self::Configuration { .. } => "configuration",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}
