//! Error taxonomy for Portainer operations.

use crate::transport::{ApiResponse, TransportError};

/// Errors raised by the session and service layers.
///
/// The only error the client recovers from locally is an expired session
/// (one bounded re-authentication, see [`crate::session`]); everything else
/// bubbles to the caller unmodified.
#[derive(Debug, thiserror::Error)]
pub enum PortainerError {
    /// Credential rejection at login. Fatal for the calling operation.
    #[error("Portainer rejected the configured credentials: {0}")]
    Authentication(String),

    /// The cached token expired and could not be renewed within the retry
    /// budget.
    #[error("session could not be renewed after {attempts} attempts")]
    SessionExpired { attempts: u32 },

    /// Input rejected before any orchestrator call was made.
    #[error("{0}")]
    Validation(String),

    /// Portainer reported no registered endpoints; there is nothing to
    /// deploy onto.
    #[error("Portainer has no registered endpoints")]
    MissingEndpoint,

    /// Any non-auth failure reported by Portainer.
    #[error("Portainer returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// A response body that did not have the expected shape.
    #[error("malformed Portainer response: {0}")]
    MalformedResponse(String),

    /// The stack descriptor could not be rendered or parsed.
    #[error("compose descriptor error: {0}")]
    Descriptor(#[from] serde_yaml::Error),

    #[error("invalid Portainer URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PortainerError {
    /// Build the error for a non-success Portainer response.
    pub(crate) fn from_response(response: &ApiResponse) -> Self {
        PortainerError::Api {
            status: response.status,
            message: response.error_message(),
        }
    }

    /// True for failures the REST layer should surface as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PortainerError::Validation(_))
    }
}
