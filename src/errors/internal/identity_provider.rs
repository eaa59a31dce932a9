use thiserror::Error;

/// Closed error set for the identity-provider client.
///
/// Every operation on the provider trait fails with one of these kinds so
/// the registration saga and login flow can branch exhaustively.
#[derive(Error, Debug)]
pub enum IdentityProviderError {
    /// The provider answered and said no (4xx/5xx with a body).
    #[error("identity provider rejected {operation}: {status} {message}")]
    Rejected {
        operation: String,
        status: u16,
        message: String,
    },

    /// The provider could not be reached or the call timed out.
    #[error("identity provider unreachable during {operation}: {message}")]
    Unreachable { operation: String, message: String },

    /// An identity token failed signature or claim verification.
    #[error("identity token verification failed: {0}")]
    InvalidToken(String),

    /// The provider answered with something the client could not interpret
    /// (missing Location header, malformed JSON, unknown signing key).
    #[error("identity provider protocol error during {operation}: {message}")]
    Protocol { operation: String, message: String },
}

impl IdentityProviderError {
    pub fn rejected(operation: &str, status: u16, message: impl Into<String>) -> Self {
        IdentityProviderError::Rejected {
            operation: operation.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn unreachable(operation: &str, source: &reqwest::Error) -> Self {
        IdentityProviderError::Unreachable {
            operation: operation.to_string(),
            message: source.to_string(),
        }
    }

    pub fn protocol(operation: &str, message: impl Into<String>) -> Self {
        IdentityProviderError::Protocol {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
