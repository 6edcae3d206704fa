use thiserror::Error;

use crate::form::Feature;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Why a submission ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    BadRequest,
    Unexpected,
    Network,
}

/// Errors surfaced by the prediction lifecycle.
///
/// `Display` is the text shown to the user; the variant fields keep the
/// detail for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// Rejected before sending. Only raised in strict input mode.
    #[error("{feature} must be a number, got {text:?}")]
    InvalidInput { feature: Feature, text: String },

    #[error("unknown field {0:?}")]
    UnknownFeature(String),

    /// Status 400; the service's `error` text is shown verbatim.
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", UNEXPECTED_ERROR_MESSAGE)]
    UnexpectedStatus { status: u16 },

    #[error("{}", UNEXPECTED_ERROR_MESSAGE)]
    MalformedResponse { detail: String },

    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network { detail: String },

    #[error("cannot build HTTP client: {0}")]
    Client(String),
}

impl PredictError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput { .. } | Self::UnknownFeature(_) => FailureKind::Validation,
            Self::BadRequest(_) => FailureKind::BadRequest,
            Self::UnexpectedStatus { .. } | Self::MalformedResponse { .. } | Self::Client(_) => {
                FailureKind::Unexpected
            }
            Self::Network { .. } => FailureKind::Network,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
