//! Gateway error types

use thiserror::Error;

/// Failure to deliver an outbound action
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Rejected, message)
    }

    pub fn document(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Document, message)
    }
}

/// Error classification, for logs only. Every kind gets the same recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Timeouts, refused connections
    Network,
    /// The platform answered with a non-success status
    Rejected,
    /// The document to deliver could not be read
    Document,
}
