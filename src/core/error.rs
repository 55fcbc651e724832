use thiserror::Error;

/// Validation errors raised by the core's input checks.
///
/// The matching path never returns these; a zone that would fail
/// validation is skipped instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeliveryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DeliveryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DeliveryError::InvalidInput(message.into())
    }
}
