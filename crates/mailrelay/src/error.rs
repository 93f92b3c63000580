/// Failure reported by a [`crate::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The provider answered but refused the message.
    #[error("mail provider rejected message: {0}")]
    Rejected(String),
    /// The request never completed (DNS, TLS, timeout, ...).
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Terminal outcome of a single relay request. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("method {0:?} not allowed")]
    MethodNotAllowed(Option<String>),
    #[error("invalid submission: {0}")]
    Validation(String),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl RelayError {
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MethodNotAllowed(_) => 405,
            RelayError::Validation(_) => 400,
            RelayError::Delivery(_) => 500,
        }
    }

    /// Caller-facing text. Delivery details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MethodNotAllowed(_) => "Only POST requests allowed",
            RelayError::Validation(_) => "All fields are required.",
            RelayError::Delivery(_) => "Something went wrong while sending your message.",
        }
    }
}
