use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmortizationError {
    #[error("loan never repays: amortizing payment {payment} does not exceed periodic interest {interest}")]
    NonConvergent {
        payment: f64,
        interest: f64,
    },

    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("there are no loans in the collection")]
    EmptyCollection,

    #[error("date out of range: {message}")]
    DateOutOfRange {
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl AmortizationError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AmortizationError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AmortizationError>;
