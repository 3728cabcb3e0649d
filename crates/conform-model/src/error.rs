use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid {kind} rule: {reason}")]
    InvalidRule { kind: &'static str, reason: String },
    #[error("activity name must not be empty in {kind} rule")]
    EmptyActivity { kind: &'static str },
    #[error("no eligible cases for {rule}; violation percentage is undefined")]
    NoEligibleCases { rule: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
