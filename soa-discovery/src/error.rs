//! Error types for service instances and load balancing

use std::fmt;
use thiserror::Error;

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A construction-time invariant was violated
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Wire text could not be parsed as an instance
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A required wire field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A caller passed an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Create a malformed input error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Create a missing field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a malformed input error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }

    /// Check if this is a missing field error
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Name of the missing field, if this is a missing field error
    pub fn missing_field_name(&self) -> Option<&str> {
        match self {
            Self::MissingField(field) => Some(field),
            _ => None,
        }
    }

    /// The validation details, if this is a validation error
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

/// Rejected instance field, raised while building a [`ServiceInstance`]
///
/// [`ServiceInstance`]: crate::ServiceInstance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Which part of the instance was rejected: `name`, `address` or `payload`
    pub field: String,

    /// Human-readable reason
    pub message: String,

    /// Rule that failed, e.g. `serviceName`, `portPresent`, `maxLength`
    pub constraint: String,

    /// Offending input, when short enough to be worth echoing back
    pub value: Option<String>,
}

impl ValidationError {
    /// Reject `field` with a reason; the rule defaults to `invalid`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "invalid".to_string(),
            value: None,
        }
    }

    /// Name the rule that failed
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Attach the rejected input
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.field, self.message, self.constraint)
    }
}

impl std::error::Error for ValidationError {}
