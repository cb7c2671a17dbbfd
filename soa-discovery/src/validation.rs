// Built-in validators for service instance fields

use crate::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

// Service names end up embedded in coordination paths, so only a restricted
// alphabet is allowed.
static SERVICE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$").expect("valid service name regex"));

/// Validates a service name: non-empty, alphanumeric start, then
/// alphanumerics, underscores and hyphens only
pub struct ValidServiceName;

impl ValidServiceName {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Err(
                ValidationError::new(field, format!("{} should not be empty", field))
                    .with_constraint("notEmpty"),
            );
        }

        if SERVICE_NAME_REGEX.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!(
                    "{} may only contain letters, digits, underscores and hyphens",
                    field
                ),
            )
            .with_constraint("serviceName")
            .with_value(value))
        }
    }

    /// Check without building an error
    pub fn is_valid(value: &str) -> bool {
        SERVICE_NAME_REGEX.is_match(value)
    }
}

/// Validates that a host is present
pub struct HostPresent;

impl HostPresent {
    pub fn validate(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(
                ValidationError::new(field, format!("{} must include a hostname", field))
                    .with_constraint("hostPresent"),
            )
        } else {
            Ok(())
        }
    }
}

/// Validates that a port is present and usable (1-65535)
pub struct PortPresent;

impl PortPresent {
    pub fn validate(value: Option<u16>, field: &str) -> Result<u16, ValidationError> {
        match value {
            None => Err(
                ValidationError::new(field, format!("{} must include a port", field))
                    .with_constraint("portPresent"),
            ),
            Some(0) => Err(ValidationError::new(
                field,
                format!("{} port must be between 1 and 65535", field),
            )
            .with_constraint("portRange")
            .with_value("0")),
            Some(port) => Ok(port),
        }
    }
}

/// Validates maximum string length, counted in characters
pub struct MaxChars(pub usize);

impl MaxChars {
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        // Byte length is an upper bound on the character count.
        if value.len() <= self.0 || value.chars().count() <= self.0 {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("{} must be at most {} characters", field, self.0),
            )
            .with_constraint("maxLength"))
        }
    }
}
