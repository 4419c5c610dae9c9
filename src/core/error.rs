use thiserror::Error;

/// Errors raised by the derivation transforms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),
}

impl TransformError {
    /// A required property is absent on the feature at `index`
    pub fn missing_property(index: usize, property: &str) -> Self {
        TransformError::InvalidInput(format!(
            "feature #{} is missing required property '{}'",
            index, property
        ))
    }

    /// A property is present but unusable (zero divisor, non-finite value, ...)
    pub fn invalid_property(index: usize, property: &str, value: f64) -> Self {
        TransformError::InvalidInput(format!(
            "feature #{} has invalid '{}' = {}",
            index, property, value
        ))
    }
}

pub type TransformResult<T> = Result<T, TransformError>;
