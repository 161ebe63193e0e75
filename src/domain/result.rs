//! Result type alias for PowerMap

use super::errors::PowerMapError;

/// Result type alias for PowerMap operations
///
/// Uses `PowerMapError` as the error type.
///
/// # Examples
///
/// ```
/// use powermap::domain::result::Result;
/// use powermap::domain::errors::PowerMapError;
///
/// fn failing_function() -> Result<()> {
///     Err(PowerMapError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PowerMapError>;
