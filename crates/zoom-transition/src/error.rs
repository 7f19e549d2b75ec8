//! Error types for the transition controller.

use thiserror::Error;

/// Result type for transition operations.
pub type Result<T> = std::result::Result<T, TransitionError>;

/// Errors that can occur while building a controller from caller input.
///
/// Nothing in the running lifecycle returns these: once mounted, a controller
/// degrades to fallbacks instead of failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// A CSS timing function could not be parsed.
    #[error("invalid easing function: {0}")]
    InvalidEasing(String),

    /// A duration was negative or not finite.
    #[error("invalid duration: {0}ms")]
    InvalidDuration(f64),
}
