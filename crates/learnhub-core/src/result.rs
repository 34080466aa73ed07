//! Convenience result type alias for LearnHub.

use crate::error::AppError;

/// A specialized `Result` type for LearnHub operations.
pub type AppResult<T> = Result<T, AppError>;
