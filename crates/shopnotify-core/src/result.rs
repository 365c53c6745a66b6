//! Convenience result type alias for ShopNotify.

use crate::error::AppError;

/// A specialized `Result` type for ShopNotify operations.
pub type AppResult<T> = Result<T, AppError>;
