//! # shopnotify-core
//!
//! Core crate for ShopNotify. Contains configuration schemas, typed
//! identifiers, pagination types, the delivery channel traits, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other ShopNotify crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
