//! # shopnotify-service
//!
//! Service layer for ShopNotify. Services follow constructor injection:
//! every collaborator is handed over as an `Arc` at construction time.

pub mod notification;
pub mod otp;

pub use notification::{NotificationDispatcher, NotificationService};
pub use otp::{OtpService, TtlStore};
