//! Notification domain entities.

pub mod model;
pub mod tag;

pub use model::{NewNotification, Notification};
pub use tag::NotificationTag;
