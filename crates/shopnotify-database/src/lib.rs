//! # shopnotify-database
//!
//! Persistence seams for ShopNotify: the [`NotificationStore`],
//! [`CommerceQuery`], and [`DeviceTokenLookup`] traits, their PostgreSQL
//! repositories, and in-memory implementations for tests and local runs.

pub mod connection;
pub mod filter;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use filter::NotificationFilter;
pub use traits::{CommerceQuery, DeviceTokenLookup, NotificationStore};
