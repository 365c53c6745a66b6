//! # shopnotify-entity
//!
//! Domain entity models for ShopNotify. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod commerce;
pub mod device;
pub mod money;
pub mod notification;
