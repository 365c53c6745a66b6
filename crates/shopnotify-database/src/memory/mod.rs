//! In-memory implementations of the persistence traits.
//!
//! Used by the test suites and by the server when no database is
//! configured. They honour the same visibility and ordering rules as the
//! PostgreSQL repositories.

pub mod commerce;
pub mod device;
pub mod notification;

pub use commerce::MemoryCommerceStore;
pub use device::MemoryDeviceRegistry;
pub use notification::MemoryNotificationStore;
