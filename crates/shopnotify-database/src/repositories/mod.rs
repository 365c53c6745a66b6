//! PostgreSQL implementations of the persistence traits.

pub mod commerce;
pub mod device;
pub mod notification;

pub use commerce::CommerceRepository;
pub use device::DeviceRepository;
pub use notification::NotificationRepository;
