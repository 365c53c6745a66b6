//! One-time password issuance and verification.

pub mod service;
pub mod store;

pub use service::OtpService;
pub use store::TtlStore;
