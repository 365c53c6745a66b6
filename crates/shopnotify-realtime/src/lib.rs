//! # shopnotify-realtime
//!
//! Real-time fan-out for ShopNotify. Subscribers join named groups
//! (`user_{id}` for a user's personal channel) and receive serialized
//! [`envelope::MessageEnvelope`]s over bounded mpsc channels.

pub mod envelope;
pub mod hub;

pub use envelope::MessageEnvelope;
pub use hub::RealtimeHub;
