//! Core traits defined in `shopnotify-core` and implemented by other crates.

pub mod channel;

pub use channel::{PushChannel, PushResult, RealtimeChannel, user_group};

#[cfg(test)]
mod tests {
    use crate::traits::user_group;
    use crate::types::id::UserId;

    #[test]
    fn test_user_group_reexported_for_typed_ids() {
        assert_eq!(user_group(UserId(7)), "user_7");
    }
}
