//! One-time passwords over the shared TTL store.

use std::sync::Arc;
use std::time::Duration;

use shopnotify_core::config::OtpConfig;
use shopnotify_service::{OtpService, TtlStore};

fn service() -> OtpService {
    OtpService::new(Arc::new(TtlStore::new()), &OtpConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_code_is_single_use() {
    let otp = service();
    let code = otp.issue("+1 555 0100").unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    assert!(otp.verify("+1 555 0100", &code).unwrap());
    assert!(!otp.verify("+1 555 0100", &code).unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_code_expires_after_ttl() {
    let otp = service();
    let code = otp.issue("+1 555 0101").unwrap();

    tokio::time::advance(Duration::from_secs(601)).await;
    assert!(!otp.verify("+1 555 0101", &code).unwrap());
}
