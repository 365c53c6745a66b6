//! Workspace integration tests over the in-memory stores.

mod helpers;

mod dispatch_test;
mod jobs_test;
mod otp_test;
mod store_test;
