//! Detection job implementations, one module per category.

pub mod cart_abandonment;
pub mod flash_sale;
pub mod group;
pub mod inactivity;
pub mod order_status;
pub mod placeholder;
pub mod price_drop;
pub mod recommendations;
pub mod return_reminder;
pub mod weekly_report;

pub use cart_abandonment::CartAbandonmentJob;
pub use flash_sale::FlashSaleJob;
pub use group::{GroupAlmostCompleteJob, GroupJoinJob};
pub use inactivity::InactivityJob;
pub use order_status::OrderStatusJob;
pub use placeholder::PlaceholderJob;
pub use price_drop::PriceDropJob;
pub use recommendations::RecommendationsJob;
pub use return_reminder::ReturnReminderJob;
pub use weekly_report::WeeklyReportJob;
