//! Commerce entities read by the detection jobs.

pub mod cart;
pub mod group;
pub mod order;
pub mod product;
pub mod stats;
pub mod user;

pub use cart::CartItem;
pub use group::{GroupJoin, GroupPurchase};
pub use order::{Order, OrderStage};
pub use product::Product;
pub use stats::WeeklyStats;
pub use user::User;
