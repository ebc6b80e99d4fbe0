pub mod common;
pub mod coupon;
pub mod coupon_data;
pub mod stock;
pub mod stock_data;

pub use common::*;
pub use coupon::*;
pub use coupon_data::CouponData;
pub use stock::*;
pub use stock_data::StockData;
