pub mod coupon_repository;
pub mod stock_repository;

pub use coupon_repository::CouponRepository;
pub use stock_repository::StockRepository;
