//! 微信返回数据与本地记录之间的转换, 不做任何 I/O

pub mod coupon_mapper;
pub mod stock_mapper;
