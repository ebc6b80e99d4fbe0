pub mod coupons;
pub mod stocks;

pub use coupons as coupon_entity;
pub use coupons::CouponStatus;
pub use stocks as stock_entity;
pub use stocks::StockStatus;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 后台列表中状态徽章的样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Primary => "primary",
            Badge::Secondary => "secondary",
            Badge::Success => "success",
            Badge::Danger => "danger",
            Badge::Warning => "warning",
            Badge::Info => "info",
            Badge::Light => "light",
            Badge::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
