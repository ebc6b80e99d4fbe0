use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::entities::{Badge, CouponStatus, coupon_entity};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponResponse {
    pub id: i64,
    pub coupon_code: String,
    pub stock_id: String,
    pub openid: Option<String>,
    pub status: CouponStatus,
    pub status_label: String,
    pub status_badge: Badge,
    pub used_time: Option<DateTime<Utc>>,
    pub expiry_time: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub use_request_no: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub use_info: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<coupon_entity::Model> for CouponResponse {
    fn from(coupon: coupon_entity::Model) -> Self {
        Self {
            id: coupon.id,
            status_label: coupon.status.label().to_string(),
            status_badge: coupon.status.badge(),
            status: coupon.status,
            coupon_code: coupon.coupon_code,
            stock_id: coupon.stock_id,
            openid: coupon.openid,
            used_time: coupon.used_time,
            expiry_time: coupon.expiry_time,
            transaction_id: coupon.transaction_id,
            use_request_no: coupon.use_request_no,
            use_info: coupon.use_info,
            created_at: coupon.created_at,
            updated_at: coupon.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CouponQuery {
    pub stock_id: Option<String>,
    pub openid: Option<String>,
    /// 为 true 时只返回可用的券
    pub available: Option<bool>,
}

/// 核销参数, 对应微信核销接口的请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UseCouponParams {
    pub coupon_code: String,
    pub stock_id: String,
    pub appid: String,
    pub openid: String,
    pub use_request_no: String,
}

/// 后台核销请求, `appid`/`use_request_no` 可省略
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemCouponRequest {
    pub coupon_code: String,
    pub stock_id: String,
    pub openid: String,
    pub appid: Option<String>,
    pub use_request_no: Option<String>,
}

/// 用户券列表查询条件
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserCouponsQuery {
    pub openid: String,
    pub appid: String,
    pub stock_id: Option<String>,
    pub status: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserCouponsFilter {
    pub appid: Option<String>,
    pub stock_id: Option<String>,
    pub status: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppidQuery {
    pub appid: Option<String>,
}
