use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entities::CouponStatus;
use crate::error::AppResult;
use crate::utils::parse_datetime;

/// 从微信返回的券数据中提取出的强类型数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponData {
    pub coupon_code: String,
    pub stock_id: String,
    pub openid: String,
    pub status: CouponStatus,
    pub expire_time: Option<DateTime<Utc>>,
    pub use_time: Option<DateTime<Utc>>,
}

impl CouponData {
    /// 缺失或类型不对的字段回落到默认值; 只有显式给出的非法状态会报错
    pub fn from_value(data: &Value, openid: &str) -> AppResult<Self> {
        Ok(Self {
            coupon_code: extract_string(data, "coupon_code"),
            stock_id: extract_string(data, "stock_id"),
            openid: openid.to_string(),
            status: extract_status(data)?,
            expire_time: extract_datetime(data, "expire_time"),
            use_time: extract_datetime(data, "use_time"),
        })
    }
}

fn extract_string(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn extract_status(data: &Value) -> AppResult<CouponStatus> {
    match data.get("status") {
        Some(Value::String(s)) => s.parse(),
        Some(Value::Number(n)) => n.to_string().parse(),
        _ => Ok(CouponStatus::Sended),
    }
}

fn extract_datetime(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    data.get(key).and_then(Value::as_str).and_then(parse_datetime)
}
