use serde_json::Value;

use crate::entities::{CouponStatus, coupon_entity as coupon};
use crate::error::AppResult;
use crate::models::CouponData;
use crate::utils::{parse_datetime, present};

pub fn create_from_data(data: &CouponData) -> coupon::Model {
    let mut record = coupon::Model::default();
    map_data_to_coupon(data, &mut record);
    record
}

pub fn update_from_data(record: &mut coupon::Model, data: &CouponData) {
    map_data_to_coupon(data, record);
}

fn map_data_to_coupon(data: &CouponData, record: &mut coupon::Model) {
    record.coupon_code = data.coupon_code.clone();
    record.stock_id = data.stock_id.clone();
    record.openid = Some(data.openid.clone());
    record.status = data.status;

    if let Some(expire_time) = data.expire_time {
        record.expiry_time = Some(expire_time);
    }
    if let Some(use_time) = data.use_time {
        record.used_time = Some(use_time);
    }
}

/// 首次见到的券走完整的 DTO 路径
pub fn create_from_response(response: &Value, openid: &str) -> AppResult<coupon::Model> {
    let data = CouponData::from_value(response, openid)?;
    Ok(create_from_data(&data))
}

/// 用接口返回更新已有的券: 状态非法直接报错, 时间解析失败则保留原值
pub fn update_from_response(record: &mut coupon::Model, response: &Value) -> AppResult<()> {
    match present(response, "status") {
        Some(Value::String(s)) => record.status = s.parse::<CouponStatus>()?,
        Some(Value::Number(n)) => record.status = n.to_string().parse::<CouponStatus>()?,
        _ => {}
    }

    if let Some(expire_time) = parse_time_field(response, "expire_time") {
        record.expiry_time = Some(expire_time);
    }
    if let Some(use_time) = parse_time_field(response, "use_time") {
        record.used_time = Some(use_time);
    }

    Ok(())
}

fn parse_time_field(response: &Value, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    response
        .get(key)
        .and_then(Value::as_str)
        .and_then(parse_datetime)
}
