use serde_json::{Value, json};

use crate::entities::{StockStatus, stock_entity as stock};
use crate::error::AppResult;
use crate::models::StockData;
use crate::utils::{as_blob, present};

pub fn create_from_data(data: &StockData) -> stock::Model {
    let mut record = stock::Model::default();
    map_data_to_stock(data, &mut record);
    record
}

pub fn update_from_data(record: &mut stock::Model, data: &StockData) {
    map_data_to_stock(data, record);
}

fn map_data_to_stock(data: &StockData, record: &mut stock::Model) {
    record.stock_id = data.stock_id.clone();
    record.stock_name = data.stock_name.clone();
    record.description = data.description.clone();
    record.available_begin_time = data.available_begin_time.clone();
    record.available_end_time = data.available_end_time.clone();
    record.stock_use_rule = data.stock_use_rule.clone();
    record.coupon_use_rule = data.coupon_use_rule.clone();
    record.custom_entrance = data.custom_entrance.clone();
    record.display_pattern_info = data.display_pattern_info.clone();
    record.notify_config = data.notify_config.clone();
    record.max_coupons = data.max_coupons;
    record.max_coupons_per_user = data.max_coupons_per_user;
    record.max_amount = data.max_amount;
    record.max_amount_by_day = data.max_amount_by_day;
    record.no_limit = data.no_limit;
}

/// 用批次详情接口的返回更新本地批次, 只覆盖返回里带了的字段
pub fn update_from_response(record: &mut stock::Model, response: &Value) -> AppResult<()> {
    update_status(record, response)?;

    if let Some(name) = response.get("stock_name").and_then(Value::as_str) {
        record.stock_name = name.to_string();
    }

    if let Some(begin) = present(response, "available_begin_time") {
        record.available_begin_time = json!({ "value": begin });
    }
    if let Some(end) = present(response, "available_end_time") {
        record.available_end_time = json!({ "value": end });
    }

    if let Some(rule) = as_blob(response.get("stock_use_rule")) {
        record.stock_use_rule = rule;
    }
    if let Some(rule) = as_blob(response.get("coupon_use_rule")) {
        record.coupon_use_rule = rule;
    }
    if let Some(entrance) = as_blob(response.get("custom_entrance")) {
        record.custom_entrance = entrance;
    }
    if let Some(pattern) = as_blob(response.get("display_pattern_info")) {
        record.display_pattern_info = pattern;
    }

    Ok(())
}

// 新版接口字段名为 stock_state, 旧版为 status
fn update_status(record: &mut stock::Model, response: &Value) -> AppResult<()> {
    let value = present(response, "stock_state").or_else(|| present(response, "status"));

    match value {
        Some(Value::String(s)) => record.status = s.parse::<StockStatus>()?,
        Some(Value::Number(n)) => record.status = n.to_string().parse::<StockStatus>()?,
        _ => {}
    }

    Ok(())
}
