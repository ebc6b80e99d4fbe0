use serde_json::{Value, json};

use crate::utils::{as_blob, is_truthy};

/// 从创建请求/微信返回中提取的批次数据, 构造时从不报错
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockData {
    pub stock_id: String,
    pub stock_name: String,
    pub description: Option<String>,
    pub available_begin_time: Value,
    pub available_end_time: Value,
    pub stock_use_rule: Value,
    pub coupon_use_rule: Value,
    pub custom_entrance: Value,
    pub display_pattern_info: Value,
    pub notify_config: Option<Value>,
    pub max_coupons: i64,
    pub max_coupons_per_user: i64,
    pub max_amount: i64,
    pub max_amount_by_day: i64,
    pub no_limit: bool,
}

impl StockData {
    pub fn from_value(data: &Value) -> Self {
        let stock_use_rule = blob_or_empty(data, "stock_use_rule");

        Self {
            stock_id: extract_string(data, "stock_id"),
            stock_name: extract_string(data, "stock_name"),
            description: data.get("comment").and_then(Value::as_str).map(str::to_string),
            available_begin_time: blob_or_empty(data, "available_begin_time"),
            available_end_time: blob_or_empty(data, "available_end_time"),
            coupon_use_rule: blob_or_empty(data, "coupon_use_rule"),
            custom_entrance: blob_or_empty(data, "custom_entrance"),
            display_pattern_info: blob_or_empty(data, "display_pattern_info"),
            notify_config: as_blob(data.get("notify_config")),
            // 数量/金额限制只从 stock_use_rule 中读取
            max_coupons: int_from_rule(&stock_use_rule, "max_coupons"),
            max_coupons_per_user: int_from_rule(&stock_use_rule, "max_coupons_per_user"),
            max_amount: int_from_rule(&stock_use_rule, "max_amount"),
            max_amount_by_day: int_from_rule(&stock_use_rule, "max_amount_by_day"),
            no_limit: data.get("no_limit").is_some_and(is_truthy),
            stock_use_rule,
        }
    }
}

fn extract_string(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn blob_or_empty(data: &Value, key: &str) -> Value {
    as_blob(data.get(key)).unwrap_or_else(|| json!({}))
}

fn int_from_rule(rule: &Value, key: &str) -> i64 {
    rule.get(key).and_then(Value::as_i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_yields_defaults() {
        let data = StockData::from_value(&json!({}));
        assert_eq!(data.stock_id, "");
        assert_eq!(data.stock_name, "");
        assert!(data.description.is_none());
        assert_eq!(data.available_begin_time, json!({}));
        assert_eq!(data.stock_use_rule, json!({}));
        assert!(data.notify_config.is_none());
        assert_eq!(data.max_coupons, 0);
        assert_eq!(data.max_coupons_per_user, 0);
        assert_eq!(data.max_amount, 0);
        assert_eq!(data.max_amount_by_day, 0);
        assert!(!data.no_limit);
    }

    #[test]
    fn test_limits_come_from_stock_use_rule_only() {
        let data = StockData::from_value(&json!({
            "stock_id": "S1",
            "stock_name": "满100减10",
            "comment": "周末活动",
            "max_coupons": 999,
            "stock_use_rule": {
                "max_coupons": 100,
                "max_coupons_per_user": 5,
                "max_amount": 10000,
                "max_amount_by_day": "1000",
            },
            "notify_config": {"notify_url": "https://example.com/notify"},
            "no_limit": 1,
        }));

        assert_eq!(data.stock_id, "S1");
        assert_eq!(data.stock_name, "满100减10");
        assert_eq!(data.description.as_deref(), Some("周末活动"));
        assert_eq!(data.max_coupons, 100);
        assert_eq!(data.max_coupons_per_user, 5);
        assert_eq!(data.max_amount, 10000);
        // 非整数按 0 处理
        assert_eq!(data.max_amount_by_day, 0);
        assert_eq!(
            data.notify_config,
            Some(json!({"notify_url": "https://example.com/notify"}))
        );
        assert!(data.no_limit);
    }

    #[test]
    fn test_non_blob_values_are_replaced() {
        let data = StockData::from_value(&json!({
            "stock_name": 12,
            "comment": false,
            "coupon_use_rule": "oops",
            "notify_config": "https://example.com",
            "no_limit": "0",
        }));
        assert_eq!(data.stock_name, "");
        assert!(data.description.is_none());
        assert_eq!(data.coupon_use_rule, json!({}));
        assert!(data.notify_config.is_none());
        assert!(!data.no_limit);
    }
}
