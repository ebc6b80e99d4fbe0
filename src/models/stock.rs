use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::entities::{Badge, StockStatus, stock_entity};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockResponse {
    pub id: i64,
    pub stock_id: String,
    pub stock_name: String,
    pub description: Option<String>,
    pub status: StockStatus,
    pub status_label: String,
    pub status_badge: Badge,
    #[schema(value_type = Object)]
    pub available_begin_time: Value,
    #[schema(value_type = Object)]
    pub available_end_time: Value,
    #[schema(value_type = Object)]
    pub stock_use_rule: Value,
    #[schema(value_type = Object)]
    pub coupon_use_rule: Value,
    #[schema(value_type = Object)]
    pub custom_entrance: Value,
    #[schema(value_type = Object)]
    pub display_pattern_info: Value,
    #[schema(value_type = Option<Object>)]
    pub notify_config: Option<Value>,
    pub max_coupons: i64,
    pub max_coupons_per_user: i64,
    pub max_amount: i64,
    pub max_amount_by_day: i64,
    pub remain_amount: i64,
    pub distributed_coupons: i64,
    pub no_limit: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<stock_entity::Model> for StockResponse {
    fn from(stock: stock_entity::Model) -> Self {
        Self {
            id: stock.id,
            status_label: stock.status.label().to_string(),
            status_badge: stock.status.badge(),
            status: stock.status,
            stock_id: stock.stock_id,
            stock_name: stock.stock_name,
            description: stock.description,
            available_begin_time: stock.available_begin_time,
            available_end_time: stock.available_end_time,
            stock_use_rule: stock.stock_use_rule,
            coupon_use_rule: stock.coupon_use_rule,
            custom_entrance: stock.custom_entrance,
            display_pattern_info: stock.display_pattern_info,
            notify_config: stock.notify_config,
            max_coupons: stock.max_coupons,
            max_coupons_per_user: stock.max_coupons_per_user,
            max_amount: stock.max_amount,
            max_amount_by_day: stock.max_amount_by_day,
            remain_amount: stock.remain_amount,
            distributed_coupons: stock.distributed_coupons,
            no_limit: stock.no_limit,
            created_at: stock.created_at,
            updated_at: stock.updated_at,
        }
    }
}

/// 本地批次详情, 附带本地已同步的券数量
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockDetailResponse {
    pub stock: StockResponse,
    pub coupon_count: u64,
    pub available_coupon_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockQuery {
    pub status: Option<StockStatus>,
    /// 为 true 时只返回进行中的批次, 忽略 `status`
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncStocksResponse {
    pub success_count: usize,
    pub failed_count: usize,
}
