use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::Badge;
use crate::error::AppError;

/// 商家券批次状态
///
/// 参考: https://pay.weixin.qq.com/wiki/doc/apiv3/apis/chapter9_2_2.shtml
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    #[sea_orm(string_value = "UNAUDIT")]
    Unaudit,
    #[sea_orm(string_value = "CHECKING")]
    Checking,
    #[sea_orm(string_value = "AUDIT_REJECT")]
    AuditReject,
    #[sea_orm(string_value = "AUDIT_SUCCESS")]
    AuditSuccess,
    #[sea_orm(string_value = "ONGOING")]
    Ongoing,
    #[sea_orm(string_value = "PAUSED")]
    Paused,
    #[sea_orm(string_value = "STOPPED")]
    Stopped,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Unaudit => "UNAUDIT",
            StockStatus::Checking => "CHECKING",
            StockStatus::AuditReject => "AUDIT_REJECT",
            StockStatus::AuditSuccess => "AUDIT_SUCCESS",
            StockStatus::Ongoing => "ONGOING",
            StockStatus::Paused => "PAUSED",
            StockStatus::Stopped => "STOPPED",
            StockStatus::Expired => "EXPIRED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Unaudit => "未激活",
            StockStatus::Checking => "审核中",
            StockStatus::AuditReject => "审核失败",
            StockStatus::AuditSuccess => "通过审核",
            StockStatus::Ongoing => "进行中",
            StockStatus::Paused => "已暂停",
            StockStatus::Stopped => "已停止",
            StockStatus::Expired => "已作废",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            StockStatus::Unaudit => Badge::Secondary,
            StockStatus::Checking => Badge::Info,
            StockStatus::AuditReject => Badge::Danger,
            StockStatus::AuditSuccess => Badge::Success,
            StockStatus::Ongoing => Badge::Primary,
            StockStatus::Paused => Badge::Warning,
            StockStatus::Stopped => Badge::Dark,
            StockStatus::Expired => Badge::Light,
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNAUDIT" => Ok(StockStatus::Unaudit),
            "CHECKING" => Ok(StockStatus::Checking),
            "AUDIT_REJECT" => Ok(StockStatus::AuditReject),
            "AUDIT_SUCCESS" => Ok(StockStatus::AuditSuccess),
            "ONGOING" => Ok(StockStatus::Ongoing),
            "PAUSED" => Ok(StockStatus::Paused),
            "STOPPED" => Ok(StockStatus::Stopped),
            "EXPIRED" => Ok(StockStatus::Expired),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "busifavor_stocks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub stock_id: String,
    pub stock_name: String,
    pub description: Option<String>,
    pub available_begin_time: Json,
    pub available_end_time: Json,
    pub stock_use_rule: Json,
    pub coupon_use_rule: Json,
    pub custom_entrance: Json,
    pub display_pattern_info: Json,
    pub notify_config: Option<Json>,
    pub status: StockStatus,
    pub max_coupons: i64,
    pub max_coupons_per_user: i64,
    pub max_amount: i64,          // 最大发放金额(分)
    pub max_amount_by_day: i64,   // 单日最大发放金额(分)
    pub remain_amount: i64,
    pub distributed_coupons: i64,
    pub no_limit: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 未入库的新批次, `id == 0`
impl Default for Model {
    fn default() -> Self {
        Self {
            id: 0,
            stock_id: String::new(),
            stock_name: String::new(),
            description: None,
            available_begin_time: json!({}),
            available_end_time: json!({}),
            stock_use_rule: json!({
                "max_coupons_per_user": 0,
                "max_amount": 0,
                "prevent_api_abuse": false,
            }),
            coupon_use_rule: json!({
                "available_merchants": [],
                "use_limit": false,
                "coupon_background": "",
            }),
            custom_entrance: json!({ "mini_programs_info": null }),
            display_pattern_info: json!({
                "description": "",
                "logo_url": "",
                "background_color": "",
            }),
            notify_config: None,
            status: StockStatus::Unaudit,
            max_coupons: 0,
            max_coupons_per_user: 0,
            max_amount: 0,
            max_amount_by_day: 0,
            remain_amount: 0,
            distributed_coupons: 0,
            no_limit: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Model {
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.stock_name, self.stock_id)
    }
}
