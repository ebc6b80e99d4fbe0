use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Badge;
use crate::error::AppError;

/// 商家券状态
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
pub enum CouponStatus {
    /// 已发放, 可用
    #[sea_orm(string_value = "SENDED")]
    Sended,
    #[sea_orm(string_value = "USED")]
    Used,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    #[sea_orm(string_value = "DEACTIVATED")]
    Deactivated,
}

impl CouponStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponStatus::Sended => "SENDED",
            CouponStatus::Used => "USED",
            CouponStatus::Expired => "EXPIRED",
            CouponStatus::Deactivated => "DEACTIVATED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CouponStatus::Sended => "可用",
            CouponStatus::Used => "已核销",
            CouponStatus::Expired => "已过期",
            CouponStatus::Deactivated => "已失效",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            CouponStatus::Sended => Badge::Success,
            CouponStatus::Used => Badge::Primary,
            CouponStatus::Expired => Badge::Warning,
            CouponStatus::Deactivated => Badge::Danger,
        }
    }
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CouponStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SENDED" => Ok(CouponStatus::Sended),
            "USED" => Ok(CouponStatus::Used),
            "EXPIRED" => Ok(CouponStatus::Expired),
            "DEACTIVATED" => Ok(CouponStatus::Deactivated),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "busifavor_coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub coupon_code: String,
    pub stock_id: String,
    pub openid: Option<String>,
    pub status: CouponStatus,
    pub used_time: Option<DateTime<Utc>>,
    pub expiry_time: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub use_request_no: Option<String>,
    pub use_info: Option<Json>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Default for Model {
    fn default() -> Self {
        Self {
            id: 0,
            coupon_code: String::new(),
            stock_id: String::new(),
            openid: None,
            status: CouponStatus::Sended,
            used_time: None,
            expiry_time: None,
            transaction_id: None,
            use_request_no: None,
            use_info: None,
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
        write!(f, "{} - {}", self.coupon_code, self.stock_id)
    }
}
