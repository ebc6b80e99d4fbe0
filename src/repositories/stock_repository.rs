use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{StockStatus, stock_entity as stock};
use crate::error::AppResult;

/// 批次表的读写; 传入事务即可让多次写入一起提交
pub struct StockRepository;

impl StockRepository {
    pub async fn find_by_stock_id<C: ConnectionTrait>(
        db: &C,
        stock_id: &str,
    ) -> AppResult<Option<stock::Model>> {
        Ok(stock::Entity::find()
            .filter(stock::Column::StockId.eq(stock_id))
            .one(db)
            .await?)
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<stock::Model>> {
        Ok(stock::Entity::find()
            .order_by_desc(stock::Column::CreatedAt)
            .order_by_desc(stock::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn find_by_status<C: ConnectionTrait>(
        db: &C,
        status: StockStatus,
    ) -> AppResult<Vec<stock::Model>> {
        Ok(stock::Entity::find()
            .filter(stock::Column::Status.eq(status))
            .order_by_desc(stock::Column::CreatedAt)
            .order_by_desc(stock::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn find_active<C: ConnectionTrait>(db: &C) -> AppResult<Vec<stock::Model>> {
        Self::find_by_status(db, StockStatus::Ongoing).await
    }

    /// `id == 0` 时插入, 否则按主键整行更新
    pub async fn save<C: ConnectionTrait>(db: &C, mut record: stock::Model) -> AppResult<stock::Model> {
        let now = Utc::now();
        record.updated_at = Some(now);
        if record.is_new() {
            record.created_at = Some(now);
            Ok(into_active_model(record).insert(db).await?)
        } else {
            Ok(into_active_model(record).update(db).await?)
        }
    }
}

fn into_active_model(record: stock::Model) -> stock::ActiveModel {
    stock::ActiveModel {
        id: if record.is_new() { NotSet } else { Unchanged(record.id) },
        stock_id: Set(record.stock_id),
        stock_name: Set(record.stock_name),
        description: Set(record.description),
        available_begin_time: Set(record.available_begin_time),
        available_end_time: Set(record.available_end_time),
        stock_use_rule: Set(record.stock_use_rule),
        coupon_use_rule: Set(record.coupon_use_rule),
        custom_entrance: Set(record.custom_entrance),
        display_pattern_info: Set(record.display_pattern_info),
        notify_config: Set(record.notify_config),
        status: Set(record.status),
        max_coupons: Set(record.max_coupons),
        max_coupons_per_user: Set(record.max_coupons_per_user),
        max_amount: Set(record.max_amount),
        max_amount_by_day: Set(record.max_amount_by_day),
        remain_amount: Set(record.remain_amount),
        distributed_coupons: Set(record.distributed_coupons),
        no_limit: Set(record.no_limit),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}
