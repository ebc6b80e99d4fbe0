use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};

use crate::entities::{CouponStatus, coupon_entity as coupon};
use crate::error::AppResult;

pub struct CouponRepository;

impl CouponRepository {
    pub async fn find_by_coupon_code<C: ConnectionTrait>(
        db: &C,
        coupon_code: &str,
    ) -> AppResult<Option<coupon::Model>> {
        Ok(coupon::Entity::find()
            .filter(coupon::Column::CouponCode.eq(coupon_code))
            .one(db)
            .await?)
    }

    /// 按批次、用户和状态过滤, 最新的在前
    pub async fn find_filtered<C: ConnectionTrait>(
        db: &C,
        stock_id: Option<&str>,
        openid: Option<&str>,
        status: Option<CouponStatus>,
    ) -> AppResult<Vec<coupon::Model>> {
        let mut query = coupon::Entity::find();
        if let Some(stock_id) = stock_id {
            query = query.filter(coupon::Column::StockId.eq(stock_id));
        }
        if let Some(openid) = openid {
            query = query.filter(coupon::Column::Openid.eq(openid));
        }
        if let Some(status) = status {
            query = query.filter(coupon::Column::Status.eq(status));
        }
        Ok(newest_first(query).all(db).await?)
    }

    pub async fn find_by_openid<C: ConnectionTrait>(
        db: &C,
        openid: &str,
    ) -> AppResult<Vec<coupon::Model>> {
        Self::find_filtered(db, None, Some(openid), None).await
    }

    pub async fn find_by_stock_id<C: ConnectionTrait>(
        db: &C,
        stock_id: &str,
    ) -> AppResult<Vec<coupon::Model>> {
        Self::find_filtered(db, Some(stock_id), None, None).await
    }

    pub async fn find_available_by_openid<C: ConnectionTrait>(
        db: &C,
        openid: &str,
    ) -> AppResult<Vec<coupon::Model>> {
        Self::find_filtered(db, None, Some(openid), Some(CouponStatus::Sended)).await
    }

    pub async fn find_available_by_stock_id<C: ConnectionTrait>(
        db: &C,
        stock_id: &str,
    ) -> AppResult<Vec<coupon::Model>> {
        Self::find_filtered(db, Some(stock_id), None, Some(CouponStatus::Sended)).await
    }

    pub async fn count_by_stock_id<C: ConnectionTrait>(db: &C, stock_id: &str) -> AppResult<u64> {
        Ok(coupon::Entity::find()
            .filter(coupon::Column::StockId.eq(stock_id))
            .count(db)
            .await?)
    }

    pub async fn count_available_by_stock_id<C: ConnectionTrait>(
        db: &C,
        stock_id: &str,
    ) -> AppResult<u64> {
        Ok(coupon::Entity::find()
            .filter(coupon::Column::StockId.eq(stock_id))
            .filter(coupon::Column::Status.eq(CouponStatus::Sended))
            .count(db)
            .await?)
    }

    pub async fn save<C: ConnectionTrait>(
        db: &C,
        mut record: coupon::Model,
    ) -> AppResult<coupon::Model> {
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

fn newest_first(query: Select<coupon::Entity>) -> Select<coupon::Entity> {
    query
        .order_by_desc(coupon::Column::CreatedAt)
        .order_by_desc(coupon::Column::Id)
}

fn into_active_model(record: coupon::Model) -> coupon::ActiveModel {
    coupon::ActiveModel {
        id: if record.is_new() { NotSet } else { Unchanged(record.id) },
        coupon_code: Set(record.coupon_code),
        stock_id: Set(record.stock_id),
        openid: Set(record.openid),
        status: Set(record.status),
        used_time: Set(record.used_time),
        expiry_time: Set(record.expiry_time),
        transaction_id: Set(record.transaction_id),
        use_request_no: Set(record.use_request_no),
        use_info: Set(record.use_info),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;

    fn new_coupon(code: &str, stock_id: &str, openid: &str, status: CouponStatus) -> coupon::Model {
        coupon::Model {
            coupon_code: code.to_string(),
            stock_id: stock_id.to_string(),
            openid: Some(openid.to_string()),
            status,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_queries_and_counts() {
        let db = setup_db().await;
        for (code, stock, openid, status) in [
            ("C1", "S1", "o1", CouponStatus::Sended),
            ("C2", "S1", "o2", CouponStatus::Used),
            ("C3", "S2", "o1", CouponStatus::Sended),
            ("C4", "S1", "o1", CouponStatus::Expired),
        ] {
            CouponRepository::save(&db, new_coupon(code, stock, openid, status))
                .await
                .unwrap();
        }

        assert_eq!(CouponRepository::count_by_stock_id(&db, "S1").await.unwrap(), 3);
        assert_eq!(
            CouponRepository::count_available_by_stock_id(&db, "S1").await.unwrap(),
            1
        );
        assert_eq!(CouponRepository::find_by_openid(&db, "o1").await.unwrap().len(), 3);
        assert_eq!(CouponRepository::find_by_stock_id(&db, "S2").await.unwrap().len(), 1);
        assert_eq!(
            CouponRepository::find_available_by_openid(&db, "o1").await.unwrap().len(),
            2
        );
        assert_eq!(
            CouponRepository::find_available_by_stock_id(&db, "S1").await.unwrap().len(),
            1
        );
        assert_eq!(
            CouponRepository::find_filtered(&db, Some("S1"), Some("o1"), None).await.unwrap().len(),
            2
        );
        assert_eq!(CouponRepository::find_filtered(&db, None, None, None).await.unwrap().len(), 4);
        let available = CouponRepository::find_filtered(
            &db,
            Some("S1"),
            Some("o1"),
            Some(CouponStatus::Sended),
        )
        .await
        .unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].coupon_code, "C1");
    }

    #[tokio::test]
    async fn test_save_updates_existing_row() {
        let db = setup_db().await;
        let saved = CouponRepository::save(&db, new_coupon("C1", "S1", "o1", CouponStatus::Sended))
            .await
            .unwrap();

        let mut used = saved.clone();
        used.status = CouponStatus::Used;
        used.use_info = Some(serde_json::json!({"wechatpay_use_time": "2024-01-01T00:00:00+08:00"}));
        CouponRepository::save(&db, used).await.unwrap();

        let found = CouponRepository::find_by_coupon_code(&db, "C1").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert_eq!(found.status, CouponStatus::Used);
        assert!(found.use_info.is_some());
        assert_eq!(CouponRepository::find_filtered(&db, None, None, None).await.unwrap().len(), 1);
    }
}
