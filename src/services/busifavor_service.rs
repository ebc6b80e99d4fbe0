use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::Value;

use crate::entities::{CouponStatus, StockStatus, coupon_entity as coupon, stock_entity as stock};
use crate::error::AppResult;
use crate::external::{
    BusifavorApi, CreateStockRequest, GetCouponRequest, GetStockRequest, GetUserCouponsRequest,
    UseCouponRequest,
};
use crate::mappers::{coupon_mapper, stock_mapper};
use crate::models::{StockData, UseCouponParams, UserCouponsQuery};
use crate::repositories::{CouponRepository, StockRepository};
use crate::utils::{merge_objects, present};

/// 商家券同步服务
///
/// 每个操作先调用微信接口, 再在一个事务里 读取 → 修改 → 保存 → 提交。
/// 失败时记录日志并把错误原样返回。
#[derive(Clone)]
pub struct BusifavorService {
    pool: DatabaseConnection,
    client: Arc<dyn BusifavorApi>,
}

impl BusifavorService {
    pub fn new(pool: DatabaseConnection, client: Arc<dyn BusifavorApi>) -> Self {
        Self { pool, client }
    }

    /// 创建批次; 返回里带 `stock_id` 时把提交内容和返回合并后落库
    pub async fn create_stock(&self, data: Value) -> AppResult<Value> {
        self.create_stock_inner(&data)
            .await
            .inspect_err(|e| log::error!("Failed to create stock: data={data}, error={e}"))
    }

    async fn create_stock_inner(&self, data: &Value) -> AppResult<Value> {
        let response = self
            .client
            .request(&CreateStockRequest { data: data.clone() })
            .await?;

        let Some(stock_id) = response
            .get("stock_id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        else {
            log::warn!("Create stock response carries no stock_id, nothing stored");
            return Ok(response);
        };

        let stock_data = StockData::from_value(&merge_objects(data, &response));

        let txn = self.pool.begin().await?;
        let record = match StockRepository::find_by_stock_id(&txn, stock_id).await? {
            Some(mut existing) => {
                stock_mapper::update_from_data(&mut existing, &stock_data);
                existing
            }
            None => stock_mapper::create_from_data(&stock_data),
        };
        StockRepository::save(&txn, record).await?;
        txn.commit().await?;

        log::info!("Stock created: {stock_id}");
        Ok(response)
    }

    /// 查询批次详情; 本地已有记录时同步状态等字段, 本地没有时不创建
    pub async fn get_stock(&self, stock_id: &str) -> AppResult<Value> {
        self.get_stock_inner(stock_id)
            .await
            .inspect_err(|e| log::error!("Failed to get stock: stock_id={stock_id}, error={e}"))
    }

    async fn get_stock_inner(&self, stock_id: &str) -> AppResult<Value> {
        let response = self
            .client
            .request(&GetStockRequest {
                stock_id: stock_id.to_string(),
            })
            .await?;

        let txn = self.pool.begin().await?;
        if let Some(mut record) = StockRepository::find_by_stock_id(&txn, stock_id).await? {
            stock_mapper::update_from_response(&mut record, &response)?;
            StockRepository::save(&txn, record).await?;
        }
        txn.commit().await?;

        Ok(response)
    }

    /// 核销券; 本地已有的券标记为已核销并记录核销信息
    pub async fn use_coupon(&self, params: UseCouponParams) -> AppResult<Value> {
        let context = format!(
            "coupon_code={}, stock_id={}, openid={}",
            params.coupon_code, params.stock_id, params.openid
        );
        self.use_coupon_inner(params)
            .await
            .inspect_err(|e| log::error!("Failed to use coupon: {context}, error={e}"))
    }

    async fn use_coupon_inner(&self, params: UseCouponParams) -> AppResult<Value> {
        let coupon_code = params.coupon_code.clone();
        let use_request_no = params.use_request_no.clone();
        let response = self.client.request(&UseCouponRequest { params }).await?;

        let txn = self.pool.begin().await?;
        if let Some(mut record) = CouponRepository::find_by_coupon_code(&txn, &coupon_code).await? {
            record.status = CouponStatus::Used;
            record.used_time = Some(chrono::Utc::now());
            record.use_request_no = Some(use_request_no);
            record.use_info = Some(response.clone());
            CouponRepository::save(&txn, record).await?;
        }
        txn.commit().await?;

        log::info!("Coupon used: {coupon_code}");
        Ok(response)
    }

    /// 查询单张券; 本地没有时按返回创建, 有则更新
    pub async fn get_coupon(&self, coupon_code: &str, openid: &str, appid: &str) -> AppResult<Value> {
        self.get_coupon_inner(coupon_code, openid, appid)
            .await
            .inspect_err(|e| {
                log::error!(
                    "Failed to get coupon: coupon_code={coupon_code}, openid={openid}, error={e}"
                )
            })
    }

    async fn get_coupon_inner(
        &self,
        coupon_code: &str,
        openid: &str,
        appid: &str,
    ) -> AppResult<Value> {
        let response = self
            .client
            .request(&GetCouponRequest {
                coupon_code: coupon_code.to_string(),
                openid: openid.to_string(),
                appid: appid.to_string(),
            })
            .await?;

        let txn = self.pool.begin().await?;
        match CouponRepository::find_by_coupon_code(&txn, coupon_code).await? {
            Some(mut record) => {
                coupon_mapper::update_from_response(&mut record, &response)?;
                CouponRepository::save(&txn, record).await?;
            }
            None if present(&response, "coupon_code").is_some() => {
                let record = coupon_mapper::create_from_response(&response, openid)?;
                CouponRepository::save(&txn, record).await?;
            }
            None => {}
        }
        txn.commit().await?;

        Ok(response)
    }

    /// 拉取用户券列表并逐张 upsert, 整个列表一个事务
    pub async fn get_user_coupons(&self, query: UserCouponsQuery) -> AppResult<Value> {
        let openid = query.openid.clone();
        self.get_user_coupons_inner(query)
            .await
            .inspect_err(|e| log::error!("Failed to get user coupons: openid={openid}, error={e}"))
    }

    async fn get_user_coupons_inner(&self, query: UserCouponsQuery) -> AppResult<Value> {
        let openid = query.openid.clone();
        let response = self.client.request(&GetUserCouponsRequest { query }).await?;

        let items = response
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let txn = self.pool.begin().await?;
        let mut synced = 0usize;
        for item in items {
            let Some(coupon_code) = item.get("coupon_code").and_then(Value::as_str) else {
                continue;
            };
            if present(item, "stock_id").is_none() {
                continue;
            }

            let record = match CouponRepository::find_by_coupon_code(&txn, coupon_code).await? {
                Some(mut existing) => {
                    coupon_mapper::update_from_response(&mut existing, item)?;
                    existing
                }
                None => coupon_mapper::create_from_response(item, &openid)?,
            };
            CouponRepository::save(&txn, record).await?;
            synced += 1;
        }
        txn.commit().await?;

        log::debug!("User coupons synced: openid={openid}, count={synced}");
        Ok(response)
    }

    pub async fn list_local_stocks(&self, status: Option<StockStatus>) -> AppResult<Vec<stock::Model>> {
        match status {
            Some(status) => StockRepository::find_by_status(&self.pool, status).await,
            None => StockRepository::find_all(&self.pool).await,
        }
    }

    /// 进行中的批次
    pub async fn list_active_stocks(&self) -> AppResult<Vec<stock::Model>> {
        StockRepository::find_active(&self.pool).await
    }

    /// `available_only` 时只返回可用 (`SENDED`) 的券
    pub async fn list_local_coupons(
        &self,
        stock_id: Option<&str>,
        openid: Option<&str>,
        available_only: bool,
    ) -> AppResult<Vec<coupon::Model>> {
        let db = &self.pool;
        match (stock_id, openid, available_only) {
            (Some(stock_id), None, false) => CouponRepository::find_by_stock_id(db, stock_id).await,
            (None, Some(openid), false) => CouponRepository::find_by_openid(db, openid).await,
            (Some(stock_id), None, true) => {
                CouponRepository::find_available_by_stock_id(db, stock_id).await
            }
            (None, Some(openid), true) => {
                CouponRepository::find_available_by_openid(db, openid).await
            }
            (stock_id, openid, available_only) => {
                let status = available_only.then_some(CouponStatus::Sended);
                CouponRepository::find_filtered(db, stock_id, openid, status).await
            }
        }
    }

    pub async fn find_local_stock(&self, stock_id: &str) -> AppResult<Option<stock::Model>> {
        StockRepository::find_by_stock_id(&self.pool, stock_id).await
    }

    pub async fn find_local_coupon(&self, coupon_code: &str) -> AppResult<Option<coupon::Model>> {
        CouponRepository::find_by_coupon_code(&self.pool, coupon_code).await
    }

    /// (券总数, 可用券数)
    pub async fn stock_coupon_counts(&self, stock_id: &str) -> AppResult<(u64, u64)> {
        let total = CouponRepository::count_by_stock_id(&self.pool, stock_id).await?;
        let available = CouponRepository::count_available_by_stock_id(&self.pool, stock_id).await?;
        Ok((total, available))
    }

    /// 逐个同步本地所有批次, 单个失败不影响其余
    pub async fn sync_all_stocks(&self) -> AppResult<StockSyncReport> {
        let stocks = StockRepository::find_all(&self.pool).await?;

        let mut outcomes = Vec::with_capacity(stocks.len());
        for stock in stocks {
            let result = self.get_stock(&stock.stock_id).await;
            outcomes.push(StockSyncOutcome { stock, result });
        }

        let report = StockSyncReport { outcomes };
        log::info!(
            "Stock sync finished: success={}, failed={}",
            report.success_count(),
            report.failed_count()
        );
        Ok(report)
    }
}

/// 单个批次的同步结果; 成功时为接口原始返回
#[derive(Debug)]
pub struct StockSyncOutcome {
    pub stock: stock::Model,
    pub result: AppResult<Value>,
}

#[derive(Debug, Default)]
pub struct StockSyncReport {
    pub outcomes: Vec<StockSyncOutcome>,
}

impl StockSyncReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}
