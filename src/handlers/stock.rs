use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::{Value, json};

use crate::entities::StockStatus;
use crate::error::AppError;
use crate::models::*;
use crate::services::BusifavorService;

#[utoipa::path(
    get,
    path = "/admin/stocks",
    tag = "stock",
    params(
        ("status" = Option<StockStatus>, Query, description = "批次状态, 如 ONGOING"),
        ("active" = Option<bool>, Query, description = "只看进行中的批次")
    ),
    responses(
        (status = 200, description = "本地批次列表, 最新的在前", body = [StockResponse])
    )
)]
pub async fn list_stocks(
    service: web::Data<BusifavorService>,
    query: web::Query<StockQuery>,
) -> Result<HttpResponse> {
    let stocks = if query.active.unwrap_or(false) {
        service.list_active_stocks().await
    } else {
        service.list_local_stocks(query.status).await
    };

    match stocks {
        Ok(stocks) => {
            let data: Vec<StockResponse> = stocks.into_iter().map(StockResponse::from).collect();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": data
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/stocks/{stock_id}",
    tag = "stock",
    params(
        ("stock_id" = String, Path, description = "批次号")
    ),
    responses(
        (status = 200, description = "本地批次详情", body = StockDetailResponse),
        (status = 404, description = "本地没有该批次")
    )
)]
pub async fn get_stock(
    service: web::Data<BusifavorService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let stock_id = path.into_inner();

    let result = async {
        let stock = service
            .find_local_stock(&stock_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stock {stock_id} not found")))?;
        let (coupon_count, available_coupon_count) =
            service.stock_coupon_counts(&stock_id).await?;
        Ok::<_, AppError>(StockDetailResponse {
            stock: stock.into(),
            coupon_count,
            available_coupon_count,
        })
    }
    .await;

    match result {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/stocks",
    tag = "stock",
    request_body = Object,
    responses(
        (status = 200, description = "创建成功, 返回微信原始响应"),
        (status = 502, description = "微信接口调用失败")
    )
)]
pub async fn create_stock(
    service: web::Data<BusifavorService>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    match service.create_stock(body.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "批次创建完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/stocks/{stock_id}/sync",
    tag = "stock",
    params(
        ("stock_id" = String, Path, description = "批次号")
    ),
    responses(
        (status = 200, description = "同步成功, 返回微信原始响应"),
        (status = 502, description = "微信接口调用失败")
    )
)]
pub async fn sync_stock(
    service: web::Data<BusifavorService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_stock(&path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/sync/stocks",
    tag = "stock",
    responses(
        (status = 200, description = "同步所有本地批次", body = SyncStocksResponse)
    )
)]
pub async fn sync_all_stocks(service: web::Data<BusifavorService>) -> Result<HttpResponse> {
    match service.sync_all_stocks().await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": SyncStocksResponse {
                success_count: report.success_count(),
                failed_count: report.failed_count(),
            },
            "message": "批次同步完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn stock_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stocks", web::get().to(list_stocks))
        .route("/stocks", web::post().to(create_stock))
        .route("/stocks/{stock_id}", web::get().to(get_stock))
        .route("/stocks/{stock_id}/sync", web::post().to(sync_stock))
        .route("/sync/stocks", web::post().to(sync_all_stocks));
}
