use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

use crate::config::WechatPayConfig;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::BusifavorService;

/// 请求里没带 appid 时使用配置的默认值
fn resolve_appid(appid: Option<String>, config: &WechatPayConfig) -> AppResult<String> {
    match appid.filter(|a| !a.is_empty()) {
        Some(appid) => Ok(appid),
        None if !config.appid.is_empty() => Ok(config.appid.clone()),
        None => Err(AppError::ValidationError("appid is required".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/admin/coupons",
    tag = "coupon",
    params(
        ("stock_id" = Option<String>, Query, description = "批次号"),
        ("openid" = Option<String>, Query, description = "用户 openid"),
        ("available" = Option<bool>, Query, description = "只看可用的券")
    ),
    responses(
        (status = 200, description = "本地券列表, 最新的在前", body = [CouponResponse])
    )
)]
pub async fn list_coupons(
    service: web::Data<BusifavorService>,
    query: web::Query<CouponQuery>,
) -> Result<HttpResponse> {
    match service
        .list_local_coupons(
            query.stock_id.as_deref(),
            query.openid.as_deref(),
            query.available.unwrap_or(false),
        )
        .await
    {
        Ok(coupons) => {
            let data: Vec<CouponResponse> =
                coupons.into_iter().map(CouponResponse::from).collect();
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
    path = "/admin/coupons/{coupon_code}",
    tag = "coupon",
    params(
        ("coupon_code" = String, Path, description = "券码")
    ),
    responses(
        (status = 200, description = "本地券详情", body = CouponResponse),
        (status = 404, description = "本地没有该券")
    )
)]
pub async fn get_coupon(
    service: web::Data<BusifavorService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let coupon_code = path.into_inner();

    match service.find_local_coupon(&coupon_code).await {
        Ok(Some(coupon)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": CouponResponse::from(coupon)
        }))),
        Ok(None) => Ok(AppError::NotFound(format!("Coupon {coupon_code} not found")).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/coupons/use",
    tag = "coupon",
    request_body = RedeemCouponRequest,
    responses(
        (status = 200, description = "核销成功, 返回微信原始响应"),
        (status = 400, description = "缺少 appid"),
        (status = 502, description = "微信接口调用失败")
    )
)]
pub async fn use_coupon(
    service: web::Data<BusifavorService>,
    config: web::Data<WechatPayConfig>,
    request: web::Json<RedeemCouponRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let appid = match resolve_appid(request.appid, &config) {
        Ok(appid) => appid,
        Err(e) => return Ok(e.error_response()),
    };

    let params = UseCouponParams {
        coupon_code: request.coupon_code,
        stock_id: request.stock_id,
        appid,
        openid: request.openid,
        use_request_no: request
            .use_request_no
            .filter(|no| !no.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
    };

    match service.use_coupon(params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "核销完成"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{openid}/coupons/sync",
    tag = "coupon",
    params(
        ("openid" = String, Path, description = "用户 openid"),
        ("appid" = Option<String>, Query, description = "默认使用配置的 appid"),
        ("stock_id" = Option<String>, Query, description = "批次号"),
        ("status" = Option<String>, Query, description = "券状态"),
        ("offset" = Option<u32>, Query, description = "分页起始位置"),
        ("limit" = Option<u32>, Query, description = "分页大小")
    ),
    responses(
        (status = 200, description = "同步成功, 返回微信原始响应"),
        (status = 502, description = "微信接口调用失败")
    )
)]
pub async fn sync_user_coupons(
    service: web::Data<BusifavorService>,
    config: web::Data<WechatPayConfig>,
    path: web::Path<String>,
    filter: web::Query<UserCouponsFilter>,
) -> Result<HttpResponse> {
    let filter = filter.into_inner();
    let appid = match resolve_appid(filter.appid, &config) {
        Ok(appid) => appid,
        Err(e) => return Ok(e.error_response()),
    };

    let query = UserCouponsQuery {
        openid: path.into_inner(),
        appid,
        stock_id: filter.stock_id,
        status: filter.status,
        offset: filter.offset,
        limit: filter.limit,
    };

    match service.get_user_coupons(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/users/{openid}/coupons/{coupon_code}/sync",
    tag = "coupon",
    params(
        ("openid" = String, Path, description = "用户 openid"),
        ("coupon_code" = String, Path, description = "券码"),
        ("appid" = Option<String>, Query, description = "默认使用配置的 appid")
    ),
    responses(
        (status = 200, description = "同步成功, 返回微信原始响应"),
        (status = 502, description = "微信接口调用失败")
    )
)]
pub async fn sync_coupon(
    service: web::Data<BusifavorService>,
    config: web::Data<WechatPayConfig>,
    path: web::Path<(String, String)>,
    query: web::Query<AppidQuery>,
) -> Result<HttpResponse> {
    let (openid, coupon_code) = path.into_inner();
    let appid = match resolve_appid(query.into_inner().appid, &config) {
        Ok(appid) => appid,
        Err(e) => return Ok(e.error_response()),
    };

    match service.get_coupon(&coupon_code, &openid, &appid).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coupon_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/coupons", web::get().to(list_coupons))
        .route("/coupons/use", web::post().to(use_coupon))
        .route("/coupons/{coupon_code}", web::get().to(get_coupon))
        .route("/users/{openid}/coupons/sync", web::post().to(sync_user_coupons))
        .route(
            "/users/{openid}/coupons/{coupon_code}/sync",
            web::post().to(sync_coupon),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockBusifavorApi, setup_db};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use serde_json::Value;
    use std::sync::Arc;

    fn config(appid: &str) -> WechatPayConfig {
        WechatPayConfig {
            appid: appid.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_appid() {
        assert_eq!(
            resolve_appid(Some("wx_req".into()), &config("wx_cfg")).unwrap(),
            "wx_req"
        );
        assert_eq!(resolve_appid(None, &config("wx_cfg")).unwrap(), "wx_cfg");
        assert_eq!(resolve_appid(Some(String::new()), &config("wx_cfg")).unwrap(), "wx_cfg");
        assert!(matches!(
            resolve_appid(None, &config("")),
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_use_coupon_generates_request_no_and_default_appid() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({"stock_id": "S1", "openid": "o1"})).await;
        let service = BusifavorService::new(setup_db().await, api.clone());
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(web::Data::new(config("wx_cfg")))
                .service(web::scope("/api/v1/admin").configure(coupon_config)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/admin/coupons/use")
            .set_json(json!({"coupon_code": "C1", "stock_id": "S1", "openid": "o1"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let requests = api.requests().await;
        let sent = requests[0].body.as_ref().unwrap();
        assert_eq!(sent["appid"], "wx_cfg");
        assert_eq!(sent["use_request_no"].as_str().unwrap().len(), 32);
    }

    #[actix_web::test]
    async fn test_sync_user_coupons_then_list_locally() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({
            "data": [{"coupon_code": "C1", "stock_id": "S1", "status": "SENDED"}],
            "total_count": 1
        }))
        .await;
        let service = BusifavorService::new(setup_db().await, api.clone());
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(web::Data::new(config("wx_cfg")))
                .service(web::scope("/api/v1/admin").configure(coupon_config)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/admin/users/o1/coupons/sync?stock_id=S1&limit=5")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            api.requests().await[0].query,
            vec![
                ("appid", "wx_cfg".to_string()),
                ("stock_id", "S1".to_string()),
                ("limit", "5".to_string()),
            ]
        );

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/coupons?openid=o1")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["coupon_code"], "C1");
        assert_eq!(body["data"][0]["status_label"], "可用");

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/coupons/C1")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["openid"], "o1");
    }

    #[actix_web::test]
    async fn test_list_coupons_available_filter() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({
            "data": [
                {"coupon_code": "C1", "stock_id": "S1", "status": "SENDED"},
                {"coupon_code": "C2", "stock_id": "S1", "status": "USED"}
            ],
            "total_count": 2
        }))
        .await;
        let service = BusifavorService::new(setup_db().await, api);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(web::Data::new(config("wx_cfg")))
                .service(web::scope("/api/v1/admin").configure(coupon_config)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/admin/users/o1/coupons/sync")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/coupons?stock_id=S1")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/coupons?stock_id=S1&available=true")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["coupon_code"], "C1");
    }
}
