use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{Badge, CouponStatus, StockStatus};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::stock::list_stocks,
        handlers::stock::get_stock,
        handlers::stock::create_stock,
        handlers::stock::sync_stock,
        handlers::stock::sync_all_stocks,
        handlers::coupon::list_coupons,
        handlers::coupon::get_coupon,
        handlers::coupon::use_coupon,
        handlers::coupon::sync_user_coupons,
        handlers::coupon::sync_coupon,
    ),
    components(
        schemas(
            StockResponse,
            StockDetailResponse,
            SyncStocksResponse,
            StockStatus,
            CouponResponse,
            CouponStatus,
            RedeemCouponRequest,
            UserCouponsFilter,
            Badge,
            ApiError,
        )
    ),
    tags(
        (name = "stock", description = "商家券批次"),
        (name = "coupon", description = "商家券核销与同步"),
    ),
    info(
        title = "WeChat Pay Busifavor Admin API",
        version = "0.1.0",
        description = "商家券批次与用户券的本地同步后台"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
