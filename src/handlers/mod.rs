pub mod coupon;
pub mod stock;

use actix_web::web;

pub use coupon::coupon_config;
pub use stock::stock_config;

/// 后台接口统一挂在 `/admin` 下
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(stock_config)
            .configure(coupon_config),
    );
}
