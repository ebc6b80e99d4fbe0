use actix_cors::Cors;

/// 后台接口只有 GET/POST, 来源不做限制, 由网关负责访问控制
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
