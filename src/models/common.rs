use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 失败响应中的 `error` 字段: `{"success": false, "error": {code, message}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
