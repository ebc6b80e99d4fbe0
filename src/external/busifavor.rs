use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::requests::ApiRequest;
use crate::config::WechatPayConfig;
use crate::error::{AppError, AppResult};

/// 商家券接口的调用入口, 返回解码后的 JSON
#[async_trait]
pub trait BusifavorApi: Send + Sync {
    async fn request(&self, request: &dyn ApiRequest) -> AppResult<Value>;
}

/// 基于 reqwest 的微信支付客户端
///
/// 不负责签名: `base_url` 在生产环境指向负责签名的网关。
#[derive(Clone)]
pub struct BusifavorClient {
    client: Client,
    config: WechatPayConfig,
}

impl BusifavorClient {
    pub fn new(config: WechatPayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn request_url(&self, request: &dyn ApiRequest) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/{}", base, request.path().trim_start_matches('/'))
    }
}

#[async_trait]
impl BusifavorApi for BusifavorClient {
    async fn request(&self, request: &dyn ApiRequest) -> AppResult<Value> {
        let url = self.request_url(request);
        let method = request.method();
        log::debug!("WeChat Pay request: {method} {url}");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json");

        let query = request.query();
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = request.body() {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::ExternalApiError(format!(
                "{method} {} returned {status}: {text}",
                request.path()
            )));
        }

        // 部分接口成功时不返回内容
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
