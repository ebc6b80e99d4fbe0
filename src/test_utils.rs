//! 测试用的内存数据库和微信接口替身

use std::collections::VecDeque;

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use reqwest::Method;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::external::{ApiRequest, BusifavorApi};

/// 迁移完成的内存 SQLite; 单连接, 保证事务和后续查询看到同一个库
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

/// 按顺序返回预设的响应, 并记录收到的请求; 队列为空时返回 `{}`
#[derive(Default)]
pub struct MockBusifavorApi {
    responses: Mutex<VecDeque<AppResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBusifavorApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond(&self, response: Value) {
        self.responses.lock().await.push_back(Ok(response));
    }

    pub async fn fail(&self, error: AppError) {
        self.responses.lock().await.push_back(Err(error));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }
}

#[async_trait]
impl BusifavorApi for MockBusifavorApi {
    async fn request(&self, request: &dyn ApiRequest) -> AppResult<Value> {
        self.requests.lock().await.push(RecordedRequest {
            method: request.method(),
            path: request.path(),
            query: request.query(),
            body: request.body(),
        });
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}
