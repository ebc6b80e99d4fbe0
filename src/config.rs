use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

pub const DEFAULT_WECHAT_PAY_BASE_URL: &str = "https://api.mch.weixin.qq.com/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub wechat_pay: WechatPayConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WechatPayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 公众号/小程序 appid, 命令行和后台未指定时使用
    #[serde(default)]
    pub appid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// 批次状态定时同步间隔(秒), 0 表示关闭
    pub stock_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stock_interval_secs: 3600,
        }
    }
}

impl Default for WechatPayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            appid: String::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_WECHAT_PAY_BASE_URL.to_string()
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError(
                        "缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml".to_string(),
                    )
                })?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    wechat_pay: WechatPayConfig {
                        base_url: get_env("WECHAT_PAY_BASE_URL").unwrap_or_else(default_base_url),
                        appid: get_env("WECHAT_APPID").unwrap_or_default(),
                    },
                    sync: SyncConfig {
                        stock_interval_secs: get_env_parse("STOCK_SYNC_INTERVAL_SECS", 3600u64),
                    },
                }
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "无法读取配置文件 {config_path}: {e}"
                )));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("WECHAT_PAY_BASE_URL") {
            config.wechat_pay.base_url = v;
        }
        if let Ok(v) = env::var("WECHAT_APPID") {
            config.wechat_pay.appid = v;
        }
        if let Ok(v) = env::var("STOCK_SYNC_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.sync.stock_interval_secs = n;
        }

        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("解析配置文件失败: {e}")))
    }
}
