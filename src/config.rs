use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 未配置 url 时周期记录使用内存存储
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 上传文件、recipes.csv 与结果文件所在目录
    pub data_dir: PathBuf,
    /// 每次预测必须上传的周快照数量 (week1..weekN)
    pub required_weeks: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig::default(),
            forecast: ForecastConfig {
                data_dir: PathBuf::from("data"),
                required_weeks: 4,
            },
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置, 例如 INVENTORY_SERVER__PORT=9000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(
            Environment::with_prefix("INVENTORY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "forecast.data_dir",
                defaults.forecast.data_dir.to_string_lossy().into_owned(),
            )?
            .set_default("forecast.required_weeks", defaults.forecast.required_weeks as i64)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}
