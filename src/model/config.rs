use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite 数据库文件路径（支持 ":memory:"）
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// 留存记录所在集合名
    #[serde(default = "default_collection")]
    pub collection: String,

    /// 记录时间戳使用的 IANA 时区
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// 是否按记录 schema 校验 POST 请求体
    #[serde(default)]
    pub enforce_schema: bool,

    /// 通知通道容量（订阅者落后超过此数量的事件会被跳过）
    #[serde(default = "default_notify_capacity")]
    pub notify_capacity: usize,

    /// 配置文件路径（运行时元数据，不从 JSON 读取）
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "retention.db".to_string()
}

fn default_collection() -> String {
    "user_retention_data".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_notify_capacity() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            collection: default_collection(),
            timezone: default_timezone(),
            enforce_schema: false,
            notify_capacity: default_notify_capacity(),
            config_path: None,
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
