//! 留存记录数据模型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::schema::RetentionReading;

/// 请求体中的 RSSI 字段
pub const RSSI_FIELD: &str = "rssi_values";
/// 请求体中的留存字段（存储时改名为 user_retention）
pub const RETENTION_FIELD: &str = "last_retention";

/// 已持久化的留存记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionRecord {
    /// 存储分配的 ID，对外始终为字符串
    #[serde(rename = "_id")]
    pub id: String,
    pub rssi_values: Value,
    pub user_retention: Value,
    pub timestamp: String,
}

/// 待写入的新记录（尚未分配 ID）
///
/// 字段按提交原样保存，缺失字段记为 null
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRetentionRecord {
    #[serde(default)]
    pub rssi_values: Value,
    #[serde(default)]
    pub user_retention: Value,
    pub timestamp: String,
}

impl NewRetentionRecord {
    /// 从请求体构造记录，时间戳由服务端给出
    pub fn from_payload(payload: &Map<String, Value>, timestamp: String) -> Self {
        Self {
            rssi_values: payload.get(RSSI_FIELD).cloned().unwrap_or(Value::Null),
            user_retention: payload.get(RETENTION_FIELD).cloned().unwrap_or(Value::Null),
            timestamp,
        }
    }

    /// 从通过 schema 校验的读数构造记录
    pub fn from_reading(reading: RetentionReading, timestamp: String) -> Self {
        Self {
            rssi_values: Value::from(reading.rssi_values),
            user_retention: Value::from(reading.last_retention),
            timestamp,
        }
    }

    /// 附加存储分配的 ID
    pub fn with_id(self, id: String) -> RetentionRecord {
        RetentionRecord {
            id,
            rssi_values: self.rssi_values,
            user_retention: self.user_retention,
            timestamp: self.timestamp,
        }
    }
}
