//! 留存 API 请求/响应类型

use serde::Serialize;
use serde_json::Value;

/// POST /api/data 成功响应
#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub response: String,
    pub inserted_id: String,
}

impl InsertResponse {
    pub fn new(inserted_id: String) -> Self {
        Self {
            response: "Data received and stored successfully".to_string(),
            inserted_id,
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
