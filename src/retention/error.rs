//! 留存 API 错误类型

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;

use super::schema::SchemaErrors;
use super::types::ErrorResponse;

/// 处理器边界上的错误，统一转换为 JSON 响应
#[derive(Debug)]
pub enum ApiError {
    /// Content-Type 不是 JSON
    NotJson,
    /// 请求体无法解析为 JSON 对象
    InvalidJson(String),
    /// 启用 schema 校验时请求体不合法
    SchemaViolation(SchemaErrors),
    /// 读取存储失败
    FetchFailed(String),
    /// 写入存储失败
    InsertFailed(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotJson | Self::InvalidJson(_) | Self::SchemaViolation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::FetchFailed(_) | Self::InsertFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::NotJson => ErrorResponse::new("Request must be JSON"),
            Self::InvalidJson(details) => {
                ErrorResponse::with_details("Failed to decode JSON object", details.clone())
            }
            Self::SchemaViolation(errors) => ErrorResponse::with_details(
                "Invalid request body",
                Value::Object(
                    errors
                        .iter()
                        .map(|(field, message)| (field.clone(), Value::from(message.as_str())))
                        .collect(),
                ),
            ),
            Self::FetchFailed(details) => {
                ErrorResponse::with_details("Failed to fetch data from database", details.clone())
            }
            Self::InsertFailed(details) => {
                ErrorResponse::with_details("Failed to insert data into database", details.clone())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_json_has_no_details() {
        let err = ApiError::NotJson;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({"error": "Request must be JSON"})
        );
    }

    #[test]
    fn test_storage_errors_are_server_errors() {
        let err = ApiError::FetchFailed("disk I/O error".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err.body()).unwrap(),
            json!({"error": "Failed to fetch data from database", "details": "disk I/O error"})
        );
        assert_eq!(
            ApiError::InsertFailed(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_schema_violation_details_are_an_object() {
        let mut errors = SchemaErrors::new();
        errors.insert("last_retention".to_string(), "Not a valid integer.".to_string());
        let body = serde_json::to_value(ApiError::SchemaViolation(errors).body()).unwrap();
        assert_eq!(body["details"], json!({"last_retention": "Not a valid integer."}));
    }
}
