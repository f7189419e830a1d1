//! 留存 API 处理器

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::Value;

use crate::common::now_in_zone;
use crate::notification::DATA_UPDATED;

use super::error::ApiError;
use super::model::NewRetentionRecord;
use super::router::RetentionState;
use super::schema::RetentionSchema;
use super::types::InsertResponse;

/// GET /api/data
pub async fn get_data(State(state): State<RetentionState>) -> Response {
    match state.store.find_all().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::error!("查询留存数据失败: {:#}", e);
            ApiError::FetchFailed(format!("{:#}", e)).into_response()
        }
    }
}

/// POST /api/data
pub async fn receive_data(
    State(state): State<RetentionState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !is_json_request(&headers) {
        return ApiError::NotJson.into_response();
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return ApiError::InvalidJson("request body must be a JSON object".to_string())
                .into_response();
        }
        Err(e) => return ApiError::InvalidJson(e.to_string()).into_response(),
    };

    #[cfg(feature = "sensitive-logs")]
    tracing::debug!("收到留存数据: {}", Value::Object(payload.clone()));

    let timestamp = now_in_zone(state.timezone);
    let record = if state.enforce_schema {
        match RetentionSchema::validate(&payload) {
            Ok(reading) => NewRetentionRecord::from_reading(reading, timestamp),
            Err(errors) => {
                tracing::warn!("留存数据未通过 schema 校验: {:?}", errors);
                return ApiError::SchemaViolation(errors).into_response();
            }
        }
    } else {
        NewRetentionRecord::from_payload(&payload, timestamp)
    };

    match state.store.insert(record).await {
        Ok(id) => {
            tracing::info!("留存数据写入成功, ID: {}", id);
            state.notifier.publish(DATA_UPDATED);
            Json(InsertResponse::new(id)).into_response()
        }
        Err(e) => {
            tracing::error!("写入留存数据失败: {:#}", e);
            ApiError::InsertFailed(format!("{:#}", e)).into_response()
        }
    }
}

/// Content-Type 为 `application/json` 或 `application/*+json`
fn is_json_request(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
