//! 留存 API 路由

use std::sync::Arc;

use axum::{Router, routing::get};
use chrono_tz::Tz;

use crate::notification::Notifier;

use super::handlers::{get_data, receive_data};
use super::store::RetentionStore;

/// 留存 API 状态
#[derive(Clone)]
pub struct RetentionState {
    pub store: Arc<dyn RetentionStore>,
    pub notifier: Arc<dyn Notifier>,
    /// 记录时间戳所用时区
    pub timezone: Tz,
    /// 是否按 schema 校验请求体
    pub enforce_schema: bool,
}

/// 创建留存 API 路由
///
/// # 端点
/// - `GET /data` - 获取全部留存记录
/// - `POST /data` - 提交一条读数
///
/// 返回 Router<()>，由主应用 nest 到 `/api`
pub fn create_retention_router(state: RetentionState) -> Router {
    Router::new()
        .route("/data", get(get_data).post(receive_data))
        .with_state(state)
}
