//! 应用路由组装

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::notification::{Notifier, create_notification_router};
use crate::retention::{RetentionState, create_retention_router};

/// 组装完整应用：`/api/*` 留存接口 + `/ws` 通知通道，所有路由允许跨域
pub fn build_app(state: RetentionState) -> Router {
    let notifier: Arc<dyn Notifier> = state.notifier.clone();

    Router::new()
        .nest("/api", create_retention_router(state))
        .merge(create_notification_router(notifier))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
