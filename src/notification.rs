//! 实时通知模块
//!
//! 数据写入后向所有在线客户端广播事件，客户端通过 WebSocket 订阅。
//! 不保留历史事件：发布时未连接的客户端不会收到该事件。

use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;

/// 数据已更新事件
pub const DATA_UPDATED: &str = "data_updated";

/// 推送给客户端的事件帧（无 payload）
#[derive(Debug, Clone, Serialize)]
pub struct EventFrame {
    pub event: String,
}

/// 单个订阅者的事件接收端
pub struct Subscription {
    receiver: broadcast::Receiver<String>,
}

impl Subscription {
    /// 等待下一个事件
    ///
    /// 落后过多时跳过丢失的事件继续接收；通道关闭时返回 None
    pub async fn next(&mut self) -> Option<String> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("通知订阅者落后，跳过 {} 个事件", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// 发布/订阅能力
pub trait Notifier: Send + Sync {
    /// 注册新的订阅者，只会收到注册之后发布的事件
    fn subscribe(&self) -> Subscription;

    /// 向当前所有订阅者发布事件，返回送达的订阅者数量
    fn publish(&self, event: &str) -> usize;
}

/// 基于 tokio broadcast 的通知通道
pub struct BroadcastNotifier {
    sender: broadcast::Sender<String>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }
}

impl Notifier for BroadcastNotifier {
    fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    fn publish(&self, event: &str) -> usize {
        // 没有订阅者时 send 返回 Err，视为送达 0 个
        let delivered = self.sender.send(event.to_string()).unwrap_or(0);
        tracing::debug!("已发布事件 {} -> {} 个订阅者", event, delivered);
        delivered
    }
}

/// 创建通知 WebSocket 路由
///
/// # 端点
/// - `GET /ws` - 升级为 WebSocket，推送 `{"event": "<name>"}` 文本帧
pub fn create_notification_router(notifier: Arc<dyn Notifier>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(notifier)
}

/// GET /ws
async fn ws_handler(
    State(notifier): State<Arc<dyn Notifier>>,
    ws: WebSocketUpgrade,
) -> Response {
    // 升级前订阅，确保握手完成后发布的事件不会丢失
    let subscription = notifier.subscribe();
    ws.on_upgrade(move |socket| forward_events(socket, subscription))
}

/// 将订阅到的事件转发给 WebSocket 客户端，直到任一方关闭
async fn forward_events(socket: WebSocket, mut subscription: Subscription) {
    tracing::debug!("通知客户端已连接");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = subscription.next() => {
                let Some(event) = event else { break };
                let frame = match serde_json::to_string(&EventFrame { event }) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("序列化事件失败: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    // 客户端消息不做处理
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("通知客户端已断开");
}
