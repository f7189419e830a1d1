//! 留存数据模块
//!
//! 接收 RSSI 读数与留存指标，写入文档存储，并在写入后通知在线客户端

pub mod error;
pub mod model;
pub mod schema;
pub mod store;
mod handlers;
mod router;
mod types;

pub use router::{RetentionState, create_retention_router};
pub use store::{RetentionStore, SqliteDatabase};
