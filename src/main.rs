mod common;
mod model;
mod notification;
mod retention;
mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use model::config::Config;
use notification::{BroadcastNotifier, Notifier};
use retention::{RetentionState, RetentionStore, SqliteDatabase};

/// RSSI / 留存数据采集服务
#[derive(Parser, Debug)]
#[command(name = "retention-rs", version)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = Config::default_config_path())]
    config: String,

    /// 覆盖监听地址
    #[arg(long)]
    host: Option<String>,

    /// 覆盖监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 覆盖数据库路径
    #[arg(long)]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.db_path = db_path;
    }
    if let Some(path) = config.config_path() {
        tracing::info!("配置文件: {}", path.display());
    }

    let timezone = common::parse_timezone(&config.timezone)?;

    let db = SqliteDatabase::open(&config.db_path)?;
    let store: Arc<dyn RetentionStore> = Arc::new(db.collection(&config.collection)?);
    tracing::info!("数据库已打开: {} (集合 {})", config.db_path, config.collection);

    let notifier: Arc<dyn Notifier> = Arc::new(BroadcastNotifier::new(config.notify_capacity));

    if config.enforce_schema {
        tracing::info!("已启用请求体 schema 校验");
    }

    let app = server::build_app(RetentionState {
        store,
        notifier,
        timezone,
        enforce_schema: config.enforce_schema,
    });

    let addr = config.listen_addr();
    tracing::info!("服务启动: http://{}", addr);
    tracing::info!("  GET  /api/data");
    tracing::info!("  POST /api/data");
    tracing::info!("  GET  /ws (data_updated 通知)");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定监听地址失败: {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
