//! 留存数据文档存储
//!
//! 每个集合对应一张 SQLite 表，文档以 JSON 文本保存，ID 由存储分配

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::Connection;

use super::model::{NewRetentionRecord, RetentionRecord};

/// 留存记录集合
#[async_trait]
pub trait RetentionStore: Send + Sync {
    /// 按写入顺序返回全部记录
    async fn find_all(&self) -> Result<Vec<RetentionRecord>>;

    /// 写入新文档，返回分配的 ID
    async fn insert(&self, record: NewRetentionRecord) -> Result<String>;
}

/// 底层 SQLite 连接（同步）
struct DocumentDb {
    conn: Mutex<Connection>,
}

impl DocumentDb {
    fn create_collection(&self, table: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                document TEXT NOT NULL
            );"
        ))?;
        Ok(())
    }

    fn find_all(&self, table: &str) -> Result<Vec<RetentionRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT id, document FROM \"{table}\" ORDER BY seq"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, document)| {
                let record: NewRetentionRecord = serde_json::from_str(&document)
                    .with_context(|| format!("文档 {} 格式损坏", id))?;
                Ok(record.with_id(id))
            })
            .collect()
    }

    fn insert(&self, table: &str, record: &NewRetentionRecord) -> Result<String> {
        let document = serde_json::to_string(record)?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let conn = self.conn.lock();
        conn.execute(
            &format!("INSERT INTO \"{table}\" (id, document) VALUES (?1, ?2)"),
            rusqlite::params![id, document],
        )?;
        Ok(id)
    }
}

/// SQLite 文档数据库
#[derive(Clone)]
pub struct SqliteDatabase {
    db: Arc<DocumentDb>,
}

impl SqliteDatabase {
    /// 打开数据库文件（":memory:" 为内存库）
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("打开数据库失败: {}", path))?;
        Ok(Self {
            db: Arc::new(DocumentDb {
                conn: Mutex::new(conn),
            }),
        })
    }

    /// 获取指定名称的集合，不存在时创建
    pub fn collection(&self, name: &str) -> Result<SqliteCollection> {
        validate_collection_name(name)?;
        self.db.create_collection(name)?;
        Ok(SqliteCollection {
            db: self.db.clone(),
            table: Arc::from(name),
        })
    }
}

/// 集合名只允许字母、数字和下划线，且不以数字开头
fn validate_collection_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        anyhow::bail!("无效的集合名: '{}'", name);
    }
    Ok(())
}

/// 单个集合的句柄
#[derive(Clone)]
pub struct SqliteCollection {
    db: Arc<DocumentDb>,
    table: Arc<str>,
}

#[async_trait]
impl RetentionStore for SqliteCollection {
    async fn find_all(&self) -> Result<Vec<RetentionRecord>> {
        let db = self.db.clone();
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || db.find_all(&table)).await?
    }

    async fn insert(&self, record: NewRetentionRecord) -> Result<String> {
        let db = self.db.clone();
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || db.insert(&table, &record)).await?
    }
}
