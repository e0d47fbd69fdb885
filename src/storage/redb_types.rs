//! Redb 存储共享类型定义
//!
//! 计数器表和短链接记录表共用同一个数据库文件，一个进程内只能打开一次

use redb::{Database, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// 计数器名称 -> 当前总数
pub const COUNTERS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("counters");

/// 记录 ID -> JSON 编码的 `UrlRecord`
pub const URL_RECORDS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("url_records");

/// 打开（或创建）数据库文件，并确保所有表都已存在
pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Arc<Database>, redb::Error> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(redb::StorageError::from)?;
        }
    }

    let db = Database::create(path.as_ref())?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(COUNTERS_TABLE)?;
        write_txn.open_table(URL_RECORDS_TABLE)?;
    }
    write_txn.commit()?;

    Ok(Arc::new(db))
}

