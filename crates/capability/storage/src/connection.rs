//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池（最大连接数 8，获取连接超时 5 秒）

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// 建立 Postgres 连接池
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::info!(max_connections = 8, "postgres pool ready");
    Ok(pool)
}
