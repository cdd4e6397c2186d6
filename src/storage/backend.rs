use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{error, info, warn};

use crate::errors::{Result, SubtrackError};
use crate::storage::models::{HistoryEntry, HistoryRow, NewStreamer, Platform, Streamer};
use crate::storage::StreamerStore;

use migration::{Migrator, MigratorTrait, entities::streamer, entities::subscriber_history};

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SubtrackError::database_config("DATABASE_URL 未设置"));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        // 运行迁移
        storage.run_migrations().await?;

        warn!("{} storage initialized.", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    /// 连接 SQLite 数据库（带自动创建和性能优化）
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| SubtrackError::database_config(format!("SQLite URL 解析失败: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            SubtrackError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 连接通用数据库（MySQL/PostgreSQL）
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .idle_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            SubtrackError::database_connection(format!(
                "无法连接到 {} 数据库: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("迁移失败: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Underlying connection, for graceful shutdown
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn model_to_streamer(model: streamer::Model, history: Vec<HistoryEntry>) -> Streamer {
        Streamer {
            id: model.id,
            name: model.name,
            // Tolerate unknown stored platform strings on read
            platform: model.platform.parse::<Platform>().unwrap_or(Platform::Other),
            created_at: model.created_at,
            history,
        }
    }

    fn model_to_history_row(model: subscriber_history::Model) -> HistoryRow {
        HistoryRow {
            id: model.id,
            streamer_id: model.streamer_id,
            count: model.count,
            timestamp: model.timestamp,
            created_at: model.created_at,
        }
    }

    /// History of one streamer, ascending by timestamp
    async fn load_history(&self, streamer_id: i64) -> Result<Vec<HistoryEntry>> {
        let rows = subscriber_history::Entity::find()
            .filter(subscriber_history::Column::StreamerId.eq(streamer_id))
            .order_by_asc(subscriber_history::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("查询订阅历史失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| HistoryEntry {
                count: r.count,
                timestamp: r.timestamp,
            })
            .collect())
    }
}

#[async_trait]
impl StreamerStore for SeaOrmStorage {
    async fn load_all(&self) -> Result<Vec<Streamer>> {
        let streamer_models = streamer::Entity::find()
            .order_by_desc(streamer::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("加载主播列表失败: {}", e)))?;

        // One pass over the whole history table instead of a query per
        // streamer; rows come back ascending so each bucket stays sorted.
        let history_rows = subscriber_history::Entity::find()
            .order_by_asc(subscriber_history::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("加载订阅历史失败: {}", e)))?;

        let mut histories: HashMap<i64, Vec<HistoryEntry>> = HashMap::new();
        for row in history_rows {
            histories.entry(row.streamer_id).or_default().push(HistoryEntry {
                count: row.count,
                timestamp: row.timestamp,
            });
        }

        let streamers: Vec<Streamer> = streamer_models
            .into_iter()
            .map(|m| {
                let history = histories.remove(&m.id).unwrap_or_default();
                Self::model_to_streamer(m, history)
            })
            .collect();

        info!("Loaded {} streamers", streamers.len());
        Ok(streamers)
    }

    async fn get(&self, id: i64) -> Result<Option<Streamer>> {
        let model = streamer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("查询主播失败: {}", e)))?;

        match model {
            Some(model) => {
                let history = self.load_history(model.id).await?;
                Ok(Some(Self::model_to_streamer(model, history)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, new: NewStreamer) -> Result<Streamer> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SubtrackError::database_operation(format!("开始事务失败: {}", e)))?;

        let now = Utc::now();

        let streamer_model = streamer::ActiveModel {
            id: NotSet,
            name: Set(new.name.clone()),
            platform: Set(new.platform.to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| SubtrackError::database_operation(format!("插入主播失败: {}", e)))?;

        let seed = subscriber_history::ActiveModel {
            id: NotSet,
            streamer_id: Set(streamer_model.id),
            count: Set(new.initial_count),
            timestamp: Set(new.timestamp),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| SubtrackError::database_operation(format!("插入初始订阅数失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| SubtrackError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Streamer created: {} ({})", streamer_model.name, streamer_model.id);

        Ok(Self::model_to_streamer(
            streamer_model,
            vec![HistoryEntry {
                count: seed.count,
                timestamp: seed.timestamp,
            }],
        ))
    }

    async fn update_metadata(
        &self,
        id: i64,
        name: &str,
        platform: Platform,
    ) -> Result<Streamer> {
        let existing = streamer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("查询主播失败: {}", e)))?
            .ok_or_else(|| SubtrackError::not_found(format!("Streamer not found: {}", id)))?;

        let mut active: streamer::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.platform = Set(platform.to_string());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("更新主播失败: {}", e)))?;

        info!("Streamer updated: {} ({})", updated.name, updated.id);

        let history = self.load_history(updated.id).await?;
        Ok(Self::model_to_streamer(updated, history))
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SubtrackError::database_operation(format!("开始事务失败: {}", e)))?;

        // Explicit cascade so the behavior does not depend on the backend's
        // foreign-key enforcement being switched on.
        subscriber_history::Entity::delete_many()
            .filter(subscriber_history::Column::StreamerId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("删除订阅历史失败: {}", e)))?;

        let result = streamer::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("删除主播失败: {}", e)))?;

        if result.rows_affected == 0 {
            // Nothing to delete: roll back and report the missing row
            if let Err(e) = txn.rollback().await {
                error!("回滚事务失败: {}", e);
            }
            return Err(SubtrackError::not_found(format!("Streamer not found: {}", id)));
        }

        txn.commit()
            .await
            .map_err(|e| SubtrackError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Streamer deleted: {}", id);
        Ok(())
    }

    async fn append_history(&self, id: i64, count: i64, timestamp: i64) -> Result<HistoryRow> {
        let exists = streamer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SubtrackError::database_operation(format!("查询主播失败: {}", e)))?;

        if exists.is_none() {
            return Err(SubtrackError::not_found(format!("Streamer not found: {}", id)));
        }

        let inserted = subscriber_history::ActiveModel {
            id: NotSet,
            streamer_id: Set(id),
            count: Set(count),
            timestamp: Set(timestamp),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| SubtrackError::database_operation(format!("插入订阅历史失败: {}", e)))?;

        info!("History entry appended for streamer {}: count={}", id, count);
        Ok(Self::model_to_history_row(inserted))
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| SubtrackError::database_connection(format!("数据库探活失败: {}", e)))
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
