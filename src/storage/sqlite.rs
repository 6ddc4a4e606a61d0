use anyhow::Context;
use chrono::Utc;
use entities::kv_entry;
use migration::MigratorTrait;
use sea_orm::{
    ActiveValue::Set, Database, DatabaseConnection, EntityTrait, sea_query::OnConflict,
};

use super::DurableStore;

/// `DurableStore` on a sqlite `kv_entry` table.
#[derive(Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Connect and bring the schema up to date.
    pub async fn open(connection_string: &str) -> anyhow::Result<Self> {
        let db = Database::connect(connection_string)
            .await
            .with_context(|| "Failed to connect to database")?;
        migration::Migrator::up(&db, None)
            .await
            .with_context(|| "Failed to run database migrations")?;
        tracing::debug!(%connection_string, "opened sqlite store");
        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl DurableStore for SqliteStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = kv_entry::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .with_context(|| format!("Failed to read key {key}"))?;
        Ok(row.map(|m| m.value))
    }

    #[tracing::instrument(level = "debug", skip(self, value), fields(len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now()),
        };
        kv_entry::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("Failed to write key {key}"))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        kv_entry::Entity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await
            .with_context(|| format!("Failed to remove key {key}"))?;
        Ok(())
    }
}
