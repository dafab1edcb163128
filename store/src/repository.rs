use sqlx::{Row, SqlitePool};
use tokio::time::sleep;

use crate::models::RoomDocument;
use crate::retry::RetryPolicy;
use crate::StoreError;

pub struct RoomStore {
    pool: SqlitePool,
    policy: RetryPolicy,
}

impl RoomStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(pool: SqlitePool, policy: RetryPolicy) -> Self {
        Self { pool, policy }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                version INTEGER NOT NULL,
                data TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    pub async fn create_room(&self, doc: &RoomDocument) -> Result<(), StoreError> {
        let data = serde_json::to_string(doc)?;
        sqlx::query("INSERT INTO rooms (id, version, data) VALUES (?, ?, ?)")
            .bind(&doc.id)
            .bind(doc.version)
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    pub async fn load_room(&self, room_id: &str) -> Result<RoomDocument, StoreError> {
        let row = sqlx::query("SELECT version, data FROM rooms WHERE id = ?")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;

        let data: String = row.get("data");
        let mut doc: RoomDocument = serde_json::from_str(&data)?;
        doc.version = row.get("version");
        Ok(doc)
    }

    // game rejections pass through without a write and without a retry
    pub async fn transact<T, F>(&self, room_id: &str, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut(&mut RoomDocument) -> Result<T, StoreError>,
    {
        let mut attempts = 0;
        let mut delays = self.policy.delays();
        loop {
            attempts += 1;
            let mut doc = self.load_room(room_id).await?;
            let expected_version = doc.version;
            let value = op(&mut doc)?;

            match self.save_cas(&doc, expected_version).await {
                Ok(()) => return Ok(value),
                Err(err) if err.is_conflict() => match delays.next() {
                    Some(delay) => {
                        tracing::warn!(
                            "write conflict on room {room_id} (attempt {attempts}), retrying in {delay:?}"
                        );
                        sleep(delay).await;
                    }
                    None => {
                        return Err(StoreError::RetryExhausted {
                            room_id: room_id.to_string(),
                            attempts,
                        })
                    }
                },
                Err(err) => return Err(err),
            }
        }
    }

    async fn save_cas(&self, doc: &RoomDocument, expected_version: i64) -> Result<(), StoreError> {
        let data = serde_json::to_string(doc)?;
        let result = sqlx::query(
            "UPDATE rooms SET data = ?, version = version + 1 WHERE id = ? AND version = ?",
        )
        .bind(data)
        .bind(&doc.id)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(doc.id.clone()));
        }
        Ok(())
    }
}
