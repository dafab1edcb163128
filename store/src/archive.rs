use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::MatchArchive;
use crate::StoreError;

// invoked exactly once, when the room turns terminal
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn archive_match(&self, archive: &MatchArchive) -> Result<(), StoreError>;
}

pub struct SqliteArchive {
    pool: SqlitePool,
}

impl SqliteArchive {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS matches (
                room_id TEXT PRIMARY KEY,
                finished_at TIMESTAMP NOT NULL,
                winner TEXT,
                teruteru_won INTEGER NOT NULL,
                transcript JSON NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS match_players (
                room_id TEXT NOT NULL REFERENCES matches(room_id),
                player_id TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                original_role TEXT,
                status TEXT NOT NULL,
                death_reason TEXT,
                died_day INTEGER,
                PRIMARY KEY (room_id, player_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ArchiveSink for SqliteArchive {
    async fn archive_match(&self, archive: &MatchArchive) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let winner = archive.winner.map(|w| w.to_string());
        let transcript = serde_json::to_string(&archive.transcript)?;
        sqlx::query(
            "INSERT INTO matches (room_id, finished_at, winner, teruteru_won, transcript)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&archive.room_id)
        .bind(archive.finished_at)
        .bind(winner)
        .bind(archive.teruteru_won as i64)
        .bind(transcript)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        for player in &archive.players {
            sqlx::query(
                "INSERT INTO match_players
                 (room_id, player_id, name, role, original_role, status, death_reason, died_day)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&archive.room_id)
            .bind(player.id.to_string())
            .bind(&player.name)
            .bind(player.role.to_string())
            .bind(player.original_role.map(|r| r.to_string()))
            .bind(format!("{:?}", player.status).to_lowercase())
            .bind(player.death_reason.as_deref())
            .bind(player.died_day.map(|d| d as i64))
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        tracing::info!("archived match {}", archive.room_id);
        Ok(())
    }
}

pub struct NoopArchive;

#[async_trait]
impl ArchiveSink for NoopArchive {
    async fn archive_match(&self, _archive: &MatchArchive) -> Result<(), StoreError> {
        Ok(())
    }
}
