use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{Faction, LogEntry, PlayerStatus, Role, Room, Seat};
use uuid::Uuid;

// written back only through a compare-and-swap on version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDocument {
    pub id: String,
    #[serde(skip)]
    pub version: i64,
    pub room: Room,
    pub seats: Vec<Seat>,
}

impl RoomDocument {
    pub fn new(id: impl Into<String>, room: Room, seats: Vec<Seat>) -> Self {
        Self {
            id: id.into(),
            version: 0,
            room,
            seats,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchArchive {
    pub room_id: String,
    pub finished_at: DateTime<Utc>,
    pub winner: Option<Faction>,
    pub teruteru_won: bool,
    pub players: Vec<ArchivedPlayer>,
    pub transcript: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedPlayer {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub original_role: Option<Role>,
    pub status: PlayerStatus,
    pub death_reason: Option<String>,
    pub died_day: Option<u32>,
}

impl MatchArchive {
    pub fn from_document(doc: &RoomDocument, finished_at: DateTime<Utc>) -> Self {
        let players = doc
            .seats
            .iter()
            .map(|seat| ArchivedPlayer {
                id: seat.id(),
                name: seat.player.name.clone(),
                role: seat.role(),
                original_role: seat.secret.original_role,
                status: seat.player.status,
                death_reason: seat.player.death_reason.clone(),
                died_day: seat.player.died_day,
            })
            .collect();
        Self {
            room_id: doc.id.clone(),
            finished_at,
            winner: doc.room.winner,
            teruteru_won: doc.room.teruteru_won,
            players,
            transcript: doc.room.logs.clone(),
        }
    }
}
