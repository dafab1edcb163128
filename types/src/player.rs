use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Alive,
    Dead,
    // removed by admin action, not dead: no reason, no cards
    Vanished,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub status: PlayerStatus,
    // "&"-joined when a night stacks several causes
    pub death_reason: Option<String>,
    pub died_day: Option<u32>,
    pub is_ready: bool,
    // may not be guarded again the following night
    pub last_guard_target: Option<Uuid>,
    pub is_spectator: bool,
}

impl Player {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            status: PlayerStatus::Alive,
            death_reason: None,
            died_day: None,
            is_ready: false,
            last_guard_target: None,
            is_spectator: false,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerSecret {
    pub role: Role,
    pub original_role: Option<Role>,
    pub teammates: Vec<Uuid>,
    pub elder_shield: bool,
}

impl PlayerSecret {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            original_role: None,
            teammates: Vec::new(),
            elder_shield: role == Role::Elder,
        }
    }
}

// redaction for untrusted viewers is the transport's concern
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Seat {
    pub player: Player,
    pub secret: PlayerSecret,
}

impl Seat {
    pub fn new(id: Uuid, name: String, role: Role) -> Self {
        Self {
            player: Player::new(id, name),
            secret: PlayerSecret::new(role),
        }
    }

    pub fn id(&self) -> Uuid {
        self.player.id
    }

    pub fn role(&self) -> Role {
        self.secret.role
    }

    pub fn is_alive(&self) -> bool {
        self.player.status == PlayerStatus::Alive && !self.player.is_spectator
    }
}

pub fn find_seat(seats: &[Seat], id: Uuid) -> Option<&Seat> {
    seats.iter().find(|s| s.id() == id)
}

pub fn find_seat_mut(seats: &mut [Seat], id: Uuid) -> Option<&mut Seat> {
    seats.iter_mut().find(|s| s.id() == id)
}

pub fn living(seats: &[Seat]) -> impl Iterator<Item = &Seat> {
    seats.iter().filter(|s| s.is_alive())
}

pub fn living_with_role(seats: &[Seat], role: Role) -> impl Iterator<Item = &Seat> {
    seats.iter().filter(move |s| s.is_alive() && s.role() == role)
}
