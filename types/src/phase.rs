use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Countdown,
    RoleReveal,
    Day,
    Voting,
    Night,
    Announcement,
    Finished,
    Aborted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished | Phase::Aborted)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Countdown => "countdown",
            Phase::RoleReveal => "role reveal",
            Phase::Day => "day",
            Phase::Voting => "voting",
            Phase::Night => "night",
            Phase::Announcement => "announcement",
            Phase::Finished => "finished",
            Phase::Aborted => "aborted",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
    Aborted,
    Closed,
}

impl RoomStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RoomStatus::Finished | RoomStatus::Aborted | RoomStatus::Closed
        )
    }
}
