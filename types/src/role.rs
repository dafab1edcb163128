use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Werewolf,
    Greatwolf,
    WiseWolf,
    Madman,
    Seer,
    Sage,
    Knight,
    Trapper,
    Medium,
    Detective,
    Fox,
    Cursed,
    Elder,
    Teruteru,
    Assassin,
    Killer,
}

impl Role {
    pub fn is_wolf(self) -> bool {
        matches!(self, Role::Werewolf | Role::Greatwolf | Role::WiseWolf)
    }

    // madman counts as human here despite rooting for wolves
    pub fn counts_as_human(self) -> bool {
        !self.is_wolf() && !matches!(self, Role::Fox | Role::Teruteru)
    }

    pub fn is_solo_night_role(self) -> bool {
        matches!(self, Role::Seer | Role::Sage | Role::Knight | Role::Trapper)
    }

    pub fn is_guard(self) -> bool {
        matches!(self, Role::Knight | Role::Trapper)
    }

    pub fn is_diviner(self) -> bool {
        matches!(self, Role::Seer | Role::Sage)
    }

    pub fn team(self) -> Option<Team> {
        match self {
            r if r.is_wolf() => Some(Team::Wolves),
            Role::Assassin => Some(Team::Assassin),
            Role::Teruteru => Some(Team::Teruteru),
            Role::Seer => Some(Team::Seer),
            Role::Sage => Some(Team::Sage),
            Role::Knight => Some(Team::Knight),
            Role::Trapper => Some(Team::Trapper),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Werewolf => "werewolf",
            Role::Greatwolf => "greatwolf",
            Role::WiseWolf => "wise wolf",
            Role::Madman => "madman",
            Role::Seer => "seer",
            Role::Sage => "sage",
            Role::Knight => "knight",
            Role::Trapper => "trapper",
            Role::Medium => "medium",
            Role::Detective => "detective",
            Role::Fox => "fox",
            Role::Cursed => "cursed",
            Role::Elder => "elder",
            Role::Teruteru => "teruteru",
            Role::Assassin => "assassin",
            Role::Killer => "killer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Wolves,
    Assassin,
    Teruteru,
    Seer,
    Sage,
    Knight,
    Trapper,
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Team::Wolves => "wolves",
            Team::Assassin => "assassin",
            Team::Teruteru => "teruteru",
            Team::Seer => "seer",
            Team::Sage => "sage",
            Team::Knight => "knight",
            Team::Trapper => "trapper",
        };
        write!(f, "{s}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Citizen,
    Werewolf,
    Fox,
}

impl Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Faction::Citizen => "citizen",
            Faction::Werewolf => "werewolf",
            Faction::Fox => "fox",
        };
        write!(f, "{s}")
    }
}
