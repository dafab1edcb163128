use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ActionTarget, Faction, LogEntry, NightAction, Phase, Role, RoomStatus, Team, TeamProposal,
    VoteRecord,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub phase: Phase,
    pub day: u32,
    pub status: RoomStatus,
    pub role_counts: HashMap<Role, usize>,
    pub night_actions: HashMap<Uuid, NightAction>,
    pub pending_team_actions: HashMap<Team, TeamProposal>,
    pub night_leaders: HashMap<Team, Uuid>,
    pub vote_records: Vec<VoteRecord>,
    // sticky once the single shot lands
    pub assassin_used: bool,
    // never ends the game on its own
    pub teruteru_won: bool,
    pub phase_started_at: DateTime<Utc>,
    pub night_completion_deadline: Option<DateTime<Utc>>,
    pub winner: Option<Faction>,
    pub logs: Vec<LogEntry>,
}

impl Room {
    pub fn new(role_counts: HashMap<Role, usize>, now: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Countdown,
            day: 0,
            status: RoomStatus::Playing,
            role_counts,
            night_actions: HashMap::new(),
            pending_team_actions: HashMap::new(),
            night_leaders: HashMap::new(),
            vote_records: Vec::new(),
            assassin_used: false,
            teruteru_won: false,
            phase_started_at: now,
            night_completion_deadline: None,
            winner: None,
            logs: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn log_public(&mut self, text: impl Into<String>) {
        self.push_log(text.into(), false, HashSet::new());
    }

    pub fn log_secret(&mut self, text: impl Into<String>, visible_to: HashSet<Uuid>) {
        self.push_log(text.into(), true, visible_to);
    }

    fn push_log(&mut self, text: String, secret: bool, visible_to: HashSet<Uuid>) {
        self.logs.push(LogEntry {
            text,
            phase_label: self.phase.label().to_string(),
            day: self.day,
            secret,
            visible_to,
        });
    }

    pub fn night_action(&self, actor_id: Uuid) -> Option<&NightAction> {
        self.night_actions.get(&actor_id)
    }

    pub fn wolf_attack(&self) -> Option<&NightAction> {
        self.night_actions.values().find(|a| a.role.is_wolf())
    }

    pub fn guard_targets(&self) -> HashSet<Uuid> {
        self.night_actions
            .values()
            .filter(|a| a.role.is_guard())
            .filter_map(|a| a.target.player())
            .collect()
    }

    pub fn trap_targets(&self) -> HashSet<Uuid> {
        self.night_actions
            .values()
            .filter(|a| a.role == Role::Trapper)
            .filter_map(|a| a.target.player())
            .collect()
    }

    pub fn clear_night_bookkeeping(&mut self) {
        self.night_actions.clear();
        self.pending_team_actions.clear();
        self.night_leaders.clear();
        self.night_completion_deadline = None;
    }

    // replaces any earlier ballot by the same voter
    pub fn record_vote(&mut self, voter_id: Uuid, target: ActionTarget) {
        self.vote_records.retain(|v| v.voter_id != voter_id);
        self.vote_records.push(VoteRecord { voter_id, target });
    }
}

impl Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let winner_str = self
            .winner
            .map(|w| w.to_string())
            .unwrap_or("None".to_string());
        let leaders_str = self
            .night_leaders
            .iter()
            .map(|(team, id)| format!("{team}: {id}"))
            .join(", ");
        write!(
            f,
            "day {} {} (winner: {}, leaders: [{}])",
            self.day, self.phase, winner_str, leaders_str
        )
    }
}
