use std::collections::HashSet;

use chrono::{DateTime, Utc};
use types::{player, Room, Seat, Team};
use uuid::Uuid;

use crate::config::GameConfig;

// detective and medium only receive information, so they never gate completion
pub fn required_actors(room: &Room, seats: &[Seat]) -> HashSet<Uuid> {
    let mut required = HashSet::new();

    let wolves_alive = player::living(seats).any(|s| s.role().is_wolf());
    if wolves_alive {
        if let Some(&leader) = room.night_leaders.get(&Team::Wolves) {
            required.insert(leader);
        }
    }

    let assassin_alive = player::living(seats).any(|s| s.role() == types::Role::Assassin);
    if assassin_alive && !room.assassin_used {
        if let Some(&leader) = room.night_leaders.get(&Team::Assassin) {
            required.insert(leader);
        }
    }

    required.extend(
        player::living(seats)
            .filter(|s| s.role().is_solo_night_role())
            .map(Seat::id),
    );
    required
}

// the deadline is set at most once per night and never pushed back
pub fn refresh(room: &mut Room, seats: &[Seat], now: DateTime<Utc>, config: &GameConfig) {
    if room.night_completion_deadline.is_some() {
        return;
    }
    let required = required_actors(room, seats);
    if required
        .iter()
        .all(|id| room.night_actions.contains_key(id))
    {
        let deadline = now + config.night_grace();
        log::debug!("all {} required night actions in, deadline {deadline}", required.len());
        room.night_completion_deadline = Some(deadline);
    }
}
