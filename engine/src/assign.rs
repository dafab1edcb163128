use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::prelude::*;
use types::{GameError, Role, Room, Seat};
use uuid::Uuid;

#[derive(Debug)]
pub struct RoomInit {
    pub room: Room,
    pub seats: Vec<Seat>,
}

pub fn assign_roles<R: Rng>(
    entrants: &[(Uuid, String)],
    role_counts: &HashMap<Role, usize>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<RoomInit, GameError> {
    let total: usize = role_counts.values().sum();
    if total != entrants.len() {
        return Err(GameError::validation(format!(
            "role counts sum to {total} but {} players joined",
            entrants.len()
        )));
    }
    let wolf_count: usize = role_counts
        .iter()
        .filter(|(role, _)| role.is_wolf())
        .map(|(_, count)| count)
        .sum();
    if wolf_count == 0 {
        return Err(GameError::validation("at least one wolf is required"));
    }
    if wolf_count >= total - wolf_count {
        return Err(GameError::validation(format!(
            "{wolf_count} wolves cannot face {} non-wolves",
            total - wolf_count
        )));
    }

    let mut roles: Vec<Role> = role_counts
        .iter()
        .flat_map(|(&role, &count)| std::iter::repeat(role).take(count))
        .collect();
    roles.shuffle(rng);

    let mut seats: Vec<Seat> = entrants
        .iter()
        .zip(roles)
        .map(|((id, name), role)| Seat::new(*id, name.clone(), role))
        .collect();

    let wolf_ids: Vec<Uuid> = seats
        .iter()
        .filter(|s| s.role().is_wolf())
        .map(Seat::id)
        .collect();
    let teammate_sets: Vec<Vec<Uuid>> = seats
        .iter()
        .map(|seat| {
            let (id, role) = (seat.id(), seat.role());
            if role.is_wolf() {
                wolf_ids.iter().copied().filter(|&w| w != id).collect()
            } else if role == Role::Madman {
                wolf_ids.clone()
            } else {
                seats
                    .iter()
                    .filter(|s| s.role() == role && s.id() != id)
                    .map(Seat::id)
                    .collect()
            }
        })
        .collect();
    for (seat, teammates) in seats.iter_mut().zip(teammate_sets) {
        seat.secret.teammates = teammates;
    }

    log::info!(
        "assigned roles to {} players ({} wolves)",
        seats.len(),
        wolf_count
    );
    let mut room = Room::new(role_counts.clone(), now);
    room.log_public(format!("The match begins with {} players.", seats.len()));
    Ok(RoomInit { room, seats })
}
