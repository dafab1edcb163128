use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use types::{player, ActionTarget, GameError, Phase, PlayerStatus, Role, Room, Seat};
use uuid::Uuid;

pub const REASON_EXECUTION: &str = "vote execution";

pub fn submit_vote(
    room: &mut Room,
    seats: &[Seat],
    voter_id: Uuid,
    target: ActionTarget,
) -> Result<(), GameError> {
    if room.is_terminal() {
        return Err(GameError::precondition("the match is over"));
    }
    if room.phase != Phase::Voting {
        return Err(GameError::precondition(format!(
            "votes are not accepted during {}",
            room.phase
        )));
    }
    let voter = player::find_seat(seats, voter_id)
        .ok_or_else(|| GameError::precondition("unknown voter"))?;
    if !voter.is_alive() {
        return Err(GameError::precondition("dead players do not vote"));
    }
    if let Some(target_id) = target.player() {
        let target = player::find_seat(seats, target_id)
            .ok_or_else(|| GameError::precondition("unknown target"))?;
        if !target.is_alive() {
            return Err(GameError::precondition("target is not alive"));
        }
    }
    room.record_vote(voter_id, target);
    Ok(())
}

// a tie or a skip plurality executes no one
pub(crate) fn resolve(room: &mut Room, seats: &mut [Seat]) -> Option<Uuid> {
    let ballots: Vec<_> = room
        .vote_records
        .iter()
        .filter(|v| {
            player::find_seat(seats, v.voter_id)
                .map(Seat::is_alive)
                .unwrap_or(false)
        })
        .copied()
        .collect();

    let mut tally: HashMap<ActionTarget, usize> = HashMap::new();
    for ballot in &ballots {
        *tally.entry(ballot.target).or_default() += 1;
    }

    let summary = tally
        .iter()
        .sorted_by_key(|(target, count)| (std::cmp::Reverse(*count), target.to_string()))
        .map(|(target, count)| match target.player() {
            Some(id) => {
                let name = player::find_seat(seats, id)
                    .map(|s| s.player.name.clone())
                    .unwrap_or_else(|| id.to_string());
                format!("{name}: {count}")
            }
            None => format!("skip: {count}"),
        })
        .join(", ");
    room.log_public(format!("Vote tally: {summary}"));

    let executed = single_argmax(&tally);
    match executed {
        Some(victim_id) => execute(room, seats, victim_id),
        None => room.log_public("The vote was inconclusive; no one is executed."),
    }
    deliver_medium_card(room, seats, executed);
    executed
}

fn single_argmax(tally: &HashMap<ActionTarget, usize>) -> Option<Uuid> {
    let max = tally.values().copied().max()?;
    let mut top = tally.iter().filter(|(_, &count)| count == max);
    let (&target, _) = top.next()?;
    if top.next().is_some() {
        return None;
    }
    target.player()
}

fn execute(room: &mut Room, seats: &mut [Seat], victim_id: Uuid) {
    let Some(victim) = player::find_seat_mut(seats, victim_id) else {
        return;
    };
    victim.player.status = PlayerStatus::Dead;
    victim.player.death_reason = Some(REASON_EXECUTION.to_string());
    victim.player.died_day = Some(room.day);
    let name = victim.player.name.clone();
    let was_teruteru = victim.role() == Role::Teruteru;
    log::info!("{name} executed by vote");
    room.log_public(format!("{name} was executed by vote."));

    // The bonus fires only once every teruteru has been executed; it never
    // ends the game by itself.
    if was_teruteru {
        let all_executed = seats
            .iter()
            .filter(|s| s.role() == Role::Teruteru)
            .all(|s| s.player.death_reason.as_deref() == Some(REASON_EXECUTION));
        if all_executed {
            room.teruteru_won = true;
        }
    }
}

fn deliver_medium_card(room: &mut Room, seats: &[Seat], executed: Option<Uuid>) {
    let mediums: HashSet<Uuid> = player::living_with_role(seats, Role::Medium)
        .map(Seat::id)
        .collect();
    if mediums.is_empty() {
        return;
    }
    let text = match executed.and_then(|id| player::find_seat(seats, id)) {
        Some(victim) if victim.role().is_wolf() => {
            format!("{} was a werewolf.", victim.player.name)
        }
        Some(victim) => format!("{} was not a werewolf.", victim.player.name),
        None => "No information.".to_string(),
    };
    room.log_secret(text, mediums);
}
