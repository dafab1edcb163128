use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use types::{player, Faction, GameError, Phase, PlayerStatus, Role, Room, RoomStatus, Seat};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::{consensus, night, vote, win};

// stale and not-due are defined no-ops, never errors
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Stale,
    NotDue,
    Moved(Phase),
    // the caller owes the archive sink exactly one invocation
    Finished(Faction),
}

pub fn advance_phase<R: Rng>(
    room: &mut Room,
    seats: &mut [Seat],
    expected: Phase,
    expected_day: u32,
    now: DateTime<Utc>,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Advance, GameError> {
    // the phase alone does not identify a state: night 2 and night 3
    // both read as Night, so the day is part of the caller's snapshot
    if room.is_terminal() || room.phase != expected || room.day != expected_day {
        return Ok(Advance::Stale);
    }
    if !is_due(room, seats, now, config) {
        return Ok(Advance::NotDue);
    }

    let advance = match room.phase {
        Phase::Countdown => {
            enter(room, Phase::RoleReveal, now);
            Advance::Moved(Phase::RoleReveal)
        }
        Phase::RoleReveal => {
            room.day = 1;
            room.clear_night_bookkeeping();
            enter(room, Phase::Day, now);
            room.log_public("Day 1 begins.");
            Advance::Moved(Phase::Day)
        }
        Phase::Day if room.day == 1 => begin_night(room, seats, now, rng),
        Phase::Day => {
            room.vote_records.clear();
            reset_ready(seats);
            enter(room, Phase::Voting, now);
            Advance::Moved(Phase::Voting)
        }
        Phase::Voting => {
            vote::resolve(room, seats);
            match win::evaluate(seats) {
                Some(winner) => finish(room, now, winner),
                None => begin_night(room, seats, now, rng),
            }
        }
        Phase::Night => {
            night::resolve(room, seats);
            room.day += 1;
            room.clear_night_bookkeeping();
            match win::evaluate(seats) {
                Some(winner) => finish(room, now, winner),
                None => {
                    enter(room, Phase::Announcement, now);
                    Advance::Moved(Phase::Announcement)
                }
            }
        }
        Phase::Announcement => {
            enter(room, Phase::Day, now);
            room.log_public(format!("Day {} begins.", room.day));
            Advance::Moved(Phase::Day)
        }
        Phase::Finished | Phase::Aborted => Advance::Stale,
    };
    Ok(advance)
}

pub fn mark_ready(room: &Room, seats: &mut [Seat], player_id: Uuid) -> Result<(), GameError> {
    if room.is_terminal() {
        return Err(GameError::precondition("the match is over"));
    }
    let seat = player::find_seat_mut(seats, player_id)
        .ok_or_else(|| GameError::precondition("unknown player"))?;
    if !seat.is_alive() {
        return Err(GameError::precondition("dead players cannot ready up"));
    }
    seat.player.is_ready = true;
    Ok(())
}

// not dead: no death reason, no detective card, no day of death
pub fn vanish_player(room: &mut Room, seats: &mut [Seat], player_id: Uuid) -> Result<(), GameError> {
    if room.is_terminal() {
        return Err(GameError::precondition("the match is over"));
    }
    let seat = player::find_seat_mut(seats, player_id)
        .ok_or_else(|| GameError::precondition("unknown player"))?;
    if seat.player.status == PlayerStatus::Vanished {
        return Err(GameError::precondition("player already removed"));
    }
    seat.player.status = PlayerStatus::Vanished;
    let name = seat.player.name.clone();
    log::warn!("{name} removed from the room");
    room.log_public(format!("{name} was removed from the room."));
    Ok(())
}

pub fn abort_room(room: &mut Room, now: DateTime<Utc>) -> Result<(), GameError> {
    if room.is_terminal() {
        return Err(GameError::precondition("the match is over"));
    }
    enter(room, Phase::Aborted, now);
    room.status = RoomStatus::Aborted;
    room.log_public("The match was aborted.");
    Ok(())
}

fn is_due(room: &Room, seats: &[Seat], now: DateTime<Utc>, config: &GameConfig) -> bool {
    if now >= room.phase_started_at + config.phase_duration(room.phase) {
        return true;
    }
    match room.phase {
        Phase::Night => room
            .night_completion_deadline
            .map(|deadline| now >= deadline)
            .unwrap_or(false),
        Phase::Day | Phase::Announcement => {
            let mut living = player::living(seats).peekable();
            living.peek().is_some() && player::living(seats).all(|s| s.player.is_ready)
        }
        _ => false,
    }
}

fn begin_night<R: Rng>(
    room: &mut Room,
    seats: &mut [Seat],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Advance {
    room.clear_night_bookkeeping();
    room.night_leaders = consensus::elect_leaders(seats, rng);
    reset_ready(seats);
    enter(room, Phase::Night, now);
    room.log_public(format!("Night {} falls.", room.day));
    // The first night has nothing to report yet.
    if room.day == 1 {
        for role in [Role::Detective, Role::Medium] {
            let audience: HashSet<Uuid> =
                player::living_with_role(seats, role).map(Seat::id).collect();
            if !audience.is_empty() {
                room.log_secret("No information.", audience);
            }
        }
    }
    Advance::Moved(Phase::Night)
}

fn finish(room: &mut Room, now: DateTime<Utc>, winner: Faction) -> Advance {
    room.winner = Some(winner);
    room.status = RoomStatus::Finished;
    enter(room, Phase::Finished, now);
    log::info!("match finished, {winner} wins");
    room.log_public(format!("The {winner} faction wins."));
    if room.teruteru_won {
        room.log_public("Teruteru achieved their own victory as well.");
    }
    Advance::Finished(winner)
}

fn enter(room: &mut Room, phase: Phase, now: DateTime<Utc>) {
    log::debug!("phase {} -> {phase} (day {})", room.phase, room.day);
    room.phase = phase;
    room.phase_started_at = now;
}

fn reset_ready(seats: &mut [Seat]) {
    for seat in seats.iter_mut() {
        seat.player.is_ready = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use types::{ActionTarget, Team};

    fn fixture(roles: &[Role]) -> (Room, Vec<Seat>, GameConfig, StdRng) {
        let seats: Vec<Seat> = roles
            .iter()
            .enumerate()
            .map(|(i, &role)| Seat::new(Uuid::new_v4(), format!("p{i}"), role))
            .collect();
        let room = Room::new(Default::default(), Utc::now());
        (room, seats, GameConfig::default(), StdRng::seed_from_u64(42))
    }

    fn after(room: &Room, config: &GameConfig) -> DateTime<Utc> {
        room.phase_started_at + config.phase_duration(room.phase) + Duration::seconds(1)
    }

    fn tick(room: &mut Room, seats: &mut [Seat], config: &GameConfig, rng: &mut StdRng) -> Advance {
        let now = after(room, config);
        let (expected, day) = (room.phase, room.day);
        advance_phase(room, seats, expected, day, now, config, rng).unwrap()
    }

    #[test]
    fn opening_sequence_reaches_the_first_night() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Seer, Role::Citizen, Role::Citizen]);

        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::RoleReveal));
        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::Day));
        assert_eq!(room.day, 1);
        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::Night));
        assert!(room.night_leaders.contains_key(&Team::Wolves));
        assert!(room.night_leaders.contains_key(&Team::Seer));
    }

    #[test]
    fn advance_before_the_timer_is_not_due() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        let now = room.phase_started_at + Duration::seconds(1);
        let result = advance_phase(&mut room, &mut seats, Phase::Countdown, 0, now, &config, &mut rng);
        assert_eq!(result.unwrap(), Advance::NotDue);
    }

    #[test]
    fn stale_expected_phase_is_a_noop() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        let now = after(&room, &config);
        let first = advance_phase(&mut room, &mut seats, Phase::Countdown, 0, now, &config, &mut rng);
        assert_eq!(first.unwrap(), Advance::Moved(Phase::RoleReveal));

        // A second caller raced with the same observation; exactly one
        // state change happens.
        let second = advance_phase(&mut room, &mut seats, Phase::Countdown, 0, now, &config, &mut rng);
        assert_eq!(second.unwrap(), Advance::Stale);
        assert_eq!(room.phase, Phase::RoleReveal);
    }

    #[test]
    fn a_snapshot_from_an_earlier_night_is_stale_despite_the_matching_phase() {
        let (mut room, mut seats, config, mut rng) = fixture(&[
            Role::Werewolf,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        room.phase = Phase::Night;
        room.day = 3;
        room.night_leaders.insert(Team::Wolves, seats[0].id());

        // a caller that observed night 2 must not advance night 3
        let now = after(&room, &config);
        let result = advance_phase(&mut room, &mut seats, Phase::Night, 2, now, &config, &mut rng);
        assert_eq!(result.unwrap(), Advance::Stale);
        assert_eq!(room.day, 3);
        assert_eq!(room.phase, Phase::Night);
    }

    #[test]
    fn first_day_skips_voting_and_later_days_do_not() {
        let (mut room, mut seats, config, mut rng) = fixture(&[
            Role::Werewolf,
            Role::Seer,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::Night));

        // Night 1 resolves with no actions; day 2 goes through voting.
        assert_eq!(
            tick(&mut room, &mut seats, &config, &mut rng),
            Advance::Moved(Phase::Announcement)
        );
        assert_eq!(room.day, 2);
        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::Day));
        assert_eq!(tick(&mut room, &mut seats, &config, &mut rng), Advance::Moved(Phase::Voting));
    }

    #[test]
    fn first_night_hands_no_information_to_detective_and_medium() {
        let (mut room, mut seats, config, mut rng) = fixture(&[
            Role::Werewolf,
            Role::Detective,
            Role::Medium,
            Role::Citizen,
        ]);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        assert_eq!(room.phase, Phase::Night);

        let cards: Vec<_> = room
            .logs
            .iter()
            .filter(|l| l.secret && l.text == "No information.")
            .collect();
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn night_advances_early_once_the_completion_deadline_passes() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        assert_eq!(room.phase, Phase::Night);

        let wolf = room.night_leaders[&Team::Wolves];
        let submitted_at = room.phase_started_at + Duration::seconds(5);
        consensus::propose_team_action(
            &mut room,
            &mut seats,
            wolf,
            ActionTarget::Skip,
            submitted_at,
            &config,
        )
        .unwrap();
        let deadline = room.night_completion_deadline.expect("deadline scheduled");

        let early = advance_phase(&mut room, &mut seats, Phase::Night, 1, deadline, &config, &mut rng);
        assert_eq!(early.unwrap(), Advance::Moved(Phase::Announcement));
    }

    #[test]
    fn all_ready_makes_a_day_due_immediately() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        tick(&mut room, &mut seats, &config, &mut rng);
        tick(&mut room, &mut seats, &config, &mut rng);
        assert_eq!(room.phase, Phase::Day);

        let now = room.phase_started_at + Duration::seconds(1);
        for id in seats.iter().map(Seat::id).collect::<Vec<_>>() {
            mark_ready(&room, &mut seats, id).unwrap();
        }
        let result = advance_phase(&mut room, &mut seats, Phase::Day, 1, now, &config, &mut rng);
        assert_eq!(result.unwrap(), Advance::Moved(Phase::Night));
        // Entering the night resets readiness.
        assert!(seats.iter().all(|s| !s.player.is_ready));
    }

    #[test]
    fn executing_the_last_wolf_finishes_the_match_from_voting() {
        let (mut room, mut seats, config, mut rng) = fixture(&[
            Role::Werewolf,
            Role::Seer,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        room.phase = Phase::Voting;
        room.day = 2;
        let wolf = seats[0].id();
        for voter in 1..5 {
            vote::submit_vote(&mut room, &seats, seats[voter].id(), ActionTarget::Player(wolf))
                .unwrap();
        }

        let now = after(&room, &config);
        let result = advance_phase(&mut room, &mut seats, Phase::Voting, 2, now, &config, &mut rng);
        assert_eq!(result.unwrap(), Advance::Finished(Faction::Citizen));
        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(room.winner, Some(Faction::Citizen));
        // Terminal rooms ignore further ticks.
        let day = room.day;
        let again = advance_phase(
            &mut room,
            &mut seats,
            Phase::Finished,
            day,
            now + Duration::seconds(60),
            &config,
            &mut rng,
        );
        assert_eq!(again.unwrap(), Advance::Stale);
    }

    #[test]
    fn a_night_kill_reaching_parity_finishes_the_match() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen]);
        room.phase = Phase::Night;
        room.day = 2;
        let leader = seats[0].id();
        room.night_leaders.insert(Team::Wolves, leader);
        let victim = ActionTarget::Player(seats[1].id());
        let submitted_at = room.phase_started_at + Duration::seconds(2);
        consensus::propose_team_action(&mut room, &mut seats, leader, victim, submitted_at, &config)
            .unwrap();

        let now = after(&room, &config);
        let result = advance_phase(&mut room, &mut seats, Phase::Night, 2, now, &config, &mut rng);
        assert_eq!(result.unwrap(), Advance::Finished(Faction::Werewolf));
        assert_eq!(room.day, 3);
    }

    #[test]
    fn vanished_player_is_logged_and_out_of_the_game() {
        let (mut room, mut seats, _config, _rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        let target = seats[1].id();
        vanish_player(&mut room, &mut seats, target).unwrap();
        assert_eq!(seats[1].player.status, PlayerStatus::Vanished);
        assert!(seats[1].player.death_reason.is_none());
        assert!(room.logs.iter().any(|l| !l.secret && l.text.contains("removed")));

        let again = vanish_player(&mut room, &mut seats, target);
        assert!(matches!(again, Err(GameError::Precondition(_))));
    }

    #[test]
    fn abort_is_terminal() {
        let (mut room, mut seats, config, mut rng) =
            fixture(&[Role::Werewolf, Role::Citizen, Role::Citizen, Role::Citizen]);
        abort_room(&mut room, Utc::now()).unwrap();
        assert_eq!(room.status, RoomStatus::Aborted);
        let result = tick(&mut room, &mut seats, &config, &mut rng);
        assert_eq!(result, Advance::Stale);
    }
}
