use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::prelude::*;
use rand::rngs::StdRng;
use uuid::Uuid;

use engine::{
    advance_phase, approve_team_action, assign_roles, propose_team_action, submit_solo_action,
    submit_vote, Advance, GameConfig,
};
use types::{player, ActionTarget, Phase, Role, Seat, Team};

#[derive(Parser, Debug)]
struct Params {
    #[arg(short, long)]
    player: Vec<String>,
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let names = if args.player.len() >= 4 {
        args.player.clone()
    } else {
        (1..=7).map(|i| format!("player{i}")).collect()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let entrants: Vec<(Uuid, String)> = names
        .iter()
        .map(|name| (Uuid::new_v4(), name.clone()))
        .collect();
    let role_counts = composition_for(entrants.len());
    let config = GameConfig::default();
    let init = assign_roles(&entrants, &role_counts, Utc::now(), &mut rng)
        .expect("composition is valid for this player count");
    let (mut room, mut seats) = (init.room, init.seats);

    for _ in 0..200 {
        let now = act_for_phase(&mut room, &mut seats, &config, &mut rng);
        let (expected, day) = (room.phase, room.day);
        match advance_phase(&mut room, &mut seats, expected, day, now, &config, &mut rng)
            .expect("tick is never rejected")
        {
            Advance::Finished(winner) => {
                println!("winner: {winner} (teruteru bonus: {})", room.teruteru_won);
                for entry in room.logs.iter().filter(|l| !l.secret) {
                    println!("[day {} {}] {}", entry.day, entry.phase_label, entry.text);
                }
                return;
            }
            advance => log::info!("{room}: {advance:?}"),
        }
    }
    println!("no winner within the iteration cap: {room}");
}

fn act_for_phase(
    room: &mut types::Room,
    seats: &mut [Seat],
    config: &GameConfig,
    rng: &mut StdRng,
) -> DateTime<Utc> {
    let submit_at = room.phase_started_at + Duration::seconds(1);
    match room.phase {
        Phase::Night => {
            run_night_actions(room, seats, config, rng, submit_at);
            room.night_completion_deadline
                .unwrap_or(room.phase_started_at + config.phase_duration(Phase::Night))
                + Duration::seconds(1)
        }
        Phase::Voting => {
            let voters: Vec<Uuid> = player::living(seats).map(Seat::id).collect();
            for voter in voters {
                if let Some(target) = random_living_target(seats, rng, voter) {
                    let _ = submit_vote(room, seats, voter, ActionTarget::Player(target));
                }
            }
            room.phase_started_at + config.phase_duration(Phase::Voting) + Duration::seconds(1)
        }
        phase => room.phase_started_at + config.phase_duration(phase) + Duration::seconds(1),
    }
}

fn run_night_actions(
    room: &mut types::Room,
    seats: &mut [Seat],
    config: &GameConfig,
    rng: &mut StdRng,
    now: DateTime<Utc>,
) {
    let solo_actors: Vec<Uuid> = player::living(seats)
        .filter(|s| s.role().is_solo_night_role())
        .map(Seat::id)
        .collect();
    for actor in solo_actors {
        if let Some(target) = random_living_target(seats, rng, actor) {
            let _ = submit_solo_action(room, seats, actor, ActionTarget::Player(target), now, config);
        }
    }

    for team in [Team::Wolves, Team::Assassin] {
        let Some(&leader) = room.night_leaders.get(&team) else {
            continue;
        };
        let Some(target) = random_living_target(seats, rng, leader) else {
            continue;
        };
        if propose_team_action(room, seats, leader, ActionTarget::Player(target), now, config)
            .is_err()
        {
            continue;
        }
        let teammates: Vec<Uuid> = player::living(seats)
            .filter(|s| s.role().team() == Some(team) && s.id() != leader)
            .map(Seat::id)
            .collect();
        for teammate in teammates {
            let _ = approve_team_action(room, seats, teammate, now, config);
        }
    }
}

fn random_living_target(seats: &[Seat], rng: &mut StdRng, actor: Uuid) -> Option<Uuid> {
    let candidates: Vec<Uuid> = player::living(seats)
        .map(Seat::id)
        .filter(|&id| id != actor)
        .collect();
    candidates.choose(rng).copied()
}

fn composition_for(n: usize) -> HashMap<Role, usize> {
    let wolves = (n / 4).max(1);
    let mut counts = HashMap::from([(Role::Werewolf, wolves), (Role::Seer, 1)]);
    if n >= 6 {
        counts.insert(Role::Knight, 1);
    }
    if n >= 8 {
        counts.insert(Role::Medium, 1);
    }
    let specials: usize = counts.values().sum();
    counts.insert(Role::Citizen, n - specials);
    counts
}
