use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::prelude::*;
use types::{
    player, ActionTarget, GameError, NightAction, Phase, Role, Room, Seat, Team, TeamProposal,
};
use uuid::Uuid;

use crate::completion;
use crate::config::GameConfig;

pub fn elect_leaders<R: Rng>(seats: &[Seat], rng: &mut R) -> HashMap<Team, Uuid> {
    let mut leaders = HashMap::new();
    for team in [
        Team::Wolves,
        Team::Assassin,
        Team::Teruteru,
        Team::Seer,
        Team::Sage,
        Team::Knight,
        Team::Trapper,
    ] {
        let members: Vec<Uuid> = player::living(seats)
            .filter(|s| s.role().team() == Some(team))
            .map(Seat::id)
            .collect();
        if let Some(&leader) = members.choose(rng) {
            log::debug!("night leader for {team}: {leader}");
            leaders.insert(team, leader);
        }
    }
    leaders
}

pub fn submit_solo_action(
    room: &mut Room,
    seats: &mut [Seat],
    actor_id: Uuid,
    target: ActionTarget,
    now: DateTime<Utc>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let actor = night_actor(room, seats, actor_id)?;
    let role = actor.role();
    if !role.is_solo_night_role() {
        return Err(GameError::precondition(format!(
            "{role} has no solo night action"
        )));
    }
    if room.night_action(actor_id).is_some() {
        return Err(GameError::precondition(
            "night action already submitted for this actor",
        ));
    }
    check_target(seats, target)?;
    check_guard_repeat(actor, target)?;
    record_action(room, seats, actor_id, target, role, now, config);
    Ok(())
}

pub fn propose_team_action(
    room: &mut Room,
    seats: &mut [Seat],
    actor_id: Uuid,
    target: ActionTarget,
    now: DateTime<Utc>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let team = team_member(room, seats, actor_id)?;
    if room.night_leaders.get(&team) != Some(&actor_id) {
        return Err(GameError::precondition(
            "only the night leader may propose a team action",
        ));
    }
    if room.night_action(actor_id).is_some() {
        return Err(GameError::precondition("team action already finalized"));
    }
    check_target(seats, target)?;
    let leader = player::find_seat(seats, actor_id)
        .ok_or_else(|| GameError::precondition("unknown player"))?;
    check_guard_repeat(leader, target)?;

    room.pending_team_actions
        .insert(team, TeamProposal::new(actor_id, target));
    log::debug!("{team} proposal opened for {target}");
    try_finalize(room, seats, team, now, config)
}

// the threshold is the living roster counted now, not at proposal time
pub fn approve_team_action(
    room: &mut Room,
    seats: &mut [Seat],
    actor_id: Uuid,
    now: DateTime<Utc>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let team = team_member(room, seats, actor_id)?;
    let proposal = room
        .pending_team_actions
        .get_mut(&team)
        .ok_or_else(|| GameError::precondition("no proposal to approve"))?;
    if proposal.leader_id == actor_id {
        return Err(GameError::precondition("the leader's approval is implicit"));
    }
    proposal.approvals.insert(actor_id);
    try_finalize(room, seats, team, now, config)
}

pub fn reject_team_action(
    room: &mut Room,
    seats: &mut [Seat],
    actor_id: Uuid,
) -> Result<(), GameError> {
    let team = team_member(room, seats, actor_id)?;
    let proposal = room
        .pending_team_actions
        .get(&team)
        .ok_or_else(|| GameError::precondition("no proposal to reject"))?;
    if proposal.leader_id == actor_id {
        return Err(GameError::precondition("the leader cannot reject their own proposal"));
    }
    room.pending_team_actions.remove(&team);
    log::debug!("{team} proposal rejected by {actor_id}");
    Ok(())
}

fn try_finalize(
    room: &mut Room,
    seats: &mut [Seat],
    team: Team,
    now: DateTime<Utc>,
    config: &GameConfig,
) -> Result<(), GameError> {
    let living_members = player::living(seats)
        .filter(|s| s.role().team() == Some(team))
        .count();
    let Some(proposal) = room.pending_team_actions.get(&team) else {
        return Ok(());
    };
    if proposal.approvals.len() < living_members {
        return Ok(());
    }

    let proposal = room
        .pending_team_actions
        .remove(&team)
        .expect("proposal checked just above");
    let leader_role = player::find_seat(seats, proposal.leader_id)
        .map(Seat::role)
        .ok_or_else(|| GameError::precondition("night leader is no longer seated"))?;
    log::info!("{team} action finalized: {}", proposal.target);
    record_action(
        room,
        seats,
        proposal.leader_id,
        proposal.target,
        leader_role,
        now,
        config,
    );
    Ok(())
}

fn record_action(
    room: &mut Room,
    seats: &mut [Seat],
    actor_id: Uuid,
    target: ActionTarget,
    role: Role,
    now: DateTime<Utc>,
    config: &GameConfig,
) {
    room.night_actions.insert(
        actor_id,
        NightAction {
            actor_id,
            target,
            role,
        },
    );
    if role.is_guard() {
        if let Some(seat) = player::find_seat_mut(seats, actor_id) {
            seat.player.last_guard_target = target.player();
        }
    }
    if role.is_wolf() {
        wise_wolf_reveal(room, seats, target);
    }
    completion::refresh(room, seats, now, config);
}

// when no wise wolf lives no card goes out at all
fn wise_wolf_reveal(room: &mut Room, seats: &[Seat], target: ActionTarget) {
    if player::living_with_role(seats, Role::WiseWolf).next().is_none() {
        return;
    }
    let Some(target_id) = target.player() else {
        return;
    };
    let Some(victim) = player::find_seat(seats, target_id) else {
        return;
    };
    let pack: HashSet<Uuid> = player::living(seats)
        .filter(|s| s.role().is_wolf())
        .map(Seat::id)
        .collect();
    let text = format!("{} is the {}.", victim.player.name, victim.role());
    room.log_secret(text, pack);
}

fn night_actor<'a>(
    room: &Room,
    seats: &'a [Seat],
    actor_id: Uuid,
) -> Result<&'a Seat, GameError> {
    if room.is_terminal() {
        return Err(GameError::precondition("the match is over"));
    }
    if room.phase != Phase::Night {
        return Err(GameError::precondition(format!(
            "night actions are not accepted during {}",
            room.phase
        )));
    }
    let seat = player::find_seat(seats, actor_id)
        .ok_or_else(|| GameError::precondition("unknown player"))?;
    if !seat.is_alive() {
        return Err(GameError::precondition("dead players take no actions"));
    }
    Ok(seat)
}

fn team_member(room: &Room, seats: &[Seat], actor_id: Uuid) -> Result<Team, GameError> {
    let actor = night_actor(room, seats, actor_id)?;
    let team = actor
        .role()
        .team()
        .ok_or_else(|| GameError::precondition(format!("{} has no team action", actor.role())))?;
    if team == Team::Assassin && room.assassin_used {
        return Err(GameError::precondition(
            "the assassin's single shot is already spent",
        ));
    }
    Ok(team)
}

fn check_guard_repeat(actor: &Seat, target: ActionTarget) -> Result<(), GameError> {
    if actor.role().is_guard() {
        if let Some(target_id) = target.player() {
            if actor.player.last_guard_target == Some(target_id) {
                return Err(GameError::precondition(
                    "guards may not protect the same target on consecutive nights",
                ));
            }
        }
    }
    Ok(())
}

fn check_target(seats: &[Seat], target: ActionTarget) -> Result<(), GameError> {
    if let Some(target_id) = target.player() {
        let seat = player::find_seat(seats, target_id)
            .ok_or_else(|| GameError::precondition("unknown target"))?;
        if !seat.is_alive() {
            return Err(GameError::precondition("target is not alive"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn night_room() -> Room {
        let mut room = Room::new(Default::default(), Utc::now());
        room.phase = Phase::Night;
        room.day = 1;
        room
    }

    fn seats_of(roles: &[Role]) -> Vec<Seat> {
        roles
            .iter()
            .enumerate()
            .map(|(i, &role)| Seat::new(Uuid::new_v4(), format!("p{i}"), role))
            .collect()
    }

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn leaders_come_from_living_members_only() {
        let mut seats = seats_of(&[Role::Werewolf, Role::Werewolf, Role::Seer, Role::Citizen]);
        seats[0].player.status = types::PlayerStatus::Dead;
        let leaders = elect_leaders(&seats, &mut StdRng::seed_from_u64(11));
        assert_eq!(leaders.get(&Team::Wolves), Some(&seats[1].id()));
        assert_eq!(leaders.get(&Team::Seer), Some(&seats[2].id()));
        assert!(!leaders.contains_key(&Team::Assassin));
    }

    #[test]
    fn finalize_waits_for_every_living_member() {
        let mut room = night_room();
        let mut seats = seats_of(&[
            Role::Werewolf,
            Role::Greatwolf,
            Role::WiseWolf,
            Role::Citizen,
            Role::Citizen,
        ]);
        let (leader, a, b) = (seats[0].id(), seats[1].id(), seats[2].id());
        room.night_leaders.insert(Team::Wolves, leader);
        let victim = ActionTarget::Player(seats[3].id());

        propose_team_action(&mut room, &mut seats, leader, victim, Utc::now(), &config()).unwrap();
        assert!(room.night_action(leader).is_none());

        approve_team_action(&mut room, &mut seats, a, Utc::now(), &config()).unwrap();
        assert!(room.night_action(leader).is_none());

        approve_team_action(&mut room, &mut seats, b, Utc::now(), &config()).unwrap();
        let record = room.night_action(leader).expect("finalized exactly now");
        assert_eq!(record.target, victim);
        assert_eq!(room.night_actions.len(), 1);
        assert!(room.pending_team_actions.is_empty());
    }

    #[test]
    fn a_teammate_dying_mid_negotiation_lowers_the_bar() {
        let mut room = night_room();
        let mut seats = seats_of(&[
            Role::Werewolf,
            Role::Greatwolf,
            Role::WiseWolf,
            Role::Citizen,
            Role::Citizen,
        ]);
        let (leader, a) = (seats[0].id(), seats[1].id());
        room.night_leaders.insert(Team::Wolves, leader);
        let victim = ActionTarget::Player(seats[3].id());

        propose_team_action(&mut room, &mut seats, leader, victim, Utc::now(), &config()).unwrap();
        // The third wolf vanishes mid-negotiation.
        seats[2].player.status = types::PlayerStatus::Vanished;
        approve_team_action(&mut room, &mut seats, a, Utc::now(), &config()).unwrap();
        assert!(room.night_action(leader).is_some());
    }

    #[test]
    fn rejection_clears_the_proposal_outright() {
        let mut room = night_room();
        let mut seats = seats_of(&[
            Role::Werewolf,
            Role::Greatwolf,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        let (leader, dissenter) = (seats[0].id(), seats[1].id());
        room.night_leaders.insert(Team::Wolves, leader);

        let target = ActionTarget::Player(seats[2].id());
        propose_team_action(&mut room, &mut seats, leader, target, Utc::now(), &config()).unwrap();
        reject_team_action(&mut room, &mut seats, dissenter).unwrap();
        assert!(room.pending_team_actions.is_empty());
        assert!(room.night_action(leader).is_none());

        // The leader may re-propose after a rejection.
        propose_team_action(&mut room, &mut seats, leader, target, Utc::now(), &config()).unwrap();
        assert!(room.pending_team_actions.contains_key(&Team::Wolves));
    }

    #[test]
    fn non_leader_proposals_are_refused() {
        let mut room = night_room();
        let mut seats = seats_of(&[
            Role::Werewolf,
            Role::Greatwolf,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        room.night_leaders.insert(Team::Wolves, seats[0].id());
        let follower = seats[1].id();
        let result = propose_team_action(
            &mut room,
            &mut seats,
            follower,
            ActionTarget::Skip,
            Utc::now(),
            &config(),
        );
        assert!(matches!(result, Err(GameError::Precondition(_))));
    }

    #[test]
    fn spent_assassin_team_cannot_act_again() {
        let mut room = night_room();
        room.assassin_used = true;
        let mut seats = seats_of(&[Role::Assassin, Role::Werewolf, Role::Citizen, Role::Citizen]);
        let leader = seats[0].id();
        room.night_leaders.insert(Team::Assassin, leader);
        let result = propose_team_action(
            &mut room,
            &mut seats,
            leader,
            ActionTarget::Skip,
            Utc::now(),
            &config(),
        );
        assert!(matches!(result, Err(GameError::Precondition(_))));
    }

    #[test]
    fn solo_submission_rejects_repeat_guard_target_and_wrong_phase() {
        let mut room = night_room();
        let mut seats = seats_of(&[Role::Knight, Role::Werewolf, Role::Citizen, Role::Citizen]);
        let (knight, charge) = (seats[0].id(), seats[2].id());
        seats[0].player.last_guard_target = Some(charge);

        let repeat = submit_solo_action(
            &mut room,
            &mut seats,
            knight,
            ActionTarget::Player(charge),
            Utc::now(),
            &config(),
        );
        assert!(matches!(repeat, Err(GameError::Precondition(_))));

        let other = seats[3].id();
        submit_solo_action(
            &mut room,
            &mut seats,
            knight,
            ActionTarget::Player(other),
            Utc::now(),
            &config(),
        )
        .unwrap();
        assert_eq!(seats[0].player.last_guard_target, Some(other));

        room.phase = Phase::Day;
        let wrong_phase = submit_solo_action(
            &mut room,
            &mut seats,
            knight,
            ActionTarget::Skip,
            Utc::now(),
            &config(),
        );
        assert!(matches!(wrong_phase, Err(GameError::Precondition(_))));
    }

    #[test]
    fn guard_proposals_reject_the_repeat_target_too() {
        let mut room = night_room();
        let mut seats = seats_of(&[Role::Knight, Role::Knight, Role::Werewolf, Role::Citizen]);
        let (leader, charge) = (seats[0].id(), seats[3].id());
        seats[0].player.last_guard_target = Some(charge);
        room.night_leaders.insert(Team::Knight, leader);

        let repeat = propose_team_action(
            &mut room,
            &mut seats,
            leader,
            ActionTarget::Player(charge),
            Utc::now(),
            &config(),
        );
        assert!(matches!(repeat, Err(GameError::Precondition(_))));
        assert!(room.pending_team_actions.is_empty());

        let other = seats[2].id();
        propose_team_action(
            &mut room,
            &mut seats,
            leader,
            ActionTarget::Player(other),
            Utc::now(),
            &config(),
        )
        .unwrap();
        let approver = seats[1].id();
        approve_team_action(&mut room, &mut seats, approver, Utc::now(), &config()).unwrap();
        assert!(room.night_action(leader).is_some());
        assert_eq!(seats[0].player.last_guard_target, Some(other));
    }

    #[test]
    fn duplicate_solo_submission_is_refused() {
        let mut room = night_room();
        let mut seats = seats_of(&[Role::Seer, Role::Werewolf, Role::Citizen, Role::Citizen]);
        let seer = seats[0].id();
        let target = ActionTarget::Player(seats[1].id());
        submit_solo_action(&mut room, &mut seats, seer, target, Utc::now(), &config()).unwrap();
        let again = submit_solo_action(&mut room, &mut seats, seer, target, Utc::now(), &config());
        assert!(matches!(again, Err(GameError::Precondition(_))));
    }

    #[test]
    fn wolf_finalize_reveals_the_victim_only_while_a_wise_wolf_lives() {
        let mut room = night_room();
        let mut seats = seats_of(&[
            Role::Werewolf,
            Role::WiseWolf,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ]);
        let (leader, wise) = (seats[0].id(), seats[1].id());
        room.night_leaders.insert(Team::Wolves, leader);
        let victim = ActionTarget::Player(seats[2].id());

        propose_team_action(&mut room, &mut seats, leader, victim, Utc::now(), &config()).unwrap();
        approve_team_action(&mut room, &mut seats, wise, Utc::now(), &config()).unwrap();

        let reveal = room.logs.iter().find(|l| l.secret).expect("reveal card");
        assert!(reveal.text.contains("citizen"));
        assert!(reveal.visible_to.contains(&leader));
        assert!(reveal.visible_to.contains(&wise));
        assert!(!reveal.visible_to.contains(&seats[2].id()));
    }
}
