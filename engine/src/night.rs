use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use types::{player, NightAction, Role, Room, Seat};
use uuid::Uuid;

pub const REASON_WOLF_ATTACK: &str = "wolf attack";
pub const REASON_TRAP: &str = "counter-kill by trap";
pub const REASON_ERASURE: &str = "existential erasure";
pub const REASON_FOX_CURSE: &str = "divined fox curse";
pub const REASON_KILLER: &str = "killed retaliating killer";

// step order is load-bearing: guards resolve before the attack and
// deaths apply before the informational cards
pub(crate) fn resolve(room: &mut Room, seats: &mut [Seat]) {
    let guard_set = room.guard_targets();
    let trap_set = room.trap_targets();
    let attack = room.wolf_attack().cloned();
    let assassin = room
        .night_actions
        .values()
        .find(|a| a.role == Role::Assassin)
        .filter(|a| a.target.player().is_some())
        .cloned();

    let mut reasons: HashMap<Uuid, Vec<&'static str>> = HashMap::new();
    let mut push = |reasons: &mut HashMap<Uuid, Vec<&'static str>>, id: Uuid, why: &'static str| {
        reasons.entry(id).or_default().push(why);
    };

    // A trapped target kills the attacker whether or not the attack lands.
    if let Some(attack) = &attack {
        if let Some(victim) = attack.target.player() {
            if trap_set.contains(&victim) {
                push(&mut reasons, attack.actor_id, REASON_TRAP);
            }
        }
    }

    let mut plain_kill: Option<Uuid> = None;
    if let Some(attack) = &attack {
        if let Some(victim_id) = attack.target.player() {
            if !guard_set.contains(&victim_id) {
                match resolve_attack(room, seats, victim_id) {
                    AttackOutcome::Negated => {}
                    AttackOutcome::Killed => {
                        push(&mut reasons, victim_id, REASON_WOLF_ATTACK);
                        plain_kill = Some(victim_id);
                    }
                }
            }
        }
    }

    if let Some(assassin) = &assassin {
        resolve_assassin(room, assassin, &attack, &guard_set, &mut reasons, &mut push);
    }

    resolve_divinations(room, seats, &mut reasons, &mut push);

    // A killer takes the attacker down with them, on top of any trap.
    if let Some(victim_id) = plain_kill {
        let victim_is_killer = player::find_seat(seats, victim_id)
            .map(|s| s.role() == Role::Killer)
            .unwrap_or(false);
        if victim_is_killer {
            if let Some(attack) = &attack {
                push(&mut reasons, attack.actor_id, REASON_KILLER);
            }
        }
    }

    let deaths = apply_deaths(room, seats, &reasons);
    deliver_detective_cards(room, seats, &deaths);
}

enum AttackOutcome {
    Negated,
    Killed,
}

fn resolve_attack(room: &mut Room, seats: &mut [Seat], victim_id: Uuid) -> AttackOutcome {
    let Some((name, role, shield)) = player::find_seat(seats, victim_id)
        .map(|v| (v.player.name.clone(), v.role(), v.secret.elder_shield))
    else {
        return AttackOutcome::Negated;
    };
    match role {
        Role::Fox => {
            // Recorded with an empty visibility set, readable by no one.
            room.log_secret(format!("The attack on {name} was silently negated."), HashSet::new());
            AttackOutcome::Negated
        }
        Role::Elder if shield => {
            if let Some(victim) = player::find_seat_mut(seats, victim_id) {
                victim.secret.elder_shield = false;
            }
            room.log_secret(format!("{name} weathered the attack."), HashSet::new());
            AttackOutcome::Negated
        }
        Role::Cursed => {
            awaken_cursed(room, seats, victim_id);
            AttackOutcome::Negated
        }
        _ => AttackOutcome::Killed,
    }
}

fn awaken_cursed(room: &mut Room, seats: &mut [Seat], victim_id: Uuid) {
    let name = player::find_seat(seats, victim_id)
        .map(|s| s.player.name.clone())
        .unwrap_or_default();
    log::info!("cursed awakening: {name}");

    if let Some(victim) = player::find_seat_mut(seats, victim_id) {
        victim.secret.original_role = Some(Role::Cursed);
        victim.secret.role = Role::Werewolf;
    }
    let wolf_ids: Vec<Uuid> = seats
        .iter()
        .filter(|s| s.role().is_wolf())
        .map(Seat::id)
        .collect();
    for seat in seats.iter_mut() {
        if seat.id() == victim_id {
            seat.secret.teammates = wolf_ids.iter().copied().filter(|&w| w != victim_id).collect();
        } else if seat.role().is_wolf() || seat.role() == Role::Madman {
            if !seat.secret.teammates.contains(&victim_id) {
                seat.secret.teammates.push(victim_id);
            }
        }
    }

    let audience: HashSet<Uuid> = seats
        .iter()
        .filter(|s| s.is_alive() && s.role().is_wolf())
        .map(Seat::id)
        .collect();
    room.log_secret(format!("{name} has awakened as a werewolf."), audience);
}

// the shot is not spent when the wolves kill the assassin first
fn resolve_assassin(
    room: &mut Room,
    assassin: &NightAction,
    attack: &Option<NightAction>,
    guard_set: &HashSet<Uuid>,
    reasons: &mut HashMap<Uuid, Vec<&'static str>>,
    push: &mut impl FnMut(&mut HashMap<Uuid, Vec<&'static str>>, Uuid, &'static str),
) {
    let Some(target_id) = assassin.target.player() else {
        return;
    };
    let actor_attacked_unguarded = attack
        .as_ref()
        .and_then(|a| a.target.player())
        .map(|victim| victim == assassin.actor_id && !guard_set.contains(&victim))
        .unwrap_or(false);
    if actor_attacked_unguarded {
        return;
    }
    push(reasons, target_id, REASON_ERASURE);
    room.assassin_used = true;
}

fn resolve_divinations(
    room: &mut Room,
    seats: &[Seat],
    reasons: &mut HashMap<Uuid, Vec<&'static str>>,
    push: &mut impl FnMut(&mut HashMap<Uuid, Vec<&'static str>>, Uuid, &'static str),
) {
    let divinations: Vec<NightAction> = room
        .night_actions
        .values()
        .filter(|a| a.role.is_diviner())
        .cloned()
        .collect();
    for action in divinations {
        let Some(target_id) = action.target.player() else {
            continue;
        };
        let Some(target) = player::find_seat(seats, target_id) else {
            continue;
        };
        let text = match action.role {
            Role::Seer if target.role().is_wolf() => {
                format!("{} is a werewolf.", target.player.name)
            }
            Role::Seer => format!("{} is human.", target.player.name),
            _ => format!("{} is the {}.", target.player.name, target.role()),
        };
        room.log_secret(text, HashSet::from([action.actor_id]));
        if target.role() == Role::Fox {
            push(reasons, target_id, REASON_FOX_CURSE);
        }
    }
}

// seat order keeps the transcript stable
fn apply_deaths(
    room: &mut Room,
    seats: &mut [Seat],
    reasons: &HashMap<Uuid, Vec<&'static str>>,
) -> Vec<(Uuid, String)> {
    let day = room.day;
    let mut deaths = Vec::new();
    for seat in seats.iter_mut() {
        let Some(whys) = reasons.get(&seat.id()) else {
            continue;
        };
        if !seat.is_alive() {
            continue;
        }
        let joined = whys.iter().join("&");
        seat.player.status = types::PlayerStatus::Dead;
        seat.player.death_reason = Some(joined.clone());
        seat.player.died_day = Some(day);
        deaths.push((seat.id(), joined));
        log::info!("{} died: {}", seat.player.name, seat.player.death_reason.as_deref().unwrap_or(""));
    }
    for (id, _) in &deaths {
        if let Some(seat) = player::find_seat(seats, *id) {
            room.log_public(format!("{} died during the night.", seat.player.name));
        }
    }
    deaths
}

// vote executions and removals never show up here
fn deliver_detective_cards(room: &mut Room, seats: &[Seat], deaths: &[(Uuid, String)]) {
    let detectives: HashSet<Uuid> = player::living_with_role(seats, Role::Detective)
        .map(Seat::id)
        .collect();
    if detectives.is_empty() {
        return;
    }
    if deaths.is_empty() {
        room.log_secret("No information.", detectives);
        return;
    }
    for (id, reason) in deaths {
        if let Some(victim) = player::find_seat(seats, *id) {
            room.log_secret(
                format!("{} died of: {reason}.", victim.player.name),
                detectives.clone(),
            );
        }
    }
}
