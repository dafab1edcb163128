use types::{player, Faction, Role, Seat};

// wolves win at parity with humans; a living fox steals a fired result
// but never triggers one on its own
pub fn evaluate(seats: &[Seat]) -> Option<Faction> {
    let wolf_count = player::living(seats).filter(|s| s.role().is_wolf()).count();
    let human_count = player::living(seats)
        .filter(|s| s.role().counts_as_human())
        .count();
    let fox_alive = player::living(seats).any(|s| s.role() == Role::Fox);

    let primary = if wolf_count == 0 {
        Faction::Citizen
    } else if wolf_count >= human_count {
        Faction::Werewolf
    } else {
        return None;
    };

    if fox_alive {
        Some(Faction::Fox)
    } else {
        Some(primary)
    }
}
