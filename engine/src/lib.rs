pub mod assign;
pub mod completion;
pub mod config;
pub mod consensus;
pub mod night;
pub mod phase;
pub mod vote;
pub mod win;

pub use assign::{assign_roles, RoomInit};
pub use config::GameConfig;
pub use consensus::{
    approve_team_action, propose_team_action, reject_team_action, submit_solo_action,
};
pub use phase::{abort_room, advance_phase, mark_ready, vanish_player, Advance};
pub use vote::submit_vote;
pub use win::evaluate;
