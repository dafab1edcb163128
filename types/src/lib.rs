pub mod action;
pub mod error;
pub mod log_entry;
pub mod phase;
pub mod player;
pub mod role;
pub mod room;

pub use action::{ActionTarget, NightAction, TeamProposal, VoteRecord};
pub use error::GameError;
pub use log_entry::LogEntry;
pub use phase::{Phase, RoomStatus};
pub use player::{Player, PlayerSecret, PlayerStatus, Seat};
pub use role::{Faction, Role, Team};
pub use room::Room;
