use std::collections::HashSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    Player(Uuid),
    Skip,
}

impl ActionTarget {
    pub fn player(self) -> Option<Uuid> {
        match self {
            ActionTarget::Player(id) => Some(id),
            ActionTarget::Skip => None,
        }
    }
}

impl Display for ActionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionTarget::Player(id) => write!(f, "{id}"),
            ActionTarget::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NightAction {
    pub actor_id: Uuid,
    pub target: ActionTarget,
    // role held at submission time
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamProposal {
    pub target: ActionTarget,
    pub leader_id: Uuid,
    pub approvals: HashSet<Uuid>,
}

impl TeamProposal {
    pub fn new(leader_id: Uuid, target: ActionTarget) -> Self {
        Self {
            target,
            leader_id,
            approvals: HashSet::from([leader_id]),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: Uuid,
    pub target: ActionTarget,
}
