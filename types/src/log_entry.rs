use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub phase_label: String,
    pub day: u32,
    pub secret: bool,
    // an empty visibility set means readable by no one
    pub visible_to: HashSet<Uuid>,
}
