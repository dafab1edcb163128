use chrono::Duration;
use serde::{Deserialize, Serialize};
use types::Phase;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub countdown_secs: i64,
    pub role_reveal_secs: i64,
    pub day_secs: i64,
    pub voting_secs: i64,
    pub night_secs: i64,
    pub announcement_secs: i64,
    pub night_grace_secs: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 5,
            role_reveal_secs: 15,
            day_secs: 300,
            voting_secs: 60,
            night_secs: 120,
            announcement_secs: 15,
            night_grace_secs: 10,
        }
    }
}

impl GameConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn phase_duration(&self, phase: Phase) -> Duration {
        let secs = match phase {
            Phase::Countdown => self.countdown_secs,
            Phase::RoleReveal => self.role_reveal_secs,
            Phase::Day => self.day_secs,
            Phase::Voting => self.voting_secs,
            Phase::Night => self.night_secs,
            Phase::Announcement => self.announcement_secs,
            Phase::Finished | Phase::Aborted => 0,
        };
        Duration::seconds(secs)
    }

    pub fn night_grace(&self) -> Duration {
        Duration::seconds(self.night_grace_secs)
    }
}
