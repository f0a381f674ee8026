//! Draft clock configuration.
//!
//! The pick window and snake flag are per-league values stored with the
//! league settings and re-read at draft start. Leagues that never configured
//! them fall back to process-wide defaults taken from the environment:
//!
//! - `FAIRWAY_SECONDS_PER_PICK` (default 60)
//! - `FAIRWAY_SNAKE_DRAFT` (default true)

use std::env;
use std::time::Duration;

pub const DEFAULT_SECONDS_PER_PICK: u64 = 60;

/// Clock settings as stored on a league document; absent fields fall back to
/// the process defaults.
#[derive(Debug, Clone, Default)]
pub struct StoredDraftSettings {
    pub seconds_per_pick: Option<u64>,
    pub snake: Option<bool>,
}

/// Effective clock rules for one draft.
#[derive(Debug, Clone)]
pub struct DraftRules {
    pub seconds_per_pick: u64,
    pub snake: bool,
}

impl Default for DraftRules {
    fn default() -> Self {
        Self {
            seconds_per_pick: DEFAULT_SECONDS_PER_PICK,
            snake: true,
        }
    }
}

impl DraftRules {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let seconds_per_pick = env::var("FAIRWAY_SECONDS_PER_PICK")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.seconds_per_pick);
        let snake = env::var("FAIRWAY_SNAKE_DRAFT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.snake);
        Self {
            seconds_per_pick,
            snake,
        }
    }

    /// Apply league-stored settings on top of these defaults.
    pub fn overlay(&self, stored: &StoredDraftSettings) -> Self {
        Self {
            seconds_per_pick: stored
                .seconds_per_pick
                .filter(|v| *v > 0)
                .unwrap_or(self.seconds_per_pick),
            snake: stored.snake.unwrap_or(self.snake),
        }
    }

    pub fn pick_window(&self) -> Duration {
        Duration::from_secs(self.seconds_per_pick)
    }
}
