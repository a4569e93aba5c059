//! Delays used by the editing-surface controller

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorTimings {
    /// Delay between a mount request and widget construction
    pub settle_ms: u64,
    /// How long after the last keystroke the user counts as typing
    pub typing_ms: u64,
    /// Grace period before a focus loss is honoured
    pub focus_release_ms: u64,
    /// Quiet period after the last change before saving
    pub save_debounce_ms: u64,
    /// Upper bound on waiting for a new widget to become ready
    pub ready_timeout_ms: u64,
    /// Upper bound on waiting for readiness before destroying a widget
    pub destroy_ready_timeout_ms: u64,
}

impl Default for EditorTimings {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            typing_ms: 2000,
            focus_release_ms: 500,
            save_debounce_ms: 1500,
            ready_timeout_ms: 5000,
            destroy_ready_timeout_ms: 1000,
        }
    }
}

impl EditorTimings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn typing(&self) -> Duration {
        Duration::from_millis(self.typing_ms)
    }

    pub fn focus_release(&self) -> Duration {
        Duration::from_millis(self.focus_release_ms)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn destroy_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.destroy_ready_timeout_ms)
    }
}
