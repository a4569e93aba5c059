//! # Editing Session
//!
//! Runtime state for one live mount of the editing surface. A session is
//! owned by exactly one controller; nothing here is shared between mount
//! points.

use crate::{EditorTimings, EditorWidget, IntentTracker};
use tokio::time::Instant;
use tutorly_model::BlockDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Destroying,
    Destroyed,
    /// Readiness failed; the next mount starts over from `Uninitialized`
    InitFailed,
}

impl SessionState {
    /// A widget is being built or is live
    pub fn is_live(&self) -> bool {
        matches!(self, SessionState::Initializing | SessionState::Ready)
    }
}

pub struct EditingSession {
    pub state: SessionState,

    /// Live widget, present from construction until teardown
    pub(crate) widget: Option<Box<dyn EditorWidget>>,

    /// Instance number of the current widget; bumped on every construction
    pub instance: u64,

    /// When the settle delay for a requested mount runs out
    pub mount_due: Option<Instant>,

    pub intent: IntentTracker,

    /// Host-controlled switch for automatic saves
    pub save_enabled: bool,

    /// Last document forwarded to the host, used to drop echoed renders
    pub last_emitted: Option<BlockDocument>,
}

impl EditingSession {
    pub fn new(timings: EditorTimings) -> Self {
        Self {
            state: SessionState::Uninitialized,
            widget: None,
            instance: 0,
            mount_due: None,
            intent: IntentTracker::new(timings),
            save_enabled: true,
            last_emitted: None,
        }
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    /// Earliest instant the controller needs to wake up for
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.mount_due, self.intent.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("state", &self.state)
            .field("has_widget", &self.widget.is_some())
            .field("instance", &self.instance)
            .field("mount_due", &self.mount_due)
            .field("intent", &self.intent)
            .field("save_enabled", &self.save_enabled)
            .finish()
    }
}
