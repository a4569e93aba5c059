//! # Intent Tracking
//!
//! Decides, from the stream of widget activity, whether the user is
//! composing and when a live edit should be pushed to the host.
//!
//! Three independent deadlines are tracked:
//!
//! ```text
//! keystroke/change ──► typing window (2 s)      isTyping until expiry
//! focus out        ──► focus release (500 ms)   isFocused until expiry
//! change           ──► save debounce (1.5 s)    trailing, restarted on each change
//! ```
//!
//! The tracker holds no timers of its own. Callers pass the current
//! [`Instant`] in and ask for [`IntentTracker::next_deadline`], which keeps
//! the logic deterministic under a paused clock.

use crate::EditorTimings;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct IntentTracker {
    timings: EditorTimings,
    typing_until: Option<Instant>,
    focused: bool,
    focus_release_at: Option<Instant>,
    save_due: Option<Instant>,
    save_armed_at: Option<Instant>,
    last_keystroke: Option<Instant>,
}

impl IntentTracker {
    pub fn new(timings: EditorTimings) -> Self {
        Self {
            timings,
            typing_until: None,
            focused: false,
            focus_release_at: None,
            save_due: None,
            save_armed_at: None,
            last_keystroke: None,
        }
    }

    /// A key was pressed inside the widget
    pub fn keystroke(&mut self, now: Instant) {
        self.typing_until = Some(now + self.timings.typing());
        self.last_keystroke = Some(now);
    }

    /// The widget reported a content change: counts as typing and
    /// restarts the save debounce.
    pub fn content_changed(&mut self, now: Instant) {
        self.typing_until = Some(now + self.timings.typing());
        self.save_due = Some(now + self.timings.save_debounce());
        self.save_armed_at = Some(now);
    }

    pub fn focus_in(&mut self) {
        self.focused = true;
        self.focus_release_at = None;
    }

    pub fn focus_out(&mut self, now: Instant) {
        if self.focused {
            self.focus_release_at = Some(now + self.timings.focus_release());
        }
    }

    pub fn is_typing(&self, now: Instant) -> bool {
        self.typing_until.is_some_and(|until| now < until)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn save_pending(&self) -> bool {
        self.save_due.is_some()
    }

    /// Programmatic re-renders must not overwrite what the user is writing
    pub fn suppress_external_render(&self, now: Instant) -> bool {
        self.focused || self.is_typing(now)
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.typing_until, self.focus_release_at, self.save_due]
            .into_iter()
            .flatten()
            .min()
    }

    /// Expire elapsed deadlines. Returns `true` when the save debounce has
    /// run out and a save should be attempted now.
    ///
    /// A keystroke that arrived after the debounce was armed pushes the
    /// save back to one debounce period after that keystroke.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.typing_until.is_some_and(|until| until <= now) {
            self.typing_until = None;
        }

        if self.focus_release_at.is_some_and(|at| at <= now) {
            self.focus_release_at = None;
            self.focused = false;
        }

        let Some(due) = self.save_due else {
            return false;
        };
        if due > now {
            return false;
        }

        match (self.last_keystroke, self.save_armed_at) {
            (Some(key), Some(armed)) if key > armed => {
                self.save_due = Some(key + self.timings.save_debounce());
                self.save_armed_at = Some(key);
                if key + self.timings.save_debounce() <= now {
                    self.save_due = None;
                    self.save_armed_at = None;
                    return true;
                }
                false
            }
            _ => {
                self.save_due = None;
                self.save_armed_at = None;
                true
            }
        }
    }

    /// Drop every pending deadline and flag
    pub fn cancel_all(&mut self) {
        *self = Self::new(self.timings);
    }
}
