//! # Tutorly Editor
//!
//! Editing engine for lesson block documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ authoring UI                                │
//! │  mutations: append/remove/move/update       │──► new BlockDocument
//! │  history: undo/redo over snapshots          │
//! └─────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────┐
//! │ live editing surface                        │
//! │  EditorController (actor, one per mount)    │
//! │   ├─ EditingSession: state + widget         │
//! │   ├─ IntentTracker: typing/focus/debounce   │──► EditorEvent::Changed
//! │   └─ MountHandle: forced reset              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Copy-on-write**: neither the mutation API nor the controller edits
//!    a document the caller still holds
//! 2. **One widget per mount point**: guarded by session state and by
//!    wiping the mount point before every construction
//! 3. **Untrusted widget**: graceful teardown is always followed by a
//!    forced reset
//! 4. **User input wins**: external renders are suppressed while the user
//!    is focused or typing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tutorly_editor::{EditorController, EditorProps, EditorTimings, MountHandle};
//!
//! let mount = MountHandle::new("lesson-editor");
//! let (editor, mut events) =
//!     EditorController::spawn(mount, factory, EditorProps::default(), EditorTimings::default());
//!
//! editor.mount()?;
//! while let Some(event) = events.recv().await {
//!     if let EditorEvent::Changed(doc) = event {
//!         store.update_lesson(&id, draft.with_content(doc)).await?;
//!     }
//! }
//! ```

mod errors;
mod history;
mod intent;
mod lifecycle;
mod mount;
pub mod mutations;
mod session;
mod timings;
mod widget;

pub use errors::EditorError;
pub use history::{History, HistoryEntry};
pub use intent::IntentTracker;
pub use lifecycle::{EditorController, EditorEvent, EditorHandle, EditorProps, INIT_FAILED_MESSAGE};
pub use mount::{MountHandle, MountNode, MountPoint, FALLBACK_CLASS, MOUNTED_MARKER_CLASS};
pub use mutations::{Direction, Mutation, MutationError};
pub use session::{EditingSession, SessionState};
pub use timings::EditorTimings;
pub use widget::{EditorWidget, WidgetConfig, WidgetError, WidgetEvent, WidgetEventSink, WidgetFactory};
