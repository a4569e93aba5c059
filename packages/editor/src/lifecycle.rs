//! # Editing-Surface Lifecycle
//!
//! Keeps a [`BlockDocument`] in sync with a live, asynchronously
//! initialized editing widget.
//!
//! ```text
//!              mount (after settle delay)        ready() ok
//! Uninitialized ──────────────────► Initializing ──────────► Ready
//!       ▲                               │                       │
//!       │ mount                         │ ready() err/timeout   │ unmount
//!  InitFailed ◄─────────────────────────┘                       ▼
//!                                              Destroyed ◄── Destroying
//! ```
//!
//! The controller is an actor: one task owns the [`EditingSession`] and
//! processes host commands, widget events and deadline expiries one at a
//! time. Because every widget call is awaited inside that task, transitions
//! are strictly sequential per mount point.
//!
//! Teardown is always two-phase: a graceful `destroy()` whose failure is
//! logged and ignored, then [`MountHandle::force_reset`].

use crate::{
    EditingSession, EditorError, EditorTimings, EditorWidget, MountHandle, SessionState,
    WidgetConfig, WidgetError, WidgetEvent, WidgetEventSink, WidgetFactory, MOUNTED_MARKER_CLASS,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, info, warn};
use tutorly_model::BlockDocument;

/// Message rendered into the mount point when the widget fails to start
pub const INIT_FAILED_MESSAGE: &str = "The editor could not be loaded. Reload the page to try again.";

/// What the host supplies to the editor
#[derive(Debug, Clone)]
pub struct EditorProps {
    pub data: BlockDocument,
    pub read_only: bool,
    pub placeholder: String,
}

impl Default for EditorProps {
    fn default() -> Self {
        Self {
            data: BlockDocument::empty(),
            read_only: false,
            placeholder: "Start writing your lesson...".to_string(),
        }
    }
}

/// Notifications sent to the host
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Ready,
    InitFailed { message: String },
    Changed(BlockDocument),
    Destroyed,
}

enum Command {
    Mount,
    Unmount {
        done: oneshot::Sender<()>,
    },
    SetData(BlockDocument),
    SetReadOnly(bool),
    SetSaveEnabled(bool),
    Save {
        reply: oneshot::Sender<Result<BlockDocument, EditorError>>,
    },
    Clear {
        reply: oneshot::Sender<Result<(), EditorError>>,
    },
    State {
        reply: oneshot::Sender<SessionState>,
    },
}

enum Step {
    Command(Option<Command>),
    Widget(u64, WidgetEvent),
    Deadline,
}

/// Host-side handle to a running controller
#[derive(Clone)]
pub struct EditorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl EditorHandle {
    fn send(&self, command: Command) -> Result<(), EditorError> {
        self.commands
            .send(command)
            .map_err(|_| EditorError::ControllerClosed)
    }

    /// Request a widget. Ignored while one is pending, initializing or live.
    pub fn mount(&self) -> Result<(), EditorError> {
        self.send(Command::Mount)
    }

    /// Tear the widget down; resolves once the mount point is clean
    pub async fn unmount(&self) -> Result<(), EditorError> {
        let (done, wait) = oneshot::channel();
        self.send(Command::Unmount { done })?;
        wait.await.map_err(|_| EditorError::ControllerClosed)
    }

    /// New document from the host. Not rendered while the user is composing.
    pub fn set_data(&self, document: BlockDocument) -> Result<(), EditorError> {
        self.send(Command::SetData(document))
    }

    pub fn set_read_only(&self, read_only: bool) -> Result<(), EditorError> {
        self.send(Command::SetReadOnly(read_only))
    }

    pub fn set_save_enabled(&self, enabled: bool) -> Result<(), EditorError> {
        self.send(Command::SetSaveEnabled(enabled))
    }

    /// Serialize the widget now and notify the host
    pub async fn save(&self) -> Result<BlockDocument, EditorError> {
        let (reply, wait) = oneshot::channel();
        self.send(Command::Save { reply })?;
        wait.await.map_err(|_| EditorError::ControllerClosed)?
    }

    pub async fn clear(&self) -> Result<(), EditorError> {
        let (reply, wait) = oneshot::channel();
        self.send(Command::Clear { reply })?;
        wait.await.map_err(|_| EditorError::ControllerClosed)?
    }

    pub async fn state(&self) -> Result<SessionState, EditorError> {
        let (reply, wait) = oneshot::channel();
        self.send(Command::State { reply })?;
        wait.await.map_err(|_| EditorError::ControllerClosed)
    }
}

/// Owns one mount point's editing session
pub struct EditorController {
    mount: MountHandle,
    factory: Arc<dyn WidgetFactory>,
    props: EditorProps,
    timings: EditorTimings,
    session: EditingSession,
    commands: mpsc::UnboundedReceiver<Command>,
    widget_tx: mpsc::UnboundedSender<(u64, WidgetEvent)>,
    widget_rx: mpsc::UnboundedReceiver<(u64, WidgetEvent)>,
    events: mpsc::UnboundedSender<EditorEvent>,
}

impl EditorController {
    /// Start a controller task for `mount`. The task runs until every
    /// [`EditorHandle`] is dropped, tearing the widget down on the way out.
    pub fn spawn(
        mount: MountHandle,
        factory: Arc<dyn WidgetFactory>,
        props: EditorProps,
        timings: EditorTimings,
    ) -> (EditorHandle, mpsc::UnboundedReceiver<EditorEvent>) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (widget_tx, widget_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = mpsc::unbounded_channel();

        let controller = EditorController {
            mount,
            factory,
            props,
            timings,
            session: EditingSession::new(timings),
            commands,
            widget_tx,
            widget_rx,
            events,
        };
        tokio::spawn(controller.run());

        (
            EditorHandle {
                commands: command_tx,
            },
            event_rx,
        )
    }

    async fn run(mut self) {
        debug!(mount = %self.mount.id(), "Editor controller started");

        loop {
            let deadline = self.session.next_deadline();
            let step = tokio::select! {
                command = self.commands.recv() => Step::Command(command),
                Some((instance, event)) = self.widget_rx.recv() => Step::Widget(instance, event),
                _ = wait_until(deadline) => Step::Deadline,
            };

            match step {
                Step::Command(Some(command)) => self.handle_command(command).await,
                Step::Command(None) => break,
                Step::Widget(instance, event) => self.handle_widget_event(instance, event),
                Step::Deadline => self.handle_deadlines().await,
            }
        }

        self.teardown().await;
        debug!(mount = %self.mount.id(), "Editor controller stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Mount => self.request_mount(),
            Command::Unmount { done } => {
                self.teardown().await;
                let _ = done.send(());
            }
            Command::SetData(document) => self.apply_external_data(document).await,
            Command::SetReadOnly(read_only) => {
                self.props.read_only = read_only;
                if let Some(widget) = self.ready_widget() {
                    if let Err(e) = widget.set_read_only(read_only).await {
                        warn!(error = %e, "Failed to toggle read-only mode");
                    }
                }
            }
            Command::SetSaveEnabled(enabled) => self.session.save_enabled = enabled,
            Command::Save { reply } => {
                let _ = reply.send(self.save().await);
            }
            Command::Clear { reply } => {
                let result = match self.ready_widget() {
                    Some(widget) => widget.clear().await.map_err(EditorError::from),
                    None => Err(EditorError::NotReady(self.session.state)),
                };
                let _ = reply.send(result);
            }
            Command::State { reply } => {
                let _ = reply.send(self.session.state);
            }
        }
    }

    fn request_mount(&mut self) {
        if self.session.state.is_live() || self.session.mount_due.is_some() {
            debug!(state = ?self.session.state, "Mount ignored; editor already mounting or mounted");
            return;
        }

        if matches!(
            self.session.state,
            SessionState::InitFailed | SessionState::Destroyed
        ) {
            self.session.state = SessionState::Uninitialized;
        }

        self.session.mount_due = Some(Instant::now() + self.timings.settle());
    }

    async fn initialize(&mut self) {
        self.session.state = SessionState::Initializing;
        self.mount.force_reset();

        self.session.instance += 1;
        let instance = self.session.instance;
        let sink = WidgetEventSink::new(instance, self.widget_tx.clone());
        let config = WidgetConfig {
            data: self.props.data.clone(),
            read_only: self.props.read_only,
            placeholder: self.props.placeholder.clone(),
        };

        info!(mount = %self.mount.id(), instance, "Initializing editor widget");
        let mut widget = self.factory.construct(&self.mount, config, sink);

        let ready = match timeout(self.timings.ready_timeout(), widget.ready()).await {
            Ok(result) => result,
            Err(_) => Err(WidgetError::Timeout(self.timings.ready_timeout())),
        };

        match ready {
            Ok(()) => {
                self.session.widget = Some(widget);
                self.session.state = SessionState::Ready;
                self.mount.add_class(MOUNTED_MARKER_CLASS);
                info!(mount = %self.mount.id(), instance, "Editor widget ready");
                self.emit(EditorEvent::Ready);
            }
            Err(e) => {
                warn!(mount = %self.mount.id(), instance, error = %e, "Editor widget failed to initialize");
                drop(widget);
                self.mount.force_reset();
                self.mount.show_fallback(INIT_FAILED_MESSAGE);
                self.session.state = SessionState::InitFailed;
                self.emit(EditorEvent::InitFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Graceful destroy followed by a forced reset. Always ends `Destroyed`.
    async fn teardown(&mut self) {
        self.session.mount_due = None;
        self.session.intent.cancel_all();

        if let Some(mut widget) = self.session.widget.take() {
            self.session.state = SessionState::Destroying;

            let ready = widget.is_ready() || {
                let wait = self.timings.destroy_ready_timeout();
                match timeout(wait, widget.ready()).await {
                    Ok(Ok(())) => true,
                    Ok(Err(e)) => {
                        debug!(error = %e, "Widget never became ready; skipping graceful destroy");
                        false
                    }
                    Err(_) => {
                        debug!(?wait, "Gave up waiting for widget readiness; skipping graceful destroy");
                        false
                    }
                }
            };

            if ready {
                if let Err(e) = widget.destroy().await {
                    warn!(mount = %self.mount.id(), error = %e, "Widget destroy failed; forcing cleanup");
                }
            }
        }

        self.mount.force_reset();

        if self.session.state != SessionState::Destroyed {
            self.session.state = SessionState::Destroyed;
            self.emit(EditorEvent::Destroyed);
        }
    }

    async fn apply_external_data(&mut self, document: BlockDocument) {
        if self.session.last_emitted.as_ref() == Some(&document) {
            self.props.data = document;
            return;
        }

        let now = Instant::now();
        let suppressed = self.session.intent.suppress_external_render(now);
        self.props.data = document;

        if suppressed {
            debug!("External update suppressed while the user is editing");
            return;
        }

        let data = self.props.data.clone();
        if let Some(widget) = self.ready_widget() {
            if let Err(e) = widget.render(&data).await {
                warn!(error = %e, "Failed to render external document");
            }
        }
    }

    fn handle_widget_event(&mut self, instance: u64, event: WidgetEvent) {
        if instance != self.session.instance || !self.session.has_widget() {
            debug!(instance, ?event, "Ignoring event from stale widget");
            return;
        }

        let now = Instant::now();
        let intent = &mut self.session.intent;
        match event {
            WidgetEvent::Keystroke => intent.keystroke(now),
            WidgetEvent::Changed => intent.content_changed(now),
            WidgetEvent::FocusIn => intent.focus_in(),
            WidgetEvent::FocusOut => intent.focus_out(now),
        }
    }

    async fn handle_deadlines(&mut self) {
        let now = Instant::now();

        if self.session.mount_due.is_some_and(|due| due <= now) {
            self.session.mount_due = None;
            self.initialize().await;
        }

        let save_due = self.session.intent.poll(now);
        if save_due && self.autosave_allowed() {
            if let Err(e) = self.save().await {
                warn!(error = %e, "Automatic save failed; will retry after the next change");
            }
        }
    }

    fn autosave_allowed(&self) -> bool {
        self.session.state == SessionState::Ready
            && self.session.save_enabled
            && !self.props.read_only
    }

    async fn save(&mut self) -> Result<BlockDocument, EditorError> {
        let state = self.session.state;
        let widget = self.ready_widget().ok_or(EditorError::NotReady(state))?;
        let document = widget.save().await?;

        debug!(blocks = document.blocks.len(), "Editor content saved");
        self.session.last_emitted = Some(document.clone());
        self.emit(EditorEvent::Changed(document.clone()));
        Ok(document)
    }

    fn ready_widget(&mut self) -> Option<&mut Box<dyn EditorWidget>> {
        if self.session.state != SessionState::Ready {
            return None;
        }
        self.session.widget.as_mut()
    }

    fn emit(&self, event: EditorEvent) {
        let _ = self.events.send(event);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
