//! # Editing Widget Interface
//!
//! The live editing surface is a third-party component. The controller
//! talks to it only through [`EditorWidget`]; everything it does is
//! asynchronous and may fail.

use crate::MountHandle;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tutorly_model::BlockDocument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("Widget failed to become ready: {0}")]
    NotReady(String),

    #[error("Widget readiness timed out after {0:?}")]
    Timeout(Duration),

    #[error("Widget operation failed: {0}")]
    Operation(String),
}

/// Options a widget is constructed with
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub data: BlockDocument,
    pub read_only: bool,
    pub placeholder: String,
}

/// Activity reported by a live widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Keystroke,
    Changed,
    FocusIn,
    FocusOut,
}

/// Channel a widget reports its activity through. Each sink is bound to
/// one widget instance so events from a destroyed widget are ignored.
#[derive(Debug, Clone)]
pub struct WidgetEventSink {
    instance: u64,
    tx: mpsc::UnboundedSender<(u64, WidgetEvent)>,
}

impl WidgetEventSink {
    pub(crate) fn new(instance: u64, tx: mpsc::UnboundedSender<(u64, WidgetEvent)>) -> Self {
        Self { instance, tx }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Report activity. Silently dropped once the controller is gone.
    pub fn emit(&self, event: WidgetEvent) {
        let _ = self.tx.send((self.instance, event));
    }
}

#[async_trait]
pub trait EditorWidget: Send {
    /// Whether the widget has signalled internal readiness
    fn is_ready(&self) -> bool;

    /// Resolves once the widget is ready, or fails if it never will be
    async fn ready(&mut self) -> Result<(), WidgetError>;

    /// Serialize the widget's current content
    async fn save(&mut self) -> Result<BlockDocument, WidgetError>;

    /// Replace the widget's content
    async fn render(&mut self, document: &BlockDocument) -> Result<(), WidgetError>;

    async fn clear(&mut self) -> Result<(), WidgetError>;

    async fn set_read_only(&mut self, read_only: bool) -> Result<(), WidgetError>;

    /// Graceful teardown. May leave nodes behind in the mount point.
    async fn destroy(&mut self) -> Result<(), WidgetError>;
}

/// Builds widgets into a mount point
pub trait WidgetFactory: Send + Sync {
    fn construct(
        &self,
        mount: &MountHandle,
        config: WidgetConfig,
        events: WidgetEventSink,
    ) -> Box<dyn EditorWidget>;
}
