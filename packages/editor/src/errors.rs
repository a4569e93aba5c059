//! Error types for the editor

use crate::mutations::MutationError;
use crate::session::SessionState;
use crate::widget::WidgetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    #[error("Editor is not ready (state: {0:?})")]
    NotReady(SessionState),

    #[error("Editor controller has shut down")]
    ControllerClosed,
}
