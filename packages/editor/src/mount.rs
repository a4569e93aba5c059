//! # Mount Points
//!
//! The host container a widget renders into. Only two operations on it are
//! trusted: letting a widget attach its root, and [`MountHandle::force_reset`],
//! which wipes everything regardless of what the widget left behind.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Class set on a mount point while it hosts a ready widget
pub const MOUNTED_MARKER_CLASS: &str = "tutorly-editor--mounted";

/// Class on the fallback message shown after a failed initialization
pub const FALLBACK_CLASS: &str = "tutorly-editor__fallback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountNode {
    /// Root element of a constructed widget instance
    WidgetRoot { instance: u64 },

    /// Visible message shown when the widget could not start
    Fallback { message: String },

    /// Anything else a widget injected (toolbars, popovers, ...)
    Element { tag: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPoint {
    pub id: String,
    pub children: Vec<MountNode>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn widget_roots(&self) -> usize {
        self.children
            .iter()
            .filter(|c| matches!(c, MountNode::WidgetRoot { .. }))
            .count()
    }

    pub fn fallback_message(&self) -> Option<&str> {
        self.children.iter().find_map(|c| match c {
            MountNode::Fallback { message } => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Shared handle to a mount point
#[derive(Debug, Clone, Default)]
pub struct MountHandle {
    inner: Arc<Mutex<MountPoint>>,
}

impl MountHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MountPoint::new(id))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MountPoint> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> String {
        self.lock().id.clone()
    }

    pub fn append_child(&self, node: MountNode) {
        self.lock().children.push(node);
    }

    pub fn remove_child(&self, node: &MountNode) -> bool {
        let mut mount = self.lock();
        let before = mount.children.len();
        mount.children.retain(|c| c != node);
        mount.children.len() != before
    }

    pub fn add_class(&self, class: &str) {
        self.lock().classes.insert(class.to_string());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.lock().classes.contains(class)
    }

    pub fn set_style(&self, property: &str, value: &str) {
        self.lock()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.lock()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn child_count(&self) -> usize {
        self.lock().children.len()
    }

    pub fn widget_roots(&self) -> usize {
        self.lock().widget_roots()
    }

    pub fn snapshot(&self) -> MountPoint {
        self.lock().clone()
    }

    /// Remove every child and clear classes, styles and attributes.
    /// Idempotent.
    pub fn force_reset(&self) {
        let mut mount = self.lock();
        mount.children.clear();
        mount.classes.clear();
        mount.styles.clear();
        mount.attributes.clear();
    }

    pub fn show_fallback(&self, message: impl Into<String>) {
        let mut mount = self.lock();
        mount.classes.insert(FALLBACK_CLASS.to_string());
        mount.children.push(MountNode::Fallback {
            message: message.into(),
        });
    }
}
