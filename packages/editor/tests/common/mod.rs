//! Scripted editing widget for controller tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tutorly_editor::{
    EditorWidget, MountHandle, MountNode, WidgetConfig, WidgetError, WidgetEvent, WidgetEventSink,
    WidgetFactory,
};
use tutorly_model::{Block, BlockDocument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readiness {
    Immediate,
    After(Duration),
    Fail,
    Never,
}

#[derive(Debug, Default)]
pub struct WidgetLog {
    pub constructed: usize,
    pub destroyed: usize,
    pub saves: Vec<Instant>,
    pub renders: Vec<BlockDocument>,
    pub clears: usize,
    pub read_only: Vec<bool>,
    pub configs: Vec<WidgetConfig>,
}

pub struct FakeFactory {
    pub readiness: Mutex<Readiness>,
    pub destroy_fails: bool,
    pub save_fails: Arc<AtomicBool>,
    /// Leave the widget root behind on destroy, like a leaky widget would
    pub leak_on_destroy: bool,
    pub log: Arc<Mutex<WidgetLog>>,
    sink: Mutex<Option<WidgetEventSink>>,
    content: Arc<Mutex<BlockDocument>>,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self {
            readiness: Mutex::new(Readiness::Immediate),
            destroy_fails: false,
            save_fails: Arc::new(AtomicBool::new(false)),
            leak_on_destroy: false,
            log: Arc::new(Mutex::new(WidgetLog::default())),
            sink: Mutex::new(None),
            content: Arc::new(Mutex::new(BlockDocument::with_blocks(vec![Block::paragraph(
                "typed",
            )]))),
        }
    }

    pub fn with_readiness(self, readiness: Readiness) -> Self {
        *self.readiness.lock().unwrap() = readiness;
        self
    }

    pub fn leaky(mut self) -> Self {
        self.leak_on_destroy = true;
        self
    }

    pub fn failing_destroy(mut self) -> Self {
        self.destroy_fails = true;
        self
    }

    pub fn set_save_fails(&self, fails: bool) {
        self.save_fails.store(fails, Ordering::SeqCst);
    }

    pub fn set_readiness(&self, readiness: Readiness) {
        *self.readiness.lock().unwrap() = readiness;
    }

    /// Emit an event as the most recently constructed widget
    pub fn emit(&self, event: WidgetEvent) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink.emit(event);
        }
    }

    /// Simulate the user typing one character
    pub fn type_key(&self) {
        self.emit(WidgetEvent::Keystroke);
        self.emit(WidgetEvent::Changed);
    }

    pub fn set_content(&self, document: BlockDocument) {
        *self.content.lock().unwrap() = document;
    }

    pub fn constructed(&self) -> usize {
        self.log.lock().unwrap().constructed
    }

    pub fn destroyed(&self) -> usize {
        self.log.lock().unwrap().destroyed
    }

    pub fn saves(&self) -> Vec<Instant> {
        self.log.lock().unwrap().saves.clone()
    }

    pub fn renders(&self) -> Vec<BlockDocument> {
        self.log.lock().unwrap().renders.clone()
    }
}

impl WidgetFactory for FakeFactory {
    fn construct(
        &self,
        mount: &MountHandle,
        config: WidgetConfig,
        events: WidgetEventSink,
    ) -> Box<dyn EditorWidget> {
        let instance = events.instance();
        mount.append_child(MountNode::WidgetRoot { instance });
        mount.append_child(MountNode::Element {
            tag: "div".to_string(),
        });

        {
            let mut log = self.log.lock().unwrap();
            log.constructed += 1;
            log.configs.push(config);
        }
        *self.sink.lock().unwrap() = Some(events);

        Box::new(FakeWidget {
            instance,
            mount: mount.clone(),
            readiness: *self.readiness.lock().unwrap(),
            ready: false,
            destroy_fails: self.destroy_fails,
            save_fails: self.save_fails.clone(),
            leak_on_destroy: self.leak_on_destroy,
            log: self.log.clone(),
            content: self.content.clone(),
        })
    }
}

pub struct FakeWidget {
    instance: u64,
    mount: MountHandle,
    readiness: Readiness,
    ready: bool,
    destroy_fails: bool,
    save_fails: Arc<AtomicBool>,
    leak_on_destroy: bool,
    log: Arc<Mutex<WidgetLog>>,
    content: Arc<Mutex<BlockDocument>>,
}

#[async_trait]
impl EditorWidget for FakeWidget {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn ready(&mut self) -> Result<(), WidgetError> {
        match self.readiness {
            Readiness::Immediate => {}
            Readiness::After(delay) => tokio::time::sleep(delay).await,
            Readiness::Fail => return Err(WidgetError::NotReady("boom".to_string())),
            Readiness::Never => std::future::pending::<()>().await,
        }
        self.ready = true;
        Ok(())
    }

    async fn save(&mut self) -> Result<BlockDocument, WidgetError> {
        self.log.lock().unwrap().saves.push(Instant::now());
        if self.save_fails.load(Ordering::SeqCst) {
            return Err(WidgetError::Operation("serialize failed".to_string()));
        }
        Ok(self.content.lock().unwrap().clone())
    }

    async fn render(&mut self, document: &BlockDocument) -> Result<(), WidgetError> {
        self.log.lock().unwrap().renders.push(document.clone());
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), WidgetError> {
        self.log.lock().unwrap().clears += 1;
        Ok(())
    }

    async fn set_read_only(&mut self, read_only: bool) -> Result<(), WidgetError> {
        self.log.lock().unwrap().read_only.push(read_only);
        Ok(())
    }

    async fn destroy(&mut self) -> Result<(), WidgetError> {
        self.log.lock().unwrap().destroyed += 1;
        if self.destroy_fails {
            return Err(WidgetError::Operation("destroy exploded".to_string()));
        }
        if !self.leak_on_destroy {
            self.mount.remove_child(&MountNode::WidgetRoot {
                instance: self.instance,
            });
        }
        Ok(())
    }
}
