//! Controller lifecycle tests
//!
//! All tests run on a paused clock so settle delays, debounces and
//! readiness timeouts are exact.

mod common;

use common::{FakeFactory, Readiness};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep, Instant};
use tutorly_editor::{
    EditorController, EditorError, EditorEvent, EditorHandle, EditorProps, EditorTimings,
    MountHandle, SessionState, WidgetEvent, INIT_FAILED_MESSAGE, MOUNTED_MARKER_CLASS,
};
use tutorly_model::{Block, BlockDocument};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn spawn_editor(
    factory: &Arc<FakeFactory>,
) -> (EditorHandle, UnboundedReceiver<EditorEvent>, MountHandle) {
    let mount = MountHandle::new("lesson-editor");
    let (editor, events) = EditorController::spawn(
        mount.clone(),
        factory.clone(),
        EditorProps::default(),
        EditorTimings::default(),
    );
    (editor, events, mount)
}

fn drain(events: &mut UnboundedReceiver<EditorEvent>) -> Vec<EditorEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn changed_count(events: &[EditorEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, EditorEvent::Changed(_)))
        .count()
}

async fn mounted(factory: &Arc<FakeFactory>) -> (EditorHandle, UnboundedReceiver<EditorEvent>, MountHandle) {
    let (editor, mut events, mount) = spawn_editor(factory);
    editor.mount().unwrap();
    sleep(ms(200)).await;
    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);
    drain(&mut events);
    (editor, events, mount)
}

fn doc(text: &str) -> BlockDocument {
    BlockDocument::with_blocks(vec![Block::paragraph(text)])
}

// ============================================================================
// Mounting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_mount_becomes_ready_after_settle_delay() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    sleep(ms(50)).await;
    assert_eq!(editor.state().await.unwrap(), SessionState::Uninitialized);
    assert_eq!(factory.constructed(), 0);

    sleep(ms(100)).await;
    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);
    assert_eq!(factory.constructed(), 1);
    assert_eq!(mount.widget_roots(), 1);
    assert!(mount.has_class(MOUNTED_MARKER_CLASS));
    assert_eq!(drain(&mut events), vec![EditorEvent::Ready]);
}

#[tokio::test(start_paused = true)]
async fn test_widget_receives_props() {
    let factory = Arc::new(FakeFactory::new());
    let mount = MountHandle::new("lesson-editor");
    let props = EditorProps {
        data: doc("hello"),
        read_only: true,
        placeholder: "Write here".to_string(),
    };
    let (editor, _events) =
        EditorController::spawn(mount, factory.clone(), props, EditorTimings::default());

    editor.mount().unwrap();
    sleep(ms(200)).await;

    let log = factory.log.lock().unwrap();
    assert_eq!(log.configs.len(), 1);
    assert_eq!(log.configs[0].data, doc("hello"));
    assert!(log.configs[0].read_only);
    assert_eq!(log.configs[0].placeholder, "Write here");
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_mount_is_ignored() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, mount) = mounted(&factory).await;

    editor.mount().unwrap();
    editor.mount().unwrap();
    sleep(ms(500)).await;

    assert_eq!(factory.constructed(), 1);
    assert_eq!(mount.widget_roots(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_mount_unmount_mount_leaves_one_widget() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    editor.unmount().await.unwrap();
    editor.mount().unwrap();
    editor.mount().unwrap();
    sleep(ms(500)).await;

    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);
    assert_eq!(factory.constructed(), 1);
    assert_eq!(mount.widget_roots(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remount_after_unmount() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, mount) = mounted(&factory).await;

    editor.unmount().await.unwrap();
    assert_eq!(editor.state().await.unwrap(), SessionState::Destroyed);
    assert_eq!(mount.child_count(), 0);
    assert!(!mount.has_class(MOUNTED_MARKER_CLASS));

    editor.mount().unwrap();
    sleep(ms(200)).await;

    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);
    assert_eq!(factory.constructed(), 2);
    assert_eq!(factory.destroyed(), 1);
    assert_eq!(mount.widget_roots(), 1);
    assert_eq!(
        drain(&mut events),
        vec![EditorEvent::Destroyed, EditorEvent::Ready]
    );
}

// ============================================================================
// Teardown
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_leaky_destroy_is_cleaned_up() {
    let factory = Arc::new(FakeFactory::new().leaky());
    let (editor, _events, mount) = mounted(&factory).await;

    editor.unmount().await.unwrap();

    assert_eq!(factory.destroyed(), 1);
    assert_eq!(mount.child_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failing_destroy_is_swallowed() {
    let factory = Arc::new(FakeFactory::new().failing_destroy());
    let (editor, mut events, mount) = mounted(&factory).await;

    editor.unmount().await.unwrap();

    assert_eq!(editor.state().await.unwrap(), SessionState::Destroyed);
    assert_eq!(mount.child_count(), 0);
    assert_eq!(drain(&mut events), vec![EditorEvent::Destroyed]);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_during_initialization_waits_for_readiness() {
    let factory = Arc::new(FakeFactory::new().with_readiness(Readiness::After(ms(800))));
    let (editor, _events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    sleep(ms(150)).await;
    editor.unmount().await.unwrap();

    assert_eq!(editor.state().await.unwrap(), SessionState::Destroyed);
    assert_eq!(factory.destroyed(), 1);
    assert_eq!(mount.widget_roots(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_tears_down() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, mount) = mounted(&factory).await;

    drop(editor);
    sleep(ms(10)).await;

    assert_eq!(factory.destroyed(), 1);
    assert_eq!(mount.child_count(), 0);
    assert_eq!(events.recv().await, Some(EditorEvent::Destroyed));
    assert_eq!(events.recv().await, None);
}

// ============================================================================
// Initialization failure
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_init_failure_shows_fallback() {
    let factory = Arc::new(FakeFactory::new().with_readiness(Readiness::Fail));
    let (editor, mut events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    sleep(ms(200)).await;

    assert_eq!(editor.state().await.unwrap(), SessionState::InitFailed);
    assert_eq!(mount.widget_roots(), 0);
    assert_eq!(
        mount.snapshot().fallback_message(),
        Some(INIT_FAILED_MESSAGE)
    );
    assert!(matches!(
        drain(&mut events).as_slice(),
        [EditorEvent::InitFailed { .. }]
    ));
}

#[tokio::test(start_paused = true)]
async fn test_init_failure_allows_retry() {
    let factory = Arc::new(FakeFactory::new().with_readiness(Readiness::Fail));
    let (editor, _events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    sleep(ms(200)).await;
    assert_eq!(editor.state().await.unwrap(), SessionState::InitFailed);

    factory.set_readiness(Readiness::Immediate);
    editor.mount().unwrap();
    sleep(ms(200)).await;

    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);
    assert_eq!(factory.constructed(), 2);
    assert_eq!(mount.widget_roots(), 1);
    assert_eq!(mount.snapshot().fallback_message(), None);
}

#[tokio::test(start_paused = true)]
async fn test_readiness_timeout_counts_as_failure() {
    let factory = Arc::new(FakeFactory::new().with_readiness(Readiness::Never));
    let (editor, mut events, mount) = spawn_editor(&factory);

    editor.mount().unwrap();
    sleep(ms(6000)).await;

    assert_eq!(editor.state().await.unwrap(), SessionState::InitFailed);
    assert_eq!(mount.widget_roots(), 0);
    match drain(&mut events).as_slice() {
        [EditorEvent::InitFailed { message }] => assert!(message.contains("timed out")),
        other => panic!("Expected InitFailed, got {:?}", other),
    }
}

// ============================================================================
// Saving
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_keystroke_burst_saves_once_after_debounce() {
    let factory = Arc::new(FakeFactory::new());
    let (_editor, mut events, _mount) = mounted(&factory).await;

    let mut last_keystroke = Instant::now();
    for _ in 0..16 {
        factory.type_key();
        last_keystroke = Instant::now();
        sleep(ms(200)).await;
    }
    assert!(factory.saves().is_empty());

    sleep(ms(1800)).await;

    let saves = factory.saves();
    assert_eq!(saves.len(), 1);
    let delay = saves[0] - last_keystroke;
    assert!(
        delay >= ms(1500) && delay < ms(1510),
        "save fired {:?} after the last keystroke",
        delay
    );
    assert_eq!(changed_count(&drain(&mut events)), 1);
}

#[tokio::test(start_paused = true)]
async fn test_manual_save_emits_changed() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, _mount) = mounted(&factory).await;

    let saved = editor.save().await.unwrap();

    assert_eq!(saved, doc("typed"));
    assert_eq!(drain(&mut events), vec![EditorEvent::Changed(doc("typed"))]);
}

#[tokio::test(start_paused = true)]
async fn test_save_before_ready_is_rejected() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = spawn_editor(&factory);

    let result = editor.save().await;

    assert!(matches!(
        result,
        Err(EditorError::NotReady(SessionState::Uninitialized))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_autosave_disabled_by_host() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, _mount) = mounted(&factory).await;

    editor.set_save_enabled(false).unwrap();
    sleep(ms(10)).await;
    factory.type_key();
    sleep(ms(3000)).await;

    assert!(factory.saves().is_empty());
    assert_eq!(changed_count(&drain(&mut events)), 0);
}

#[tokio::test(start_paused = true)]
async fn test_read_only_blocks_autosave() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;

    editor.set_read_only(true).unwrap();
    sleep(ms(10)).await;
    factory.type_key();
    sleep(ms(3000)).await;

    assert!(factory.saves().is_empty());
    assert_eq!(factory.log.lock().unwrap().read_only, vec![true]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_autosave_is_retried_after_next_change() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, mut events, _mount) = mounted(&factory).await;

    factory.set_save_fails(true);
    factory.type_key();
    sleep(ms(2000)).await;
    assert_eq!(factory.saves().len(), 1);
    assert_eq!(changed_count(&drain(&mut events)), 0);
    assert_eq!(editor.state().await.unwrap(), SessionState::Ready);

    factory.set_save_fails(false);
    factory.type_key();
    sleep(ms(2000)).await;
    assert_eq!(factory.saves().len(), 2);
    assert_eq!(changed_count(&drain(&mut events)), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_requires_ready_widget() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = spawn_editor(&factory);

    assert!(matches!(
        editor.clear().await,
        Err(EditorError::NotReady(_))
    ));

    editor.mount().unwrap();
    sleep(ms(200)).await;
    editor.clear().await.unwrap();
    assert_eq!(factory.log.lock().unwrap().clears, 1);
}

// ============================================================================
// External updates
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_external_update_renders_when_idle() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;

    editor.set_data(doc("from host")).unwrap();
    sleep(ms(10)).await;

    assert_eq!(factory.renders(), vec![doc("from host")]);
}

#[tokio::test(start_paused = true)]
async fn test_external_update_suppressed_while_focused() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;

    factory.emit(WidgetEvent::FocusIn);
    sleep(ms(10)).await;
    editor.set_data(doc("ignored")).unwrap();
    sleep(ms(10)).await;
    assert!(factory.renders().is_empty());

    factory.emit(WidgetEvent::FocusOut);
    sleep(ms(100)).await;
    editor.set_data(doc("still ignored")).unwrap();
    sleep(ms(10)).await;
    assert!(factory.renders().is_empty());

    sleep(ms(500)).await;
    editor.set_data(doc("applied")).unwrap();
    sleep(ms(10)).await;
    assert_eq!(factory.renders(), vec![doc("applied")]);
}

#[tokio::test(start_paused = true)]
async fn test_external_update_suppressed_while_typing() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;
    editor.set_save_enabled(false).unwrap();

    factory.emit(WidgetEvent::Keystroke);
    sleep(ms(1000)).await;
    editor.set_data(doc("ignored")).unwrap();
    sleep(ms(10)).await;
    assert!(factory.renders().is_empty());

    sleep(ms(1500)).await;
    editor.set_data(doc("applied")).unwrap();
    sleep(ms(10)).await;
    assert_eq!(factory.renders(), vec![doc("applied")]);
}

#[tokio::test(start_paused = true)]
async fn test_echoed_document_is_not_rendered() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;

    let saved = editor.save().await.unwrap();
    editor.set_data(saved).unwrap();
    sleep(ms(10)).await;

    assert!(factory.renders().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_events_from_destroyed_widget_are_ignored() {
    let factory = Arc::new(FakeFactory::new());
    let (editor, _events, _mount) = mounted(&factory).await;

    editor.unmount().await.unwrap();
    factory.type_key();
    sleep(ms(3000)).await;

    assert!(factory.saves().is_empty());
}
