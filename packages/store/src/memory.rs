use crate::{ContentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use tutorly_model::{LessonDraft, LessonRecord};

/// Store kept in memory, for tests and previews. Ids are sequential
/// numbers starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    lessons: RwLock<BTreeMap<String, LessonRecord>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_lessons(lessons: impl IntoIterator<Item = LessonRecord>) -> Self {
        let lessons: BTreeMap<String, LessonRecord> =
            lessons.into_iter().map(|l| (l.id.clone(), l)).collect();
        let highest = lessons
            .keys()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self {
            lessons: RwLock::new(lessons),
            next_id: AtomicU64::new(highest),
        }
    }

    pub async fn len(&self) -> usize {
        self.lessons.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lessons.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn get_lesson(&self, id: &str) -> StoreResult<LessonRecord> {
        self.lessons
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create_lesson(&self, tutorial_id: &str, draft: LessonDraft) -> StoreResult<LessonRecord> {
        let id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        let record = LessonRecord::from_draft(&id, tutorial_id, draft);

        self.lessons.write().await.insert(id.clone(), record.clone());
        debug!(id = %id, tutorial_id, "Lesson created");
        Ok(record)
    }

    async fn update_lesson(&self, id: &str, draft: LessonDraft) -> StoreResult<LessonRecord> {
        let mut lessons = self.lessons.write().await;
        let record = lessons
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.apply_draft(draft);
        debug!(id, blocks = record.content.len(), "Lesson updated");
        Ok(record.clone())
    }

    async fn delete_lesson(&self, id: &str) -> StoreResult<()> {
        if self.lessons.write().await.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(id, "Lesson deleted");
        Ok(())
    }
}
