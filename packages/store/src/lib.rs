//! # Tutorly Store
//!
//! Where lesson records live. The editor and exporters only need
//! [`ContentStore`]; the backing store is picked by the host.

mod error;
mod json_dir;
mod memory;

pub use error::{StoreError, StoreResult};
pub use json_dir::JsonDirStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use tutorly_model::{LessonDraft, LessonRecord};

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_lesson(&self, id: &str) -> StoreResult<LessonRecord>;

    /// Store a new lesson under `tutorial_id` and return it with its id
    async fn create_lesson(&self, tutorial_id: &str, draft: LessonDraft) -> StoreResult<LessonRecord>;

    /// Replace a lesson's editable fields
    async fn update_lesson(&self, id: &str, draft: LessonDraft) -> StoreResult<LessonRecord>;

    async fn delete_lesson(&self, id: &str) -> StoreResult<()>;
}
