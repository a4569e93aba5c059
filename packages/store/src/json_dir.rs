use crate::{ContentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tutorly_model::{LessonDraft, LessonRecord};

/// One pretty-printed `<id>.json` file per lesson under a directory.
/// New lessons get the next free numeric id.
#[derive(Debug)]
pub struct JsonDirStore {
    root: PathBuf,
    /// Serializes id allocation and writes
    write_lock: Mutex<()>,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> StoreResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    async fn read(&self, id: &str) -> StoreResult<LessonRecord> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut record: LessonRecord = serde_json::from_str(&json)?;
        // The file name is the identity
        record.id = id.to_string();
        Ok(record)
    }

    async fn write(&self, record: &LessonRecord) -> StoreResult<()> {
        let path = self.path_for(&record.id)?;
        fs::create_dir_all(&self.root).await?;

        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn next_id(&self) -> StoreResult<String> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok("1".to_string()),
            Err(e) => return Err(e.into()),
        };

        let mut highest = 0u64;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(n) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                highest = highest.max(n);
            }
        }
        Ok((highest + 1).to_string())
    }
}

#[async_trait]
impl ContentStore for JsonDirStore {
    async fn get_lesson(&self, id: &str) -> StoreResult<LessonRecord> {
        self.read(id).await
    }

    async fn create_lesson(&self, tutorial_id: &str, draft: LessonDraft) -> StoreResult<LessonRecord> {
        let _guard = self.write_lock.lock().await;

        let id = self.next_id().await?;
        let record = LessonRecord::from_draft(&id, tutorial_id, draft);
        self.write(&record).await?;

        info!(id = %id, root = %self.root.display(), "Lesson created");
        Ok(record)
    }

    async fn update_lesson(&self, id: &str, draft: LessonDraft) -> StoreResult<LessonRecord> {
        let _guard = self.write_lock.lock().await;

        let mut record = self.read(id).await?;
        record.apply_draft(draft);
        self.write(&record).await?;

        debug!(id, blocks = record.content.len(), "Lesson updated");
        Ok(record)
    }

    async fn delete_lesson(&self, id: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(id, "Lesson deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
