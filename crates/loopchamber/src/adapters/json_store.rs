//! JSON Memory Store
//!
//! File-backed `MemoryRepository`. The whole collection lives in one JSON
//! array; every mutation rewrites it through a temporary file in the same
//! directory followed by a rename, so readers see either the old or the new
//! document and never a partial one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::{validate, CorruptStoreError, MemoryCandidate, MemoryRecord, StoreError};
use crate::ports::MemoryRepository;

/// Memory store backed by a single JSON document
#[derive(Debug)]
pub struct JsonMemoryStore {
    path: PathBuf,
    records: Vec<MemoryRecord>,
}

impl JsonMemoryStore {
    /// Create an empty store for `path` without reading it.
    ///
    /// Call [`MemoryRepository::load`] before relying on `all()`, or use [`open`](Self::open).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Create a store and load the persisted document
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Location of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate a document without touching any store state
    pub fn read_document(path: &Path) -> Result<Vec<MemoryRecord>, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No memory document yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let document: Value = serde_json::from_slice(&bytes).map_err(|e| {
            CorruptStoreError::document(path.to_path_buf(), format!("invalid JSON: {}", e))
        })?;

        let Value::Array(items) = document else {
            return Err(CorruptStoreError::document(
                path.to_path_buf(),
                "expected a JSON array of memory records",
            )
            .into());
        };

        let mut records = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            let candidate: MemoryCandidate = serde_json::from_value(item).map_err(|e| {
                CorruptStoreError::record(path.to_path_buf(), position, e.to_string())
            })?;
            let record = validate(candidate).map_err(|e| {
                CorruptStoreError::record(path.to_path_buf(), position, e.to_string())
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Write `records` to a temporary file next to the document.
    ///
    /// Nothing is visible at the document path until the returned
    /// [`StagedDocument`] is committed; dropping it discards the write.
    pub fn stage(&self, records: &[MemoryRecord]) -> Result<StagedDocument, StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut body = serde_json::to_vec_pretty(records)?;
        body.push(b'\n');

        let prefix = format!(
            ".{}.",
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "memories".to_string())
        );
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| StoreError::io(&dir, e))?;

        file.write_all(&body)
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| StoreError::io(file.path(), e))?;

        debug!(
            path = %self.path.display(),
            staged = %file.path().display(),
            count = records.len(),
            "Staged memory document"
        );

        Ok(StagedDocument {
            file,
            target: self.path.clone(),
            dir,
        })
    }

    fn persist(&self, records: &[MemoryRecord]) -> Result<(), StoreError> {
        self.stage(records)?.commit()
    }
}

/// A fully written document waiting to replace the persisted one
#[derive(Debug)]
pub struct StagedDocument {
    file: NamedTempFile,
    target: PathBuf,
    dir: PathBuf,
}

impl StagedDocument {
    /// Atomically replace the target document with the staged content.
    ///
    /// The rename is the commit point. A failed directory sync afterwards is
    /// logged, not returned, because the new document is already in place.
    pub fn commit(self) -> Result<(), StoreError> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| StoreError::io(&target, e.error))?;

        if let Err(e) = sync_dir(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "Failed to sync store directory");
        }
        Ok(())
    }
}

/// Flush the directory entry so a completed rename survives power loss
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl MemoryRepository for JsonMemoryStore {
    fn load(&mut self) -> Result<Vec<MemoryRecord>, StoreError> {
        let records = Self::read_document(&self.path)?;
        debug!(
            path = %self.path.display(),
            count = records.len(),
            "Loaded memory store"
        );
        self.records = records.clone();
        Ok(records)
    }

    fn save(&mut self, record: MemoryRecord) -> Result<(), StoreError> {
        self.records.push(record);

        if let Err(e) = self.persist(&self.records) {
            self.records.pop();
            warn!(path = %self.path.display(), error = %e, "Save failed, record discarded");
            return Err(e);
        }

        info!(
            path = %self.path.display(),
            count = self.records.len(),
            "Memory saved"
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.records);

        if let Err(e) = self.persist(&self.records) {
            self.records = previous;
            warn!(path = %self.path.display(), error = %e, "Reset failed, records kept");
            return Err(e);
        }

        info!(
            path = %self.path.display(),
            cleared = previous.len(),
            "Memory store reset"
        );
        Ok(())
    }

    fn all(&self) -> &[MemoryRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FragmentKind;
    use tempfile::TempDir;

    fn record(text: &str) -> MemoryRecord {
        validate(MemoryCandidate::new(
            text,
            FragmentKind::Reflection,
            0.4,
            0.6,
            0.2,
            "neutral",
        ))
        .unwrap()
    }

    #[test]
    fn test_missing_document_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let store = JsonMemoryStore::open(&path).unwrap();
        assert!(store.all().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memory").join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("first")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_document_is_pretty_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("first")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n  {"));
        let value: Value = serde_json::from_str(&contents).unwrap();
        let item = &value[0];
        assert_eq!(item["text"], "first");
        assert_eq!(item["emotion"], "neutral");
        assert_eq!(item["kind"], "reflection");
        assert!(item["created_at"].is_string());
    }

    #[test]
    fn test_save_failure_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("kept")).unwrap();

        // A directory at the document path makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.save(record("lost")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].text(), "kept");
    }

    #[test]
    fn test_reset_failure_keeps_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("a")).unwrap();
        store.save(record("b")).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.reset().is_err());
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn test_dropped_stage_leaves_document_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("a")).unwrap();
        let before = fs::read(&path).unwrap();

        let staged = store.stage(&[record("a"), record("b")]).unwrap();
        drop(staged);

        assert_eq!(fs::read(&path).unwrap(), before);
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() != "memories.json")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_commit_replaces_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let store = JsonMemoryStore::open(&path).unwrap();

        store.stage(&[record("a")]).unwrap().commit().unwrap();

        let records = JsonMemoryStore::read_document(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "a");
    }

    #[test]
    fn test_load_failure_keeps_in_memory_view() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let mut store = JsonMemoryStore::open(&path).unwrap();
        store.save(record("a")).unwrap();

        fs::write(&path, "{not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(ref c) if c.position.is_none()));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_non_array_document_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        fs::write(&path, r#"{"text": "not a list"}"#).unwrap();

        let err = JsonMemoryStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(ref c) if c.position.is_none()));
    }

    #[test]
    fn test_invalid_record_reports_position() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let doc = r#"[
  {"text": "ok", "pitch": 0.5, "tempo": 0.5, "dissonance": 0.5,
   "emotion": "neutral", "created_at": "2024-05-01T12:00:00Z"},
  {"text": "ok", "pitch": 0.5, "tempo": 0.5, "dissonance": 0.5,
   "emotion": "neutral", "created_at": "2024-05-01T12:00:00Z"},
  {"text": "too loud", "pitch": 0.5, "tempo": 0.5, "dissonance": 1.7,
   "emotion": "neutral", "created_at": "2024-05-01T12:00:00Z"}
]"#;
        fs::write(&path, doc).unwrap();

        match JsonMemoryStore::open(&path).unwrap_err() {
            StoreError::Corrupt(c) => {
                assert_eq!(c.position, Some(2));
                assert!(c.reason.contains("dissonance"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), doc);
    }

    #[test]
    fn test_missing_kind_defaults_to_reflection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        fs::write(
            &path,
            r#"[{"text": "plain", "pitch": 0.1, "tempo": 0.2, "dissonance": 0.3,
                 "emotion": "tense", "created_at": "2024-05-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let store = JsonMemoryStore::open(&path).unwrap();
        assert_eq!(store.all()[0].kind(), FragmentKind::Reflection);
    }

    #[test]
    fn test_commit_syncs_staging_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        let store = JsonMemoryStore::new(&path);

        let staged = store.stage(&[record("a")]).unwrap();
        assert_eq!(staged.dir, temp_dir.path());
        staged.commit().unwrap();

        assert!(sync_dir(temp_dir.path()).is_ok());
        assert_eq!(JsonMemoryStore::read_document(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_tags_on_disk_ignore_case() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        fs::write(
            &path,
            r#"[{"text": "loud", "pitch": 0.1, "tempo": 0.2, "dissonance": 0.3,
                 "kind": "Insight", "emotion": "Tense", "created_at": "2024-05-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let store = JsonMemoryStore::open(&path).unwrap();
        assert_eq!(store.all()[0].kind(), FragmentKind::Insight);
        assert_eq!(store.all()[0].emotion(), crate::domain::Emotion::Tense);
    }

    #[test]
    fn test_unknown_kind_on_disk_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memories.json");
        fs::write(
            &path,
            r#"[{"text": "x", "pitch": 0.1, "tempo": 0.2, "dissonance": 0.3,
                 "kind": "rumor", "emotion": "tense", "created_at": "2024-05-01T12:00:00Z"}]"#,
        )
        .unwrap();

        let err = JsonMemoryStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(ref c) if c.position == Some(0)));
    }
}
