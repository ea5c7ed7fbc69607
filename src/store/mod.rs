pub mod tabular;

use crate::models::{Dataset, Source};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

pub use tabular::{load_from_file, load_from_upload, save_csv, write_csv, LoadError};

/// Holds the working dataset of a session.
///
/// Replacement swaps a whole `Arc<Dataset>`, so readers either see the
/// previous dataset or the new one, never a mix. Failed loads leave the
/// current dataset and its provenance untouched.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new dataset, returning the one it replaced.
    pub fn replace(&self, dataset: Dataset) -> Option<Arc<Dataset>> {
        self.swap(Arc::new(dataset))
    }

    fn swap(&self, dataset: Arc<Dataset>) -> Option<Arc<Dataset>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(dataset)
    }

    pub fn load_file(&self, path: &Path, source: Source) -> Result<Arc<Dataset>, LoadError> {
        let dataset = Arc::new(load_from_file(path, source)?);
        self.swap(Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn load_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<Arc<Dataset>, LoadError> {
        let dataset = Arc::new(load_from_upload(file_name, bytes, Source::UploadedFile)?);
        self.swap(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Load the default data file when nothing has been loaded yet.
    ///
    /// Returns the dataset that is current afterwards, or `None` when the
    /// store is empty and there is no default file. A default file that
    /// exists but cannot be read is an error.
    pub fn load_default_if_empty(&self, path: &Path) -> Result<Option<Arc<Dataset>>, LoadError> {
        if let Some(current) = self.current() {
            return Ok(Some(current));
        }
        if !path.exists() {
            info!("No default data file at {}", path.display());
            return Ok(None);
        }

        self.load_file(path, Source::DefaultFile).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingRecord;

    fn record(category: &str) -> ListingRecord {
        ListingRecord {
            category: category.to_string(),
            page: 1,
            name: "A".to_string(),
            price: "10".to_string(),
            address: "Dakar".to_string(),
            image_url: "a.jpg".to_string(),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = DatasetStore::new();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = DatasetStore::new();
        store.replace(Dataset::new(
            vec![record("chiens"), record("chiens")],
            Source::Scraped,
        ));
        let previous = store.replace(Dataset::new(
            vec![record("moutons")],
            Source::UploadedFile,
        ));

        assert_eq!(previous.unwrap().len(), 2);
        let current = store.current().unwrap();
        assert_eq!(current.source, Source::UploadedFile);
        assert_eq!(current.records, vec![record("moutons")]);
    }

    #[test]
    fn test_failed_load_keeps_current_dataset() {
        let store = DatasetStore::new();
        store.replace(Dataset::new(vec![record("chiens")], Source::UploadedFile));

        let err = store
            .load_file(Path::new("/definitely/not/here.csv"), Source::DefaultFile)
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));

        let err = store.load_upload("bad.csv", b"nom,prix\nA,1\n".to_vec()).unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }));

        let current = store.current().unwrap();
        assert_eq!(current.source, Source::UploadedFile);
        assert_eq!(current.records, vec![record("chiens")]);
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = DatasetStore::new();
        store.replace(Dataset::new(vec![record("chiens")], Source::Scraped));
        let snapshot = store.current().unwrap();

        store.replace(Dataset::new(Vec::new(), Source::UploadedFile));
        assert_eq!(snapshot.len(), 1);
        assert!(store.current().unwrap().is_empty());
    }

    #[test]
    fn test_default_file_not_present() {
        let store = DatasetStore::new();
        assert!(store
            .load_default_if_empty(Path::new("/definitely/not/here.csv"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unreadable_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_animaux.csv");
        std::fs::write(&path, "nom,prix\nA,1\n").unwrap();

        let store = DatasetStore::new();
        let err = store.load_default_if_empty(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ParseFailure { ref reason, .. } if reason.contains("categorie")
        ));
        assert!(store.current().is_none());
    }
}
