//! In-memory image store for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    adapters::naming::generate_stored_filename,
    domain::StoredFilename,
    ports::{ImageStore, ImageStoreError, ImageStoreResult, ImageUpload},
};

/// Thread-safe image store keeping bytes in a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageStore {
    objects: Arc<RwLock<HashMap<StoredFilename, Vec<u8>>>>,
}

impl InMemoryImageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when bytes are stored under the name.
    #[must_use]
    pub fn contains(&self, stored_filename: &StoredFilename) -> bool {
        self.objects
            .read()
            .is_ok_and(|objects| objects.contains_key(stored_filename))
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().map_or(0, |objects| objects.len())
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(err: impl std::fmt::Display) -> ImageStoreError {
    ImageStoreError::io(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, upload: &ImageUpload) -> ImageStoreResult<StoredFilename> {
        if upload.is_empty() {
            return Err(ImageStoreError::EmptyUpload);
        }
        let stored_filename = generate_stored_filename(upload.original_filename())?;
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.insert(stored_filename.clone(), upload.bytes().to_vec());
        Ok(stored_filename)
    }

    async fn delete(&self, stored_filename: &StoredFilename) -> ImageStoreResult<()> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        objects.remove(stored_filename);
        Ok(())
    }
}
