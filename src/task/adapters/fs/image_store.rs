//! Capability-scoped filesystem image store.
//!
//! All file operations go through a [`Dir`] handle opened once on the upload
//! root, so stored names can never escape it.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::task::{
    adapters::naming::generate_stored_filename,
    domain::StoredFilename,
    ports::{ImageStore, ImageStoreError, ImageStoreResult, ImageUpload},
};

/// Image store writing uploads into a single directory.
#[derive(Debug, Clone)]
pub struct FilesystemImageStore {
    root: Utf8PathBuf,
    dir: Arc<Dir>,
}

impl FilesystemImageStore {
    /// Opens the upload directory, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(upload_dir: impl Into<Utf8PathBuf>) -> ImageStoreResult<Self> {
        let root = upload_dir.into();
        Dir::create_ambient_dir_all(&root, ambient_authority()).map_err(ImageStoreError::io)?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).map_err(ImageStoreError::io)?;
        Ok(Self {
            root,
            dir: Arc::new(dir),
        })
    }

    /// Returns the upload root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    async fn run_blocking<F, T>(&self, f: F) -> ImageStoreResult<T>
    where
        F: FnOnce(&Dir) -> ImageStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || f(&dir))
            .await
            .map_err(|err| ImageStoreError::io(std::io::Error::other(err)))?
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn save(&self, upload: &ImageUpload) -> ImageStoreResult<StoredFilename> {
        if upload.is_empty() {
            return Err(ImageStoreError::EmptyUpload);
        }
        let stored_filename = generate_stored_filename(upload.original_filename())?;
        let name = stored_filename.clone();
        let bytes = upload.bytes().to_vec();
        self.run_blocking(move |dir| {
            dir.write(name.as_str(), bytes).map_err(ImageStoreError::io)
        })
        .await?;
        tracing::debug!(stored_filename = %stored_filename, root = %self.root, "image written");
        Ok(stored_filename)
    }

    async fn delete(&self, stored_filename: &StoredFilename) -> ImageStoreResult<()> {
        let name = stored_filename.clone();
        self.run_blocking(move |dir| match dir.remove_file(name.as_str()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImageStoreError::io(err)),
        })
        .await
    }
}
