//! Filesystem image store tests against a temporary upload directory.

use camino::Utf8PathBuf;
use eyre::{OptionExt, ensure};
use rstest::{fixture, rstest};
use taskmanager::task::{
    adapters::fs::FilesystemImageStore,
    domain::StoredFilename,
    ports::{ImageStore, ImageStoreError, ImageUpload},
};
use tempfile::TempDir;

struct UploadDir {
    root: Utf8PathBuf,
    _temp: TempDir,
}

#[fixture]
fn upload_dir() -> UploadDir {
    let temp = tempfile::tempdir().expect("temporary directory");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("uploads"))
        .expect("temporary path should be UTF-8");
    UploadDir { root, _temp: temp }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_creates_the_upload_directory(upload_dir: UploadDir) -> eyre::Result<()> {
    ensure!(!upload_dir.root.exists(), "directory absent before open");

    let store = FilesystemImageStore::open(upload_dir.root.clone())?;

    ensure!(upload_dir.root.is_dir(), "directory created");
    ensure!(store.root() == upload_dir.root.as_path(), "root reported");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saved_bytes_land_under_a_unique_name(upload_dir: UploadDir) -> eyre::Result<()> {
    let store = FilesystemImageStore::open(upload_dir.root.clone())?;
    let upload = ImageUpload::new("sketch.png", b"first".to_vec());

    let first = store.save(&upload).await?;
    let second = store.save(&upload).await?;

    ensure!(first != second, "every save gets a fresh name");
    ensure!(first.as_str().ends_with("_sketch.png"), "original name kept as suffix");
    let written = std::fs::read(upload_dir.root.join(first.as_str()))?;
    ensure!(written == b"first", "bytes written verbatim");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn path_components_cannot_escape_the_root(upload_dir: UploadDir) -> eyre::Result<()> {
    let store = FilesystemImageStore::open(upload_dir.root.clone())?;
    let upload = ImageUpload::new("../../outside.png", b"sneaky".to_vec());

    let stored = store.save(&upload).await?;

    ensure!(!stored.as_str().contains('/'), "no separators in {stored}");
    ensure!(
        upload_dir.root.join(stored.as_str()).is_file(),
        "file written inside the upload root"
    );
    let parent = upload_dir
        .root
        .parent()
        .ok_or_eyre("upload root has a parent")?;
    ensure!(
        !parent.join("outside.png").exists(),
        "nothing written outside the root"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_upload_is_rejected(upload_dir: UploadDir) -> eyre::Result<()> {
    let store = FilesystemImageStore::open(upload_dir.root.clone())?;

    let result = store.save(&ImageUpload::new("blank.png", Vec::new())).await;

    ensure!(
        matches!(result, Err(ImageStoreError::EmptyUpload)),
        "expected empty upload error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_file_and_tolerates_missing_ones(
    upload_dir: UploadDir,
) -> eyre::Result<()> {
    let store = FilesystemImageStore::open(upload_dir.root.clone())?;
    let stored = store
        .save(&ImageUpload::new("sketch.png", b"bytes".to_vec()))
        .await?;

    store.delete(&stored).await?;
    ensure!(
        !upload_dir.root.join(stored.as_str()).exists(),
        "file removed"
    );

    store.delete(&StoredFilename::new("never_written.png")?).await?;
    Ok(())
}
