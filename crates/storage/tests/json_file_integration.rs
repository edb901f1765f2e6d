use recite_core::model::ProgressIndex;
use storage::json_file::JsonFileRepository;
use storage::repository::{ProgressRepository, StorageError};

#[tokio::test]
async fn missing_file_loads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("memory_progress.json"));
    assert_eq!(repo.load_progress().await.unwrap(), ProgressIndex::START);
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("memory_progress.json"));

    for value in [0, 1, 7, 41, u64::MAX] {
        repo.save_progress(ProgressIndex::new(value)).await.unwrap();
        assert_eq!(repo.load_progress().await.unwrap(), ProgressIndex::new(value));
    }
}

#[tokio::test]
async fn writes_the_progress_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("memory_progress.json");
    let repo = JsonFileRepository::new(&path);

    repo.save_progress(ProgressIndex::new(3)).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!({ "progress": 3 }));
    assert!(!dir.path().join("nested").join("memory_progress.json.tmp").exists());
}

#[tokio::test]
async fn corrupt_file_loads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory_progress.json");
    std::fs::write(&path, "{\"progress\": \"lots\"").unwrap();

    let repo = JsonFileRepository::new(&path);
    assert_eq!(repo.load_progress().await.unwrap(), ProgressIndex::START);
}

#[tokio::test]
async fn unwritable_location_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "plain file").unwrap();

    // A regular file where the parent directory should be.
    let repo = JsonFileRepository::new(blocker.join("memory_progress.json"));
    let result = repo.save_progress(ProgressIndex::new(1)).await;
    assert!(matches!(result, Err(StorageError::Io(_))), "got {result:?}");
}
