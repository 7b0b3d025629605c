use super::*;
use crate::backend::LocalBackend;
use crate::db::{NewPaper, Paper, PaperId, PaperStats, PaperStatus, Review, UserId};
use crate::decision::Decision;
use crate::storage::{MemoryStore, StorageError};
use async_trait::async_trait;

/// Backend whose every call fails, standing in for an unreachable server.
struct OfflineBackend;

fn offline() -> BackendError {
    BackendError::Unavailable("offline".to_string())
}

#[async_trait]
impl Backend for OfflineBackend {
    async fn authenticate(&self, _: &str, _: &str, _: Role) -> Result<Option<Identity>, BackendError> {
        Err(offline())
    }
    async fn register(&self, _: &str, _: &str, _: &str) -> Result<Option<Identity>, BackendError> {
        Err(offline())
    }
    async fn user(&self, _: UserId) -> Result<Option<Identity>, BackendError> {
        Err(offline())
    }
    async fn reviewers(&self) -> Result<Vec<Identity>, BackendError> {
        Err(offline())
    }
    async fn submit_paper(&self, _: NewPaper) -> Result<Paper, BackendError> {
        Err(offline())
    }
    async fn assign_reviewer(&self, _: PaperId, _: UserId) -> Result<(), BackendError> {
        Err(offline())
    }
    async fn submit_review(
        &self,
        _: PaperId,
        _: UserId,
        _: u8,
        _: String,
    ) -> Result<Review, BackendError> {
        Err(offline())
    }
    async fn update_paper_status(
        &self,
        _: PaperId,
        _: PaperStatus,
        _: Option<f64>,
    ) -> Result<bool, BackendError> {
        Err(offline())
    }
    async fn decide(&self, _: PaperId, _: Decision) -> Result<f64, BackendError> {
        Err(offline())
    }
    async fn declare_winner(&self, _: PaperId) -> Result<bool, BackendError> {
        Err(offline())
    }
    async fn papers_by_author(&self, _: UserId) -> Result<Vec<Paper>, BackendError> {
        Err(offline())
    }
    async fn papers_for_reviewer(&self, _: UserId) -> Result<Vec<Paper>, BackendError> {
        Err(offline())
    }
    async fn all_papers(&self) -> Result<Vec<Paper>, BackendError> {
        Err(offline())
    }
    async fn reviews_by_paper(&self, _: PaperId) -> Result<Vec<Review>, BackendError> {
        Err(offline())
    }
    async fn paper_by_id(&self, _: PaperId) -> Result<Option<Paper>, BackendError> {
        Err(offline())
    }
    async fn stats(&self) -> Result<PaperStats, BackendError> {
        Err(offline())
    }
    async fn winner_candidates(&self) -> Result<Vec<Paper>, BackendError> {
        Err(offline())
    }
    async fn winners(&self) -> Result<Vec<Paper>, BackendError> {
        Err(offline())
    }
}

/// Reads succeed with nothing stored; every write fails.
struct FullDisk;

impl KeyValueStore for FullDisk {
    fn get_item(&self, _: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }
    fn set_item(&self, _: &str, _: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }
    fn remove_item(&self, _: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

fn session(storage: &Arc<dyn KeyValueStore>) -> SessionStore {
    SessionStore::restore(storage.clone(), session_key("test"))
}

#[tokio::test]
async fn login_sets_and_persists_sanitized_identity() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = session(&storage);

    let ok = store
        .login(&backend, "reviewer@example.com", "reviewer123", Role::Reviewer)
        .await
        .expect("login");
    assert!(ok);

    let identity = store.current().expect("identity");
    assert_eq!(identity.id, UserId(3));
    assert_eq!(identity.name, "Reviewer User");
    assert_eq!(store.viewer(), Viewer::Reviewer);

    let raw = storage
        .get_item(&session_key("test"))
        .expect("get")
        .expect("persisted");
    assert!(!raw.contains("reviewer123"));
    let persisted: Identity = serde_json::from_str(&raw).expect("json");
    assert_eq!(&persisted, identity);
}

#[tokio::test]
async fn mismatched_triple_leaves_identity_unset() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = session(&storage);

    let ok = store
        .login(&backend, "admin@example.com", "admin123", Role::Reviewer)
        .await
        .expect("login");
    assert!(!ok);
    assert!(!store.is_authenticated());
    assert_eq!(store.viewer(), Viewer::Anonymous);
    assert_eq!(storage.get_item(&session_key("test")).expect("get"), None);
}

#[tokio::test]
async fn restore_picks_up_previous_login() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut first = session(&storage);
    first
        .login(&backend, "admin@example.com", "admin123", Role::Admin)
        .await
        .expect("login");

    let restored = session(&storage);
    assert_eq!(restored.viewer(), Viewer::Admin);

    let other = SessionStore::restore(storage.clone(), session_key("other"));
    assert!(!other.is_authenticated());
}

#[tokio::test]
async fn logout_clears_identity_and_storage() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = session(&storage);
    store
        .login(&backend, "author@example.com", "author123", Role::Author)
        .await
        .expect("login");

    store.logout();
    assert!(store.current().is_none());
    assert!(!session(&storage).is_authenticated());
}

#[test]
fn malformed_persisted_identity_is_ignored() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage
        .set_item(&session_key("test"), "{\"id\":")
        .expect("set");
    assert!(!session(&storage).is_authenticated());
}

#[tokio::test]
async fn register_then_login_as_author() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = session(&storage);

    assert!(store
        .register(&backend, "Grace", "grace@example.com", "hopper")
        .await
        .expect("register"));
    assert!(!store.is_authenticated());
    assert!(!store
        .register(&backend, "Grace", "grace@example.com", "other")
        .await
        .expect("register"));

    assert!(!store
        .login(&backend, "grace@example.com", "hopper", Role::Reviewer)
        .await
        .expect("login"));
    assert!(store
        .login(&backend, "grace@example.com", "hopper", Role::Author)
        .await
        .expect("login"));
    assert_eq!(store.viewer(), Viewer::Author);
}

#[tokio::test]
async fn backend_failure_is_an_error_not_a_rejection() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut store = session(&storage);

    let err = store
        .login(&OfflineBackend, "admin@example.com", "admin123", Role::Admin)
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        SessionError::Backend(BackendError::Unavailable(_))
    ));
    assert!(!store.is_authenticated());

    assert!(store
        .register(&OfflineBackend, "x", "x@example.com", "pw")
        .await
        .is_err());
}

#[tokio::test]
async fn login_fails_when_identity_cannot_be_persisted() {
    let backend = LocalBackend::seeded(false);
    let storage: Arc<dyn KeyValueStore> = Arc::new(FullDisk);
    let mut store = session(&storage);

    let err = store
        .login(&backend, "admin@example.com", "admin123", Role::Admin)
        .await
        .expect_err("write should fail");
    assert!(matches!(err, SessionError::Storage(StorageError::Io(_))));
    assert!(!store.is_authenticated());
}
