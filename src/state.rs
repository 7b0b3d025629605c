use crate::backend::Backend;
use crate::storage::KeyValueStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub storage: Arc<dyn KeyValueStore>,
}
