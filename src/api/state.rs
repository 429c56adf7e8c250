use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub server: Arc<ServerConfig>,
}
