//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use sharenotes_server::{
    create_app, storage::open_storage, AppState, Config, PasteStorage, StorageKind,
};
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) const TEST_MAX_CONTENT_BYTES: usize = 1024;

pub(crate) fn test_config(storage: StorageKind, temp_dir: &TempDir) -> Config {
    Config {
        storage,
        db_path: temp_dir
            .path()
            .join("pastes.redb")
            .to_str()
            .expect("db path")
            .to_string(),
        port: 0,
        worker_id: 7,
        max_content_bytes: TEST_MAX_CONTENT_BYTES,
        sweep_interval_secs: 0,
    }
}

pub(crate) struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn PasteStorage>,
    _temp_dir: TempDir,
}

pub(crate) fn setup_test_server(kind: StorageKind) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(kind, &temp_dir);
    let storage = open_storage(&config).expect("open storage");
    let state = AppState::new(config, storage.clone());
    let server = TestServer::new(create_app(state, false)).expect("server");
    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}

pub(crate) fn each_backend() -> Vec<TestApp> {
    vec![
        setup_test_server(StorageKind::Memory),
        setup_test_server(StorageKind::Durable),
    ]
}
