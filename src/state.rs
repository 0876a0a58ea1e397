// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

use std::sync::Arc;

use crate::blockchain::CertificateRegistry;
use crate::files::FileStore;
use crate::storage::DualStore;

/// Shared application state handed to every handler.
///
/// The registry is held behind the capability trait so tests can swap the
/// alloy client for an in-memory double.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DualStore>,
    pub registry: Arc<dyn CertificateRegistry>,
    pub files: Arc<FileStore>,
}

impl AppState {
    pub fn new(store: DualStore, registry: Arc<dyn CertificateRegistry>, files: FileStore) -> Self {
        Self {
            store: Arc::new(store),
            registry,
            files: Arc::new(files),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> (
    AppState,
    Arc<crate::blockchain::testing::MockRegistry>,
    tempfile::TempDir,
) {
    use crate::storage::StoragePaths;

    let dir = tempfile::tempdir().unwrap();
    let paths = StoragePaths::new(dir.path().join("data"), dir.path().join("public"));
    let store = DualStore::open(&paths).unwrap();
    let files = FileStore::new(paths);
    files.initialize().unwrap();

    let registry = Arc::new(crate::blockchain::testing::MockRegistry::new());
    let state = AppState::new(store, registry.clone(), files);
    (state, registry, dir)
}
