//! Shared test helpers for `skytrack-core` integration tests.
//!
//! Lightweight mocks of the core ports with failure injection and call
//! counting, plus fixtures for principals.

#![allow(dead_code)]

pub mod documents;
pub mod identity;

use std::sync::Arc;

use skytrack_core::{AuthService, EntityStore};
use skytrack_domain::{Principal, Role};

pub use documents::{MockDocumentStore, Op};
pub use identity::MockIdentityProvider;

/// Principal fixture
pub fn principal(uid: &str, role: Role) -> Principal {
    Principal {
        uid: uid.to_string(),
        name: format!("User {uid}"),
        email: format!("{uid}@example.com"),
        photo_url: None,
        role,
    }
}

/// Entity store already bound to `uid`
pub async fn signed_in_store(documents: &Arc<MockDocumentStore>, uid: &str) -> EntityStore {
    let store = EntityStore::new(documents.clone());
    store.on_principal_changed(Some(principal(uid, Role::Student))).await.unwrap();
    store
}

/// Auth service over the two mocks
pub fn auth_service(
    provider: &Arc<MockIdentityProvider>,
    documents: &Arc<MockDocumentStore>,
) -> AuthService {
    AuthService::new(provider.clone(), documents.clone())
}
