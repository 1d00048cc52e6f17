use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::database::Store;
use crate::middleware::ScopeGuard;

/// Shared request context: the backing store and the token verifier
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: ScopeGuard,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            store,
            auth: ScopeGuard::authenticated(verifier),
        }
    }
}
