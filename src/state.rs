use std::sync::Arc;

use crate::auth::TokenService;
use crate::database::CredentialStore;

/// Shared application state handed to the router.
///
/// Auth context is never read from ambient globals: the credential store and
/// token service travel through axum `State` into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}
