use std::sync::Arc;

use warden_application::AuthorizationGate;
use warden_core::Clock;

/// Everything the handlers need, shared by every request.
///
/// Stores are expected to be cheap to clone (`Arc` inside).
#[derive(Clone)]
pub struct AppState<S, H, T> {
    pub user_store: S,
    pub hasher: H,
    pub gate: AuthorizationGate<T>,
    pub clock: Arc<dyn Clock>,
}

impl<S, H, T> AppState<S, H, T> {
    pub fn new(user_store: S, hasher: H, gate: AuthorizationGate<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_store,
            hasher,
            gate,
            clock,
        }
    }
}
