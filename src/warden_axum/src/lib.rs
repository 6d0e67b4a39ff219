//! Axum transport for the warden user service.
//!
//! Handlers are generic over the ports so the same routes serve PostgreSQL/Redis
//! in production and in-memory adapters in tests.
//!
//! ```ignore
//! use warden_axum::{AppState, routes};
//!
//! let app = Router::new()
//!     .route("/login", post(routes::login::<S, H, T>))
//!     .with_state(state);
//! ```

pub mod routes;
pub mod state;

pub use routes::error::{ApiError, ErrorResponse};
pub use state::AppState;
