//! # Warden - User Identity Service Library
//!
//! Facade crate that re-exports the public APIs of the warden components:
//! registration, login, token issuing and verification, and the owner-guarded
//! user resource.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! warden = { path = "../warden" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `Role`, `TokenPayload`, etc.
//! - **Ports**: `UserRepository`, `Cache`, `UserStore`, `PasswordHasher`, `TokenCodec`
//! - **Application**: `CacheAsideUserStore`, `AuthorizationGate` and the use cases
//! - **Adapters**: `PostgresUserRepository`, `RedisUserCache`, `Argon2Hasher`, `JwtTokenCodec`
//! - **Service**: `UserService` - The HTTP entry point, with Prometheus request metrics

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use warden_core::*;
}

pub use warden_core::{
    DateOfBirth, Email, Password, PasswordHash, Role, Token, TokenPayload, User, UserChanges,
    UserError, UserId, UserName, UserProfile,
};

// ============================================================================
// Ports
// ============================================================================

/// Storage and service traits
pub mod ports {
    pub use warden_core::{
        Cache, CacheError, Clock, HashingError, PasswordHasher, PatchedUser, SystemClock,
        TokenCodec, TokenError, TokenIdGenerator, UserRepository, UserStore, UserStoreError,
    };
}

pub use ports::{PasswordHasher, TokenCodec, UserRepository, UserStore, UserStoreError};

// ============================================================================
// Application Layer
// ============================================================================

/// Use cases, the cache-aside store and the authorization gate
pub mod application {
    pub use warden_application::*;
}

pub use warden_application::{
    AuthorizationError, AuthorizationGate, CacheAsideUserStore, DeleteUserUseCase,
    GetUserUseCase, LoginUseCase, RegisterUseCase, UpdateUserUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use warden_axum::routes::*;
        pub use warden_axum::{ApiError, AppState, ErrorResponse};
    }

    /// Persistence implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Token codec
    pub mod authentication {
        pub use warden_adapters::authentication::*;
    }

    /// Credential hashing
    pub mod hashing {
        pub use warden_adapters::hashing::*;
    }

    /// Configuration
    pub mod config {
        pub use warden_adapters::config::*;
    }
}

pub use warden_adapters::{
    Argon2Hasher, HashMapUserCache, HashMapUserRepository, JwtTokenCodec, JwtTokenConfig,
    PostgresUserRepository, RedisUserCache,
};

// ============================================================================
// User Service (Main Entry Point)
// ============================================================================

/// Main user service
pub use warden_service::{
    RequestMetrics, UserService, configure_postgresql, configure_redis, get_postgres_pool,
    get_redis_client, init_metrics, init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
