//! Accounts Backend Module
//!
//! The authentication and account-lifecycle slice of the campus site:
//! registration, login/logout with server-side sessions, role-gated
//! account editing and deletion, and the one-shot flash messages that
//! carry operation outcomes across redirects.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the session gate
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, forms, guards, router, views
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; plaintext zeroized, never logged
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Role-based access with a closed role enumeration (Admin, User)
//! - Login failures are generic: account existence is never revealed

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use error::{AccountsError, AccountsResult};
pub use infra::postgres::PgAccountsRepository;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
