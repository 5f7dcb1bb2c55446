//! Presentation Layer
//!
//! HTTP handlers, form DTOs, guard middleware, router, and views.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use handlers::AccountsState;
pub use middleware::{CurrentSession, GuardState, RoleGuard, require_login, require_role};
pub use router::{accounts_router, accounts_router_generic};
