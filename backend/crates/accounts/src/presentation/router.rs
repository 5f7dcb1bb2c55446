//! Accounts Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::infra::postgres::PgAccountsRepository;
use crate::presentation::handlers::{self, AccountsState};
use crate::presentation::middleware::{self, GuardState, RoleGuard};

/// Create the accounts router with the PostgreSQL repository
pub fn accounts_router(repo: PgAccountsRepository, config: AccountsConfig) -> Router {
    accounts_router_generic(repo, config)
}

/// Create a generic accounts router for any repository implementation
pub fn accounts_router_generic<R>(repo: R, config: AccountsConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AccountsState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    let guard = GuardState {
        repo: state.repo.clone(),
        config: state.config.clone(),
    };

    let public = Router::new()
        .route(
            "/login",
            get(handlers::show_login_form::<R>).post(handlers::process_login::<R>),
        )
        .route("/logout", get(handlers::process_logout::<R>))
        .route(
            "/register",
            get(handlers::show_registration_form::<R>).post(handlers::process_registration::<R>),
        )
        // TODO: decide whether the listing should require login; public for now
        .route("/users", get(handlers::show_all_users::<R>));

    let authenticated = Router::new()
        .route("/dashboard", get(handlers::show_dashboard::<R>))
        .route("/users/{id}/edit", get(handlers::show_edit_form::<R>))
        .route("/users/{id}/update", post(handlers::process_edit::<R>))
        .route_layer(from_fn_with_state(
            guard.clone(),
            middleware::require_login::<R>,
        ));

    let admin_only = Router::new()
        .route("/users/{id}/delete", post(handlers::process_delete::<R>))
        .route_layer(from_fn_with_state(
            RoleGuard {
                guard,
                role: UserRole::Admin,
            },
            middleware::require_role::<R>,
        ));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin_only)
        .with_state(state)
}
