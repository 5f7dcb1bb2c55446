//! Auth Guard Middleware
//!
//! Route guards for protected pages.
//!
//! - [`require_login`] redirects anonymous requests to the login page and
//!   inserts the current session into request extensions for handlers.
//! - [`require_role`] additionally checks the session's role; failures
//!   are communicated as flash messages, an anonymous caller lands on
//!   `/login`, a caller with the wrong role on `/`.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::session_gate::SessionGate;
use crate::domain::entity::session::{Flash, Session};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::handlers::flash_redirect;

/// Middleware state for the login guard
#[derive(Clone)]
pub struct GuardState<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<S>,
    pub config: Arc<AccountsConfig>,
}

/// Middleware state for the role guard
#[derive(Clone)]
pub struct RoleGuard<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub guard: GuardState<S>,
    pub role: UserRole,
}

/// The authenticated session, inserted into request extensions by the
/// guards so handlers get it without a second store lookup.
#[derive(Clone)]
pub struct CurrentSession(pub Session);

/// Middleware that requires an authenticated session.
pub async fn require_login<S>(
    State(state): State<GuardState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.repo.clone(), state.config.clone());

    let session = match gate.resolve(req.headers()).await {
        Ok(session) => session,
        Err(e) => {
            // A store fault must not leak past the guard; treat the
            // request as unauthenticated.
            e.log();
            None
        }
    };

    match session {
        Some(session) if session.is_authenticated() => {
            req.extensions_mut().insert(CurrentSession(session));
            next.run(req).await
        }
        _ => Redirect::to("/login").into_response(),
    }
}

/// Middleware that requires a specific role.
pub async fn require_role<S>(
    State(RoleGuard { guard, role }): State<RoleGuard<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(guard.repo.clone(), guard.config.clone());

    let session = match gate.resolve(req.headers()).await {
        Ok(session) => session,
        Err(e) => {
            e.log();
            None
        }
    };

    let Some(session) = session else {
        return flash_redirect(
            &gate,
            req.headers(),
            &guard.config,
            Flash::error("You must be logged in to access this page."),
            "/login",
        )
        .await;
    };

    let Some(user) = session.user.clone() else {
        return flash_redirect(
            &gate,
            req.headers(),
            &guard.config,
            Flash::error("You must be logged in to access this page."),
            "/login",
        )
        .await;
    };

    if user.role != role {
        tracing::warn!(
            actor_id = %user.id,
            required_role = %role,
            actual_role = %user.role,
            "Rejected request: insufficient role"
        );
        return flash_redirect(
            &gate,
            req.headers(),
            &guard.config,
            Flash::error("You do not have permission to access this page."),
            "/",
        )
        .await;
    }

    req.extensions_mut().insert(CurrentSession(session));
    next.run(req).await
}
