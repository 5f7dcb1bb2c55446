//! HTTP Handlers
//!
//! Every mutating operation follows the same contract: failures become a
//! flash message plus a redirect, store faults are logged server-side and
//! shown only as a generic retry message, and the one page-level error is
//! the 404 for a missing edit target.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::{
    DeleteAccountUseCase, EditAccountUseCase, LoginInput, LoginUseCase, RegisterUseCase,
    SessionGate,
};
use crate::domain::entity::session::{Flash, UserSnapshot};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AccountsError;
use crate::presentation::forms::{LoginForm, RegisterForm, UpdateAccountForm};
use crate::presentation::middleware::CurrentSession;
use crate::presentation::views;
use kernel::id::{Id, UserId};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountsConfig>,
}

impl<R> AccountsState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    fn gate(&self) -> SessionGate<R> {
        SessionGate::new(self.repo.clone(), self.config.clone())
    }
}

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

// ============================================================================
// Shared helpers
// ============================================================================

/// Queue a flash and redirect. When the request carried no session, one is
/// opened to hold the message and its cookie rides on the redirect. A
/// failing session store degrades to a plain redirect.
pub async fn flash_redirect<S>(
    gate: &SessionGate<S>,
    headers: &HeaderMap,
    config: &AccountsConfig,
    flash: Flash,
    to: &str,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    match gate.queue_flash(headers, flash).await {
        Ok(Some(token)) => (
            [(header::SET_COOKIE, config.cookie().build_set_cookie(&token))],
            Redirect::to(to),
        )
            .into_response(),
        Ok(None) => Redirect::to(to).into_response(),
        Err(e) => {
            e.log();
            Redirect::to(to).into_response()
        }
    }
}

/// Resolve the request's session and consume its flash for rendering.
async fn page_context<S>(
    gate: &SessionGate<S>,
    headers: &HeaderMap,
) -> (Option<UserSnapshot>, Option<Flash>)
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    match gate.resolve(headers).await {
        Ok(Some(mut session)) => {
            let flash = match gate.take_flash(&mut session).await {
                Ok(flash) => flash,
                Err(e) => {
                    e.log();
                    None
                }
            };
            (session.user.clone(), flash)
        }
        Ok(None) => (None, None),
        Err(e) => {
            e.log();
            (None, None)
        }
    }
}

// ============================================================================
// Login / Logout
// ============================================================================

/// GET /login
pub async fn show_login_form<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let (user, flash) = page_context(&gate, &headers).await;
    Html(views::login_page(user.as_ref(), flash.as_ref())).into_response()
}

/// POST /login
pub async fn process_login<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let input = LoginInput {
        email: form.email,
        password: form.password,
    };

    let snapshot = match use_case.execute(input).await {
        Ok(snapshot) => snapshot,
        Err(AccountsError::Validation(message)) => {
            return flash_redirect(&gate, &headers, &state.config, Flash::error(message), "/login")
                .await;
        }
        Err(AccountsError::InvalidCredentials) => {
            tracing::warn!("Invalid login attempt");
            return flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("Invalid email or password."),
                "/login",
            )
            .await;
        }
        Err(e) => {
            e.log();
            return flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(GENERIC_FAILURE),
                "/login",
            )
            .await;
        }
    };

    match gate.login(&headers, snapshot).await {
        Ok(token) => (
            [(
                header::SET_COOKIE,
                state.config.cookie().build_set_cookie(&token),
            )],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(e) => {
            e.log();
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(GENERIC_FAILURE),
                "/login",
            )
            .await
        }
    }
}

/// GET /logout
pub async fn process_logout<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();

    if let Err(e) = gate.logout(&headers).await {
        // The cookie is cleared either way; the row expires on its own.
        e.log();
    }

    (
        [(
            header::SET_COOKIE,
            state.config.cookie().build_delete_cookie(),
        )],
        Redirect::to("/login"),
    )
        .into_response()
}

// ============================================================================
// Registration
// ============================================================================

/// GET /register
pub async fn show_registration_form<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let (user, flash) = page_context(&gate, &headers).await;
    Html(views::registration_page(user.as_ref(), flash.as_ref())).into_response()
}

/// POST /register
pub async fn process_registration<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(e.to_string()),
                "/register",
            )
            .await;
        }
    };

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(input).await {
        Ok(user) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::success(format!("User {} registered successfully.", user.email)),
                "/users",
            )
            .await
        }
        Err(AccountsError::EmailTaken(email)) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(format!("Account with email {} already exists.", email)),
                "/register",
            )
            .await
        }
        Err(AccountsError::Validation(message)) => {
            flash_redirect(&gate, &headers, &state.config, Flash::error(message), "/register")
                .await
        }
        Err(e) => {
            e.log();
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("Failed to create your account. Please try again."),
                "/register",
            )
            .await
        }
    }
}

// ============================================================================
// User listing and dashboard
// ============================================================================

/// GET /users
pub async fn show_all_users<R>(
    State(state): State<AccountsState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let (user, flash) = page_context(&gate, &headers).await;

    // A store fault degrades to an empty listing rather than a 500.
    let users = match state.repo.list_all().await {
        Ok(users) => users,
        Err(e) => {
            e.log();
            Vec::new()
        }
    };

    Html(views::users_page(&users, user.as_ref(), flash.as_ref())).into_response()
}

/// GET /dashboard (behind `require_login`)
pub async fn show_dashboard<R>(
    State(state): State<AccountsState<R>>,
    Extension(CurrentSession(mut session)): Extension<CurrentSession>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();

    let Some(user) = session.user.clone() else {
        return Redirect::to("/login").into_response();
    };

    let flash = match gate.take_flash(&mut session).await {
        Ok(flash) => flash,
        Err(e) => {
            e.log();
            None
        }
    };

    Html(views::dashboard_page(&user, flash.as_ref())).into_response()
}

// ============================================================================
// Account edit
// ============================================================================

/// GET /users/{id}/edit (behind `require_login`)
pub async fn show_edit_form<R>(
    State(state): State<AccountsState<R>>,
    Extension(CurrentSession(mut session)): Extension<CurrentSession>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let target: UserId = Id::from_i64(id);

    let Some(caller) = session.user.clone() else {
        return Redirect::to("/login").into_response();
    };

    let use_case = EditAccountUseCase::new(state.repo.clone());

    match use_case.load(&caller, target).await {
        Ok(user) => {
            let flash = match gate.take_flash(&mut session).await {
                Ok(flash) => flash,
                Err(e) => {
                    e.log();
                    None
                }
            };
            Html(views::edit_page(&user, &caller, flash.as_ref())).into_response()
        }
        Err(AccountsError::UserNotFound) => AccountsError::UserNotFound.into_response(),
        Err(AccountsError::NotAuthorized) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("You do not have permission to edit this account."),
                "/users",
            )
            .await
        }
        Err(e) => {
            e.log();
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(GENERIC_FAILURE),
                "/users",
            )
            .await
        }
    }
}

/// POST /users/{id}/update (behind `require_login`)
pub async fn process_edit<R>(
    State(state): State<AccountsState<R>>,
    Extension(CurrentSession(mut session)): Extension<CurrentSession>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<UpdateAccountForm>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let target: UserId = Id::from_i64(id);
    let edit_form = format!("/users/{}/edit", id);

    let Some(caller) = session.user.clone() else {
        return Redirect::to("/login").into_response();
    };

    let (name, email) = match form.validate() {
        Ok(values) => values,
        Err(e) => {
            return flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(e.to_string()),
                &edit_form,
            )
            .await;
        }
    };

    let use_case = EditAccountUseCase::new(state.repo.clone());

    match use_case.execute(&caller, target, name, email).await {
        Ok(outcome) => {
            if outcome.self_edit {
                // Keep the cached snapshot consistent so the new
                // name/email shows without a re-login.
                if let Err(e) = gate.refresh_user(&mut session, &outcome.user).await {
                    e.log();
                }
            }
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::success("Account updated successfully."),
                "/users",
            )
            .await
        }
        Err(AccountsError::UserNotFound) => AccountsError::UserNotFound.into_response(),
        Err(AccountsError::NotAuthorized) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("You do not have permission to edit this account."),
                "/users",
            )
            .await
        }
        Err(AccountsError::EmailTaken(email)) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(format!("Account with email {} already exists.", email)),
                &edit_form,
            )
            .await
        }
        Err(AccountsError::Validation(message)) => {
            flash_redirect(&gate, &headers, &state.config, Flash::error(message), &edit_form)
                .await
        }
        Err(e) => {
            e.log();
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(GENERIC_FAILURE),
                &edit_form,
            )
            .await
        }
    }
}

// ============================================================================
// Account delete
// ============================================================================

/// POST /users/{id}/delete (behind `require_role(Admin)`)
pub async fn process_delete<R>(
    State(state): State<AccountsState<R>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = state.gate();
    let target: UserId = Id::from_i64(id);

    let Some(caller) = session.user.clone() else {
        return Redirect::to("/login").into_response();
    };

    let use_case = DeleteAccountUseCase::new(state.repo.clone());

    match use_case.execute(&caller, target).await {
        Ok(true) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::success("Account deleted."),
                "/users",
            )
            .await
        }
        // Already removed: idempotent from the caller's perspective.
        Ok(false) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("Failed to delete account."),
                "/users",
            )
            .await
        }
        Err(AccountsError::SelfDeletion) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("You cannot delete your own account."),
                "/users",
            )
            .await
        }
        Err(AccountsError::NotAuthorized) => {
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("You do not have permission to access this page."),
                "/",
            )
            .await
        }
        Err(e) => {
            e.log();
            flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("Failed to delete account."),
                "/users",
            )
            .await
        }
    }
}
