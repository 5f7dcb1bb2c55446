//! Site Pages and Error Routes
//!
//! The home page, the deliberate 500 route, and the 404 fallback. Error
//! pages all flow through the kernel renderer; diagnostic detail is
//! attached only in development configuration.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use accounts::PgAccountsRepository;
use accounts::application::session_gate::SessionGate;
use accounts::config::AccountsConfig;
use accounts::domain::entity::session::{Flash, UserSnapshot};
use accounts::presentation::views::layout;
use kernel::error::kind::ErrorKind;
use kernel::error::render::error_page;

/// Runtime environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    Development,
    #[default]
    Production,
}

impl AppEnv {
    /// Parse the APP_ENV variable; anything starting with "dev" is
    /// development, everything else is production.
    pub fn from_env_var(value: &str) -> Self {
        if value.trim().to_lowercase().starts_with("dev") {
            AppEnv::Development
        } else {
            AppEnv::Production
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, AppEnv::Development)
    }
}

/// Shared state for the site pages
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<PgAccountsRepository>,
    pub config: Arc<AccountsConfig>,
    pub env: AppEnv,
}

/// Diagnostic detail is shown in development only.
fn gated_detail<'a>(env: AppEnv, detail: Option<&'a str>) -> Option<&'a str> {
    if env.is_development() { detail } else { None }
}

/// Render an error page, gating diagnostic detail on the environment.
fn error_response(
    env: AppEnv,
    kind: ErrorKind,
    message: &str,
    detail: Option<&str>,
) -> Response {
    let detail = gated_detail(env, detail);

    let status =
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Html(error_page(kind, message, detail))).into_response()
}

/// GET /
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let gate = SessionGate::new(state.repo.clone(), state.config.clone());

    let (user, flash): (Option<UserSnapshot>, Option<Flash>) =
        match gate.resolve(&headers).await {
            Ok(Some(mut session)) => {
                let flash = match gate.take_flash(&mut session).await {
                    Ok(flash) => flash,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to take flash message");
                        None
                    }
                };
                (session.user.clone(), flash)
            }
            Ok(None) => (None, None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve session");
                (None, None)
            }
        };

    let body = "<h1>Welcome Home</h1>\n\
        <p>Browse the <a href=\"/users\">registered users</a>, \
        <a href=\"/register\">create an account</a>, or \
        <a href=\"/contact\">get in touch</a>.</p>";

    Html(layout("Welcome Home", user.as_ref(), flash.as_ref(), body)).into_response()
}

/// GET /test-error, deliberately exercises the 500 path.
pub async fn test_error(State(state): State<AppState>) -> Response {
    tracing::error!("Test error route triggered");

    error_response(
        state.env,
        ErrorKind::InternalServerError,
        "This is a test error",
        Some("raised deliberately by GET /test-error"),
    )
}

/// Fallback for unmatched routes.
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let detail = format!("No route matches {}", uri.path());

    error_response(
        state.env,
        ErrorKind::NotFound,
        "Page not found!",
        Some(&detail),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_env_parsing() {
        assert_eq!(AppEnv::from_env_var("development"), AppEnv::Development);
        assert_eq!(AppEnv::from_env_var("dev"), AppEnv::Development);
        assert_eq!(AppEnv::from_env_var("DEVELOPMENT"), AppEnv::Development);
        assert_eq!(AppEnv::from_env_var("production"), AppEnv::Production);
        assert_eq!(AppEnv::from_env_var(""), AppEnv::Production);
        assert_eq!(AppEnv::from_env_var("staging"), AppEnv::Production);
    }

    #[test]
    fn test_error_response_status() {
        let dev = error_response(
            AppEnv::Development,
            ErrorKind::NotFound,
            "Page not found!",
            Some("No route matches /missing"),
        );
        assert_eq!(dev.status(), StatusCode::NOT_FOUND);

        let server_error = error_response(
            AppEnv::Production,
            ErrorKind::InternalServerError,
            "This is a test error",
            Some("raised deliberately"),
        );
        assert_eq!(server_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_only_rendered_in_development() {
        let detail = Some("No route matches /missing");

        let page = error_page(
            ErrorKind::NotFound,
            "Page not found!",
            gated_detail(AppEnv::Development, detail),
        );
        assert!(page.contains("No route matches /missing"));

        let page = error_page(
            ErrorKind::NotFound,
            "Page not found!",
            gated_detail(AppEnv::Production, detail),
        );
        assert!(!page.contains("No route matches /missing"));
    }
}
