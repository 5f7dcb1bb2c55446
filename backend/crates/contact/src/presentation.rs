//! Contact HTTP Surface
//!
//! Handlers, views, and router for the contact pages. Session and flash
//! plumbing comes from the accounts crate so notices render consistently
//! across the site.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use std::sync::Arc;

use accounts::application::session_gate::SessionGate;
use accounts::config::AccountsConfig;
use accounts::domain::entity::session::{Flash, UserSnapshot};
use accounts::domain::repository::SessionRepository;
use accounts::presentation::views::layout;
use kernel::error::render::html_escape;

use crate::domain::{ContactForm, ContactMessage, ContactRepository};
use crate::postgres::PgContactRepository;

/// Shared state for contact handlers
#[derive(Clone)]
pub struct ContactState<C, S>
where
    C: ContactRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub messages: Arc<C>,
    pub sessions: Arc<S>,
    pub config: Arc<AccountsConfig>,
}

/// Create the contact router with the PostgreSQL repositories
pub fn contact_router(
    messages: PgContactRepository,
    sessions: accounts::PgAccountsRepository,
    config: AccountsConfig,
) -> Router {
    contact_router_generic(messages, sessions, config)
}

/// Create a generic contact router for any repository implementation
pub fn contact_router_generic<C, S>(messages: C, sessions: S, config: AccountsConfig) -> Router
where
    C: ContactRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let state = ContactState {
        messages: Arc::new(messages),
        sessions: Arc::new(sessions),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/contact",
            get(show_contact_form::<C, S>).post(process_contact_form::<C, S>),
        )
        .route("/contact/responses", get(show_contact_responses::<C, S>))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /contact
pub async fn show_contact_form<C, S>(
    State(state): State<ContactState<C, S>>,
    headers: HeaderMap,
) -> Response
where
    C: ContactRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.sessions.clone(), state.config.clone());
    let (user, flash) = page_context(&gate, &headers).await;

    Html(contact_page(user.as_ref(), flash.as_ref())).into_response()
}

/// POST /contact
pub async fn process_contact_form<C, S>(
    State(state): State<ContactState<C, S>>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Response
where
    C: ContactRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.sessions.clone(), state.config.clone());

    let (subject, message) = match form.validate() {
        Ok(fields) => fields,
        Err(e) => {
            return accounts::handlers::flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error(e.to_string()),
                "/contact",
            )
            .await;
        }
    };

    match state.messages.save(&subject, &message).await {
        Ok(saved) => {
            tracing::info!(message_id = %saved.id, "Contact form saved");
            accounts::handlers::flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::success("Your message has been sent successfully!"),
                "/contact",
            )
            .await
        }
        Err(e) => {
            e.log();
            accounts::handlers::flash_redirect(
                &gate,
                &headers,
                &state.config,
                Flash::error("Failed to save contact form."),
                "/contact",
            )
            .await
        }
    }
}

/// GET /contact/responses
pub async fn show_contact_responses<C, S>(
    State(state): State<ContactState<C, S>>,
    headers: HeaderMap,
) -> Response
where
    C: ContactRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.sessions.clone(), state.config.clone());
    let (user, flash) = page_context(&gate, &headers).await;

    let messages = match state.messages.list_all().await {
        Ok(messages) => messages,
        Err(e) => {
            e.log();
            Vec::new()
        }
    };

    Html(responses_page(&messages, user.as_ref(), flash.as_ref())).into_response()
}

async fn page_context<S>(
    gate: &SessionGate<S>,
    headers: &HeaderMap,
) -> (Option<UserSnapshot>, Option<Flash>)
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    match gate.resolve(headers).await {
        Ok(Some(mut session)) => {
            let flash = gate.take_flash(&mut session).await.ok().flatten();
            (session.user.clone(), flash)
        }
        Ok(None) => (None, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve session");
            (None, None)
        }
    }
}

// ============================================================================
// Views
// ============================================================================

fn contact_page(user: Option<&UserSnapshot>, flash: Option<&Flash>) -> String {
    let body = "<h1>Contact Us</h1>\n\
        <form method=\"post\" action=\"/contact\">\n\
        <label>Subject <input type=\"text\" name=\"subject\"></label>\n\
        <label>Message <textarea name=\"message\"></textarea></label>\n\
        <button type=\"submit\">Send</button>\n\
        </form>";
    layout("Contact Us", user, flash, body)
}

fn responses_page(
    messages: &[ContactMessage],
    user: Option<&UserSnapshot>,
    flash: Option<&Flash>,
) -> String {
    let mut items = String::new();
    for m in messages {
        items.push_str(&format!(
            "<li><strong>{subject}</strong> ({when})<br>{message}</li>\n",
            subject = html_escape(&m.subject),
            when = m.created_at.format("%Y-%m-%d %H:%M"),
            message = html_escape(&m.message),
        ));
    }

    let body = format!(
        "<h1>Contact Form Submissions</h1>\n<ul>\n{items}</ul>",
        items = items
    );
    layout("Contact Form Submissions", user, flash, &body)
}
