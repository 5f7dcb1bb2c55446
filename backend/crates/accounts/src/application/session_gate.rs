//! Session Gate
//!
//! The single entry point for everything session-shaped: resolving the
//! cookie token on a request, opening sessions, swapping in a fresh
//! session at login, destroying it at logout, and queueing/consuming
//! flash messages.
//!
//! The cookie value is `"{session_id}.{signature}"` where the signature
//! is HMAC-SHA256 over the uuid text under the application secret,
//! base64url-encoded. A bad signature is an absent session, not an error.

use std::sync::Arc;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::application::config::AccountsConfig;
use crate::domain::entity::session::{Flash, Session, UserSnapshot};
use crate::domain::repository::SessionRepository;
use crate::error::AccountsResult;

/// Sign a session id into a cookie token.
pub fn sign_session_token(secret: &[u8; 32], session_id: Uuid) -> String {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let session_id = session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Parse and verify a cookie token back into a session id.
///
/// Returns `None` for any malformed, truncated, or tampered token.
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> Option<Uuid> {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let (session_id_str, signature_b64) = token.split_once('.')?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    mac.verify_slice(&signature).ok()?;

    session_id_str.parse().ok()
}

/// Session gate service
pub struct SessionGate<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    sessions: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<S> SessionGate<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self { sessions, config }
    }

    /// Resolve the request's session, if a valid one is referenced.
    ///
    /// Expired rows are deleted on sight. Last-activity is bumped in the
    /// background; the write touches only the activity column, so it
    /// cannot race a flash consumption.
    pub async fn resolve(&self, headers: &HeaderMap) -> AccountsResult<Option<Session>> {
        let Some(token) =
            platform::cookie::extract_cookie(headers, &self.config.session_cookie_name)
        else {
            return Ok(None);
        };

        let Some(session_id) = parse_session_token(&self.config.session_secret, &token) else {
            return Ok(None);
        };

        let Some(mut session) = self.sessions.find_session(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            self.sessions.delete_session(session_id).await?;
            return Ok(None);
        }

        session.touch();

        let repo = self.sessions.clone();
        let last_activity_at = session.last_activity_at;
        tokio::spawn(async move {
            if let Err(e) = repo.touch_session(session_id, last_activity_at).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(Some(session))
    }

    /// Open a new session row and return it with its signed cookie token.
    pub async fn open(
        &self,
        user: Option<UserSnapshot>,
        flash: Option<Flash>,
    ) -> AccountsResult<(Session, String)> {
        let session = Session::new(user, flash, self.config.session_ttl_chrono());
        self.sessions.create_session(&session).await?;

        let token = sign_session_token(&self.config.session_secret, session.session_id);
        Ok((session, token))
    }

    /// Establish an authenticated session at login.
    ///
    /// Any session the request already carried is discarded and a fresh
    /// row (and therefore a fresh token) is issued with the snapshot.
    pub async fn login(
        &self,
        headers: &HeaderMap,
        snapshot: UserSnapshot,
    ) -> AccountsResult<String> {
        if let Some(previous) = self.resolve(headers).await? {
            self.sessions.delete_session(previous.session_id).await?;
        }

        let (session, token) = self.open(Some(snapshot), None).await?;

        tracing::info!(session_id = %session.session_id, "Session established");
        Ok(token)
    }

    /// Destroy the request's session, if any.
    pub async fn logout(&self, headers: &HeaderMap) -> AccountsResult<()> {
        if let Some(session) = self.resolve(headers).await? {
            self.sessions.delete_session(session.session_id).await?;
            tracing::info!(session_id = %session.session_id, "Session destroyed");
        }
        Ok(())
    }

    /// Queue a flash message for the next rendered page.
    ///
    /// Reuses the request's session when there is one; otherwise opens an
    /// anonymous session to carry the message and returns the token the
    /// response must set as a cookie.
    pub async fn queue_flash(
        &self,
        headers: &HeaderMap,
        flash: Flash,
    ) -> AccountsResult<Option<String>> {
        match self.resolve(headers).await? {
            Some(mut session) => {
                session.set_flash(flash);
                self.sessions.update_session(&session).await?;
                Ok(None)
            }
            None => {
                let (_, token) = self.open(None, Some(flash)).await?;
                Ok(Some(token))
            }
        }
    }

    /// Consume the session's pending flash message, persisting its
    /// removal so it renders exactly once.
    pub async fn take_flash(&self, session: &mut Session) -> AccountsResult<Option<Flash>> {
        let flash = session.take_flash();
        if flash.is_some() {
            self.sessions.update_session(session).await?;
        }
        Ok(flash)
    }

    /// Persist a refreshed snapshot after a self-edit.
    pub async fn refresh_user(
        &self,
        session: &mut Session,
        user: &crate::domain::entity::user::User,
    ) -> AccountsResult<()> {
        session.refresh_snapshot(user);
        self.sessions.update_session(session).await
    }
}
