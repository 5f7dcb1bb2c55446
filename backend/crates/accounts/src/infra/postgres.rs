//! PostgreSQL Repository Implementations
//!
//! Every query binds its parameters; nothing is interpolated into SQL
//! text. Email comparisons go through `LOWER(...)` so lookups and the
//! uniqueness pre-check are case-insensitive even against rows written
//! before emails were canonicalized.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::session::{Flash, FlashKind, Session, UserSnapshot};
use crate::domain::entity::user::User;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::StoredPassword, user_role::UserRole,
};
use crate::error::{AccountsError, AccountsResult};
use kernel::id::{Id, UserId};

/// PostgreSQL-backed accounts repository
#[derive(Clone)]
pub struct PgAccountsRepository {
    pool: PgPool,
}

impl PgAccountsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove expired session rows (startup sweep).
    pub async fn sweep_expired_sessions(&self) -> AccountsResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAccountsRepository {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> AccountsResult<Option<(User, StoredPassword)>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                users.id,
                users.name,
                users.email,
                users.password_hash,
                roles.role_name,
                users.created_at,
                users.updated_at
            FROM users
            INNER JOIN roles ON users.role_id = roles.id
            WHERE LOWER(users.email) = $1
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user_and_hash()).transpose()
    }

    async fn email_exists(&self, email: &Email) -> AccountsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(
        &self,
        name: &PersonName,
        email: &Email,
        password_hash: &StoredPassword,
    ) -> AccountsResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role_id, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(email.as_str())
        .bind(password_hash.as_str())
        .bind(UserRole::default().id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The unique index on LOWER(email) is the authoritative
            // uniqueness signal; a violation means a concurrent
            // registration won the race.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AccountsError::EmailTaken(email.to_string())
            }
            _ => AccountsError::Database(e),
        })?;

        row.into_user()
    }

    async fn list_all(&self) -> AccountsResult<Vec<User>> {
        let rows = sqlx::query_as::<_, JoinedUserRow>(
            r#"
            SELECT
                users.id,
                users.name,
                users.email,
                roles.role_name,
                users.created_at,
                users.updated_at
            FROM users
            INNER JOIN roles ON users.role_id = roles.id
            ORDER BY users.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn find_by_id(&self, id: UserId) -> AccountsResult<Option<User>> {
        let row = sqlx::query_as::<_, JoinedUserRow>(
            r#"
            SELECT
                users.id,
                users.name,
                users.email,
                roles.role_name,
                users.created_at,
                users.updated_at
            FROM users
            INNER JOIN roles ON users.role_id = roles.id
            WHERE users.id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update(
        &self,
        id: UserId,
        name: &PersonName,
        email: &Email,
    ) -> AccountsResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, role_id, created_at, updated_at
            "#,
        )
        .bind(id.as_i64())
        .bind(name.as_str())
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AccountsError::EmailTaken(email.to_string())
            }
            _ => AccountsError::Database(e),
        })?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn delete(&self, id: UserId) -> AccountsResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAccountsRepository {
    async fn create_session(&self, session: &Session) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                user_name,
                user_email,
                user_role,
                flash_kind,
                flash_text,
                expires_at_ms,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user.as_ref().map(|u| u.id.as_i64()))
        .bind(session.user.as_ref().map(|u| u.name.as_str()))
        .bind(session.user.as_ref().map(|u| u.email.as_str()))
        .bind(session.user.as_ref().map(|u| u.role.id()))
        .bind(session.flash.as_ref().map(|f| f.kind.id()))
        .bind(session.flash.as_ref().map(|f| f.text.as_str()))
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AccountsResult<Option<Session>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                user_name,
                user_email,
                user_role,
                flash_kind,
                flash_text,
                expires_at_ms,
                created_at,
                last_activity_at
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn update_session(&self, session: &Session) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                user_id = $2,
                user_name = $3,
                user_email = $4,
                user_role = $5,
                flash_kind = $6,
                flash_text = $7,
                last_activity_at = $8
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.user.as_ref().map(|u| u.id.as_i64()))
        .bind(session.user.as_ref().map(|u| u.name.as_str()))
        .bind(session.user.as_ref().map(|u| u.email.as_str()))
        .bind(session.user.as_ref().map(|u| u.role.id()))
        .bind(session.flash.as_ref().map(|f| f.kind.id()))
        .bind(session.flash.as_ref().map(|f| f.text.as_str()))
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn touch_session(
        &self,
        session_id: Uuid,
        last_activity_at: DateTime<Utc>,
    ) -> AccountsResult<()> {
        sqlx::query("UPDATE sessions SET last_activity_at = $2 WHERE session_id = $1")
            .bind(session_id)
            .bind(last_activity_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> AccountsResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountsResult<u64> {
        self.sweep_expired_sessions().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role_id: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountsResult<User> {
        let role = UserRole::from_id(self.role_id)
            .ok_or_else(|| AccountsError::Internal(format!("Invalid role id: {}", self.role_id)))?;

        Ok(User {
            id: Id::from_i64(self.id),
            name: PersonName::from_db(self.name),
            email: Email::from_db(self.email),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct JoinedUserRow {
    id: i64,
    name: String,
    email: String,
    role_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JoinedUserRow {
    fn into_user(self) -> AccountsResult<User> {
        let role = UserRole::from_code(&self.role_name).ok_or_else(|| {
            AccountsError::Internal(format!("Invalid role name: {}", self.role_name))
        })?;

        Ok(User {
            id: Id::from_i64(self.id),
            name: PersonName::from_db(self.name),
            email: Email::from_db(self.email),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_user_and_hash(self) -> AccountsResult<(User, StoredPassword)> {
        let role = UserRole::from_code(&self.role_name).ok_or_else(|| {
            AccountsError::Internal(format!("Invalid role name: {}", self.role_name))
        })?;

        let user = User {
            id: Id::from_i64(self.id),
            name: PersonName::from_db(self.name),
            email: Email::from_db(self.email),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        Ok((user, StoredPassword::from_db(self.password_hash)))
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Option<i64>,
    user_name: Option<String>,
    user_email: Option<String>,
    user_role: Option<i16>,
    flash_kind: Option<i16>,
    flash_text: Option<String>,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AccountsResult<Session> {
        let user = match (self.user_id, self.user_name, self.user_email, self.user_role) {
            (Some(id), Some(name), Some(email), Some(role_id)) => {
                let role = UserRole::from_id(role_id).ok_or_else(|| {
                    AccountsError::Internal(format!("Invalid role id: {}", role_id))
                })?;
                Some(UserSnapshot {
                    id: Id::from_i64(id),
                    name,
                    email: Email::from_db(email),
                    role,
                })
            }
            (None, _, _, _) => None,
            _ => {
                return Err(AccountsError::Internal(format!(
                    "Incomplete user snapshot in session {}",
                    self.session_id
                )));
            }
        };

        let flash = match (self.flash_kind, self.flash_text) {
            (Some(kind_id), Some(text)) => {
                let kind = FlashKind::from_id(kind_id).ok_or_else(|| {
                    AccountsError::Internal(format!("Invalid flash kind: {}", kind_id))
                })?;
                Some(Flash { kind, text })
            }
            _ => None,
        };

        Ok(Session {
            session_id: self.session_id,
            user,
            flash,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}
