//! Unit tests for the accounts crate

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = AccountsConfig::default();

        assert_eq!(config.session_cookie_name, "campus_session");
        assert_eq!(config.session_ttl, Duration::from_secs(24 * 3600));
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, SameSite::Lax);
        assert!(config.password_pepper.is_none());
    }

    #[test]
    fn test_with_random_secret() {
        let config1 = AccountsConfig::with_random_secret();
        let config2 = AccountsConfig::with_random_secret();

        assert_ne!(config1.session_secret, config2.session_secret);
        assert!(config1.session_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_development_config() {
        let config = AccountsConfig::development();

        assert!(!config.cookie_secure);
        assert!(config.session_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_cookie_settings_follow_config() {
        let config = AccountsConfig::development();
        let cookie = config.cookie();

        assert_eq!(cookie.name, "campus_session");
        assert!(!cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.max_age_secs, Some(24 * 3600));
    }
}

#[cfg(test)]
mod token_tests {
    use crate::application::session_gate::{parse_session_token, sign_session_token};
    use uuid::Uuid;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_token_roundtrip() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);

        assert_eq!(parse_session_token(&SECRET, &token), Some(session_id));
    }

    #[test]
    fn test_token_shape() {
        let token = sign_session_token(&SECRET, Uuid::nil());
        let (id_part, sig_part) = token.split_once('.').unwrap();

        assert_eq!(id_part, Uuid::nil().to_string());
        assert!(!sig_part.is_empty());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);

        // Swap the session id while keeping the signature
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);
        assert_eq!(parse_session_token(&SECRET, &forged), None);

        // Corrupt the signature
        let mut corrupted = token.clone();
        corrupted.pop();
        assert_eq!(parse_session_token(&SECRET, &corrupted), None);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session_id = Uuid::new_v4();
        let token = sign_session_token(&SECRET, session_id);

        let other_secret = [8u8; 32];
        assert_eq!(parse_session_token(&other_secret, &token), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(parse_session_token(&SECRET, ""), None);
        assert_eq!(parse_session_token(&SECRET, "no-dot-here"), None);
        assert_eq!(parse_session_token(&SECRET, "a.b.c"), None);
        assert_eq!(parse_session_token(&SECRET, "not-a-uuid.!!!"), None);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_error_status_codes() {
        let cases: Vec<(AccountsError, StatusCode)> = vec![
            (
                AccountsError::Validation("bad input".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AccountsError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AccountsError::EmailTaken("a@x.com".into()),
                StatusCode::CONFLICT,
            ),
            (AccountsError::UserNotFound, StatusCode::NOT_FOUND),
            (AccountsError::NotAuthorized, StatusCode::FORBIDDEN),
            (AccountsError::SelfDeletion, StatusCode::FORBIDDEN),
            (AccountsError::SessionInvalid, StatusCode::UNAUTHORIZED),
            (
                AccountsError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_store_failures_are_generic() {
        let error = AccountsError::Hash("argon2 parameter error".into());
        assert!(error.is_store_failure());
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        // The user-facing message must not carry the primitive's detail
        let app_error = AccountsError::Internal("pool exhausted".into());
        assert!(app_error.is_store_failure());
    }

    #[test]
    fn test_credential_errors_are_generic() {
        // Unknown email and wrong password must be indistinguishable
        let message = AccountsError::InvalidCredentials.to_string();
        assert_eq!(message, "Invalid email or password");
        assert!(!message.to_lowercase().contains("exist"));
    }
}
