//! Sign-in, sign-out and password recovery.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::calls;
use crate::api::envelope::extract_record;
use crate::api::errors::ApiError;
use crate::api::AdminBackend;
use crate::domain::auth::{AdminUser, credentials_payload};
use crate::domain::resource::Resource;
use crate::domain::types::EmailAddress;
use crate::forms::auth::{ForgotPasswordForm, LoginForm, LoginPayload};
use crate::guard::safe_next;
use crate::normalize::Raw;
use crate::repository::StoreWriter;
use crate::services::lists::invalidate_snapshot;
use crate::services::{ServiceError, ServiceResult};
use crate::session::AdminSession;

const BAD_CREDENTIALS: &str = "نام کاربری یا رمز عبور اشتباه است";

/// Session to store in the identity cookie and where to go next.
#[derive(Debug)]
pub struct SignedIn {
    pub session: AdminSession,
    pub next: String,
}

fn token_of(body: &Value) -> Option<String> {
    Raw::new(body).text(&[
        "token",
        "access_token",
        "data.token",
        "data.access_token",
    ])
}

/// Exchanges credentials for a backend token and the administrator profile.
pub async fn login<B>(backend: &B, form: LoginForm, now: DateTime<Utc>) -> ServiceResult<SignedIn>
where
    B: AdminBackend + ?Sized,
{
    let payload = LoginPayload::try_from(form)?;
    let credentials = credentials_payload(&payload.identifier, &payload.password);

    let body = backend
        .send(calls::login(credentials))
        .await
        .map_err(|err| match err {
            ApiError::Unauthorized(_) | ApiError::Rejected { .. } | ApiError::NotFound(_) => {
                log::warn!("Rejected sign-in for {}: {err}", payload.identifier);
                ServiceError::Form(BAD_CREDENTIALS.to_string())
            }
            err => {
                log::error!("Failed to sign in: {err}");
                ServiceError::Api(err)
            }
        })?;

    let token = token_of(&body).ok_or_else(|| {
        log::error!("Sign-in response carried no token");
        ServiceError::Internal("missing token in login response".to_string())
    })?;
    let profile = extract_record(&body, &["user", "admin", "web_admin"]);
    let user = AdminUser::from_backend(Raw::new(&profile));
    log::info!("Administrator {} signed in", user.id);

    Ok(SignedIn {
        session: AdminSession::new(user, token, payload.remember_me, now),
        next: safe_next(payload.next.as_deref()),
    })
}

/// Drops the cached list pages so the next administrator starts clean.
pub fn logout<R>(repo: &R, session: Option<&AdminSession>)
where
    R: StoreWriter + ?Sized,
{
    for resource in Resource::ALL {
        invalidate_snapshot(repo, resource);
    }
    if let Some(session) = session {
        log::info!("Administrator {} signed out", session.user.id);
    }
}

/// Asks the backend to mail a reset link.
pub async fn forgot_password<B>(backend: &B, form: ForgotPasswordForm) -> ServiceResult<()>
where
    B: AdminBackend + ?Sized,
{
    let email = EmailAddress::try_from(form)?;
    backend
        .send(calls::forgot_password(email.as_str()))
        .await
        .map_err(|err| {
            log::error!("Failed to request a password reset: {err}");
            ServiceError::from(err)
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiMethod;
    use crate::api::memory::MemoryBackend;

    fn form(username: &str, next: Option<&str>) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: "secret1".to_string(),
            remember_me: Some("on".to_string()),
            next: next.map(str::to_string),
        }
    }

    #[actix_web::test]
    async fn login_builds_session_from_token_and_profile() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Post,
            "/auth/login",
            Ok(json!({"data": {"token": "abc", "user": {"id": 3, "name": "Sara", "role": "admin", "permissions": ["users.view"]}}})),
        );

        let signed_in = login(&backend, form("sara@asll.ir", Some("/users?page=2")), Utc::now())
            .await
            .expect("should sign in");

        assert_eq!(signed_in.session.token, "abc");
        assert_eq!(signed_in.session.user.id, "3");
        assert!(signed_in.session.remember_me);
        assert_eq!(signed_in.next, "/users?page=2");
        let body = backend.calls()[0].body.clone().expect("body");
        assert_eq!(body["email"], "sara@asll.ir");
    }

    #[actix_web::test]
    async fn wrong_credentials_become_a_form_error() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Post,
            "/auth/login",
            Err(ApiError::Unauthorized("invalid".into())),
        );

        let result = login(&backend, form("09120000000", None), Utc::now()).await;

        assert!(matches!(result, Err(ServiceError::Form(ref message)) if message == BAD_CREDENTIALS));
    }

    #[actix_web::test]
    async fn foreign_next_is_replaced_with_home() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Post,
            "/auth/login",
            Ok(json!({"token": "t", "user": {"id": 1}})),
        );

        let signed_in = login(&backend, form("admin", Some("https://evil.example")), Utc::now())
            .await
            .expect("should sign in");

        assert_eq!(signed_in.next, "/");
    }

    #[actix_web::test]
    async fn missing_token_is_an_internal_error() {
        let backend = MemoryBackend::new();
        backend.respond(ApiMethod::Post, "/auth/login", Ok(json!({"user": {"id": 1}})));

        let result = login(&backend, form("admin", None), Utc::now()).await;

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[actix_web::test]
    async fn forgot_password_posts_email() {
        let backend = MemoryBackend::new();
        backend.respond(ApiMethod::Post, "/auth/forgot-password", Ok(json!({})));

        forgot_password(
            &backend,
            ForgotPasswordForm {
                email: "admin@asll.ir".to_string(),
            },
        )
        .await
        .expect("should request a reset");

        assert_eq!(
            backend.calls()[0].body,
            Some(json!({"email": "admin@asll.ir"}))
        );
    }
}
