//! Sign-in, sign-out and password recovery pages.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use serde::Deserialize;
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::forms::auth::{ForgotPasswordForm, LoginForm};
use crate::forms::parse_form;
use crate::guard::{login_location, safe_next};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{public_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};
use crate::session::AdminSession;

#[derive(Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

#[get("/login")]
pub async fn login_page(
    session: Option<AdminSession>,
    query: web::Query<LoginQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if session.is_some() {
        return redirect(&safe_next(query.next.as_deref()));
    }
    let mut context = public_context(&flash_messages, "login");
    context.insert("next", &query.next);
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    body: web::Bytes,
    backend: web::Data<HttpBackend>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let form: LoginForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/login");
        }
    };
    let retry = login_location(&safe_next(form.next.as_deref()));

    let signed_in = match auth_service::login(backend.get_ref(), form, Utc::now()).await {
        Ok(signed_in) => signed_in,
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(&retry);
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error(err.user_message()).send();
            return redirect(&retry);
        }
    };

    let jwt = match signed_in.session.encode(&server_config.secret) {
        Ok(jwt) => jwt,
        Err(err) => {
            log::error!("Failed to sign the session: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if let Err(err) = Identity::login(&req.extensions(), jwt) {
        log::error!("Failed to store the identity: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    FlashMessage::success(format!("{} عزیز، خوش آمدید", signed_in.session.user.name)).send();
    redirect(&signed_in.next)
}

#[post("/logout")]
pub async fn logout(
    identity: Option<Identity>,
    session: Option<AdminSession>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    auth_service::logout(repo.get_ref(), session.as_ref());
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/login")
}

#[get("/auth/forgot-password")]
pub async fn forgot_password_page(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = public_context(&flash_messages, "forgot_password");
    render_template(&tera, "auth/forgot_password.html", &context)
}

#[post("/auth/forgot-password")]
pub async fn forgot_password(body: web::Bytes, backend: web::Data<HttpBackend>) -> impl Responder {
    let form: ForgotPasswordForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/auth/forgot-password");
        }
    };
    match auth_service::forgot_password(backend.get_ref(), form).await {
        Ok(()) => {
            FlashMessage::success("لینک بازیابی رمز عبور به ایمیل شما ارسال شد").send();
            redirect("/login")
        }
        Err(err) => {
            FlashMessage::error(err.user_message()).send();
            redirect("/auth/forgot-password")
        }
    }
}
