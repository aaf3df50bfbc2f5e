//! HTTP handlers and the helpers they share.

use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::api::http::HttpBackend;
use crate::domain::settings::Theme;
use crate::dto::pages::NavLink;
use crate::guard::login_location;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;
use crate::services::lists::ListSettings;
use crate::session::AdminSession;

pub mod auth;
pub mod export;
pub mod main;
pub mod resources;
pub mod settings;

/// Bootstrap alert class for a flash level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn alerts(flash_messages: &IncomingFlashMessages) -> Vec<(&str, &'static str)> {
    flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect()
}

/// Context shared by every page rendered for a signed-in administrator.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    session: &AdminSession,
    current_page: &str,
    theme: Theme,
) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &alerts(flash_messages));
    context.insert("current_user", &session.user);
    context.insert("current_page", current_page);
    context.insert("theme", theme.as_str());
    context.insert("nav", &NavLink::for_user(&session.user, current_page));
    context
}

/// Context of the sign-in pages.
pub fn public_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let mut context = Context::new();
    context.insert("alerts", &alerts(flash_messages));
    context.insert("current_page", current_page);
    context.insert("theme", Theme::default().as_str());
    context
}

/// Backend client carrying the session's bearer token.
pub fn backend_for(backend: &HttpBackend, session: &AdminSession) -> HttpBackend {
    backend.with_token(&session.token)
}

pub fn list_settings(config: &ServerConfig) -> ListSettings {
    ListSettings {
        per_page: config.items_per_page,
        snapshot_ttl: chrono::Duration::seconds(config.store_ttl_secs),
    }
}

/// Path and query of the request, used as the post-login destination.
pub fn current_target(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{query}", req.path()),
    }
}

/// Turns a failed action into a flash message and a redirect.
///
/// A token the backend no longer accepts ends the session and sends the
/// administrator to the login page, back to `target` afterwards.
pub fn handle_service_error(
    err: ServiceError,
    identity: Option<Identity>,
    fallback: &str,
    target: &str,
) -> HttpResponse {
    if err.is_session_expired() {
        log::info!("Backend rejected the session token, signing out");
        if let Some(identity) = identity {
            identity.logout();
        }
        FlashMessage::warning("نشست شما منقضی شده است. لطفا دوباره وارد شوید.").send();
        return redirect(&login_location(target));
    }
    match &err {
        ServiceError::Form(_) | ServiceError::NotFound | ServiceError::TypeConstraint(_) => {
            log::warn!("Request rejected: {err}");
        }
        _ => log::error!("Request failed: {err}"),
    }
    FlashMessage::error(err.user_message()).send();
    redirect(fallback)
}

pub async fn not_found(
    tera: actix_web::web::Data<Tera>,
    flash_messages: IncomingFlashMessages,
) -> HttpResponse {
    let context = public_context(&flash_messages, "not_found");
    match tera.render("errors/404.html", &context) {
        Ok(body) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render the 404 page: {err:?}");
            HttpResponse::NotFound().finish()
        }
    }
}
