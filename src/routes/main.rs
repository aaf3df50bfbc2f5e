//! Dashboard, statistics and the support desk.

use actix_identity::Identity;
use actix_web::{HttpRequest, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::api::toast::ErrorToastThrottle;
use crate::domain::ticket::Ticket;
use crate::dto::list::ListView;
use crate::dto::pages::{DashboardPage, StatisticsPage};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    backend_for, base_context, current_target, handle_service_error, list_settings,
    render_template,
};
use crate::services::dashboard::{load_stats, synthesize_chart};
use crate::services::lists::load_list_page;
use crate::services::settings::load_theme;
use crate::session::AdminSession;

#[get("/")]
pub async fn dashboard(
    req: HttpRequest,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    throttle: web::Data<ErrorToastThrottle>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let backend = backend_for(&backend, &session);
    let load = match load_stats(&backend, &throttle.scoped(session.user.id.as_str())).await {
        Ok(load) => load,
        Err(err) => return handle_service_error(err, identity, "/", &current_target(&req)),
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        "dashboard",
        load_theme(repo.get_ref()),
    );
    context.insert("page", &DashboardPage::new(load.stats, &session.user));
    context.insert("load_error", &load.error);
    render_template(&tera, "main/dashboard.html", &context)
}

#[get("/statistics")]
pub async fn statistics(
    req: HttpRequest,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    throttle: web::Data<ErrorToastThrottle>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let backend = backend_for(&backend, &session);
    let load = match load_stats(&backend, &throttle.scoped(session.user.id.as_str())).await {
        Ok(load) => load,
        Err(err) => return handle_service_error(err, identity, "/", &current_target(&req)),
    };
    let chart = synthesize_chart(&mut rand::rng());

    let mut context = base_context(
        &flash_messages,
        &session,
        "statistics",
        load_theme(repo.get_ref()),
    );
    context.insert("page", &StatisticsPage::new(load.stats, chart));
    context.insert("load_error", &load.error);
    render_template(&tera, "main/statistics.html", &context)
}

/// Ticket queue for moderators and support admins.
#[get("/support/tickets")]
pub async fn support_tickets(
    req: HttpRequest,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    throttle: web::Data<ErrorToastThrottle>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let backend = backend_for(&backend, &session);
    let data = match load_list_page::<Ticket, _, _>(
        &backend,
        repo.get_ref(),
        &throttle.scoped(session.user.id.as_str()),
        req.query_string(),
        list_settings(&server_config),
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return handle_service_error(err, identity, "/", &current_target(&req)),
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        "support/tickets",
        load_theme(repo.get_ref()),
    );
    context.insert("list", &ListView::build(&data));
    context.insert("load_error", &data.error);
    render_template(&tera, "main/support.html", &context)
}
