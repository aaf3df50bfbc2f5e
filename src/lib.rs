use std::time::Duration;

use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::config::PersistentSession;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::api::toast::ErrorToastThrottle;
use crate::db::{establish_connection_pool, run_migrations};
use crate::middleware::RouteGuard;
use crate::models::config::ServerConfig;
use crate::repository::{DieselRepository, StoreWriter};
use crate::routes::auth::{forgot_password, forgot_password_page, login, login_page, logout};
use crate::routes::export::{download_export, show_export};
use crate::routes::main::{dashboard, statistics, support_tickets};
use crate::routes::not_found;
use crate::routes::resources::{
    bulk_action, confirm_delete, create_record, delete_record, edit_record, feature_record,
    generate_licenses, list_resource, new_record, review_record, show_record, ticket_reply,
    ticket_status, toggle_active, update_record, withdrawal_status,
};
use crate::routes::settings::{reset_settings, save_settings, save_theme, show_settings};
use crate::session::REMEMBER_ME_DAYS;

pub mod api;
pub mod controller;
pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod export;
pub mod forms;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod session;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite store.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;
    let applied = run_migrations(&pool).map_err(std::io::Error::other)?;
    log::info!("Applied {applied} pending migrations");

    let repo = DieselRepository::new(pool);
    match repo.purge_expired() {
        Ok(purged) => log::info!("Purged {purged} expired store entries"),
        Err(err) => log::error!("Failed to purge expired store entries: {err}"),
    }

    let throttle = web::Data::new(ErrorToastThrottle::new(Duration::from_secs(
        server_config.error_toast_cooldown_secs,
    )));

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving the admin panel on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.api_base_url
    );

    HttpServer::new(move || {
        // awc clients are per worker.
        let backend = HttpBackend::new(
            &server_config.api_base_url,
            Duration::from_secs(server_config.request_timeout_secs),
        );

        App::new()
            .wrap(RouteGuard::new(server_config.secret.clone()))
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .session_lifecycle(PersistentSession::default().session_ttl(
                        actix_web::cookie::time::Duration::days(REMEMBER_ME_DAYS),
                    ))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(login_page)
            .service(login)
            .service(logout)
            .service(forgot_password_page)
            .service(forgot_password)
            .service(dashboard)
            .service(statistics)
            .service(support_tickets)
            .service(show_export)
            .service(download_export)
            .service(show_settings)
            .service(reset_settings)
            .service(save_theme)
            .service(save_settings)
            .service(generate_licenses)
            .service(withdrawal_status)
            .service(ticket_status)
            .service(ticket_reply)
            .service(bulk_action)
            .service(new_record)
            .service(create_record)
            .service(edit_record)
            .service(update_record)
            .service(confirm_delete)
            .service(delete_record)
            .service(toggle_active)
            .service(review_record)
            .service(feature_record)
            .service(show_record)
            .service(list_resource)
            .default_service(web::to(not_found))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(backend))
            .app_data(throttle.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
