use std::time::Duration;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::Service;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpMessage, HttpResponse, HttpServer, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use chrono::Utc;
use serde_json::json;
use tera::Tera;

use asll_admin::api::http::HttpBackend;
use asll_admin::api::toast::ErrorToastThrottle;
use asll_admin::domain::auth::AdminUser;
use asll_admin::models::config::ServerConfig;
use asll_admin::repository::DieselRepository;
use asll_admin::routes::resources::{list_resource, new_record};
use asll_admin::routes::{alert_level_to_str, current_target, not_found, redirect};
use asll_admin::session::AdminSession;

mod common;

const SECRET: &str = "routes-test-secret-routes-test-secret-routes-test-secret-0000001";

fn session() -> AdminSession {
    let user = AdminUser {
        id: "7".to_string(),
        name: "Sara".to_string(),
        email: "sara@asll.ir".to_string(),
        username: "sara".to_string(),
        role: "super_admin".to_string(),
        permissions: vec!["all".to_string()],
    };
    AdminSession::new(user, "backend-token".into(), false, Utc::now())
}

fn server_config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        api_base_url: api_base_url.to_string(),
        request_timeout_secs: 5,
        items_per_page: 10,
        error_toast_cooldown_secs: 35,
        store_ttl_secs: 3600,
    }
}

/// Serves a one-user list under `/admin/users` on an ephemeral port.
fn stub_backend() -> String {
    let server = HttpServer::new(|| {
        App::new().route(
            "/admin/users",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!({
                    "data": {"users": [{"id": 1, "name": "Ali Karimi"}], "total": 1}
                }))
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("should bind the stub backend");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// Resource routes with a signed-in administrator already in the request.
macro_rules! resource_app {
    ($db:expr, $api:expr) => {{
        let config = server_config($api);
        let key = Key::from(SECRET.as_bytes());
        let flash = FlashMessagesFramework::builder(
            CookieMessageStore::builder(key.clone()).build(),
        )
        .build();
        test::init_service(
            App::new()
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(session());
                    srv.call(req)
                })
                .wrap(flash)
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new(
                    Tera::new(&config.templates_dir).expect("templates should parse"),
                ))
                .app_data(web::Data::new(HttpBackend::new(
                    &config.api_base_url,
                    Duration::from_secs(config.request_timeout_secs),
                )))
                .app_data(web::Data::new(DieselRepository::new($db.pool())))
                .app_data(web::Data::new(ErrorToastThrottle::new(Duration::from_secs(
                    config.error_toast_cooldown_secs,
                ))))
                .app_data(web::Data::new(config))
                .service(new_record)
                .service(list_resource)
                .default_service(web::to(not_found)),
        )
        .await
    }};
}

async fn body_text<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("pages should be utf-8")
}

#[::core::prelude::v1::test]
fn flash_levels_map_to_bootstrap_alerts() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[::core::prelude::v1::test]
fn redirect_points_at_the_location() {
    let resp = redirect("/users?page=2");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/users?page=2");
}

#[::core::prelude::v1::test]
fn current_target_keeps_the_query_string() {
    let req = test::TestRequest::get().uri("/users?status=banned&page=2").to_http_request();
    assert_eq!(current_target(&req), "/users?status=banned&page=2");

    let req = test::TestRequest::get().uri("/sliders").to_http_request();
    assert_eq!(current_target(&req), "/sliders");
}

#[actix_web::test]
async fn unknown_resource_renders_not_found() {
    let db = common::TestDb::new("test_unknown_resource_renders_not_found.db");
    let app = resource_app!(db, "http://127.0.0.1:9");

    let req = test::TestRequest::get().uri("/warehouses").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("۴۰۴"));
}

#[actix_web::test]
async fn slider_form_renders_for_new_records() {
    let db = common::TestDb::new("test_slider_form_renders_for_new_records.db");
    let app = resource_app!(db, "http://127.0.0.1:9");

    let req = test::TestRequest::get().uri("/sliders/new").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("name=\"image_url\""));
    assert!(body.contains("action=\"/sliders/new\""));
}

#[actix_web::test]
async fn read_only_resource_has_no_create_form() {
    let db = common::TestDb::new("test_read_only_resource_has_no_create_form.db");
    let app = resource_app!(db, "http://127.0.0.1:9");

    let req = test::TestRequest::get().uri("/withdrawals/new").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn huge_page_number_still_renders_the_list() {
    let db = common::TestDb::new("test_huge_page_number_still_renders_the_list.db");
    let api = stub_backend();
    let app = resource_app!(db, &api);

    let req = test::TestRequest::get()
        .uri("/users?page=9999999999999999999&per_page=10")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Ali Karimi"));
}
