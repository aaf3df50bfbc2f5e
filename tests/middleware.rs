use actix_identity::{Identity, IdentityMiddleware};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{
    App, HttpMessage, HttpRequest, HttpResponse,
    http::{StatusCode, header},
    test, web,
};
use chrono::Utc;

use asll_admin::domain::auth::AdminUser;
use asll_admin::guard::login_location;
use asll_admin::middleware::RouteGuard;
use asll_admin::session::AdminSession;

const SECRET: &str = "middleware-test-secret-middleware-test-secret-middleware-test-0001";

fn admin(permissions: &[&str]) -> AdminUser {
    AdminUser {
        id: "7".to_string(),
        name: "Sara".to_string(),
        email: "sara@asll.ir".to_string(),
        username: "sara".to_string(),
        role: "admin".to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    }
}

/// Signs in with a session signed by `secret`; reachable without a session.
async fn sign_in(req: HttpRequest, secret: &str, permissions: &[&str]) -> HttpResponse {
    let session = AdminSession::new(admin(permissions), "backend-token".into(), false, Utc::now());
    let jwt = session.encode(secret).unwrap();
    Identity::login(&req.extensions(), jwt).unwrap();
    HttpResponse::Ok().finish()
}

macro_rules! guarded_app {
    ($key:expr) => {
        test::init_service(
            App::new()
                .wrap(RouteGuard::new(SECRET))
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), $key)
                        .cookie_secure(false)
                        .build(),
                )
                .route(
                    "/auth/viewer",
                    web::get().to(|req: HttpRequest| sign_in(req, SECRET, &["users.view"])),
                )
                .route(
                    "/auth/nobody",
                    web::get().to(|req: HttpRequest| sign_in(req, SECRET, &[])),
                )
                .route(
                    "/auth/forged",
                    web::get().to(|req: HttpRequest| sign_in(req, "another-secret", &["all"])),
                )
                .route("/login", web::get().to(|| async { HttpResponse::Ok().body("login") }))
                .default_service(web::to(|session: AdminSession| async move {
                    HttpResponse::Ok().body(session.user.name)
                })),
        )
        .await
    };
}

fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .next()
        .expect("should set the session cookie")
        .into_owned()
}

#[actix_web::test]
async fn anonymous_request_redirects_to_login_with_next() {
    let app = guarded_app!(Key::generate());

    let req = test::TestRequest::get().uri("/users?page=2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        login_location("/users?page=2").as_str()
    );
}

#[actix_web::test]
async fn login_page_is_public() {
    let app = guarded_app!(Key::generate());

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn signed_session_reaches_permitted_page() {
    let app = guarded_app!(Key::generate());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/viewer").to_request()).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/users").cookie(cookie).to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "Sara");
}

#[actix_web::test]
async fn missing_permission_redirects_home() {
    let app = guarded_app!(Key::generate());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/nobody").to_request()).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/users").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn session_signed_with_another_secret_is_ignored() {
    let app = guarded_app!(Key::generate());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/forged").to_request()).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
}
