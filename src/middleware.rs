//! Actix middleware applying the route guard to every request.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_identity::IdentityExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;

use crate::guard::{GuardDecision, decide, login_location};
use crate::session::AdminSession;

/// Resolves the session from the identity cookie, stores it in the request
/// extensions and redirects requests the guard refuses.
#[derive(Clone)]
pub struct RouteGuard {
    secret: Rc<String>,
}

impl RouteGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct RouteGuardMiddleware<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

fn current_session(req: &ServiceRequest, secret: &str) -> Option<AdminSession> {
    let jwt = req.get_identity().ok()?.id().ok()?;
    match AdminSession::decode(&jwt, secret) {
        Ok(session) if !session.is_expired(Utc::now()) => Some(session),
        Ok(_) => None,
        Err(err) => {
            log::debug!("Ignoring invalid session: {err}");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = current_session(&req, &self.secret);
        let target = match req.query_string() {
            "" => req.path().to_string(),
            query => format!("{}?{query}", req.path()),
        };

        let location = match decide(req.path(), &target, session.as_ref().map(|s| &s.user)) {
            GuardDecision::Render => None,
            GuardDecision::RedirectToLogin { next } => Some(login_location(&next)),
            GuardDecision::RedirectHome => Some("/".to_string()),
        };

        if let Some(location) = location {
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            let res = req.into_response(response).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        if let Some(session) = session {
            req.extensions_mut().insert(session);
        }
        let service = self.service.clone();
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
