use actix_identity::Identity;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use serde::Deserialize;
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::forms::export::ExportForm;
use crate::forms::parse_form;
use crate::repository::DieselRepository;
use crate::routes::{backend_for, base_context, handle_service_error, redirect, render_template};
use crate::services::export::{export_csv, export_page};
use crate::services::settings::load_theme;
use crate::session::AdminSession;

#[derive(Deserialize)]
struct ExportQuery {
    resource: Option<String>,
}

#[get("/export")]
pub async fn show_export(
    session: AdminSession,
    query: web::Query<ExportQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(
        &flash_messages,
        &session,
        "export",
        load_theme(repo.get_ref()),
    );
    context.insert("page", &export_page(query.resource.as_deref()));
    render_template(&tera, "main/export.html", &context)
}

#[post("/export")]
pub async fn download_export(
    req: HttpRequest,
    session: AdminSession,
    identity: Option<Identity>,
    body: web::Bytes,
    backend: web::Data<HttpBackend>,
) -> impl Responder {
    let form: ExportForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/export");
        }
    };
    let backend = backend_for(&backend, &session);
    match export_csv(&backend, form, Local::now().date_naive()).await {
        Ok(file) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file.file_name)],
            })
            .body(file.bytes),
        Err(err) => handle_service_error(err, identity, "/export", req.path()),
    }
}
