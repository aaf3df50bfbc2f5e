//! Generic list, detail and dialog routes shared by every resource page.

use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use serde_json::Value;
use tera::Tera;

use crate::api::http::HttpBackend;
use crate::api::toast::ErrorToastThrottle;
use crate::domain::admin::Admin;
use crate::domain::affiliate::Affiliate;
use crate::domain::education::Education;
use crate::domain::license::License;
use crate::domain::notification::Notification;
use crate::domain::popup::Popup;
use crate::domain::product::Product;
use crate::domain::research_product::ResearchProduct;
use crate::domain::resource::Resource;
use crate::domain::slider::Slider;
use crate::domain::supplier::Supplier;
use crate::domain::ticket::Ticket;
use crate::domain::user::User;
use crate::domain::visitor::Visitor;
use crate::domain::withdrawal::Withdrawal;
use crate::dto::list::{ListView, choices};
use crate::dto::pages::{RecordPage, ResourceMeta};
use crate::forms::actions::{
    DeleteForm, FeatureForm, GenerateLicensesForm, ReviewForm, TicketReplyForm, TicketStatusForm,
    ToggleActiveForm, WithdrawalStatusForm,
};
use crate::forms::bulk::BulkForm;
use crate::forms::parse_form;
use crate::forms::records::{
    AdminForm, AffiliateForm, EducationForm, NotificationForm, PopupForm, ProductForm,
    ResearchProductForm, SliderForm, UserForm,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    backend_for, base_context, current_target, handle_service_error, list_settings, not_found,
    redirect, render_template,
};
use crate::services::lists::{load_list_page, load_record};
use crate::services::mutations::{self, bulk_summary, list_location};
use crate::services::settings::load_theme;
use crate::session::AdminSession;

/// Runs `$body` with `$model` bound to the view model of `$resource`.
macro_rules! with_model {
    ($resource:expr, |$model:ident| $body:expr) => {
        match $resource {
            Resource::Users => {
                type $model = User;
                $body
            }
            Resource::Admins => {
                type $model = Admin;
                $body
            }
            Resource::Products => {
                type $model = Product;
                $body
            }
            Resource::Withdrawals => {
                type $model = Withdrawal;
                $body
            }
            Resource::Licenses => {
                type $model = License;
                $body
            }
            Resource::Tickets => {
                type $model = Ticket;
                $body
            }
            Resource::Education => {
                type $model = Education;
                $body
            }
            Resource::Suppliers => {
                type $model = Supplier;
                $body
            }
            Resource::Visitors => {
                type $model = Visitor;
                $body
            }
            Resource::Popups => {
                type $model = Popup;
                $body
            }
            Resource::Notifications => {
                type $model = Notification;
                $body
            }
            Resource::Sliders => {
                type $model = Slider;
                $body
            }
            Resource::ResearchProducts => {
                type $model = ResearchProduct;
                $body
            }
            Resource::Affiliates => {
                type $model = Affiliate;
                $body
            }
        }
    };
}

/// Runs `$body` with `$form` bound to the create/edit form of `$resource`,
/// or evaluates `$otherwise` for resources without dialogs.
macro_rules! with_record_form {
    ($resource:expr, |$form:ident| $body:expr, $otherwise:expr) => {
        match $resource {
            Resource::Users => {
                type $form = UserForm;
                $body
            }
            Resource::Admins => {
                type $form = AdminForm;
                $body
            }
            Resource::Products => {
                type $form = ProductForm;
                $body
            }
            Resource::Education => {
                type $form = EducationForm;
                $body
            }
            Resource::Popups => {
                type $form = PopupForm;
                $body
            }
            Resource::Notifications => {
                type $form = NotificationForm;
                $body
            }
            Resource::Sliders => {
                type $form = SliderForm;
                $body
            }
            Resource::ResearchProducts => {
                type $form = ResearchProductForm;
                $body
            }
            Resource::Affiliates => {
                type $form = AffiliateForm;
                $body
            }
            _ => $otherwise,
        }
    };
}

/// Everything a resource handler reads from the application state.
struct Deps<'a> {
    backend: HttpBackend,
    repo: &'a DieselRepository,
    config: &'a ServerConfig,
}

impl<'a> Deps<'a> {
    fn new(
        backend: &HttpBackend,
        session: &AdminSession,
        repo: &'a web::Data<DieselRepository>,
        config: &'a web::Data<ServerConfig>,
    ) -> Self {
        Self {
            backend: backend_for(backend, session),
            repo: repo.get_ref(),
            config: config.get_ref(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ReturnTo {
    #[serde(default)]
    return_to: Option<String>,
}

/// The list query string posted along with an action form.
fn return_to(body: &[u8]) -> Option<String> {
    parse_form::<ReturnTo>(body)
        .unwrap_or_default()
        .return_to
        .filter(|query| !query.is_empty())
}

fn record_location(resource: Resource, id: &str) -> String {
    format!("/{}/{id}", resource.slug())
}

#[get("/{resource}")]
pub async fn list_resource(
    req: HttpRequest,
    path: web::Path<String>,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    throttle: web::Data<ErrorToastThrottle>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let Some(resource) = Resource::from_slug(&path) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);

    let list = with_model!(resource, |Model| {
        load_list_page::<Model, _, _>(
            &deps.backend,
            deps.repo,
            &throttle.scoped(session.user.id.as_str()),
            req.query_string(),
            list_settings(deps.config),
        )
        .await
        .map(|data| (ListView::build(&data), data.error))
    });
    let (list, load_error) = match list {
        Ok(list) => list,
        Err(err) => return handle_service_error(err, identity, "/", &current_target(&req)),
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        resource.slug(),
        load_theme(deps.repo),
    );
    context.insert("meta", &ResourceMeta::from(resource));
    context.insert("list", &list);
    context.insert("choices", &choices(resource));
    context.insert("load_error", &load_error);
    render_template(&tera, "resources/index.html", &context)
}

#[post("/{resource}/bulk")]
pub async fn bulk_action(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let Some(resource) = Resource::from_slug(&path) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let form: BulkForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&list_location(resource, None));
        }
    };
    let back = list_location(resource, form.return_to.as_deref());

    let result = with_model!(resource, |Model| {
        mutations::apply_bulk::<Model, _, _>(
            &deps.backend,
            deps.repo,
            form,
            list_settings(deps.config),
        )
        .await
    });
    match result {
        Ok(result) => {
            let summary = bulk_summary(&result);
            if result.outcome.is_complete_success() {
                FlashMessage::success(summary).send();
            } else {
                FlashMessage::warning(summary).send();
            }
            redirect(&result.location)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[get("/{resource}/new")]
pub async fn new_record(
    path: web::Path<String>,
    session: AdminSession,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let Some(resource) = Resource::from_slug(&path).filter(|resource| resource.editable()) else {
        return not_found(tera, flash_messages).await;
    };
    let mut context = base_context(
        &flash_messages,
        &session,
        resource.slug(),
        load_theme(repo.get_ref()),
    );
    context.insert("meta", &ResourceMeta::from(resource));
    context.insert("record", &Value::Object(Default::default()));
    context.insert("editing", &false);
    context.insert("action", &format!("/{}/new", resource.slug()));
    context.insert("choices", &choices(resource));
    render_template(
        &tera,
        &format!("resources/forms/{}.html", resource.slug()),
        &context,
    )
}

#[post("/{resource}/new")]
pub async fn create_record(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let Some(resource) = Resource::from_slug(&path) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let result = with_record_form!(
        resource,
        |Form| mutations::save_record::<Form, _, _>(&deps.backend, deps.repo, None, &body).await,
        return not_found(tera, flash_messages).await
    );
    let form_location = format!("/{}/new", resource.slug());
    match result {
        Ok(()) => {
            FlashMessage::success("رکورد با موفقیت ایجاد شد").send();
            redirect(&list_location(resource, return_to(&body).as_deref()))
        }
        Err(err) => handle_service_error(err, identity, &form_location, &current_target(&req)),
    }
}

#[get("/{resource}/{id}/edit")]
pub async fn edit_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug).filter(|resource| resource.editable()) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);

    let record = with_model!(resource, |Model| {
        load_record::<Model, _>(&deps.backend, &id)
            .await
            .map(|item| RecordPage::build(&item).record)
    });
    let record = match record {
        Ok(record) => record,
        Err(err) => {
            return handle_service_error(
                err,
                identity,
                &list_location(resource, None),
                &current_target(&req),
            );
        }
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        resource.slug(),
        load_theme(deps.repo),
    );
    context.insert("meta", &ResourceMeta::from(resource));
    context.insert("record", &record);
    context.insert("editing", &true);
    context.insert("action", &format!("/{}/{id}/edit", resource.slug()));
    context.insert("choices", &choices(resource));
    render_template(
        &tera,
        &format!("resources/forms/{}.html", resource.slug()),
        &context,
    )
}

#[post("/{resource}/{id}/edit")]
pub async fn update_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let result = with_record_form!(
        resource,
        |Form| {
            mutations::save_record::<Form, _, _>(&deps.backend, deps.repo, Some(&id), &body).await
        },
        return not_found(tera, flash_messages).await
    );
    let form_location = format!("/{}/{id}/edit", resource.slug());
    match result {
        Ok(()) => {
            FlashMessage::success("تغییرات ذخیره شد").send();
            redirect(&list_location(resource, return_to(&body).as_deref()))
        }
        Err(err) => handle_service_error(err, identity, &form_location, &current_target(&req)),
    }
}

#[derive(Deserialize)]
struct ConfirmQuery {
    return_to: Option<String>,
}

#[get("/{resource}/{id}/delete")]
pub async fn confirm_delete(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    query: web::Query<ConfirmQuery>,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug).filter(|resource| resource.deletable()) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);

    let page = with_model!(resource, |Model| {
        load_record::<Model, _>(&deps.backend, &id)
            .await
            .map(|item| RecordPage::build(&item))
    });
    let page = match page {
        Ok(page) => page,
        Err(err) => {
            return handle_service_error(
                err,
                identity,
                &list_location(resource, query.return_to.as_deref()),
                &current_target(&req),
            );
        }
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        resource.slug(),
        load_theme(deps.repo),
    );
    context.insert("meta", &ResourceMeta::from(resource));
    context.insert("page", &page);
    context.insert("return_to", &query.return_to);
    context.insert(
        "cancel_href",
        &list_location(resource, query.return_to.as_deref()),
    );
    render_template(&tera, "resources/confirm_delete.html", &context)
}

#[post("/{resource}/{id}/delete")]
pub async fn delete_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let return_to = return_to(&body);
    let form: DeleteForm = parse_form(&body).unwrap_or(DeleteForm { confirm: None });

    let result = with_model!(resource, |Model| {
        mutations::delete_record::<Model, _, _>(
            &deps.backend,
            deps.repo,
            &id,
            &form,
            return_to.as_deref(),
            list_settings(deps.config),
        )
        .await
    });
    match result {
        Ok(location) => {
            FlashMessage::success("مورد با موفقیت حذف شد").send();
            redirect(&location)
        }
        Err(err) => handle_service_error(
            err,
            identity,
            &list_location(resource, return_to.as_deref()),
            &current_target(&req),
        ),
    }
}

#[post("/{resource}/{id}/toggle")]
pub async fn toggle_active(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = list_location(resource, return_to(&body).as_deref());
    let form: ToggleActiveForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::toggle_active(&deps.backend, deps.repo, resource, &id, &form).await {
        Ok(true) => {
            FlashMessage::success("وضعیت به فعال تغییر کرد").send();
            redirect(&back)
        }
        Ok(false) => {
            FlashMessage::success("وضعیت به غیرفعال تغییر کرد").send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/{resource}/{id}/review")]
pub async fn review_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = record_location(resource, &id);
    let form: ReviewForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::review(&deps.backend, deps.repo, resource, &id, form).await {
        Ok(payload) => {
            FlashMessage::success(format!("وضعیت به «{}» تغییر کرد", payload.decision.label()))
                .send();
            redirect(&list_location(resource, return_to(&body).as_deref()))
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/{resource}/{id}/feature")]
pub async fn feature_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = list_location(resource, return_to(&body).as_deref());
    let form: FeatureForm = parse_form(&body).unwrap_or(FeatureForm { featured: None });

    match mutations::set_featured(&deps.backend, deps.repo, resource, &id, &form).await {
        Ok(true) => {
            FlashMessage::success("به فهرست ویژه اضافه شد").send();
            redirect(&back)
        }
        Ok(false) => {
            FlashMessage::success("از فهرست ویژه حذف شد").send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/withdrawals/{id}/status")]
pub async fn withdrawal_status(
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = record_location(Resource::Withdrawals, &id);
    let form: WithdrawalStatusForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::set_withdrawal_status(&deps.backend, deps.repo, &id, form).await {
        Ok(payload) => {
            FlashMessage::success(format!(
                "وضعیت درخواست به «{}» تغییر کرد",
                payload.status.label()
            ))
            .send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/tickets/{id}/status")]
pub async fn ticket_status(
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = record_location(Resource::Tickets, &id);
    let form: TicketStatusForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::set_ticket_status(&deps.backend, deps.repo, &id, form).await {
        Ok(payload) => {
            FlashMessage::success(format!("وضعیت تیکت به «{}» تغییر کرد", payload.status.label()))
                .send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/tickets/{id}/reply")]
pub async fn ticket_reply(
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = record_location(Resource::Tickets, &id);
    let form: TicketReplyForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::reply_ticket(&deps.backend, deps.repo, &id, form).await {
        Ok(()) => {
            FlashMessage::success("پاسخ ارسال شد").send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[post("/licenses/generate")]
pub async fn generate_licenses(
    req: HttpRequest,
    body: web::Bytes,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let deps = Deps::new(&backend, &session, &repo, &server_config);
    let back = list_location(Resource::Licenses, return_to(&body).as_deref());
    let form: GenerateLicensesForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match mutations::generate_licenses(&deps.backend, deps.repo, form).await {
        Ok(payload) => {
            FlashMessage::success(format!(
                "{} لایسنس {} تولید شد",
                payload.count,
                payload.kind.label()
            ))
            .send();
            redirect(&back)
        }
        Err(err) => handle_service_error(err, identity, &back, &current_target(&req)),
    }
}

#[get("/{resource}/{id}")]
pub async fn show_record(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    session: AdminSession,
    identity: Option<Identity>,
    backend: web::Data<HttpBackend>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let (slug, id) = path.into_inner();
    let Some(resource) = Resource::from_slug(&slug) else {
        return not_found(tera, flash_messages).await;
    };
    let deps = Deps::new(&backend, &session, &repo, &server_config);

    let page = with_model!(resource, |Model| {
        load_record::<Model, _>(&deps.backend, &id)
            .await
            .map(|item| RecordPage::build(&item))
    });
    let page = match page {
        Ok(page) => page,
        Err(err) => {
            return handle_service_error(
                err,
                identity,
                &list_location(resource, None),
                &current_target(&req),
            );
        }
    };

    let mut context = base_context(
        &flash_messages,
        &session,
        resource.slug(),
        load_theme(deps.repo),
    );
    context.insert("meta", &ResourceMeta::from(resource));
    context.insert("page", &page);
    context.insert("choices", &choices(resource));
    render_template(&tera, "resources/show.html", &context)
}
