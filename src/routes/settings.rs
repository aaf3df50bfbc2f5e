use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::settings::SettingsTab;
use crate::forms::parse_form;
use crate::forms::settings::{SettingsForm, ThemeForm};
use crate::guard::safe_next;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::settings as settings_service;
use crate::session::AdminSession;

#[derive(Deserialize)]
struct SettingsQuery {
    tab: Option<String>,
}

fn tab_location(tab: SettingsTab) -> String {
    format!("/settings?tab={}", tab.as_str())
}

#[get("/settings")]
pub async fn show_settings(
    session: AdminSession,
    query: web::Query<SettingsQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let tab = SettingsTab::parse_or_default(query.tab.as_deref());
    match settings_service::settings_page(repo.get_ref(), tab) {
        Ok(page) => {
            let mut context = base_context(
                &flash_messages,
                &session,
                "settings",
                settings_service::load_theme(repo.get_ref()),
            );
            context.insert("page", &page);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load settings: {err}");
            FlashMessage::error(err.user_message()).send();
            redirect("/")
        }
    }
}

#[post("/settings/reset")]
pub async fn reset_settings(repo: web::Data<DieselRepository>) -> impl Responder {
    match settings_service::reset_settings(repo.get_ref()) {
        Ok(_) => FlashMessage::success("تنظیمات به حالت پیش‌فرض بازگشت").send(),
        Err(err) => FlashMessage::error(err.user_message()).send(),
    }
    redirect("/settings")
}

/// Any signed-in administrator may switch the theme.
#[post("/settings/theme")]
pub async fn save_theme(body: web::Bytes, repo: web::Data<DieselRepository>) -> impl Responder {
    let form: ThemeForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect("/");
        }
    };
    if let Err(err) = settings_service::save_theme(repo.get_ref(), &form) {
        FlashMessage::error(err.user_message()).send();
    }
    redirect(&safe_next(form.return_to.as_deref()))
}

#[post("/settings/{tab}")]
pub async fn save_settings(
    tab: web::Path<String>,
    body: web::Bytes,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Some(tab) = SettingsTab::parse(&tab) else {
        FlashMessage::error("بخش تنظیمات نامعتبر است").send();
        return redirect("/settings");
    };
    let form: SettingsForm = match parse_form(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&tab_location(tab));
        }
    };

    match settings_service::save_tab(repo.get_ref(), tab, &form) {
        Ok(_) => {
            FlashMessage::success(format!("تنظیمات {} ذخیره شد", tab.label())).send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to save {} settings: {err}", tab.as_str());
            FlashMessage::error(err.user_message()).send();
        }
    }
    redirect(&tab_location(tab))
}
