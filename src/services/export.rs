//! CSV downloads of resource lists.

use chrono::NaiveDate;

use crate::api::errors::ApiError;
use crate::api::AdminBackend;
use crate::controller::{ListController, ListQuery};
use crate::domain::resource::Resource;
use crate::domain::ViewModel;
use crate::domain::admin::Admin;
use crate::domain::affiliate::Affiliate;
use crate::domain::education::Education;
use crate::domain::license::License;
use crate::domain::notification::Notification;
use crate::domain::popup::Popup;
use crate::domain::product::Product;
use crate::domain::research_product::ResearchProduct;
use crate::domain::slider::Slider;
use crate::domain::supplier::Supplier;
use crate::domain::ticket::Ticket;
use crate::domain::user::User;
use crate::domain::visitor::Visitor;
use crate::domain::withdrawal::Withdrawal;
use crate::dto::pages::{ExportPage, ExportResource};
use crate::export::{EXPORT_PAGE_SIZE, file_name, select_columns, to_csv};
use crate::forms::export::{ExportForm, ExportRequest};
use crate::services::{ServiceError, ServiceResult};

/// Generated file ready to be sent as an attachment.
#[derive(Debug)]
pub struct CsvFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

pub fn export_page(selected: Option<&str>) -> ExportPage {
    let resources: Vec<ExportResource> = Resource::ALL
        .into_iter()
        .map(|resource| ExportResource {
            slug: resource.slug(),
            title: resource.title(),
            columns: columns_of(resource),
        })
        .collect();
    let selected = selected
        .and_then(Resource::from_slug)
        .unwrap_or(Resource::Users)
        .slug();
    ExportPage {
        resources,
        selected,
    }
}

fn columns_of(resource: Resource) -> &'static [crate::domain::Column] {
    match resource {
        Resource::Users => User::columns(),
        Resource::Admins => Admin::columns(),
        Resource::Products => Product::columns(),
        Resource::Withdrawals => Withdrawal::columns(),
        Resource::Licenses => License::columns(),
        Resource::Tickets => Ticket::columns(),
        Resource::Education => Education::columns(),
        Resource::Suppliers => Supplier::columns(),
        Resource::Visitors => Visitor::columns(),
        Resource::Popups => Popup::columns(),
        Resource::Notifications => Notification::columns(),
        Resource::Sliders => Slider::columns(),
        Resource::ResearchProducts => ResearchProduct::columns(),
        Resource::Affiliates => Affiliate::columns(),
    }
}

async fn export_as<V, B>(backend: &B, request: &ExportRequest, today: NaiveDate) -> ServiceResult<CsvFile>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
{
    let mut controller = ListController::<V, B>::new(backend, ListQuery::new(EXPORT_PAGE_SIZE));
    controller.reload().await.map_err(|err| {
        log::error!("Failed to load {} for export: {err}", V::RESOURCE);
        match err {
            ApiError::NotFound(_) => ServiceError::NotFound,
            err => ServiceError::Api(err),
        }
    })?;

    let items = controller.result().items;
    let columns = select_columns::<V>(&request.columns);
    let bytes = to_csv(&items, &columns, request.include_header).map_err(|err| {
        log::error!("Failed to write the {} export: {err}", V::RESOURCE);
        ServiceError::Internal(err.to_string())
    })?;
    log::info!("Exported {} {} rows", items.len(), V::RESOURCE);

    Ok(CsvFile {
        file_name: file_name(V::RESOURCE, today),
        rows: items.len(),
        bytes,
    })
}

/// Loads the first [`EXPORT_PAGE_SIZE`] rows of the chosen resource and
/// renders the chosen columns as CSV.
pub async fn export_csv<B>(backend: &B, form: ExportForm, today: NaiveDate) -> ServiceResult<CsvFile>
where
    B: AdminBackend + ?Sized,
{
    let request = ExportRequest::try_from(form)?;
    match request.resource {
        Resource::Users => export_as::<User, B>(backend, &request, today).await,
        Resource::Admins => export_as::<Admin, B>(backend, &request, today).await,
        Resource::Products => export_as::<Product, B>(backend, &request, today).await,
        Resource::Withdrawals => export_as::<Withdrawal, B>(backend, &request, today).await,
        Resource::Licenses => export_as::<License, B>(backend, &request, today).await,
        Resource::Tickets => export_as::<Ticket, B>(backend, &request, today).await,
        Resource::Education => export_as::<Education, B>(backend, &request, today).await,
        Resource::Suppliers => export_as::<Supplier, B>(backend, &request, today).await,
        Resource::Visitors => export_as::<Visitor, B>(backend, &request, today).await,
        Resource::Popups => export_as::<Popup, B>(backend, &request, today).await,
        Resource::Notifications => export_as::<Notification, B>(backend, &request, today).await,
        Resource::Sliders => export_as::<Slider, B>(backend, &request, today).await,
        Resource::ResearchProducts => {
            export_as::<ResearchProduct, B>(backend, &request, today).await
        }
        Resource::Affiliates => export_as::<Affiliate, B>(backend, &request, today).await,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiMethod;
    use crate::api::memory::MemoryBackend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[actix_web::test]
    async fn export_requests_a_large_first_page() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/suppliers",
            Ok(json!({"suppliers": [{"id": 1, "full_name": "Tabriz Trade"}]})),
        );
        let form = ExportForm {
            resource: "suppliers".to_string(),
            columns: Vec::new(),
            include_header: Some("on".to_string()),
        };

        let file = export_csv(&backend, form, today()).await.expect("should export");

        assert_eq!(file.file_name, "suppliers-export-2025-05-01.csv");
        assert_eq!(file.rows, 1);
        let call = &backend.calls()[0];
        assert!(call.query.contains(&("per_page".to_string(), "1000".to_string())));
        assert!(call.query.contains(&("page".to_string(), "1".to_string())));
    }

    #[actix_web::test]
    async fn backend_failure_is_reported() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Err(ApiError::from_status(500, "boom".into())),
        );
        let form = ExportForm {
            resource: "users".to_string(),
            columns: vec!["name".to_string()],
            include_header: None,
        };

        let result = export_csv(&backend, form, today()).await;

        assert!(matches!(result, Err(ServiceError::Api(_))));
    }

    #[test]
    fn export_page_lists_every_resource() {
        let page = export_page(Some("tickets"));
        assert_eq!(page.resources.len(), Resource::ALL.len());
        assert_eq!(page.selected, "tickets");
        assert_eq!(export_page(Some("nope")).selected, "users");
    }
}
