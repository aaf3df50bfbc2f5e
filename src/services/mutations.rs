//! Services behind the dialogs: each validates its form, issues one backend
//! mutation and invalidates the stored list snapshot.

use serde_json::Value;

use crate::api::calls;
use crate::api::errors::ApiError;
use crate::api::{AdminBackend, ApiCall};
use crate::controller::{ListController, ListQuery};
use crate::domain::bulk::{BulkAction, BulkOutcome};
use crate::domain::resource::Resource;
use crate::domain::types::{ResourceId, SanitizedText};
use crate::domain::ViewModel;
use crate::forms::actions::{
    DeleteForm, FeatureForm, GenerateLicensesForm, GenerateLicensesPayload, ReviewForm,
    ReviewPayload, TicketReplyForm, TicketStatusForm, TicketStatusPayload, ToggleActiveForm,
    WithdrawalStatusForm, WithdrawalStatusPayload,
};
use crate::forms::bulk::BulkForm;
use crate::forms::records::{RecordForm, SaveMode};
use crate::forms::{FormError, parse_form};
use crate::repository::{StoreReader, StoreWriter};
use crate::services::lists::{ListSettings, invalidate_snapshot, write_snapshot};
use crate::services::{ServiceError, ServiceResult};

/// List page to return to after a mutation, keeping its query string.
pub fn list_location(resource: Resource, return_to: Option<&str>) -> String {
    match return_to.map(|query| query.trim_start_matches('?')) {
        Some(query) if !query.is_empty() && !query.contains(['#', '\\']) => {
            format!("/{}?{query}", resource.slug())
        }
        _ => format!("/{}", resource.slug()),
    }
}

/// Summary of a bulk action and where to show it.
#[derive(Debug)]
pub struct BulkResult {
    pub action: BulkAction,
    pub outcome: BulkOutcome,
    pub location: String,
}

async fn mutate<B, R>(
    backend: &B,
    repo: &R,
    resource: Resource,
    call: ApiCall,
) -> ServiceResult<Value>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let path = call.path.clone();
    let response = backend.send(call).await.map_err(|err| {
        log::error!("Failed to update {resource} via {path}: {err}");
        ServiceError::from(err)
    })?;
    invalidate_snapshot(repo, resource);
    Ok(response)
}

/// Creates (`id == None`) or updates one record from a posted dialog.
pub async fn save_record<F, B, R>(
    backend: &B,
    repo: &R,
    id: Option<&str>,
    body: &[u8],
) -> ServiceResult<()>
where
    F: RecordForm,
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let resource = F::Model::RESOURCE;
    let form: F = parse_form(body)?;
    match id {
        Some(id) => {
            let id = ResourceId::new(id)?;
            let payload = form.payload(SaveMode::Update)?;
            mutate(backend, repo, resource, calls::update(resource, &id, payload)).await?;
            log::info!("Updated {resource} {id}");
        }
        None => {
            let payload = form.payload(SaveMode::Create)?;
            mutate(backend, repo, resource, calls::create(resource, payload)).await?;
            log::info!("Created a record in {resource}");
        }
    }
    Ok(())
}

pub async fn toggle_active<B, R>(
    backend: &B,
    repo: &R,
    resource: Resource,
    id: &str,
    form: &ToggleActiveForm,
) -> ServiceResult<bool>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    if !resource.toggles_active() {
        return Err(FormError::InvalidAction.into());
    }
    let id = ResourceId::new(id)?;
    let active = form.active()?;
    mutate(backend, repo, resource, calls::set_active_flag(resource, &id, active)).await?;
    log::info!("Set {resource} {id} active={active}");
    Ok(active)
}

/// Approves or rejects a supplier or visitor registration.
pub async fn review<B, R>(
    backend: &B,
    repo: &R,
    resource: Resource,
    id: &str,
    form: ReviewForm,
) -> ServiceResult<ReviewPayload>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    if !resource.reviewable() {
        return Err(FormError::InvalidAction.into());
    }
    let id = ResourceId::new(id)?;
    let payload = ReviewPayload::try_from(form)?;
    let notes = payload.admin_notes.as_ref().map(|notes| notes.as_str());
    mutate(
        backend,
        repo,
        resource,
        calls::review(resource, &id, payload.decision, notes),
    )
    .await?;
    log::info!("Reviewed {resource} {id}: {}", payload.decision);
    Ok(payload)
}

pub async fn set_featured<B, R>(
    backend: &B,
    repo: &R,
    resource: Resource,
    id: &str,
    form: &FeatureForm,
) -> ServiceResult<bool>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    if !resource.reviewable() {
        return Err(FormError::InvalidAction.into());
    }
    let id = ResourceId::new(id)?;
    let featured = form.featured();
    mutate(backend, repo, resource, calls::set_featured(resource, &id, featured)).await?;
    log::info!("Set {resource} {id} featured={featured}");
    Ok(featured)
}

pub async fn set_withdrawal_status<B, R>(
    backend: &B,
    repo: &R,
    id: &str,
    form: WithdrawalStatusForm,
) -> ServiceResult<WithdrawalStatusPayload>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let id = ResourceId::new(id)?;
    let payload = WithdrawalStatusPayload::try_from(form)?;
    let notes = payload.admin_notes.as_ref().map(|notes| notes.as_str());
    mutate(
        backend,
        repo,
        Resource::Withdrawals,
        calls::set_withdrawal_status(&id, payload.status, notes),
    )
    .await?;
    log::info!("Withdrawal {id} set to {}", payload.status);
    Ok(payload)
}

pub async fn set_ticket_status<B, R>(
    backend: &B,
    repo: &R,
    id: &str,
    form: TicketStatusForm,
) -> ServiceResult<TicketStatusPayload>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let id = ResourceId::new(id)?;
    let payload = TicketStatusPayload::try_from(form)?;
    let message = payload.message.as_ref().map(SanitizedText::as_str);
    mutate(
        backend,
        repo,
        Resource::Tickets,
        calls::set_ticket_status(&id, payload.status, message),
    )
    .await?;
    log::info!("Ticket {id} set to {}", payload.status);
    Ok(payload)
}

pub async fn reply_ticket<B, R>(
    backend: &B,
    repo: &R,
    id: &str,
    form: TicketReplyForm,
) -> ServiceResult<()>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let id = ResourceId::new(id)?;
    let message = SanitizedText::try_from(form)?;
    mutate(
        backend,
        repo,
        Resource::Tickets,
        calls::reply_ticket(&id, message.as_str()),
    )
    .await?;
    log::info!("Replied to ticket {id}");
    Ok(())
}

pub async fn generate_licenses<B, R>(
    backend: &B,
    repo: &R,
    form: GenerateLicensesForm,
) -> ServiceResult<GenerateLicensesPayload>
where
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    let payload = GenerateLicensesPayload::try_from(form)?;
    mutate(
        backend,
        repo,
        Resource::Licenses,
        calls::generate_licenses(payload.count, payload.kind),
    )
    .await?;
    log::info!("Generated {} {} licenses", payload.count, payload.kind);
    Ok(payload)
}

/// Refreshes or drops the stored snapshot after the controller reloaded.
fn store_reloaded<V, B, R>(controller: &ListController<'_, V, B>, repo: &R, settings: ListSettings)
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
    R: StoreWriter + ?Sized,
{
    match (controller.last_error(), controller.snapshot()) {
        (None, Some(snapshot)) => {
            write_snapshot(repo, V::RESOURCE, snapshot, settings.snapshot_ttl)
        }
        _ => invalidate_snapshot(repo, V::RESOURCE),
    }
}

fn session_expired<V, B>(controller: &ListController<'_, V, B>) -> Option<ServiceError>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
{
    match controller.last_error() {
        Some(err @ ApiError::Unauthorized(_)) => Some(ServiceError::Api(err.clone())),
        _ => None,
    }
}

/// Deletes one confirmed record and returns the (clamped) list location.
pub async fn delete_record<V, B, R>(
    backend: &B,
    repo: &R,
    id: &str,
    form: &DeleteForm,
    return_to: Option<&str>,
    settings: ListSettings,
) -> ServiceResult<String>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
    R: StoreReader + StoreWriter + ?Sized,
{
    let resource = V::RESOURCE;
    if !resource.deletable() {
        return Err(FormError::InvalidAction.into());
    }
    form.ensure_confirmed()?;
    let id = ResourceId::new(id)?;

    let query = ListQuery::from_query_string(
        return_to.unwrap_or_default(),
        resource.filter_keys(),
        settings.per_page,
    );
    let mut controller = ListController::<V, B>::new(backend, query);
    controller.delete(&id).await.map_err(|err| {
        log::error!("Failed to delete {resource} {id}: {err}");
        ServiceError::from(err)
    })?;
    log::info!("Deleted {resource} {id}");

    store_reloaded(&controller, repo, settings);
    if let Some(err) = session_expired(&controller) {
        return Err(err);
    }
    Ok(list_location(
        resource,
        Some(&controller.query().to_query_string()),
    ))
}

/// Runs a bulk action over the posted ids; failures do not stop the batch.
pub async fn apply_bulk<V, B, R>(
    backend: &B,
    repo: &R,
    form: BulkForm,
    settings: ListSettings,
) -> ServiceResult<BulkResult>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
    R: StoreReader + StoreWriter + ?Sized,
{
    let resource = V::RESOURCE;
    let query = ListQuery::from_query_string(
        form.return_to.as_deref().unwrap_or_default(),
        resource.filter_keys(),
        settings.per_page,
    );
    let payload = form.into_payload(resource)?;

    let mut controller = ListController::<V, B>::new(backend, query)
        .with_selection(payload.ids.iter().cloned().collect());
    let outcome = controller
        .apply_bulk_action(payload.action, &payload.ids)
        .await;
    log::info!(
        "Bulk {} on {resource}: {} succeeded, {} failed",
        payload.action,
        outcome.succeeded.len(),
        outcome.failed.len()
    );

    store_reloaded(&controller, repo, settings);
    if outcome.succeeded.is_empty()
        && let Some(err) = session_expired(&controller)
    {
        return Err(err);
    }
    Ok(BulkResult {
        action: payload.action,
        location: list_location(resource, Some(&controller.query().to_query_string())),
        outcome,
    })
}

/// Flash text summarizing a bulk action.
pub fn bulk_summary(result: &BulkResult) -> String {
    let outcome = &result.outcome;
    if outcome.is_complete_success() {
        format!(
            "عملیات «{}» روی {} مورد با موفقیت انجام شد",
            result.action.label(),
            outcome.succeeded.len()
        )
    } else {
        format!(
            "عملیات «{}»: {} مورد موفق، {} مورد ناموفق (شناسه‌ها: {})",
            result.action.label(),
            outcome.succeeded.len(),
            outcome.failed.len(),
            outcome.failed_ids()
        )
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::api::ApiMethod;
    use crate::api::memory::MemoryBackend;
    use crate::domain::admin::Admin;
    use crate::domain::store::{NewStoreEntry, StoreEntry};
    use crate::domain::supplier::Supplier;
    use crate::domain::user::User;
    use crate::forms::records::UserForm;
    use crate::repository::mock::MockRepository;

    fn settings() -> ListSettings {
        ListSettings {
            per_page: 10,
            snapshot_ttl: Duration::hours(1),
        }
    }

    fn echo(entry: &NewStoreEntry) -> StoreEntry {
        StoreEntry {
            key: entry.key.clone(),
            value: entry.value.clone(),
            updated_at: entry.updated_at,
            expires_at: entry.expires_at,
        }
    }

    fn invalidating(key: &'static str) -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_remove_entry()
            .withf(move |candidate| candidate == key)
            .times(1)
            .returning(|_| Ok(true));
        repo
    }

    #[test]
    fn list_location_keeps_query() {
        assert_eq!(list_location(Resource::Users, None), "/users");
        assert_eq!(
            list_location(Resource::Users, Some("?page=2&status=active")),
            "/users?page=2&status=active"
        );
    }

    /// Creating a user posts the normalized body and drops the snapshot.
    #[actix_web::test]
    async fn save_record_creates_and_invalidates() {
        let backend = MemoryBackend::new();
        backend.respond(ApiMethod::Post, "/admin/users", Ok(json!({"success": true})));
        let repo = invalidating("asll-users");

        save_record::<UserForm, _, _>(
            &backend,
            &repo,
            None,
            b"name=Ali+Rezaei&email=ali%40asll.ir&phone=09121234567&status=active&balance=1500",
        )
        .await
        .expect("should create the user");

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let body = calls[0].body.clone().expect("body");
        assert_eq!(body["email"], "ali@asll.ir");
        assert_eq!(body["is_active"], true);
    }

    /// Invalid forms never reach the backend.
    #[actix_web::test]
    async fn invalid_form_is_rejected_before_sending() {
        let backend = MemoryBackend::new();
        let mut repo = MockRepository::new();
        repo.expect_remove_entry().times(0);

        let result = save_record::<UserForm, _, _>(
            &backend,
            &repo,
            Some("4"),
            b"name=A&email=bad&phone=1&status=active",
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(backend.calls().is_empty());
    }

    /// A failed mutation keeps the snapshot and surfaces the backend message.
    #[actix_web::test]
    async fn backend_rejection_keeps_snapshot() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Put,
            "/admin/users/4/status",
            Err(ApiError::from_status(422, "قابل تغییر نیست".into())),
        );
        let mut repo = MockRepository::new();
        repo.expect_remove_entry().times(0);
        let form = ToggleActiveForm {
            active: "false".to_string(),
            return_to: None,
        };

        let err = toggle_active(&backend, &repo, Resource::Users, "4", &form)
            .await
            .expect_err("should fail");

        assert_eq!(err.user_message(), "قابل تغییر نیست");
    }

    #[actix_web::test]
    async fn rejecting_a_supplier_sends_notes() {
        let backend = MemoryBackend::new();
        backend.respond(ApiMethod::Post, "/admin/suppliers/3/reject", Ok(json!({})));
        let repo = invalidating("asll-suppliers");
        let form = ReviewForm {
            decision: "rejected".to_string(),
            admin_notes: "مدارک ناقص".to_string(),
        };

        review(&backend, &repo, Resource::Suppliers, "3", form)
            .await
            .expect("should reject");

        let body = backend.calls()[0].body.clone().expect("body");
        assert_eq!(body["admin_notes"], "مدارک ناقص");
    }

    #[actix_web::test]
    async fn review_is_limited_to_registrations() {
        let backend = MemoryBackend::new();
        let repo = MockRepository::new();
        let form = ReviewForm {
            decision: "approved".to_string(),
            admin_notes: String::new(),
        };

        let result = review(&backend, &repo, Resource::Users, "3", form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    /// Deleting admin 7 reloads the list once and stores the fresh page.
    #[actix_web::test]
    async fn delete_reloads_and_refreshes_snapshot() {
        let backend = MemoryBackend::new();
        backend
            .respond(ApiMethod::Delete, "/admin/web-admins/7", Ok(json!({})))
            .respond(
                ApiMethod::Get,
                "/admin/web-admins",
                Ok(json!({"admins": [{"id": 8}], "total": 1})),
            );
        let mut repo = MockRepository::new();
        repo.expect_put_entry()
            .withf(|entry| entry.key == "asll-admins")
            .times(1)
            .returning(|entry| Ok(echo(entry)));
        let form = DeleteForm {
            confirm: Some("on".to_string()),
        };

        let location = delete_record::<Admin, _, _>(
            &backend,
            &repo,
            "7",
            &form,
            Some("page=3"),
            settings(),
        )
        .await
        .expect("should delete");

        assert_eq!(location, "/admins?page=1&per_page=10");
        assert_eq!(backend.count(ApiMethod::Get, "/admin/web-admins"), 2);
    }

    #[actix_web::test]
    async fn delete_requires_confirmation() {
        let backend = MemoryBackend::new();
        let repo = MockRepository::new();

        let result = delete_record::<User, _, _>(
            &backend,
            &repo,
            "7",
            &DeleteForm::default(),
            None,
            settings(),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(backend.calls().is_empty());
    }

    /// Partial bulk failures are summarized with the failed ids.
    #[actix_web::test]
    async fn bulk_reports_partial_failure() {
        let backend = MemoryBackend::new();
        backend
            .respond(ApiMethod::Post, "/admin/suppliers/1/feature", Ok(json!({})))
            .respond(
                ApiMethod::Post,
                "/admin/suppliers/2/feature",
                Err(ApiError::from_status(400, "نامعتبر".into())),
            )
            .respond(
                ApiMethod::Get,
                "/admin/suppliers",
                Ok(json!({"suppliers": [{"id": 1}, {"id": 2}]})),
            );
        let mut repo = MockRepository::new();
        repo.expect_put_entry().returning(|entry| Ok(echo(entry)));
        let form = BulkForm {
            action: "feature".to_string(),
            ids: vec!["1".to_string(), "2".to_string()],
            confirm: None,
            return_to: Some("status=pending".to_string()),
        };

        let result = apply_bulk::<Supplier, _, _>(&backend, &repo, form, settings())
            .await
            .expect("should run the batch");

        assert_eq!(result.outcome.succeeded.len(), 1);
        assert_eq!(result.outcome.failed_ids(), "2");
        assert!(result.location.contains("status=pending"));
        assert!(bulk_summary(&result).contains("شناسه‌ها: 2"));
    }
}
