//! Services loading list pages and single records.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::api::calls;
use crate::api::errors::ApiError;
use crate::api::toast::ToastScope;
use crate::api::AdminBackend;
use crate::controller::{ListController, ListQuery, ListSnapshot, SelectionSet};
use crate::domain::resource::Resource;
use crate::domain::store::NewStoreEntry;
use crate::domain::types::ResourceId;
use crate::domain::ViewModel;
use crate::dto::list::ListPageData;
use crate::normalize::Raw;
use crate::pagination::Paginated;
use crate::repository::{StoreReader, StoreWriter};
use crate::services::{ServiceError, ServiceResult};

/// Paging and caching knobs taken from the server configuration.
#[derive(Clone, Copy, Debug)]
pub struct ListSettings {
    pub per_page: usize,
    /// Lifetime of the stored fallback snapshot.
    pub snapshot_ttl: Duration,
}

/// Row selection requested by the query string: repeated `selected` ids,
/// and whether `select=all` asks for every visible row.
pub fn requested_selection(query_string: &str) -> (SelectionSet, bool) {
    let params: BTreeMap<String, Vec<String>> =
        serde_html_form::from_str(query_string).unwrap_or_default();
    let selection = params
        .get("selected")
        .into_iter()
        .flatten()
        .filter_map(|value| ResourceId::new(value.as_str()).ok())
        .collect();
    let all = params
        .get("select")
        .is_some_and(|values| values.iter().any(|value| value == "all"));
    (selection, all)
}

/// Last good page of `resource`, if one is stored and still fresh.
pub fn read_snapshot<R>(repo: &R, resource: Resource) -> Option<ListSnapshot>
where
    R: StoreReader + ?Sized,
{
    let entry = match repo.get_entry(&resource.storage_key()) {
        Ok(entry) => entry?,
        Err(err) => {
            log::error!("Failed to read the {resource} snapshot: {err}");
            return None;
        }
    };
    match serde_json::from_value(entry.value) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            log::warn!("Ignoring malformed {resource} snapshot: {err}");
            None
        }
    }
}

pub fn write_snapshot<R>(repo: &R, resource: Resource, snapshot: &ListSnapshot, ttl: Duration)
where
    R: StoreWriter + ?Sized,
{
    let value = match serde_json::to_value(snapshot) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to serialize the {resource} snapshot: {err}");
            return;
        }
    };
    let entry =
        NewStoreEntry::new(resource.storage_key(), value, Utc::now().naive_utc()).with_ttl(ttl);
    if let Err(err) = repo.put_entry(&entry) {
        log::error!("Failed to store the {resource} snapshot: {err}");
    }
}

/// Drops the stored page after a mutation so stale rows are never shown.
pub fn invalidate_snapshot<R>(repo: &R, resource: Resource)
where
    R: StoreWriter + ?Sized,
{
    if let Err(err) = repo.remove_entry(&resource.storage_key()) {
        log::error!("Failed to invalidate the {resource} snapshot: {err}");
    }
}

/// Loads one list page for `V` from the query string of the request.
///
/// Backend failures other than an expired session do not fail the page:
/// the stored snapshot (or an empty list) is rendered and the error is
/// returned for flashing, subject to the toast throttle.
pub async fn load_list_page<V, B, R>(
    backend: &B,
    repo: &R,
    throttle: &ToastScope<'_>,
    query_string: &str,
    settings: ListSettings,
) -> ServiceResult<ListPageData<V>>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
    R: StoreReader + StoreWriter + ?Sized,
{
    let resource = V::RESOURCE;
    let query = ListQuery::from_query_string(query_string, resource.filter_keys(), settings.per_page);

    let (selection, select_all) = requested_selection(query_string);
    // Only a snapshot of this very view may stand in for a failed load.
    let snapshot = read_snapshot(repo, resource).filter(|snapshot| snapshot.matches(&query));
    let mut controller = ListController::<V, B>::new(backend, query).with_selection(selection);
    if let Some(snapshot) = snapshot {
        controller = controller.with_snapshot(snapshot);
    }

    let error = match controller.reload().await {
        Ok(()) => {
            if let Some(snapshot) = controller.snapshot() {
                write_snapshot(repo, resource, snapshot, settings.snapshot_ttl);
            }
            None
        }
        Err(err @ ApiError::Unauthorized(_)) => return Err(err.into()),
        Err(err) => {
            log::error!("Failed to load {resource}: {err}");
            throttle.should_show(&err).then(|| err.user_message())
        }
    };

    let result = controller.result();
    if select_all {
        let visible: Vec<ResourceId> = result
            .items
            .iter()
            .filter_map(|item| ResourceId::new(item.id()).ok())
            .collect();
        controller.selection_mut().select_all(&visible);
    }
    let query = controller.query().clone();
    Ok(ListPageData {
        resource,
        items: Paginated::new(result.items, query.page, result.total, result.total_pages),
        selection: controller.selection().clone(),
        query,
        error,
    })
}

/// Fetches and normalizes one record.
pub async fn load_record<V, B>(backend: &B, id: &str) -> ServiceResult<V>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
{
    let id = ResourceId::new(id)?;
    let raw = backend
        .fetch_record(calls::fetch(V::RESOURCE, &id), V::RESOURCE.record_keys())
        .await
        .map_err(|err| match err {
            ApiError::NotFound(_) => ServiceError::NotFound,
            err => {
                log::error!("Failed to fetch {} {id}: {err}", V::RESOURCE);
                ServiceError::Api(err)
            }
        })?;
    if raw.is_null() {
        return Err(ServiceError::NotFound);
    }
    Ok(V::normalize(Raw::new(&raw)))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::time::Duration as StdDuration;

    use serde_json::{Value, json};

    use super::*;
    use crate::api::ApiMethod;
    use crate::api::memory::MemoryBackend;
    use crate::api::toast::ErrorToastThrottle;
    use crate::domain::store::StoreEntry;
    use crate::domain::user::User;
    use crate::repository::mock::MockRepository;

    fn settings() -> ListSettings {
        ListSettings {
            per_page: 10,
            snapshot_ttl: Duration::hours(1),
        }
    }

    fn throttle() -> ErrorToastThrottle {
        ErrorToastThrottle::new(StdDuration::from_secs(35))
    }

    fn stored(key: &str, value: Value) -> StoreEntry {
        StoreEntry {
            key: key.to_string(),
            value,
            updated_at: Utc::now().naive_utc(),
            expires_at: None,
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

    /// A successful load is written back as the fallback snapshot.
    #[actix_web::test]
    async fn successful_load_stores_snapshot() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Ok(json!({"data": {"users": [{"id": 1, "name": "Ali"}], "total": 1}})),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().times(1).returning(|_| Ok(None));
        repo.expect_put_entry()
            .withf(|entry| entry.key == "asll-users" && entry.expires_at.is_some())
            .times(1)
            .returning(|entry| Ok(echo(entry)));

        let data = load_list_page::<User, _, _>(&backend, &repo, &throttle().scoped("1"), "", settings())
            .await
            .expect("should load users");

        assert_eq!(data.items.items.len(), 1);
        assert_eq!(data.items.total, 1);
        assert!(data.error.is_none());
    }

    /// A failing backend renders the stored rows with an error message.
    #[actix_web::test]
    async fn failure_falls_back_to_snapshot() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Err(ApiError::from_status(500, "boom".into())),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry()
            .withf(|key| key == "asll-users")
            .times(1)
            .returning(|key| {
                Ok(Some(stored(
                    key,
                    json!({
                        "query": "page=1&per_page=10",
                        "records": [{"id": 9, "name": "cached"}],
                        "total": 1,
                        "total_pages": 1
                    }),
                )))
            });
        repo.expect_put_entry().times(0);

        let data = load_list_page::<User, _, _>(&backend, &repo, &throttle().scoped("1"), "", settings())
            .await
            .expect("should render the fallback");

        assert_eq!(data.items.items[0].name, "cached");
        assert_eq!(data.error.as_deref(), Some("boom"));
    }

    /// Rows stored for another page or filter are not shown under this one.
    #[actix_web::test]
    async fn snapshot_of_another_view_is_ignored() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Err(ApiError::from_status(500, "boom".into())),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().times(1).returning(|key| {
            Ok(Some(stored(
                key,
                json!({
                    "query": "page=1&per_page=10",
                    "records": [{"id": 1, "name": "active-user", "status": "active"}],
                    "total": 1,
                    "total_pages": 1
                }),
            )))
        });
        repo.expect_put_entry().times(0);

        let data = load_list_page::<User, _, _>(
            &backend,
            &repo,
            &throttle().scoped("1"),
            "status=banned&page=3",
            settings(),
        )
        .await
        .expect("should render an empty page");

        assert!(data.items.items.is_empty());
        assert_eq!(data.query.page, 3);
        assert!(data.query.has_filter("status", "banned"));
        assert_eq!(data.error.as_deref(), Some("boom"));
    }

    /// Repeated server errors are flashed once within the cooldown.
    #[actix_web::test]
    async fn repeated_failures_are_throttled() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Err(ApiError::Network("refused".into())),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));
        let shared = throttle();
        let throttle = shared.scoped("1");

        let first = load_list_page::<User, _, _>(&backend, &repo, &throttle, "", settings())
            .await
            .expect("should render");
        let second = load_list_page::<User, _, _>(&backend, &repo, &throttle, "", settings())
            .await
            .expect("should render");

        assert!(first.error.is_some());
        assert!(second.error.is_none());
        assert!(second.items.items.is_empty());
    }

    /// An expired backend token is surfaced so the handler can sign out.
    #[actix_web::test]
    async fn unauthorized_is_propagated() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Err(ApiError::Unauthorized("expired".into())),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));

        let result =
            load_list_page::<User, _, _>(&backend, &repo, &throttle().scoped("1"), "", settings()).await;

        assert!(matches!(result, Err(ref err) if err.is_session_expired()));
    }

    /// Ids carried in `selected` stay checked when still visible.
    #[actix_web::test]
    async fn selected_ids_survive_when_visible() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Ok(json!({"users": [{"id": 1}, {"id": 2}], "total": 2})),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));
        repo.expect_put_entry().returning(|entry| Ok(echo(entry)));

        let data = load_list_page::<User, _, _>(
            &backend,
            &repo,
            &throttle().scoped("1"),
            "selected=2&selected=7&status=active",
            settings(),
        )
        .await
        .expect("should load users");

        assert!(data.selection.contains("2"));
        assert!(!data.selection.contains("7"));
        assert!(data.query.has_filter("status", "active"));
    }

    /// `select=all` checks every row of the rendered page.
    #[actix_web::test]
    async fn select_all_checks_visible_rows() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users",
            Ok(json!({"users": [{"id": 1}, {"id": 2}], "total": 2})),
        );
        let mut repo = MockRepository::new();
        repo.expect_get_entry().returning(|_| Ok(None));
        repo.expect_put_entry().returning(|entry| Ok(echo(entry)));

        let data =
            load_list_page::<User, _, _>(&backend, &repo, &throttle().scoped("1"), "select=all", settings())
                .await
                .expect("should load users");

        assert_eq!(data.selection.len(), 2);
    }

    #[actix_web::test]
    async fn missing_record_is_not_found() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users/5",
            Err(ApiError::NotFound("missing".into())),
        );

        let result = load_record::<User, _>(&backend, "5").await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[actix_web::test]
    async fn record_is_unwrapped_and_normalized() {
        let backend = MemoryBackend::new();
        backend.respond(
            ApiMethod::Get,
            "/admin/users/5",
            Ok(json!({"success": true, "data": {"user": {"id": 5, "name": "Reza"}}})),
        );

        let user = load_record::<User, _>(&backend, "5")
            .await
            .expect("should load the user");

        assert_eq!(user.id, "5");
        assert_eq!(user.name, "Reza");
    }
}
