//! Generic list controller shared by every resource page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::calls;
use crate::api::envelope::RawPage;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::AdminBackend;
use crate::controller::query::{ListQuery, SortOrder};
use crate::controller::selection::{SelectionPolicy, SelectionSet};
use crate::domain::ViewModel;
use crate::domain::bulk::{BulkAction, BulkFailure, BulkOutcome};
use crate::domain::types::ResourceId;
use crate::normalize::Raw;

/// Rows currently rendered with the totals used by the pager.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListResult<V> {
    pub items: Vec<V>,
    pub total: usize,
    pub total_pages: usize,
}

impl<V> ListResult<V> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

/// Raw form of the last good page, kept in the store as a fallback.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ListSnapshot {
    /// Query string of the view the rows belong to.
    #[serde(default)]
    pub query: String,
    pub records: Vec<Value>,
    pub total: usize,
    pub total_pages: usize,
}

impl ListSnapshot {
    /// Whether the rows were fetched for exactly `query`.
    pub fn matches(&self, query: &ListQuery) -> bool {
        self.query == query.to_query_string()
    }

    fn normalize<V: ViewModel>(&self) -> ListResult<V> {
        ListResult {
            items: self.records.iter().map(|raw| V::normalize(Raw::new(raw))).collect(),
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Binds a [`ListQuery`] to the backend collection of `V`.
///
/// One controller lives for one request. Every state change issues exactly
/// one fetch (plus one more when the page has to be clamped).
pub struct ListController<'a, V, B: ?Sized> {
    backend: &'a B,
    query: ListQuery,
    selection: SelectionSet,
    policy: SelectionPolicy,
    result: Option<ListResult<V>>,
    snapshot: Option<ListSnapshot>,
    last_error: Option<ApiError>,
    fetches: usize,
}

impl<'a, V, B> ListController<'a, V, B>
where
    V: ViewModel,
    B: AdminBackend + ?Sized,
{
    pub fn new(backend: &'a B, query: ListQuery) -> Self {
        Self {
            backend,
            query,
            selection: SelectionSet::new(),
            policy: SelectionPolicy::default(),
            result: None,
            snapshot: None,
            last_error: None,
            fetches: 0,
        }
    }

    /// Seeds the last good state, e.g. from a stored snapshot.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: ListSnapshot) -> Self {
        self.result = Some(snapshot.normalize());
        self.snapshot = Some(snapshot);
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: SelectionSet) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// Rows to render; empty until the first load.
    pub fn result(&self) -> ListResult<V> {
        self.result.clone().unwrap_or_else(ListResult::empty)
    }

    /// Raw form of the last successful fetch, if any happened in this request.
    pub fn snapshot(&self) -> Option<&ListSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Number of list calls issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Replaces the query and fetches it.
    pub async fn load(&mut self, query: ListQuery) -> ApiResult<()> {
        self.query = query;
        self.reload().await
    }

    /// Fetches the current query again.
    ///
    /// On failure the last good rows stay in place; only a controller that
    /// never loaded falls back to an empty list.
    pub async fn reload(&mut self) -> ApiResult<()> {
        let policy = self.policy;
        self.reload_with(policy).await
    }

    async fn reload_with(&mut self, policy: SelectionPolicy) -> ApiResult<()> {
        let mut outcome = self.fetch().await;

        if let Ok((_, result)) = &outcome
            && self.query.page > result.total_pages.max(1)
        {
            self.query.page = 1;
            outcome = self.fetch().await;
        }

        let status = match outcome {
            Ok((snapshot, result)) => {
                self.result = Some(result);
                self.snapshot = Some(snapshot);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                if self.result.is_none() {
                    self.result = Some(ListResult::empty());
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        };

        let visible: Vec<&str> = self
            .result
            .as_ref()
            .map(|result| result.items.iter().map(V::id).collect())
            .unwrap_or_default();
        self.selection.reconcile(&visible, policy);

        status
    }

    async fn fetch(&mut self) -> ApiResult<(ListSnapshot, ListResult<V>)> {
        self.fetches += 1;
        let page = match self
            .backend
            .fetch_page(V::RESOURCE, self.query.backend_params())
            .await
        {
            Ok(page) => page,
            Err(ApiError::NotFound(_)) if V::RESOURCE.empty_on_not_found() => RawPage::default(),
            Err(err) => return Err(err),
        };
        Ok(self.paginate(page))
    }

    /// Applies client-side sorting and, when the backend ignored paging,
    /// slices the requested page out of the full list.
    fn paginate(&self, page: RawPage) -> (ListSnapshot, ListResult<V>) {
        let per_page = self.query.per_page.max(1);
        let offset = self.query.page.saturating_sub(1).saturating_mul(per_page);
        let unpaged = page.records.len() > per_page;

        let mut rows: Vec<(Value, V)> = page
            .records
            .into_iter()
            .map(|raw| {
                let view = V::normalize(Raw::new(&raw));
                (raw, view)
            })
            .collect();

        if let Some(field) = &self.query.sort_field {
            rows.sort_by(|(_, a), (_, b)| {
                let ordering = a.field(field).compare(&b.field(field));
                match self.query.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let total = match page.total {
            Some(total) => total as usize,
            None if unpaged => rows.len(),
            None => offset.saturating_add(rows.len()),
        };
        if unpaged {
            rows = rows.into_iter().skip(offset).take(per_page).collect();
        }
        let total_pages = match page.total_pages {
            Some(pages) if !unpaged => pages as usize,
            _ => total.div_ceil(per_page),
        };

        let (records, items): (Vec<Value>, Vec<V>) = rows.into_iter().unzip();
        (
            ListSnapshot {
                query: self.query.to_query_string(),
                records,
                total,
                total_pages,
            },
            ListResult {
                items,
                total,
                total_pages,
            },
        )
    }

    /// Runs `action` once per id, in order, without stopping at failures.
    ///
    /// Succeeded ids leave the selection and the list is reloaded with
    /// [`SelectionPolicy::ClearOnReload`]. The reload error, if any, is kept
    /// in [`ListController::last_error`].
    pub async fn apply_bulk_action(
        &mut self,
        action: BulkAction,
        ids: &[ResourceId],
    ) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();

        for id in ids {
            let Some(call) = calls::bulk(V::RESOURCE, action, id) else {
                outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    reason: "این عملیات برای این بخش پشتیبانی نمی‌شود".to_string(),
                });
                continue;
            };
            match self.backend.send(call).await {
                Ok(_) => {
                    self.selection.remove(id);
                    outcome.succeeded.push(id.clone());
                }
                Err(err) => {
                    log::warn!("Bulk {action} on {} {id} failed: {err}", V::RESOURCE);
                    outcome.failed.push(BulkFailure {
                        id: id.clone(),
                        reason: err.user_message(),
                    });
                }
            }
        }

        if let Err(err) = self.reload_with(SelectionPolicy::ClearOnReload).await {
            log::error!("Failed to reload {} after bulk {action}: {err}", V::RESOURCE);
        }
        outcome
    }

    /// Deletes one record, drops it from the selection and reloads.
    pub async fn delete(&mut self, id: &ResourceId) -> ApiResult<()> {
        self.backend.send(calls::delete(V::RESOURCE, id)).await?;
        self.selection.remove(id);
        if let Err(err) = self.reload().await {
            log::error!("Failed to reload {} after delete: {err}", V::RESOURCE);
        }
        Ok(())
    }

    pub async fn toggle_filter(&mut self, key: &str, value: &str) -> ApiResult<()> {
        self.query.toggle_filter(key, value);
        self.reload().await
    }

    pub async fn set_page(&mut self, page: usize) -> ApiResult<()> {
        self.query.set_page(page);
        self.reload().await
    }

    pub async fn sort_by(&mut self, field: &str) -> ApiResult<()> {
        self.query.sort_by(field);
        self.reload().await
    }

    pub async fn search(&mut self, term: &str) -> ApiResult<()> {
        self.query.search(term);
        self.reload().await
    }
}
