//! Scripted in-memory backend for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{AdminBackend, ApiCall, ApiMethod};

type RouteKey = (ApiMethod, String);

/// Answers calls from canned responses keyed by method and path and records
/// every call it receives. Unknown routes answer 404.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    sticky: Mutex<HashMap<RouteKey, ApiResult<Value>>>,
    queued: Mutex<HashMap<RouteKey, VecDeque<ApiResult<Value>>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every matching call with `response`.
    pub fn respond(&self, method: ApiMethod, path: &str, response: ApiResult<Value>) -> &Self {
        if let Ok(mut sticky) = self.sticky.lock() {
            sticky.insert((method, path.to_string()), response);
        }
        self
    }

    /// Answers the next matching call with `response`, ahead of any sticky answer.
    pub fn respond_once(&self, method: ApiMethod, path: &str, response: ApiResult<Value>) -> &Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued
                .entry((method, path.to_string()))
                .or_default()
                .push_back(response);
        }
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self, method: ApiMethod, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }
}

impl AdminBackend for MemoryBackend {
    async fn send(&self, call: ApiCall) -> ApiResult<Value> {
        let key = (call.method, call.path.clone());
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        let queued = self
            .queued
            .lock()
            .ok()
            .and_then(|mut queued| queued.get_mut(&key).and_then(VecDeque::pop_front));
        if let Some(response) = queued {
            return response;
        }

        self.sticky
            .lock()
            .ok()
            .and_then(|sticky| sticky.get(&key).cloned())
            .unwrap_or_else(|| Err(ApiError::NotFound("Not Found".to_string())))
    }
}
