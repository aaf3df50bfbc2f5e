//! Client side of the ASL Market REST backend.
//!
//! Services describe a request as an [`ApiCall`] and hand it to an
//! [`AdminBackend`]. The production backend is [`http::HttpBackend`]; tests
//! use [`memory::MemoryBackend`].

use serde_json::Value;

use crate::api::envelope::{RawPage, extract_page, extract_record};
use crate::api::errors::ApiResult;
use crate::domain::resource::Resource;

pub mod calls;
pub mod envelope;
pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod memory;
pub mod toast;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One backend request, relative to the configured API base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiCall {
    pub method: ApiMethod,
    pub path: String,
    /// Query pairs in order; keys may repeat.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiCall {
    fn new(method: ApiMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(ApiMethod::Post, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(ApiMethod::Put, path).body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(ApiMethod::Patch, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Delete, path)
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }
}

/// Anything able to execute an [`ApiCall`] and return the raw JSON body.
#[allow(async_fn_in_trait)]
pub trait AdminBackend {
    async fn send(&self, call: ApiCall) -> ApiResult<Value>;

    /// Fetches one list page and unwraps its envelope.
    async fn fetch_page(
        &self,
        resource: Resource,
        query: Vec<(String, String)>,
    ) -> ApiResult<RawPage> {
        let body = self.send(calls::list(resource, query)).await?;
        Ok(extract_page(&body, resource.list_keys()))
    }

    /// Fetches one record and unwraps its envelope.
    async fn fetch_record(&self, call: ApiCall, record_keys: &[&str]) -> ApiResult<Value> {
        let body = self.send(call).await?;
        Ok(extract_record(&body, record_keys))
    }
}
