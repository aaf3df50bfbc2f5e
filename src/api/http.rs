//! `awc` implementation of [`AdminBackend`].

use std::time::Duration;

use actix_web::http::{Method, header};
use awc::Client;
use serde_json::Value;

use crate::api::envelope::read_response;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::{AdminBackend, ApiCall, ApiMethod};

/// Upper bound on a backend response body. Export pages can be large.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl From<ApiMethod> for Method {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => Method::GET,
            ApiMethod::Post => Method::POST,
            ApiMethod::Put => Method::PUT,
            ApiMethod::Patch => Method::PATCH,
            ApiMethod::Delete => Method::DELETE,
        }
    }
}

/// HTTP client bound to the backend base URL and, optionally, a bearer token.
///
/// One instance is built per worker; handlers derive a token-bearing copy
/// with [`HttpBackend::with_token`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Installs the `ring` provider as the process-wide rustls default.
///
/// awc's rustls connector cannot pick a provider on its own. Repeated calls
/// are no-ops once a provider is installed.
pub fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none()
        && rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
    {
        log::debug!("rustls crypto provider was installed concurrently");
    }
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        install_crypto_provider();
        let client = Client::builder()
            .timeout(timeout)
            .add_default_header((header::ACCEPT, "application/json"))
            .finish();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AdminBackend for HttpBackend {
    async fn send(&self, call: ApiCall) -> ApiResult<Value> {
        let url = self.url(&call.path);
        let method = call.method;
        let mut request = self.client.request(method.into(), url.as_str());

        if !call.query.is_empty() {
            request = request
                .query(&call.query)
                .map_err(|err| ApiError::Network(format!("Invalid query: {err}")))?;
        }
        if let Some(token) = &self.token {
            request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
        }

        let sent = match call.body {
            Some(body) => request.send_json(&body).await,
            None => request.send().await,
        };
        let mut response = sent.map_err(|err| {
            log::error!("Request to {url} failed: {err}");
            ApiError::Network(err.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .body()
            .limit(MAX_BODY_BYTES)
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let result = read_response(status, &body);
        if let Err(err) = &result {
            log::warn!("{method:?} {url} returned {err}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn base_url_is_joined_without_double_slash() {
        let backend = HttpBackend::new("https://admin.asllmarket.com/api/v1/", Duration::from_secs(1));
        assert_eq!(
            backend.url("/admin/users"),
            "https://admin.asllmarket.com/api/v1/admin/users"
        );
        assert!(backend.with_token("t").token.is_some());
    }

    #[actix_web::test]
    async fn client_builds_with_tls_provider_installed() {
        install_crypto_provider();
        install_crypto_provider();
        assert!(rustls::crypto::CryptoProvider::get_default().is_some());

        let backend = HttpBackend::new("https://admin.asllmarket.com", Duration::from_secs(1));
        assert_eq!(backend.url("/health"), "https://admin.asllmarket.com/health");
    }
}
