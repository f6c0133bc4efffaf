//! The seam between request building and request execution.
//!
//! # Design
//! A `Transport` turns an `HttpRequest` into an `HttpResponse` and nothing
//! more: every status code, 4xx and 5xx included, comes back as data so the
//! `PostClient` parse step owns status interpretation. Only failures that
//! leave no response (connect, timeout, body read) become
//! `ApiError::Transport`.
//!
//! `ReqwestTransport` (feature `reqwest`) is fully async. Dropping its future
//! drops the in-flight request: the connection is closed and nothing more is
//! written to it or read from it.

use std::future::Future;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes HTTP requests on behalf of `AsyncPostClient`.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::time::Duration;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Async reqwest client. Cheap to clone; clones share the connection pool.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<Self, ApiError> {
            Self::with_timeout(DEFAULT_TIMEOUT)
        }

        /// `timeout` covers the whole exchange, from connect until the
        /// response body has been read.
        pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(transport_error)?;
            Ok(Self::from_client(client))
        }

        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl Transport for ReqwestTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Put => reqwest::Method::PUT,
            };
            let mut builder = self.client.request(method, request.path.as_str());
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| {
                    v.to_str()
                        .ok()
                        .map(|v| (k.as_str().to_string(), v.to_string()))
                })
                .collect();
            let bytes = response.bytes().await.map_err(transport_error)?;

            // A failure body is only diagnostic; a success body must be
            // decoded exactly or not at all.
            let body = match String::from_utf8(Vec::from(bytes)) {
                Ok(body) => body,
                Err(e) if !status.is_success() => String::from_utf8_lossy(e.as_bytes()).into_owned(),
                Err(e) => {
                    return Err(ApiError::Decode(format!("response body is not UTF-8: {}", e.utf8_error())))
                }
            };

            Ok(HttpResponse {
                status: status.as_u16(),
                headers,
                body,
            })
        }
    }

    fn transport_error(err: reqwest::Error) -> ApiError {
        ApiError::Transport(err.to_string())
    }
}
