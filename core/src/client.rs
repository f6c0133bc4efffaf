//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping this half of the
//! crate deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Post;

/// Synchronous, stateless client for the posts API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `AsyncPostClient` for the version that drives a
/// `Transport` between the two halves.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/posts", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build a full replacement of `title` and `body` for `post.id`. The id
    /// travels in the path, never in the body.
    pub fn build_update_post(&self, post: &Post) -> HttpRequest {
        let body = serde_json::json!({ "title": post.title, "body": post.body });
        HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/posts/{}", self.base_url, post.id),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body.to_string()),
        }
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        decode(response)
    }

    /// The returned post is the server's record and may differ from the one
    /// that was sent.
    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Map any status other than `expected` to `ApiError::Remote`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::Remote {
        status: response.status,
        body: response.body.clone(),
    })
}
