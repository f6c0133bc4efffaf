//! Typed client core for a remote posts collection.
//!
//! # Overview
//! Two operations against `{base_url}/posts`: list every post, and replace
//! the title and body of one post by id. `PostClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network
//! (host-does-IO pattern); `AsyncPostClient` drives a `Transport` between
//! the two halves and exposes each operation as a single async call.
//!
//! # Design
//! - `PostClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   C ABI can reuse it unchanged.
//! - Errors fall into transport, remote status, and decode failures; none
//!   are retried or recovered locally.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod async_client;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use async_client::AsyncPostClient;
pub use client::PostClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::Post;
