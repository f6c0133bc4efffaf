//! The two-operation posts client: `list_posts` and `update_post`.
//!
//! Each call is one request/response exchange run as a plain future: build
//! with `PostClient`, execute with the `Transport`, parse with `PostClient`.
//! Nothing is cached or retried, and no state survives between calls, so
//! concurrent calls are independent. Dropping a pending future cancels the
//! call; parsing happens inside that future, so no decoded value can appear
//! after the drop.

use tracing::{debug, warn};

use crate::client::PostClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::Post;

#[derive(Debug, Clone)]
pub struct AsyncPostClient<T> {
    client: PostClient,
    transport: T,
}

impl<T: Transport> AsyncPostClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: PostClient::new(base_url),
            transport,
        }
    }

    /// The sans-IO client used to build and parse each exchange.
    pub fn client(&self) -> &PostClient {
        &self.client
    }

    /// Fetch the whole collection, in server order.
    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.send(self.client.build_list_posts()).await?;
        let posts = self
            .client
            .parse_list_posts(response)
            .inspect_err(|e| warn!(error = %e, "list posts rejected"))?;
        debug!(count = posts.len(), "listed posts");
        Ok(posts)
    }

    /// Replace `title` and `body` of `post.id` on the server.
    ///
    /// The returned post is the server's authoritative record. Repeating a
    /// call after an ambiguous transport failure is not guaranteed safe.
    pub async fn update_post(&self, post: &Post) -> Result<Post, ApiError> {
        let response = self.send(self.client.build_update_post(post)).await?;
        let updated = self
            .client
            .parse_update_post(response)
            .inspect_err(|e| warn!(id = post.id, error = %e, "update post rejected"))?;
        debug!(id = updated.id, "updated post");
        Ok(updated)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .await
            .inspect_err(|e| warn!(error = %e, "transport failed"))?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(feature = "reqwest")]
impl AsyncPostClient<crate::transport::ReqwestTransport> {
    /// Client backed by a default `ReqwestTransport`.
    pub fn with_reqwest(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::new(base_url, crate::transport::ReqwestTransport::new()?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::http::HttpMethod;

    type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;

    /// In-process transport that records every request and answers through
    /// a closure.
    struct FakeTransport {
        requests: Mutex<Vec<HttpRequest>>,
        respond: Responder,
    }

    impl FakeTransport {
        fn new(
            respond: impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        fn replying(status: u16, body: &'static str) -> Self {
            Self::new(move |_| Ok(HttpResponse::new(status, body)))
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let response = (self.respond)(&request);
            self.requests.lock().unwrap().push(request);
            response
        }
    }

    /// Answers an update by echoing the request body under the id in the path.
    fn echo(request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let id: u64 = request.path.rsplit('/').next().unwrap().parse().unwrap();
        let update: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        let post = Post::new(
            id,
            update["title"].as_str().unwrap(),
            update["body"].as_str().unwrap(),
        );
        Ok(HttpResponse::new(200, serde_json::to_string(&post).unwrap()))
    }

    struct PendingTransport;

    impl Transport for PendingTransport {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            std::future::pending().await
        }
    }

    fn client<T: Transport>(transport: T) -> AsyncPostClient<T> {
        AsyncPostClient::new("http://stub", transport)
    }

    #[tokio::test]
    async fn list_posts_decodes_single_record() {
        let c = client(FakeTransport::replying(200, r#"[{"id":1,"title":"A","body":"x"}]"#));
        let posts = c.list_posts().await.unwrap();
        assert_eq!(posts, vec![Post::new(1, "A", "x")]);

        let requests = c.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].path, "http://stub/posts");
    }

    #[tokio::test]
    async fn list_posts_preserves_length_and_fields() {
        let body = r#"[
            {"id":10,"title":"","body":"multi\nline"},
            {"id":2,"title":"ünïcödé","body":"  padded  "},
            {"id":7,"title":"dup","body":"dup"}
        ]"#;
        let c = client(FakeTransport::replying(200, body));
        let posts = c.list_posts().await.unwrap();
        assert_eq!(
            posts,
            vec![
                Post::new(10, "", "multi\nline"),
                Post::new(2, "ünïcödé", "  padded  "),
                Post::new(7, "dup", "dup"),
            ]
        );
    }

    #[tokio::test]
    async fn list_posts_empty_collection() {
        let c = client(FakeTransport::replying(200, "[]"));
        assert!(c.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_posts_non_200_is_remote_error() {
        let c = client(FakeTransport::replying(500, r#"[{"id":1,"title":"A","body":"x"}]"#));
        let err = c.list_posts().await.unwrap_err();
        assert!(matches!(err, ApiError::Remote { status: 500, .. }));
    }

    #[tokio::test]
    async fn list_posts_missing_field_is_decode_error() {
        let c = client(FakeTransport::replying(200, r#"[{"id":1,"title":"A"}]"#));
        let err = c.list_posts().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn transport_error_is_surfaced_verbatim() {
        let c = client(FakeTransport::new(|_| {
            Err(ApiError::Transport("connection refused".to_string()))
        }));
        let err = c.list_posts().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref msg) if msg == "connection refused"));
    }

    #[tokio::test]
    async fn update_post_sends_put_with_title_and_body() {
        let c = client(FakeTransport::replying(200, r#"{"id":1,"title":"A2","body":"x"}"#));
        let updated = c.update_post(&Post::new(1, "A2", "x")).await.unwrap();
        assert_eq!(updated, Post::new(1, "A2", "x"));

        let requests = c.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].path, "http://stub/posts/1");
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "A2", "body": "x"}));
    }

    #[tokio::test]
    async fn update_post_returns_server_record_even_when_different() {
        let c = client(FakeTransport::replying(
            200,
            r#"{"id":1,"title":"normalized","body":"server body"}"#,
        ));
        let updated = c.update_post(&Post::new(1, "A2", "x")).await.unwrap();
        assert_eq!(updated, Post::new(1, "normalized", "server body"));
    }

    #[tokio::test]
    async fn update_post_round_trips_through_echo_server() {
        let c = client(FakeTransport::new(echo));
        for post in [
            Post::new(1, "A2", "x"),
            Post::new(42, "", ""),
            Post::new(u64::MAX, "quote \" and \\ slash", "tab\tnewline\n"),
        ] {
            assert_eq!(c.update_post(&post).await.unwrap(), post);
        }
    }

    #[tokio::test]
    async fn update_post_unknown_id_is_not_found() {
        let c = client(FakeTransport::replying(404, "{}"));
        let err = c.update_post(&Post::new(999, "t", "b")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_post_missing_field_is_decode_error() {
        let c = client(FakeTransport::replying(200, r#"{"id":1,"title":"A2"}"#));
        let err = c.update_post(&Post::new(1, "A2", "x")).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn dropped_call_produces_no_value() {
        let c = client(PendingTransport);
        let result = tokio::time::timeout(Duration::from_millis(20), c.list_posts()).await;
        assert!(result.is_err());

        let result =
            tokio::time::timeout(Duration::from_millis(20), c.update_post(&Post::new(1, "a", "b")))
                .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let c = client(FakeTransport::new(echo));
        let a = Post::new(1, "one", "1");
        let b = Post::new(2, "two", "2");
        let (ra, rb) = tokio::join!(c.update_post(&a), c.update_post(&b));
        assert_eq!(ra.unwrap(), a);
        assert_eq!(rb.unwrap(), b);
        assert_eq!(c.transport.requests().len(), 2);
    }
}
