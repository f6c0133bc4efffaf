use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Full replacement of a post's mutable fields; both are required.
#[derive(Deserialize)]
pub struct UpdatePost {
    pub title: String,
    pub body: String,
}

pub type Db = Arc<RwLock<BTreeMap<u64, Post>>>;

/// Posts served by `app()`.
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "Hello".to_string(),
            body: "First post.".to_string(),
        },
        Post {
            id: 2,
            title: "Second".to_string(),
            body: "Another post.".to_string(),
        },
        Post {
            id: 3,
            title: "Third".to_string(),
            body: "Yet another post.".to_string(),
        },
    ]
}

pub fn app() -> Router {
    app_with_posts(seed_posts())
}

pub fn app_with_posts(posts: Vec<Post>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        posts.into_iter().map(|post| (post.id, post)).collect(),
    ));
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/{id}", put(update_post))
        .layer(DefaultBodyLimit::disable())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    let posts = db.read().await;
    tracing::debug!(count = posts.len(), "list posts");
    Json(posts.values().cloned().collect())
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdatePost>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.write().await;
    let Some(post) = posts.get_mut(&id) else {
        tracing::info!(id, "update of unknown post");
        return Err(StatusCode::NOT_FOUND);
    };
    post.title = input.title;
    post.body = input.body;
    tracing::debug!(id, "post updated");
    Ok(Json(post.clone()))
}
