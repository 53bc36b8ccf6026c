//! Dispatches a handful of requests against a small router and prints the responses.

use http::{Method, Request};
use micro_router::extract::{Json, Query};
use micro_router::{handler_fn, PathParams, RequestContext, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Debug)]
struct Paging {
    page: u32,
}

async fn hello_world() -> &'static str {
    "hello world"
}

async fn show_user(params: PathParams) -> Json<serde_json::Value> {
    Json(json!({ "id": params.get("id"), "name": "zava" }))
}

async fn list_posts(Query(paging): Query<Paging>) -> String {
    format!("posts, page {}", paging.page)
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut builder = Router::builder();
    builder.get("/", handler_fn(hello_world)).name("home");
    builder.get("/users/{id}", handler_fn(show_user)).name("users.show");
    builder.get("/posts", handler_fn(list_posts));
    let router = builder.build().expect("router should be valid");

    for uri in ["/", "/users/42", "/posts?page=3", "/posts?page=x", "/nowhere"] {
        let request: RequestContext = Request::builder().method(Method::GET).uri(uri).body(Vec::<u8>::new()).unwrap().into();
        let response = router.handle(request).await;
        info!(uri, status = %response.status(), body = ?response.body(), "dispatched");
    }

    info!(url = ?router.url_for("users.show", [("id", "7")]), "reverse routing");
}
