//! A request router with nested groups, named routes, middleware pipelines and resource routes.
//!
//! Routes are registered on a [`RouterBuilder`] and frozen into a [`Router`] by
//! [`RouterBuilder::build`], which resolves every middleware and controller reference up front.
//! The built router is immutable and dispatches requests concurrently.
//!
//! ```
//! use micro_router::router::GroupContextFrame;
//! use micro_router::{handler_fn, PathParams, RequestContext, Router};
//! use http::{Method, Uri};
//!
//! async fn show_user(params: PathParams) -> String {
//!     format!("user {}", params.get("id").unwrap_or("?"))
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut builder = Router::builder();
//! builder.group(GroupContextFrame::new().prefix("api"), |api| {
//!     api.get("/users/{id}", handler_fn(show_user)).name("users.show");
//! });
//! let router = builder.build().unwrap();
//!
//! let url = router.url_for("users.show", [("id", "7")]).unwrap();
//! assert_eq!(url, "/api/users/7");
//!
//! let response = router.handle(RequestContext::new(Method::GET, Uri::from_static("/api/users/7"))).await;
//! assert_eq!(response.body().as_bytes(), Some(&b"user 7"[..]));
//! # });
//! ```

mod body;
mod config;
mod decorator;
mod error;
mod fn_trait;
mod handler;
mod pipeline;
mod request;
mod responder;

pub mod controller;
pub mod extract;
pub mod middleware;
pub mod router;

pub use body::BoxError;
pub use body::ResponseBody;
pub use config::RouterConfig;
pub use decorator::Decorator;
pub use error::ConfigurationError;
pub use fn_trait::FnTrait;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use middleware::{middleware_fn, Middleware, Next};
pub use pipeline::Pipeline;
pub use request::PathParams;
pub use request::RequestContext;
pub use responder::Responder;
pub use router::{ResponseEmitter, Router, RouterBuilder};
