//! Onion-ordered middleware composition around a terminal handler.
//!
//! ```text
//! Pipeline::send(request).through([A, B]).then(T)
//!
//!   A.before -> B.before -> T -> B.after -> A.after
//! ```
//!
//! The chain is built from the inside out: `T` is wrapped by `B`, the result by `A`.
//! A pipeline lives for one dispatch only.

use crate::decorator::Decorator;
use crate::handler::RequestHandler;
use crate::middleware::{Middleware, Next};
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::Response;
use std::fmt;
use std::sync::Arc;

pub struct Pipeline {
    request: RequestContext,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    /// Starts a pipeline for `request`
    pub fn send(request: RequestContext) -> Self {
        Self { request, middlewares: Vec::new() }
    }

    /// Appends middleware, the first one given runs outermost
    #[must_use]
    pub fn through<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Wraps `terminal` in the middleware and runs the chain once
    pub async fn then(self, terminal: Arc<dyn RequestHandler>) -> Response<ResponseBody> {
        let chain = self.middlewares.iter().rev().fold(terminal, |inner, middleware| middleware.decorate(inner));
        chain.invoke(self.request).await
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("request", &self.request)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

/// One layer of the chain: a middleware bound to everything inside it
struct MiddlewareHandler {
    middleware: Arc<dyn Middleware>,
    next: Next,
}

#[async_trait]
impl RequestHandler for MiddlewareHandler {
    async fn invoke(&self, req: RequestContext) -> Response<ResponseBody> {
        self.middleware.handle(req, self.next.clone()).await
    }
}

impl Decorator<Arc<dyn RequestHandler>> for Arc<dyn Middleware> {
    type Out = Arc<dyn RequestHandler>;

    fn decorate(&self, raw: Arc<dyn RequestHandler>) -> Self::Out {
        Arc::new(MiddlewareHandler { middleware: Arc::clone(self), next: Next::new(raw) })
    }
}
