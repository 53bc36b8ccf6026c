//! Middleware: the "given a request and a continuation, produce a response" capability.
//!
//! A middleware either calls [`Next::run`] and returns (possibly post-processes) the
//! inner response, or returns its own response without calling it, which short-circuits
//! every inner middleware and the route action.
//!
//! Routes refer to middleware through [`MiddlewareRef`]: either a live instance or a name
//! resolved at build time by a [`MiddlewareResolver`] such as [`MiddlewareRegistry`].

mod registry;

pub use registry::MiddlewareRegistry;
pub use registry::MiddlewareResolver;
pub use registry::{resolver_fn, FnResolver};

#[cfg(test)]
pub use registry::MockMiddlewareResolver;

use crate::handler::RequestHandler;
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::Response;
use std::fmt;
use std::sync::Arc;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, req: RequestContext, next: Next) -> Response<ResponseBody>;
}

/// The continuation handed to a [`Middleware`]: the rest of the chain including the action.
#[derive(Clone)]
pub struct Next {
    inner: Arc<dyn RequestHandler>,
}

impl Next {
    pub(crate) fn new(inner: Arc<dyn RequestHandler>) -> Self {
        Self { inner }
    }

    /// Runs the inner middleware and, at the end of the chain, the route action
    pub async fn run(self, req: RequestContext) -> Response<ResponseBody> {
        self.inner.invoke(req).await
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}

/// A [`Middleware`] backed by a closure, see [`middleware_fn`]
#[derive(Clone, Copy)]
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").field("f", &std::any::type_name::<F>()).finish()
    }
}

/// Creates a middleware from an async closure.
///
/// # Example
/// ```
/// use micro_router::middleware::middleware_fn;
///
/// let timing = middleware_fn(|req, next| async move {
///     let mut response = next.run(req).await;
///     response.headers_mut().insert("x-handled-by", http::HeaderValue::from_static("router"));
///     response
/// });
/// ```
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(RequestContext, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Response<ResponseBody>> + Send,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(RequestContext, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Response<ResponseBody>> + Send,
{
    async fn handle(&self, req: RequestContext, next: Next) -> Response<ResponseBody> {
        (self.f)(req, next).await
    }
}

/// How a route refers to one of its middleware
#[derive(Clone)]
pub enum MiddlewareRef {
    /// An already constructed middleware
    Instance(Arc<dyn Middleware>),
    /// An alias or group name, resolved when the router is built
    Named(String),
}

impl MiddlewareRef {
    pub fn instance<M: Middleware + 'static>(middleware: M) -> Self {
        Self::Instance(Arc::new(middleware))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Debug for MiddlewareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiddlewareRef::Instance(_) => f.write_str("Instance(..)"),
            MiddlewareRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareRef {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self::Instance(middleware)
    }
}
