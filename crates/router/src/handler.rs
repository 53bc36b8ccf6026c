use crate::extract::FromRequest;
use crate::fn_trait::FnTrait;
use crate::responder::Responder;
use crate::{RequestContext, ResponseBody};
use async_trait::async_trait;
use http::Response;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The terminal step of a pipeline: turns a request into a response.
///
/// Route actions, resolved controller methods and the fallback handler all implement this trait.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: RequestContext) -> Response<ResponseBody>;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    async fn invoke(&self, req: RequestContext) -> Response<ResponseBody> {
        (**self).invoke(req).await
    }
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    async fn invoke(&self, req: RequestContext) -> Response<ResponseBody> {
        (**self).invoke(req).await
    }
}

/// a `FnTrait` holder which represents any async Fn
pub struct FnHandler<F, Args> {
    f: F,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

impl<F, Args> fmt::Debug for FnHandler<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("f", &std::any::type_name::<F>()).finish()
    }
}

/// Wraps an async function into a [`RequestHandler`].
///
/// Every argument of `f` is extracted from the request with [`FromRequest`], the
/// return value is normalized into a response with [`Responder`].
pub fn handler_fn<F, Args>(f: F) -> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Args> RequestHandler for FnHandler<F, Args>
where
    F: FnTrait<Args>,
    F::Output: Responder,
    Args: FromRequest + Send,
{
    async fn invoke(&self, req: RequestContext) -> Response<ResponseBody> {
        let args = match Args::from_request(&req) {
            Ok(args) => args,
            Err(e) => return e.response_to(&req),
        };
        let responder = self.f.call(args).await;
        responder.response_to(&req)
    }
}
