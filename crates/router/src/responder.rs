//! Response handling module that converts action results into HTTP responses.
//!
//! This module provides the [`Responder`] trait which defines how the value returned by a
//! route action is normalized into a response:
//! - a `Response` passes through unchanged
//! - structured values (`Json`, `serde_json::Value`, maps, lists) become a JSON body with status 200
//! - text becomes a 200 plain text body
//! - no value (`()` or `None`) becomes an empty 200 response

use crate::extract::Json;
use crate::{RequestContext, ResponseBody};
use http::{HeaderValue, Response, StatusCode};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::hash::BuildHasher;
use tracing::warn;

const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// A trait for types that can be converted into HTTP responses.
///
/// Types implementing this trait can be returned directly from request handlers
/// and will be automatically converted into HTTP responses.
pub trait Responder {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody>;
}

/// Implementation for Result allows handlers to return Result types directly.
/// The Ok and Err variants must both implement Responder.
impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

/// None case returns an empty response.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

/// Pre-built responses pass through, only the body is converted.
impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

impl<T: Responder> Responder for (T, StatusCode) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (responder, status) = self;
        (status, responder).response_to(req)
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

/// Implementation for unit type () returns an empty response.
impl Responder for () {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        text_response(ResponseBody::from(self))
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        text_response(ResponseBody::from(self))
    }
}

impl<T: Serialize> Responder for Json<T> {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        json_response(&self.0)
    }
}

impl<T: Serialize> Responder for Vec<T> {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        json_response(&self)
    }
}

impl Responder for serde_json::Value {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        json_response(&self)
    }
}

impl<K, V, S> Responder for HashMap<K, V, S>
where
    K: Serialize + Eq + std::hash::Hash,
    V: Serialize,
    S: BuildHasher,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        json_response(&self)
    }
}

impl<K: Serialize, V: Serialize> Responder for BTreeMap<K, V> {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        json_response(&self)
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        match self {}
    }
}

fn text_response(body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    response.headers_mut().insert(http::header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF_8));
    response
}

fn json_response<T: Serialize + ?Sized>(value: &T) -> Response<ResponseBody> {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            let mut response = Response::new(ResponseBody::from(bytes));
            response
                .headers_mut()
                .insert(http::header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
            response
        }
        Err(e) => {
            warn!(cause = %e, "failed to serialize json response");
            let mut response = Response::new(ResponseBody::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}
