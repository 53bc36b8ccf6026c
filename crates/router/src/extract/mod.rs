//! Typed extraction of handler arguments from a [`RequestContext`].
//!
//! Every argument of a function passed to [`handler_fn`](crate::handler_fn) implements
//! [`FromRequest`]. A failed extraction short-circuits the action with a 4xx response.

mod extract_body;
mod extract_header;
mod extract_tuple;
mod extract_url;

use crate::responder::Responder;
use crate::{RequestContext, ResponseBody};
use http::{Response, StatusCode};
use thiserror::Error;

/// Builds a value from the request before the action runs
pub trait FromRequest: Sized {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError>;
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("request has no query string")]
    MissingQuery,

    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },

    #[error("expect content type {expected}")]
    UnsupportedContentType { expected: &'static str },

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },
}

impl ExtractError {
    pub fn invalid_query<S: ToString>(reason: S) -> Self {
        Self::InvalidQuery { reason: reason.to_string() }
    }

    pub fn invalid_body<S: ToString>(reason: S) -> Self {
        Self::InvalidBody { reason: reason.to_string() }
    }
}

impl Responder for ExtractError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            ExtractError::UnsupportedContentType { .. } => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string()).response_to(req)
            }
            ExtractError::MissingQuery | ExtractError::InvalidQuery { .. } | ExtractError::InvalidBody { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string()).response_to(req)
            }
        }
    }
}

/// Represented as form data
///
/// when `post` as a `application/x-www-form-urlencoded`, we can using this struct to inject data,
/// note: the struct must impl [`serde::Deserialize`]
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use micro_router::extract::Form;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Form(params) : Form<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
#[derive(Debug)]
pub struct Form<T>(pub T);

/// Represented as json data
///
/// As an argument it deserializes an `application/json` request body; as a return value
/// it serializes `T` into a JSON response.
///
/// # Example
/// ```
/// # use serde::{Deserialize, Serialize};
/// # use micro_router::extract::Json;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Serialize, Debug)]
/// struct User {
///     name: String,
/// }
///
/// pub async fn handle(Json(user) : Json<User>) -> Json<User> {
///     Json(user)
/// }
/// ```
#[derive(Debug)]
pub struct Json<T>(pub T);

/// Represented as url query data
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use micro_router::extract::Query;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     page: u32,
/// }
///
/// pub async fn handle(Query(params) : Query<Params>) -> String {
///     format!("page {}", params.page)
/// }
/// ```
#[derive(Debug)]
pub struct Query<T>(pub T);
