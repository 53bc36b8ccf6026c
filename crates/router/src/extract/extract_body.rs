use crate::extract::{ExtractError, Form, FromRequest, Json};
use crate::RequestContext;
use bytes::Bytes;
use mime::Mime;
use serde::Deserialize;

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_WWW_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

impl FromRequest for Bytes {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.body().clone())
    }
}

impl FromRequest for String {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        String::from_utf8(req.body().to_vec()).map_err(|_utf8| ExtractError::invalid_body("request body is not utf8"))
    }
}

impl<T> FromRequest for Json<T>
where
    T: for<'de> Deserialize<'de>,
{
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        ensure_content_type(req, APPLICATION_JSON)?;
        serde_json::from_slice::<T>(req.body()).map(Json).map_err(ExtractError::invalid_body)
    }
}

impl<T> FromRequest for Form<T>
where
    T: for<'de> Deserialize<'de>,
{
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        ensure_content_type(req, APPLICATION_WWW_FORM_URLENCODED)?;
        serde_urlencoded::from_bytes::<T>(req.body()).map(Form).map_err(ExtractError::invalid_body)
    }
}

/// Compares only `type/subtype`, parameters such as `charset` are ignored
fn ensure_content_type(req: &RequestContext, expected: &'static str) -> Result<(), ExtractError> {
    let unsupported = || ExtractError::UnsupportedContentType { expected };

    let content_type = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Mime>().ok())
        .ok_or_else(unsupported)?;

    if content_type.essence_str() == expected { Ok(()) } else { Err(unsupported()) }
}
