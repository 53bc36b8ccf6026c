use crate::extract::{ExtractError, FromRequest};
use crate::{PathParams, RequestContext};
use http::{HeaderMap, Method, Uri};

impl FromRequest for RequestContext {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.clone())
    }
}

impl FromRequest for Method {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.method().clone())
    }
}

impl FromRequest for Uri {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.uri().clone())
    }
}

impl FromRequest for HeaderMap {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.headers().clone())
    }
}

impl FromRequest for PathParams {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(req.path_params().clone())
    }
}
