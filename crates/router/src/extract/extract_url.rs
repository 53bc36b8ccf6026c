//! URL query string extraction
//!
//! Allows handlers to receive strongly-typed query parameters through [`Query<T>`],
//! deserialized with `serde_qs`.

use crate::extract::{ExtractError, FromRequest, Query};
use crate::RequestContext;
use serde::Deserialize;

impl<T> FromRequest for Query<T>
where
    T: for<'de> Deserialize<'de>,
{
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        let query = req.uri().query().ok_or(ExtractError::MissingQuery)?;
        serde_qs::from_str::<T>(query).map(Query).map_err(ExtractError::invalid_query)
    }
}
