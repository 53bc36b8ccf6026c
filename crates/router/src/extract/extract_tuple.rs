use crate::extract::{ExtractError, FromRequest};
use crate::RequestContext;

/// An optional argument never fails, a failed extraction becomes `None`
impl<T: FromRequest> FromRequest for Option<T> {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(T::from_request(req).ok())
    }
}

impl<T: FromRequest> FromRequest for Result<T, ExtractError> {
    fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
        Ok(T::from_request(req))
    }
}

macro_rules! impl_from_request_for_tuple {
    ($($param:ident)*) => {
        impl<$($param,)*> FromRequest for ($($param,)*)
        where
            $($param: FromRequest,)*
        {
            #[allow(unused_variables, reason = "the empty tuple ignores the request")]
            fn from_request(req: &RequestContext) -> Result<Self, ExtractError> {
                Ok(($($param::from_request(req)?,)*))
            }
        }
    };
}

impl_from_request_for_tuple! {}
impl_from_request_for_tuple! { A }
impl_from_request_for_tuple! { A B }
impl_from_request_for_tuple! { A B C }
impl_from_request_for_tuple! { A B C D }
impl_from_request_for_tuple! { A B C D E }
impl_from_request_for_tuple! { A B C D E F }
impl_from_request_for_tuple! { A B C D E F G }
impl_from_request_for_tuple! { A B C D E F G H }
impl_from_request_for_tuple! { A B C D E F G H I }
impl_from_request_for_tuple! { A B C D E F G H I J }
impl_from_request_for_tuple! { A B C D E F G H I J K }
impl_from_request_for_tuple! { A B C D E F G H I J K L }
