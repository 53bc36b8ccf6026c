//! Request values handed through the middleware pipeline to route actions.
//!
//! This module contains the two request-side types of the router:
//! - `RequestContext`: an owned snapshot of one request plus the path parameters bound at dispatch
//! - `PathParams`: the ordered `(name, value)` pairs extracted from the matched path template

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};

/// An owned snapshot of an HTTP request.
///
/// Middleware receive the context by value and hand it, possibly modified, to the next
/// step of the pipeline. The router fills in [`PathParams`] once a route has matched.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
}

impl RequestContext {
    /// Creates a context with an empty body and no headers
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            path_params: PathParams::empty(),
        }
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URI of the request
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path component of the URI, `/` when the URI carries no path
    pub fn path(&self) -> &str {
        match self.uri.path() {
            "" => "/",
            path => path,
        }
    }

    /// Returns the HTTP version of the request
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the HTTP headers of the request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the HTTP headers of the request for modification
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the buffered request body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path parameters bound by the matched route
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Shortcut for `path_params().get(name)`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    pub(crate) fn set_path_params(&mut self, path_params: PathParams) {
        self.path_params = path_params;
    }
}

impl<B> From<http::Request<B>> for RequestContext
where
    B: Into<Bytes>,
{
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body: body.into(),
            path_params: PathParams::empty(),
        }
    }
}

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// Path parameters are the `{name}` segments of a route's path template. For the template
/// `/posts/{post}/comments/{comment}` matched against `/posts/1/comments/5`, the parameters
/// are `post = "1"` and `comment = "5"`, in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
}

impl PathParams {
    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self { params: Vec::new() }
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Gets the value of a path parameter by its name
    /// Returns None if the parameter doesn't exist
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.params.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
    }

    /// Gets the value of the `index`-th placeholder of the template
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(|(_, value)| value.as_str())
    }

    /// Iterates `(name, value)` pairs in template order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PathParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
