use crate::error::ConfigurationError;
use crate::handler::{FnHandler, RequestHandler};
use crate::middleware::MiddlewareRef;
use crate::router::method::RouteMethod;
use crate::router::pattern::fill_template;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// What a route runs once its middleware let the request through
#[derive(Clone)]
pub enum Action {
    /// A handler invoked directly
    Invocable(Arc<dyn RequestHandler>),
    /// A method of a controller, looked up through the
    /// [`ControllerResolver`](crate::controller::ControllerResolver) when the router is built
    Controller { controller: String, method: String },
}

impl Action {
    pub fn handler<H: RequestHandler + 'static>(handler: H) -> Self {
        Action::Invocable(Arc::new(handler))
    }

    pub fn controller(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Action::Controller { controller: controller.into(), method: method.into() }
    }

    /// Parses the `"Controller@method"` notation
    ///
    /// ```
    /// use micro_router::router::Action;
    ///
    /// assert!(Action::parse("UserController@index").is_ok());
    /// assert!(Action::parse("UserController").is_err());
    /// ```
    pub fn parse(action: &str) -> Result<Self, ConfigurationError> {
        match action.split_once('@') {
            Some((controller, method)) if !controller.is_empty() && !method.is_empty() && !method.contains('@') => {
                Ok(Action::controller(controller, method))
            }
            _ => Err(ConfigurationError::InvalidAction { action: action.to_owned() }),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Invocable(_) => f.write_str("Invocable(..)"),
            Action::Controller { controller, method } => write!(f, "Controller({controller}@{method})"),
        }
    }
}

impl<F, Args> From<FnHandler<F, Args>> for Action
where
    FnHandler<F, Args>: RequestHandler + 'static,
{
    fn from(handler: FnHandler<F, Args>) -> Self {
        Action::handler(handler)
    }
}

impl From<Arc<dyn RequestHandler>> for Action {
    fn from(handler: Arc<dyn RequestHandler>) -> Self {
        Action::Invocable(handler)
    }
}

impl From<(&str, &str)> for Action {
    fn from((controller, method): (&str, &str)) -> Self {
        Action::controller(controller, method)
    }
}

impl From<(String, String)> for Action {
    fn from((controller, method): (String, String)) -> Self {
        Action::controller(controller, method)
    }
}

/// One registered route, with its path and middleware already merged with the enclosing groups
#[derive(Debug, Clone)]
pub struct Route {
    method: RouteMethod,
    path: String,
    action: Action,
    middleware: Vec<MiddlewareRef>,
    name: Option<String>,
}

impl Route {
    pub(crate) fn new(method: RouteMethod, path: String, action: Action, middleware: Vec<MiddlewareRef>) -> Self {
        Self { method, path, action, middleware, name: None }
    }

    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// The full path template, group prefixes included
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Group middleware first, then the middleware given to the route itself
    pub fn middleware(&self) -> &[MiddlewareRef] {
        &self.middleware
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Every route in registration order plus the name index
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    names: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route and returns its index
    pub(crate) fn push(&mut self, route: Route) -> usize {
        self.routes.push(route);
        self.routes.len() - 1
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn names(&self) -> &HashMap<String, String> {
        &self.names
    }

    /// Names the route at `index`, a name used before now points to this route
    pub(crate) fn set_name(&mut self, index: usize, name: String) {
        let route = &mut self.routes[index];
        if let Some(previous) = self.names.get(&name).filter(|previous| **previous != route.path) {
            warn!(name = name.as_str(), previous = previous.as_str(), path = route.path.as_str(), "route name is already taken, overwrite it");
        }

        self.names.insert(name.clone(), route.path.clone());
        route.name = Some(name);
    }

    pub(crate) fn append_middleware(&mut self, index: usize, middleware: impl IntoIterator<Item = MiddlewareRef>) {
        self.routes[index].middleware.extend(middleware);
    }

    /// Path of the route named `name` with every supplied parameter substituted
    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.names.get(name).map(|template| fill_template(template, params))
    }
}
