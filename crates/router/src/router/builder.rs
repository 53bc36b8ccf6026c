use crate::config::RouterConfig;
use crate::controller::{Controller, ControllerResolver};
use crate::error::ConfigurationError;
use crate::handler::RequestHandler;
use crate::middleware::{Middleware, MiddlewareRef, MiddlewareResolver, MiddlewareRegistry};
use crate::router::group::{GroupContextFrame, GroupContextStack};
use crate::router::method::RouteMethod;
use crate::router::pattern::{normalize_path, PathPattern};
use crate::router::registrar::RouteRegistrar;
use crate::router::resource::ResourceOptions;
use crate::router::route::{Action, Route, RouteTable};
use crate::router::{CompiledRoute, Router};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// The mutable registration phase of a [`Router`].
///
/// Routes, groups and resources are registered here; [`RouterBuilder::build`] resolves every
/// middleware and controller reference, compiles every path template and freezes the result.
pub struct RouterBuilder {
    table: RouteTable,
    groups: GroupContextStack,
    global_middleware: Vec<MiddlewareRef>,
    middleware_resolver: Box<dyn MiddlewareResolver>,
    controller_resolver: Option<Box<dyn ControllerResolver>>,
    fallback: Option<Action>,
    config: RouterConfig,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            table: RouteTable::new(),
            groups: GroupContextStack::new(),
            global_middleware: Vec::new(),
            middleware_resolver: Box::new(MiddlewareRegistry::new()),
            controller_resolver: None,
            fallback: None,
            config: RouterConfig::default(),
        }
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("table", &self.table)
            .field("groups", &self.groups)
            .field("global_middleware", &self.global_middleware)
            .field("fallback", &self.fallback)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&mut self, config: RouterConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Resolves the middleware names used by routes, groups and global middleware
    pub fn middleware_resolver<R: MiddlewareResolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.middleware_resolver = Box::new(resolver);
        self
    }

    /// Instantiates the controllers named by controller actions
    pub fn controller_resolver<R: ControllerResolver + 'static>(&mut self, resolver: R) -> &mut Self {
        self.controller_resolver = Some(Box::new(resolver));
        self
    }

    /// Middleware wrapping every matched route, outside of any group middleware
    pub fn global_middleware<I>(&mut self, middleware: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<MiddlewareRef>,
    {
        self.global_middleware.extend(middleware.into_iter().map(Into::into));
        self
    }

    /// Invoked instead of the plain 404 response when no route matches
    pub fn fallback(&mut self, action: impl Into<Action>) -> &mut Self {
        self.fallback = Some(action.into());
        self
    }

    /// Registers a route under the current group context.
    ///
    /// `path` is joined to the group prefix and normalized: `"users/"` inside a group with prefix
    /// `"api"` becomes `/api/users`. Name the route through the returned registrar,
    /// `builder.get("/users", action).name("users.index")`, or use [`RouterBuilder::add_named_route`].
    pub fn add_route(&mut self, method: RouteMethod, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        let path = normalize_path(&format!("{}/{}", self.groups.effective_prefix(), path));
        let middleware = self.groups.effective_middleware();
        let action = action.into();
        debug!(%method, path = path.as_str(), ?action, "register route");

        let index = self.table.push(Route::new(method, path, action, middleware));
        RouteRegistrar::new(&mut self.table, index, self.groups.effective_name_prefix())
    }

    /// [`RouterBuilder::add_route`] with an optional name, prefixed like [`RouteRegistrar::name`]
    pub fn add_named_route(
        &mut self,
        method: RouteMethod,
        path: &str,
        action: impl Into<Action>,
        name: Option<&str>,
    ) -> RouteRegistrar<'_> {
        let mut registrar = self.add_route(method, path, action);
        if let Some(name) = name {
            registrar.name(name);
        }
        registrar
    }

    pub fn get(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Get, path, action)
    }

    pub fn post(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Post, path, action)
    }

    pub fn put(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Put, path, action)
    }

    pub fn patch(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Patch, path, action)
    }

    pub fn delete(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Delete, path, action)
    }

    /// Registers a route matching every request method
    pub fn any(&mut self, path: &str, action: impl Into<Action>) -> RouteRegistrar<'_> {
        self.add_route(RouteMethod::Any, path, action)
    }

    /// Runs `routes` with `frame` pushed on the group context, popping it afterwards.
    ///
    /// ```
    /// use micro_router::router::GroupContextFrame;
    /// use micro_router::{handler_fn, Router};
    ///
    /// let mut builder = Router::builder();
    /// builder.group(GroupContextFrame::new().prefix("api"), |api| {
    ///     api.group(GroupContextFrame::new().prefix("v1"), |v1| {
    ///         v1.get("/users", handler_fn(|| async { "users" })).name("users");
    ///     });
    /// });
    /// assert_eq!(builder.url_for("users", Vec::<(&str, &str)>::new()).as_deref(), Some("/api/v1/users"));
    /// ```
    pub fn group<F>(&mut self, frame: GroupContextFrame, routes: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.groups.push(frame);
        routes(self);
        self.groups.pop();
        self
    }

    /// Registers the conventional CRUD routes of `name`, all bound to methods of `controller`.
    ///
    /// | method    | path                | action  | name            |
    /// |-----------|---------------------|---------|-----------------|
    /// | GET       | `/{name}`           | index   | `{name}.index`  |
    /// | GET       | `/{name}/create`    | create  | `{name}.create` |
    /// | POST      | `/{name}`           | store   | `{name}.store`  |
    /// | GET       | `/{name}/{id}`      | show    | `{name}.show`   |
    /// | GET       | `/{name}/{id}/edit` | edit    | `{name}.edit`   |
    /// | PUT,PATCH | `/{name}/{id}`      | update  | `{name}.update` |
    /// | DELETE    | `/{name}/{id}`      | destroy | `{name}.destroy`|
    pub fn resource(&mut self, name: &str, controller: &str, options: &ResourceOptions) -> &mut Self {
        for action in options.actions() {
            for (method, path) in action.routes(name) {
                self.add_route(method, &path, Action::controller(controller, action.as_str()))
                    .name(format!("{name}.{action}"));
            }
        }
        self
    }

    /// The routes registered so far, in registration order
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.table.url_for(name, params)
    }

    /// Freezes the registered routes into a [`Router`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for the first middleware name, controller or controller
    /// method that can not be resolved, and for the first malformed path template.
    pub fn build(self) -> Result<Router, ConfigurationError> {
        let routes = self.table.len();
        let result = self.compile();
        match &result {
            Ok(_) => debug!(routes, "router built"),
            Err(e) => error!(cause = %e, "failed to build router"),
        }
        result
    }

    fn compile(self) -> Result<Router, ConfigurationError> {
        let mut actions = ActionResolver::new(self.controller_resolver.as_deref());
        let middleware_resolver = &*self.middleware_resolver;

        let global_middleware = resolve_middleware(&self.global_middleware, middleware_resolver)?;
        let routes = self
            .table
            .routes()
            .iter()
            .map(|route| {
                Ok(CompiledRoute {
                    method: route.method(),
                    path: route.path().to_owned(),
                    name: route.name().map(ToOwned::to_owned),
                    pattern: PathPattern::compile(route.path())?,
                    middleware: resolve_middleware(route.middleware(), middleware_resolver)?,
                    handler: actions.resolve(route.action())?,
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;
        let fallback = self.fallback.as_ref().map(|action| actions.resolve(action)).transpose()?;

        Ok(Router {
            routes,
            names: self.table.names().clone(),
            global_middleware,
            fallback,
            config: self.config,
        })
    }
}

fn resolve_middleware(
    refs: &[MiddlewareRef],
    resolver: &dyn MiddlewareResolver,
) -> Result<Vec<Arc<dyn Middleware>>, ConfigurationError> {
    let mut resolved = Vec::with_capacity(refs.len());
    for middleware in refs {
        match middleware {
            MiddlewareRef::Instance(instance) => resolved.push(Arc::clone(instance)),
            MiddlewareRef::Named(name) => resolved.extend(resolver.resolve(name)?),
        }
    }
    Ok(resolved)
}

/// Turns actions into handlers, instantiating each controller at most once per build
struct ActionResolver<'a> {
    resolver: Option<&'a dyn ControllerResolver>,
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl<'a> ActionResolver<'a> {
    fn new(resolver: Option<&'a dyn ControllerResolver>) -> Self {
        Self { resolver, controllers: HashMap::new() }
    }

    fn resolve(&mut self, action: &Action) -> Result<Arc<dyn RequestHandler>, ConfigurationError> {
        match action {
            Action::Invocable(handler) => Ok(Arc::clone(handler)),
            Action::Controller { controller, method } => {
                let instance = self.controller(controller)?;
                instance.action(method).ok_or_else(|| ConfigurationError::missing_controller_action(controller, method))
            }
        }
    }

    fn controller(&mut self, identifier: &str) -> Result<Arc<dyn Controller>, ConfigurationError> {
        if let Some(controller) = self.controllers.get(identifier) {
            return Ok(Arc::clone(controller));
        }

        let controller = self
            .resolver
            .and_then(|resolver| resolver.instantiate(identifier))
            .ok_or_else(|| ConfigurationError::unresolvable_controller(identifier))?;
        self.controllers.insert(identifier.to_owned(), Arc::clone(&controller));
        Ok(controller)
    }
}
