//! Route registration and dispatch.
//!
//! Registration happens on a [`RouterBuilder`]: routes, nested groups, resources, names. Building
//! resolves every reference and yields an immutable [`Router`] which can be shared between tasks
//! and dispatches each request to the first route, in registration order, that accepts its method
//! and path.

mod builder;
mod group;
mod method;
mod pattern;
mod registrar;
mod resource;
mod route;

pub use builder::RouterBuilder;
pub use group::{GroupContextFrame, GroupContextStack};
pub use method::RouteMethod;
pub use registrar::RouteRegistrar;
pub use resource::{ResourceAction, ResourceOptions};
pub use route::{Action, Route, RouteTable};

use crate::config::RouterConfig;
use crate::handler::RequestHandler;
use crate::middleware::Middleware;
use crate::pipeline::Pipeline;
use crate::{PathParams, RequestContext, ResponseBody};
use async_trait::async_trait;
use http::{header, HeaderValue, Method, Response, StatusCode};
use pattern::{fill_template, PathPattern};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";

/// The dispatch phase: a frozen, shareable route table
pub struct Router {
    routes: Vec<CompiledRoute>,
    names: HashMap<String, String>,
    global_middleware: Vec<Arc<dyn Middleware>>,
    fallback: Option<Arc<dyn RequestHandler>>,
    config: RouterConfig,
}

/// A route with its template compiled and every reference resolved
pub struct CompiledRoute {
    method: RouteMethod,
    path: String,
    name: Option<String>,
    pattern: PathPattern,
    middleware: Vec<Arc<dyn Middleware>>,
    handler: Arc<dyn RequestHandler>,
}

/// Result of matching a request against the router
#[derive(Debug)]
pub struct RouteResult<'router> {
    route: &'router CompiledRoute,
    params: PathParams,
}

/// Writes a finished response to wherever it goes, e.g. a connection
#[async_trait]
pub trait ResponseEmitter: Send {
    type Error;

    async fn emit(&mut self, response: Response<ResponseBody>) -> Result<(), Self::Error>;
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the first route accepting `method` and `path`
    pub fn at(&self, method: &Method, path: &str) -> Option<RouteResult<'_>> {
        self.routes.iter().filter(|route| route.method.matches(method)).find_map(|route| {
            let params = route.pattern.matches(path)?;
            Some(RouteResult { route, params })
        })
    }

    /// Dispatches `req` to its route and runs the route pipeline.
    ///
    /// Global middleware runs outermost, then the middleware of the enclosing groups from the
    /// outermost group inwards, then the route's own middleware, then the action. When no route
    /// matches, the fallback handler answers through the global middleware if there is one,
    /// otherwise a plain 404.
    pub async fn handle(&self, mut req: RequestContext) -> Response<ResponseBody> {
        let path = self.lookup_path(req.path());
        let Some(matched) = self.at(req.method(), path) else {
            debug!(method = %req.method(), path = req.path(), "no route matched");
            return self.not_found(req).await;
        };

        debug!(method = %req.method(), path = req.path(), route = matched.route.path.as_str(), "route matched");
        let RouteResult { route, params } = matched;
        req.set_path_params(params);

        Pipeline::send(req)
            .through(self.global_middleware.iter().chain(&route.middleware).cloned())
            .then(Arc::clone(&route.handler))
            .await
    }

    /// Handles `req` and hands the response to `emitter`
    ///
    /// # Errors
    ///
    /// Returns whatever error the emitter reports.
    pub async fn dispatch<E: ResponseEmitter>(&self, req: RequestContext, emitter: &mut E) -> Result<(), E::Error> {
        let response = self.handle(req).await;
        emitter.emit(response).await
    }

    /// Path of the route named `name`, with every `{key}` replaced by the matching value.
    ///
    /// Values are inserted as given, placeholders without a value are left in place, and an
    /// unknown name gives `None`.
    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.names.get(name).map(|template| fill_template(template, params))
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    fn lookup_path<'p>(&self, path: &'p str) -> &'p str {
        if !self.config.strip_trailing_slash {
            return path;
        }

        match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        }
    }

    async fn not_found(&self, req: RequestContext) -> Response<ResponseBody> {
        if let Some(fallback) = &self.fallback {
            return Pipeline::send(req).through(self.global_middleware.iter().cloned()).then(Arc::clone(fallback)).await;
        }

        let mut response = Response::new(ResponseBody::from(self.config.not_found_body().to_owned()));
        *response.status_mut() = StatusCode::NOT_FOUND;
        response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF_8));
        response
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("names", &self.names)
            .field("global_middleware", &self.global_middleware.len())
            .field("fallback", &self.fallback.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl CompiledRoute {
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved middleware count, global middleware excluded
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

impl<'router> RouteResult<'router> {
    pub fn route(&self) -> &'router CompiledRoute {
        self.route
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::{GroupContextFrame, ResourceAction, ResourceOptions, ResponseEmitter, RouteMethod, Router};
    use crate::controller::{Controller, ControllerActions, ControllerRegistry, MockControllerResolver};
    use crate::error::ConfigurationError;
    use crate::extract::Json;
    use crate::middleware::{middleware_fn, Middleware, MiddlewareRef, MiddlewareRegistry, MockMiddlewareResolver, Next};
    use crate::{handler_fn, PathParams, RequestContext, ResponseBody, RouterConfig};
    use async_trait::async_trait;
    use http::{header, Method, Response, StatusCode, Uri};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn req(method: Method, uri: &str) -> RequestContext {
        RequestContext::new(method, uri.parse::<Uri>().unwrap())
    }

    fn get(uri: &str) -> RequestContext {
        req(Method::GET, uri)
    }

    fn body_of(response: &Response<ResponseBody>) -> String {
        String::from_utf8(response.body().as_bytes().unwrap().to_vec()).unwrap()
    }

    fn no_params() -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(log: &Log, tag: &'static str) -> impl Middleware + 'static {
        let log = Arc::clone(log);
        middleware_fn(move |req, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{tag}.before"));
                let response = next.run(req).await;
                log.lock().unwrap().push(format!("{tag}.after"));
                response
            }
        })
    }

    fn halting(log: &Log, tag: &'static str) -> impl Middleware + 'static {
        let log = Arc::clone(log);
        middleware_fn(move |_req, _next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{tag}.halt"));
                let mut response = Response::new(ResponseBody::from("unauthorized"));
                *response.status_mut() = StatusCode::UNAUTHORIZED;
                response
            }
        })
    }

    #[test]
    fn test_router_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }

    #[tokio::test]
    async fn test_exact_match_and_not_found() {
        let mut builder = Router::builder();
        builder.get("/users", handler_fn(|| async { "list" }));
        let router = builder.build().unwrap();

        let response = router.handle(get("/users")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(&response), "list");

        let response = router.handle(get("/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(&response), "404 Not Found");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");

        let response = router.handle(req(Method::POST, "/users")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_router() {
        let router = Router::builder().build().unwrap();
        assert_eq!(router.handle(get("/")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_path() {
        let mut builder = Router::builder();
        builder.get("/", handler_fn(|| async { "home" }));
        builder.group(GroupContextFrame::new().prefix("admin"), |admin| {
            admin.get("/", handler_fn(|| async { "admin" }));
        });
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/")).await), "home");
        assert_eq!(body_of(&router.handle(get("/admin")).await), "admin");
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let mut builder = Router::builder();
        builder.get("/search", handler_fn(|| async { "found" }));
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/search?q=rust&page=2")).await), "found");
    }

    #[tokio::test]
    async fn test_first_registered_route_wins() {
        let mut builder = Router::builder();
        builder.get("/users/{id}", handler_fn(|| async { "by id" }));
        builder.get("/users/me", handler_fn(|| async { "me" }));
        builder.get("/users/me", handler_fn(|| async { "me again" }));
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/users/me")).await), "by id");
    }

    #[tokio::test]
    async fn test_any_method() {
        let mut builder = Router::builder();
        builder.any("/ping", handler_fn(|method: Method| async move { method.to_string() }));
        let router = builder.build().unwrap();

        for method in [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS] {
            assert_eq!(body_of(&router.handle(req(method.clone(), "/ping")).await), method.as_str());
        }
    }

    #[tokio::test]
    async fn test_group_prefix_nesting() {
        let mut builder = Router::builder();
        builder.group(GroupContextFrame::new().prefix("api"), |api| {
            api.group(GroupContextFrame::new().prefix("v1"), |v1| {
                v1.get("/users", handler_fn(|| async { "v1 users" }));
            });
        });
        builder.get("/home", handler_fn(|| async { "home" }));
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/api/v1/users")).await), "v1 users");
        assert_eq!(body_of(&router.handle(get("/home")).await), "home");
        assert_eq!(router.handle(get("/api/v1/home")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(router.handle(get("/users")).await.status(), StatusCode::NOT_FOUND);

        let paths = router.routes().iter().map(|r| r.path()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["/api/v1/users", "/home"]);
    }

    #[tokio::test]
    async fn test_group_without_prefix_and_slashes() {
        let mut builder = Router::builder();
        builder.group(GroupContextFrame::new().prefix("/api/"), |api| {
            api.group(GroupContextFrame::new(), |inner| {
                inner.get("users/", handler_fn(|| async { "users" }));
            });
        });
        let router = builder.build().unwrap();

        assert_eq!(router.routes()[0].path(), "/api/users");
        assert_eq!(body_of(&router.handle(get("/api/users")).await), "users");
    }

    #[tokio::test]
    async fn test_middleware_onion_order() {
        let log = Log::default();
        let registry = MiddlewareRegistry::new()
            .alias("g", recording(&log, "G"))
            .alias("a", recording(&log, "A"))
            .alias("b", recording(&log, "B"))
            .alias("r", recording(&log, "R"));

        let mut builder = Router::builder();
        builder.middleware_resolver(registry).global_middleware(["g"]);
        let action_log = Arc::clone(&log);
        builder.group(GroupContextFrame::new().middleware(["a"]), |outer| {
            outer.group(GroupContextFrame::new().middleware(["b"]), |inner| {
                inner
                    .get(
                        "/x",
                        handler_fn(move || {
                            let log = Arc::clone(&action_log);
                            async move {
                                log.lock().unwrap().push("T".to_owned());
                                "done"
                            }
                        }),
                    )
                    .middleware(["r"]);
            });
        });
        let router = builder.build().unwrap();

        let response = router.handle(get("/x")).await;
        assert_eq!(body_of(&response), "done");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["G.before", "A.before", "B.before", "R.before", "T", "R.after", "B.after", "A.after", "G.after"]
        );
    }

    #[tokio::test]
    async fn test_middleware_short_circuit() {
        let log = Log::default();
        let mut builder = Router::builder();
        let action_log = Arc::clone(&log);
        let guard = MiddlewareRef::instance(halting(&log, "A"));
        builder.group(GroupContextFrame::new().middleware([guard]), |group| {
            group
                .get(
                    "/secret",
                    handler_fn(move || {
                        let log = Arc::clone(&action_log);
                        async move {
                            log.lock().unwrap().push("T".to_owned());
                            "secret"
                        }
                    }),
                )
                .middleware([MiddlewareRef::instance(recording(&log, "B"))]);
        });
        let router = builder.build().unwrap();

        let response = router.handle(get("/secret")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(&response), "unauthorized");
        assert_eq!(*log.lock().unwrap(), vec!["A.halt"]);
    }

    #[tokio::test]
    async fn test_group_middleware_does_not_leak() {
        let log = Log::default();
        let registry = MiddlewareRegistry::new().alias("auth", recording(&log, "auth"));
        let mut builder = Router::builder();
        builder.middleware_resolver(registry);
        builder.group(GroupContextFrame::new().middleware(["auth"]), |group| {
            group.get("/inside", handler_fn(|| async { "inside" }));
        });
        builder.get("/outside", handler_fn(|| async { "outside" }));
        let router = builder.build().unwrap();

        router.handle(get("/outside")).await;
        assert!(log.lock().unwrap().is_empty());

        router.handle(get("/inside")).await;
        assert_eq!(*log.lock().unwrap(), vec!["auth.before", "auth.after"]);
    }

    #[tokio::test]
    async fn test_path_parameters() {
        let mut builder = Router::builder();
        builder.get(
            "/posts/{post}/comments/{comment}",
            handler_fn(|params: PathParams| async move {
                format!("{}:{}", params.get("post").unwrap_or_default(), params.get("comment").unwrap_or_default())
            }),
        );
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/posts/1/comments/5")).await), "1:5");
        assert_eq!(router.handle(get("/posts/1/comments/5/extra")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(router.handle(get("/posts/1/comments/")).await.status(), StatusCode::NOT_FOUND);

        let matched = router.at(&Method::GET, "/posts/7/comments/8").unwrap();
        assert_eq!(matched.params().iter().collect::<Vec<_>>(), vec![("post", "7"), ("comment", "8")]);
        assert_eq!(matched.route().path(), "/posts/{post}/comments/{comment}");
    }

    #[tokio::test]
    async fn test_named_route_round_trip() {
        let mut builder = Router::builder();
        builder.get("/users/{id}", handler_fn(|| async { "user" })).name("users.show");
        builder.get("/", handler_fn(|| async { "home" })).name("home");
        let router = builder.build().unwrap();

        assert_eq!(router.url_for("users.show", [("id", "42")]).as_deref(), Some("/users/42"));
        assert_eq!(router.url_for("users.show", no_params()).as_deref(), Some("/users/{id}"));
        assert_eq!(router.url_for("home", no_params()).as_deref(), Some("/"));
        assert_eq!(router.url_for("users.index", no_params()), None);

        let url = router.url_for("users.show", [("id", "42")]).unwrap();
        let matched = router.at(&Method::GET, &url).unwrap();
        assert_eq!(matched.route().name(), Some("users.show"));
        assert_eq!(matched.params().get("id"), Some("42"));
    }

    #[test]
    fn test_add_named_route() {
        let mut builder = Router::builder();
        builder.add_named_route(RouteMethod::Get, "/users/{id}", handler_fn(|| async { "user" }), Some("users.show"));
        builder.add_named_route(RouteMethod::Post, "/users", handler_fn(|| async { "created" }), None);
        builder.group(GroupContextFrame::new().prefix("admin").name_prefix("admin."), |admin| {
            admin.add_named_route(RouteMethod::Delete, "/users/{id}", handler_fn(|| async {}), Some("users.destroy"));
        });

        assert_eq!(builder.url_for("users.show", [("id", "3")]).as_deref(), Some("/users/3"));
        assert_eq!(builder.url_for("admin.users.destroy", [("id", "3")]).as_deref(), Some("/admin/users/3"));
        assert_eq!(builder.routes().get(1).and_then(|route| route.name()), None);
    }

    #[test]
    fn test_group_name_prefix() {
        let mut builder = Router::builder();
        builder.group(GroupContextFrame::new().prefix("admin").name_prefix("admin."), |admin| {
            admin.get("/users", handler_fn(|| async { "users" })).name("users");
            admin.resource("photos", "PhotoController", &ResourceOptions::new().only([ResourceAction::Index]));
        });

        assert_eq!(builder.url_for("admin.users", no_params()).as_deref(), Some("/admin/users"));
        assert_eq!(builder.url_for("admin.photos.index", no_params()).as_deref(), Some("/admin/photos"));
        assert_eq!(builder.url_for("users", no_params()), None);
    }

    #[tokio::test]
    async fn test_response_normalization() {
        let mut builder = Router::builder();
        builder.get("/json", handler_fn(|| async { Json(json!({"a": 1})) }));
        builder.get("/text", handler_fn(|| async { String::from("hi") }));
        builder.get("/nothing", handler_fn(|| async {}));
        builder.get("/raw", handler_fn(|| async { (StatusCode::CREATED, "made") }));
        let router = builder.build().unwrap();

        let response = router.handle(get("/json")).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(serde_json::from_str::<Value>(&body_of(&response)).unwrap(), json!({"a": 1}));

        let response = router.handle(get("/text")).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(body_of(&response), "hi");

        let response = router.handle(get("/nothing")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(&response), "");

        let response = router.handle(get("/raw")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_of(&response), "made");
    }

    #[tokio::test]
    async fn test_dispatch_is_idempotent() {
        let mut builder = Router::builder();
        builder.get("/users/{id}", handler_fn(|params: PathParams| async move { params.get("id").unwrap_or("").to_owned() }));
        let router = builder.build().unwrap();

        let first = router.handle(get("/users/3")).await;
        let second = router.handle(get("/users/3")).await;
        assert_eq!(first.status(), second.status());
        assert_eq!(body_of(&first), body_of(&second));
    }

    #[tokio::test]
    async fn test_resource_routes() {
        let controller = || {
            let mut actions = ControllerActions::new();
            for action in ResourceAction::ALL {
                actions = actions.with_action(action.as_str(), handler_fn(move |m: Method| async move { format!("{m} {action}") }));
            }
            actions
        };
        let mut builder = Router::builder();
        builder.controller_resolver(ControllerRegistry::new().register("PhotoController", controller));
        builder.resource("photos", "PhotoController", &ResourceOptions::new());

        let registered = builder
            .routes()
            .routes()
            .iter()
            .map(|r| (r.method(), r.path().to_owned(), r.name().unwrap_or_default().to_owned()))
            .collect::<Vec<_>>();
        let expected = [
            (RouteMethod::Get, "/photos", "photos.index"),
            (RouteMethod::Get, "/photos/create", "photos.create"),
            (RouteMethod::Post, "/photos", "photos.store"),
            (RouteMethod::Get, "/photos/{id}", "photos.show"),
            (RouteMethod::Get, "/photos/{id}/edit", "photos.edit"),
            (RouteMethod::Put, "/photos/{id}", "photos.update"),
            (RouteMethod::Patch, "/photos/{id}", "photos.update"),
            (RouteMethod::Delete, "/photos/{id}", "photos.destroy"),
        ]
        .map(|(m, p, n)| (m, p.to_owned(), n.to_owned()));
        assert_eq!(registered, expected.to_vec());

        let router = builder.build().unwrap();
        assert_eq!(body_of(&router.handle(get("/photos/create")).await), "GET create");
        assert_eq!(body_of(&router.handle(get("/photos/9")).await), "GET show");
        assert_eq!(body_of(&router.handle(req(Method::PATCH, "/photos/9")).await), "PATCH update");
        assert_eq!(body_of(&router.handle(req(Method::DELETE, "/photos/9")).await), "DELETE destroy");
        assert_eq!(router.url_for("photos.edit", [("id", "9")]).as_deref(), Some("/photos/9/edit"));
    }

    #[test]
    fn test_resource_only_except() {
        let mut builder = Router::builder();
        builder.resource(
            "photos",
            "PhotoController",
            &ResourceOptions::new()
                .only([ResourceAction::Index, ResourceAction::Show, ResourceAction::Destroy])
                .except([ResourceAction::Destroy]),
        );

        let names = builder.routes().routes().iter().filter_map(|r| r.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["photos.index", "photos.show"]);
    }

    #[test]
    fn test_controller_instantiated_once_per_build() {
        let mut resolver = MockControllerResolver::new();
        resolver.expect_instantiate().times(1).returning(|_| {
            let users = ControllerActions::new()
                .with_action("index", handler_fn(|| async { "users" }))
                .with_action("show", handler_fn(|| async { "user" }));
            Some(Arc::new(users) as Arc<dyn Controller>)
        });

        let mut builder = Router::builder();
        builder.controller_resolver(resolver);
        builder.get("/users", ("UserController", "index"));
        builder.get("/users/{id}", ("UserController", "show"));

        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_unresolvable_controller() {
        let mut resolver = MockControllerResolver::new();
        resolver.expect_instantiate().returning(|_| None);

        let mut builder = Router::builder();
        builder.controller_resolver(resolver);
        builder.get("/users", ("UserController", "index"));

        assert_eq!(builder.build().err(), Some(ConfigurationError::unresolvable_controller("UserController")));
    }

    #[test]
    fn test_missing_controller_action() {
        let mut builder = Router::builder();
        builder.controller_resolver(ControllerRegistry::new().register("UserController", ControllerActions::new));
        builder.get("/users", ("UserController", "index"));

        assert_eq!(
            builder.build().err(),
            Some(ConfigurationError::missing_controller_action("UserController", "index"))
        );
    }

    #[test]
    fn test_controller_without_resolver() {
        let mut builder = Router::builder();
        builder.get("/users", super::Action::parse("UserController@index").unwrap());

        assert_eq!(builder.build().err(), Some(ConfigurationError::unresolvable_controller("UserController")));
    }

    #[test]
    fn test_unresolvable_middleware() {
        let mut resolver = MockMiddlewareResolver::new();
        resolver
            .expect_resolve()
            .returning(|name| Err(ConfigurationError::unresolvable_middleware(name)));

        let mut builder = Router::builder();
        builder.middleware_resolver(resolver);
        builder.get("/users", handler_fn(|| async { "users" })).middleware(["auth"]);

        assert_eq!(builder.build().err(), Some(ConfigurationError::unresolvable_middleware("auth")));
    }

    #[test]
    fn test_malformed_template() {
        let mut builder = Router::builder();
        builder.get("/users/{id", handler_fn(|| async { "user" }));

        assert!(matches!(builder.build(), Err(ConfigurationError::MalformedTemplate { template, .. }) if template == "/users/{id"));
    }

    #[tokio::test]
    async fn test_strip_trailing_slash() {
        let mut builder = Router::builder();
        builder.config(RouterConfig { strip_trailing_slash: true, ..RouterConfig::default() });
        builder.get("/users", handler_fn(|| async { "users" }));
        builder.get("/", handler_fn(|| async { "home" }));
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/users/")).await), "users");
        assert_eq!(body_of(&router.handle(get("/")).await), "home");

        let mut strict = Router::builder();
        strict.get("/users", handler_fn(|| async { "users" }));
        let strict = strict.build().unwrap();
        assert_eq!(strict.handle(get("/users/")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_not_found_body_and_fallback() {
        let mut builder = Router::builder();
        builder.config(RouterConfig { not_found_body: Some("nothing here".into()), ..RouterConfig::default() });
        let router = builder.build().unwrap();
        assert_eq!(body_of(&router.handle(get("/x")).await), "nothing here");

        let mut builder = Router::builder();
        builder.fallback(handler_fn(|uri: Uri| async move { (StatusCode::NOT_FOUND, format!("no page at {}", uri.path())) }));
        let router = builder.build().unwrap();
        let response = router.handle(get("/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(&response), "no page at /missing");
    }

    #[tokio::test]
    async fn test_fallback_runs_global_middleware() {
        let log = Log::default();
        let mut builder = Router::builder();
        builder
            .global_middleware([MiddlewareRef::instance(recording(&log, "G"))])
            .fallback(handler_fn(|| async { (StatusCode::NOT_FOUND, "fallback") }));
        let router = builder.build().unwrap();

        assert_eq!(body_of(&router.handle(get("/missing")).await), "fallback");
        assert_eq!(*log.lock().unwrap(), vec!["G.before", "G.after"]);

        let mut plain = Router::builder();
        plain.global_middleware([MiddlewareRef::instance(recording(&log, "H"))]);
        let plain = plain.build().unwrap();
        assert_eq!(plain.handle(get("/missing")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let mut builder = Router::builder();
        builder.get("/users/{id}", handler_fn(|params: PathParams| async move { params.get("id").unwrap_or("").to_owned() }));
        let router = Arc::new(builder.build().unwrap());

        let tasks = (0..16)
            .map(|i| {
                let router = Arc::clone(&router);
                tokio::spawn(async move {
                    let response = router.handle(get(&format!("/users/{i}"))).await;
                    (i, body_of(&response))
                })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            let (i, body) = task.await.unwrap();
            assert_eq!(body, i.to_string());
        }
    }

    #[derive(Default)]
    struct Collect {
        statuses: Vec<StatusCode>,
    }

    #[async_trait]
    impl ResponseEmitter for Collect {
        type Error = std::convert::Infallible;

        async fn emit(&mut self, response: Response<ResponseBody>) -> Result<(), Self::Error> {
            self.statuses.push(response.status());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_emitter() {
        let mut builder = Router::builder();
        builder.get("/", handler_fn(|| async { "home" }));
        let router = builder.build().unwrap();

        let mut emitter = Collect::default();
        router.dispatch(get("/"), &mut emitter).await.unwrap();
        router.dispatch(get("/gone"), &mut emitter).await.unwrap();
        assert_eq!(emitter.statuses, vec![StatusCode::OK, StatusCode::NOT_FOUND]);
    }
}
