//! Nested groups with middleware, a resource controller and named routes.

use http::{HeaderValue, Method, StatusCode, Uri};
use micro_router::controller::{ControllerActions, ControllerRegistry};
use micro_router::middleware::{middleware_fn, MiddlewareRegistry, Next};
use micro_router::router::{GroupContextFrame, ResourceAction, ResourceOptions};
use micro_router::{handler_fn, PathParams, RequestContext, ResponseBody, Router};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

async fn index() -> &'static str {
    "all photos"
}

async fn show(params: PathParams) -> String {
    format!("photo {}", params.get("id").unwrap_or_default())
}

async fn destroy(params: PathParams) -> (StatusCode, String) {
    (StatusCode::ACCEPTED, format!("photo {} deleted", params.get("id").unwrap_or_default()))
}

fn photo_controller() -> ControllerActions {
    ControllerActions::new()
        .with_action("index", handler_fn(index))
        .with_action("show", handler_fn(show))
        .with_action("destroy", handler_fn(destroy))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let middleware = MiddlewareRegistry::new()
        .alias(
            "auth",
            middleware_fn(|req: RequestContext, next: Next| async move {
                if req.headers().contains_key("x-token") {
                    next.run(req).await
                } else {
                    let mut response = http::Response::new(ResponseBody::from("missing token"));
                    *response.status_mut() = StatusCode::UNAUTHORIZED;
                    response
                }
            }),
        )
        .alias(
            "powered-by",
            middleware_fn(|req, next: Next| async move {
                let mut response = next.run(req).await;
                response.headers_mut().insert("x-powered-by", HeaderValue::from_static("micro-router"));
                response
            }),
        );

    let mut builder = Router::builder();
    builder
        .middleware_resolver(middleware)
        .controller_resolver(ControllerRegistry::new().register("PhotoController", photo_controller))
        .global_middleware(["powered-by"]);

    builder.group(GroupContextFrame::new().prefix("api").name_prefix("api."), |api| {
        api.group(GroupContextFrame::new().prefix("v1").middleware(["auth"]), |v1| {
            let options = ResourceOptions::new().only([ResourceAction::Index, ResourceAction::Show, ResourceAction::Destroy]);
            v1.resource("photos", "PhotoController", &options);
        });
    });

    for route in builder.routes().routes() {
        info!(method = %route.method(), path = route.path(), name = route.name(), "registered");
    }
    let router = builder.build().expect("router should be valid");

    let mut authorized = RequestContext::new(Method::DELETE, Uri::from_static("/api/v1/photos/3"));
    authorized.headers_mut().insert("x-token", HeaderValue::from_static("secret"));
    let anonymous = RequestContext::new(Method::GET, Uri::from_static("/api/v1/photos"));

    for request in [authorized, anonymous] {
        let response = router.handle(request).await;
        info!(status = %response.status(), headers = ?response.headers(), body = ?response.body(), "dispatched");
    }

    info!(url = ?router.url_for("api.photos.show", [("id", "3")]), "reverse routing");
}
