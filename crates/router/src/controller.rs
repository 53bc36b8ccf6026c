//! Controller actions: routes that name a `(controller, method)` pair instead of carrying a handler.
//!
//! The router never constructs controllers itself. A [`ControllerResolver`] instantiates a
//! controller from its identifier and the controller hands out its named methods as
//! [`RequestHandler`]s. [`ControllerRegistry`] and [`ControllerActions`] are the stock
//! implementations.

use crate::handler::RequestHandler;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A set of named actions
pub trait Controller: Send + Sync {
    fn action(&self, name: &str) -> Option<Arc<dyn RequestHandler>>;
}

/// Instantiates controllers by identifier
#[cfg_attr(test, mockall::automock)]
pub trait ControllerResolver: Send + Sync {
    fn instantiate(&self, identifier: &str) -> Option<Arc<dyn Controller>>;
}

/// A [`Controller`] assembled from `(name, handler)` pairs.
///
/// ```
/// use micro_router::controller::{Controller, ControllerActions};
/// use micro_router::handler_fn;
///
/// async fn index() -> &'static str {
///     "all users"
/// }
///
/// let users = ControllerActions::new().with_action("index", handler_fn(index));
/// assert!(users.action("index").is_some());
/// assert!(users.action("destroy").is_none());
/// ```
#[derive(Default)]
pub struct ControllerActions {
    actions: HashMap<String, Arc<dyn RequestHandler>>,
}

impl ControllerActions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_action<H: RequestHandler + 'static>(mut self, name: impl Into<String>, handler: H) -> Self {
        self.actions.insert(name.into(), Arc::new(handler));
        self
    }
}

impl Controller for ControllerActions {
    fn action(&self, name: &str) -> Option<Arc<dyn RequestHandler>> {
        self.actions.get(name).cloned()
    }
}

impl fmt::Debug for ControllerActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerActions").field("actions", &self.actions.keys().collect::<Vec<_>>()).finish()
    }
}

type ControllerFactory = Box<dyn Fn() -> Arc<dyn Controller> + Send + Sync>;

/// The stock [`ControllerResolver`], mapping identifiers to factories
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory, invoked once per identifier each time a router is built
    #[must_use]
    pub fn register<F, C>(mut self, identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(move || Arc::new(factory()) as Arc<dyn Controller>));
        self
    }
}

impl ControllerResolver for ControllerRegistry {
    fn instantiate(&self, identifier: &str) -> Option<Arc<dyn Controller>> {
        self.factories.get(identifier).map(|factory| factory())
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry").field("identifiers", &self.factories.keys().collect::<Vec<_>>()).finish()
    }
}
