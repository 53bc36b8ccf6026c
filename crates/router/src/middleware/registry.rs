use crate::error::ConfigurationError;
use crate::middleware::{Middleware, MiddlewareRef};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Resolves a middleware name into the instances it stands for.
///
/// A name may stand for more than one middleware (a group), the returned list is in
/// execution order.
#[cfg_attr(test, mockall::automock)]
pub trait MiddlewareResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Vec<Arc<dyn Middleware>>, ConfigurationError>;
}

/// A resolver backed by a plain function, see [`resolver_fn`]
pub struct FnResolver<F> {
    f: F,
}

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver").field("f", &std::any::type_name::<F>()).finish()
    }
}

/// Creates a resolver from a function mapping a name to a single instance.
pub fn resolver_fn<F>(f: F) -> FnResolver<F>
where
    F: Fn(&str) -> Option<Arc<dyn Middleware>> + Send + Sync,
{
    FnResolver { f }
}

impl<F> MiddlewareResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<Arc<dyn Middleware>> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Result<Vec<Arc<dyn Middleware>>, ConfigurationError> {
        (self.f)(name).map(|middleware| vec![middleware]).ok_or_else(|| ConfigurationError::unresolvable_middleware(name))
    }
}

/// The stock [`MiddlewareResolver`]: named aliases and named groups.
///
/// ```
/// use micro_router::middleware::{middleware_fn, MiddlewareRegistry};
///
/// let registry = MiddlewareRegistry::new()
///     .alias("auth", middleware_fn(|req, next| next.run(req)))
///     .alias("throttle", middleware_fn(|req, next| next.run(req)))
///     .group("api", ["throttle", "auth"]);
/// ```
#[derive(Default)]
pub struct MiddlewareRegistry {
    aliases: HashMap<String, Arc<dyn Middleware>>,
    groups: HashMap<String, Vec<MiddlewareRef>>,
}

impl MiddlewareRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `middleware` under `name`, an alias wins over a group of the same name
    #[must_use]
    pub fn alias<M: Middleware + 'static>(mut self, name: impl Into<String>, middleware: M) -> Self {
        self.aliases.insert(name.into(), Arc::new(middleware));
        self
    }

    /// Registers a group, its members may themselves be aliases or groups
    #[must_use]
    pub fn group<I>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MiddlewareRef>,
    {
        self.groups.insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    fn expand(
        &self,
        name: &str,
        visiting: &mut Vec<String>,
        out: &mut Vec<Arc<dyn Middleware>>,
    ) -> Result<(), ConfigurationError> {
        if let Some(middleware) = self.aliases.get(name) {
            out.push(Arc::clone(middleware));
            return Ok(());
        }

        let members = self.groups.get(name).ok_or_else(|| ConfigurationError::unresolvable_middleware(name))?;
        if visiting.iter().any(|visited| visited == name) {
            return Err(ConfigurationError::MiddlewareCycle { name: name.to_owned() });
        }

        visiting.push(name.to_owned());
        for member in members {
            match member {
                MiddlewareRef::Instance(middleware) => out.push(Arc::clone(middleware)),
                MiddlewareRef::Named(member_name) => self.expand(member_name, visiting, out)?,
            }
        }
        visiting.pop();

        Ok(())
    }
}

impl fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("aliases", &self.aliases.keys().collect::<Vec<_>>())
            .field("groups", &self.groups)
            .finish()
    }
}

impl MiddlewareResolver for MiddlewareRegistry {
    fn resolve(&self, name: &str) -> Result<Vec<Arc<dyn Middleware>>, ConfigurationError> {
        let mut out = Vec::new();
        self.expand(name, &mut Vec::new(), &mut out)?;
        Ok(out)
    }
}
