use crate::middleware::MiddlewareRef;
use crate::router::route::{Route, RouteTable};

/// A handle to a freshly registered route, for naming it and attaching more middleware.
///
/// Holds the route table mutably, so it lives only until the end of the registering statement.
#[derive(Debug)]
pub struct RouteRegistrar<'table> {
    table: &'table mut RouteTable,
    index: usize,
    name_prefix: String,
}

impl<'table> RouteRegistrar<'table> {
    pub(crate) fn new(table: &'table mut RouteTable, index: usize, name_prefix: String) -> Self {
        Self { table, index, name_prefix }
    }

    /// Names the route, prefixed by the name prefixes of the enclosing groups
    pub fn name(&mut self, name: impl AsRef<str>) -> &mut Self {
        let name = format!("{}{}", self.name_prefix, name.as_ref());
        self.table.set_name(self.index, name);
        self
    }

    /// Appends middleware after the ones inherited from the enclosing groups
    pub fn middleware<I>(&mut self, middleware: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<MiddlewareRef>,
    {
        self.table.append_middleware(self.index, middleware.into_iter().map(Into::into));
        self
    }

    pub fn route(&self) -> &Route {
        &self.table.routes()[self.index]
    }

    /// Registration order of the route, starting at zero
    pub fn index(&self) -> usize {
        self.index
    }
}
