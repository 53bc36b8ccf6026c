use crate::middleware::MiddlewareRef;

/// The attributes one `group` call contributes to every route registered inside it.
///
/// ```
/// use micro_router::router::GroupContextFrame;
///
/// let api = GroupContextFrame::new().prefix("api").middleware(["throttle"]).name_prefix("api.");
/// assert_eq!(api.prefix_str(), "api");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupContextFrame {
    prefix: String,
    middleware: Vec<MiddlewareRef>,
    name_prefix: String,
}

impl GroupContextFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path prefix, leading and trailing slashes are irrelevant
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Appends middleware, executed after the middleware of every enclosing group
    #[must_use]
    pub fn middleware<I>(mut self, middleware: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MiddlewareRef>,
    {
        self.middleware.extend(middleware.into_iter().map(Into::into));
        self
    }

    /// Prepended to the name of every route named inside the group
    #[must_use]
    pub fn name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.name_prefix = name_prefix.into();
        self
    }

    pub fn prefix_str(&self) -> &str {
        &self.prefix
    }

    pub fn middleware_refs(&self) -> &[MiddlewareRef] {
        &self.middleware
    }
}

/// The stack of currently open groups, outermost first
#[derive(Debug, Default)]
pub struct GroupContextStack {
    frames: Vec<GroupContextFrame>,
}

impl GroupContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: GroupContextFrame) {
        self.frames.push(frame);
    }

    /// Removes the innermost frame.
    ///
    /// # Panics
    ///
    /// Panics if no frame is open, a pop without a matching push is a programming error.
    pub fn pop(&mut self) -> GroupContextFrame {
        match self.frames.pop() {
            Some(frame) => frame,
            None => panic!("group context stack is unbalanced: pop without a matching push"),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The non-empty prefixes of every open frame joined by `/`, empty when no frame has one
    pub fn effective_prefix(&self) -> String {
        let mut prefix = String::new();
        for segment in self.frames.iter().map(|frame| frame.prefix.trim_matches('/')).filter(|p| !p.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
        }
        prefix
    }

    /// Middleware of every open frame, outermost frame first
    pub fn effective_middleware(&self) -> Vec<MiddlewareRef> {
        self.frames.iter().flat_map(|frame| frame.middleware.iter().cloned()).collect()
    }

    pub fn effective_name_prefix(&self) -> String {
        self.frames.iter().map(|frame| frame.name_prefix.as_str()).collect()
    }
}
