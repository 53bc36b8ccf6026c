//! Expansion of a resource name into the seven conventional CRUD routes.

use crate::router::method::RouteMethod;
use std::fmt;

/// One of the conventional resource routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    Index,
    Create,
    Store,
    Show,
    Edit,
    Update,
    Destroy,
}

impl ResourceAction {
    /// Registration order, `create` comes before `show` so `/photos/create` is not taken as an id
    pub const ALL: [ResourceAction; 7] = [
        ResourceAction::Index,
        ResourceAction::Create,
        ResourceAction::Store,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
    ];

    /// Controller method and route name suffix
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceAction::Index => "index",
            ResourceAction::Create => "create",
            ResourceAction::Store => "store",
            ResourceAction::Show => "show",
            ResourceAction::Edit => "edit",
            ResourceAction::Update => "update",
            ResourceAction::Destroy => "destroy",
        }
    }

    /// The `(method, path)` pairs registered for this action under `/{resource}`.
    ///
    /// `update` answers both PUT and PATCH, so it yields two entries.
    pub fn routes(self, resource: &str) -> Vec<(RouteMethod, String)> {
        match self {
            ResourceAction::Index => vec![(RouteMethod::Get, format!("/{resource}"))],
            ResourceAction::Create => vec![(RouteMethod::Get, format!("/{resource}/create"))],
            ResourceAction::Store => vec![(RouteMethod::Post, format!("/{resource}"))],
            ResourceAction::Show => vec![(RouteMethod::Get, format!("/{resource}/{{id}}"))],
            ResourceAction::Edit => vec![(RouteMethod::Get, format!("/{resource}/{{id}}/edit"))],
            ResourceAction::Update => vec![
                (RouteMethod::Put, format!("/{resource}/{{id}}")),
                (RouteMethod::Patch, format!("/{resource}/{{id}}")),
            ],
            ResourceAction::Destroy => vec![(RouteMethod::Delete, format!("/{resource}/{{id}}"))],
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts which resource routes get registered.
///
/// `only` is applied first, `except` is removed from what remains.
///
/// ```
/// use micro_router::router::{ResourceAction, ResourceOptions};
///
/// let read_only = ResourceOptions::new().only([ResourceAction::Index, ResourceAction::Show]);
/// let no_delete = ResourceOptions::new().except([ResourceAction::Destroy]);
/// # let _ = (read_only, no_delete);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    only: Option<Vec<ResourceAction>>,
    except: Vec<ResourceAction>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn only(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        self.only = Some(actions.into_iter().collect());
        self
    }

    #[must_use]
    pub fn except(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        self.except.extend(actions);
        self
    }

    /// The selected actions, always in conventional order
    pub fn actions(&self) -> impl Iterator<Item = ResourceAction> + '_ {
        ResourceAction::ALL
            .into_iter()
            .filter(|action| self.only.as_ref().is_none_or(|only| only.contains(action)))
            .filter(|action| !self.except.contains(action))
    }
}
