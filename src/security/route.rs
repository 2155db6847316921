//! Routes and the access rules attached to them

use std::collections::{HashMap, HashSet};

/// Who may enter a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    /// Everybody, including anonymous visitors
    PermitAll,
    /// Any logged-in user
    Authenticated,
    /// Logged-in users holding at least one of the named roles.
    /// An empty set admits nobody.
    RolesAllowed(HashSet<String>),
}

impl AccessRule {
    pub fn roles_allowed<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessRule::RolesAllowed(roles.into_iter().map(Into::into).collect())
    }

    /// Does this rule admit a user with the given roles? `None` means
    /// anonymous.
    pub fn accepts(&self, user_roles: Option<&HashSet<String>>) -> bool {
        match self {
            AccessRule::PermitAll => true,
            AccessRule::Authenticated => user_roles.is_some(),
            AccessRule::RolesAllowed(required) => match user_roles {
                Some(held) => required.iter().any(|r| held.contains(r)),
                None => false,
            },
        }
    }

    /// True when anonymous visitors pass this rule
    pub fn is_public(&self) -> bool {
        matches!(self, AccessRule::PermitAll)
    }
}

/// A navigable view: its path, its own access rule and the rules of the
/// layouts it is nested in, outermost last.
///
/// A view with no explicit rule requires login; that is the default for
/// anything not marked otherwise.
#[derive(Debug, Clone)]
pub struct ViewRoute {
    pub path: String,
    pub access: AccessRule,
    pub layouts: Vec<AccessRule>,
}

impl ViewRoute {
    pub fn new(path: impl Into<String>) -> Self {
        ViewRoute {
            path: path.into(),
            access: AccessRule::Authenticated,
            layouts: Vec::new(),
        }
    }

    pub fn permit_all(mut self) -> Self {
        self.access = AccessRule::PermitAll;
        self
    }

    pub fn roles_allowed<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access = AccessRule::roles_allowed(roles);
        self
    }

    pub fn with_access(mut self, access: AccessRule) -> Self {
        self.access = access;
        self
    }

    /// Nest this view inside a layout carrying its own rule. The view is
    /// reachable only when the view rule and every layout rule accept.
    pub fn under_layout(mut self, access: AccessRule) -> Self {
        self.layouts.push(access);
        self
    }

    /// The view's rule followed by the layout rules
    pub fn rule_chain(&self) -> impl Iterator<Item = &AccessRule> {
        std::iter::once(&self.access).chain(self.layouts.iter())
    }
}

/// Registered views, looked up by path
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, ViewRoute>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, route: ViewRoute) -> &mut Self {
        tracing::debug!(path = %route.path, "registering view route");
        self.routes.insert(route.path.clone(), route);
        self
    }

    pub fn lookup(&self, path: &str) -> Option<&ViewRoute> {
        self.routes.get(path)
    }
}
