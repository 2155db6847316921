//! Identity and role resolution
//!
//! The toolkit never consults the web container's principal mechanism.
//! Applications install a [`LoggedInUserResolver`] once at startup and both
//! the view access checker and the role-based endpoint authorizer read from
//! it. Resolvers must be immutable after initialization; they are shared
//! across request threads.

use crate::core::error::CrudError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// An authenticated identity, independent of transport mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Principal { name: name.into() }
    }
}

/// Resolves the current user and their roles for the running request
pub trait LoggedInUserResolver: Send + Sync {
    /// The current user, `None` when nobody is logged in
    fn current_user(&self) -> Option<Principal>;

    /// Roles of the current user; empty when nobody is logged in
    fn current_user_roles(&self) -> HashSet<String>;

    fn has_role(&self, role: &str) -> bool {
        self.current_user_roles().contains(role)
    }
}

/// Resolver that reports nobody logged in (the default)
pub struct NoUserResolver;

impl LoggedInUserResolver for NoUserResolver {
    fn current_user(&self) -> Option<Principal> {
        None
    }

    fn current_user_roles(&self) -> HashSet<String> {
        HashSet::new()
    }
}

/// Resolver with a fixed user and role set, for tests and development
#[derive(Debug, Clone, Default)]
pub struct FixedUserResolver {
    pub user: Option<Principal>,
    pub roles: HashSet<String>,
}

impl FixedUserResolver {
    /// An anonymous resolver
    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A resolver logged in as `name` holding the given roles
    pub fn logged_in<I, S>(name: &str, roles: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(FixedUserResolver {
            user: Some(Principal::new(name)),
            roles: roles.into_iter().map(Into::into).collect(),
        })
    }
}

impl LoggedInUserResolver for FixedUserResolver {
    fn current_user(&self) -> Option<Principal> {
        self.user.clone()
    }

    fn current_user_roles(&self) -> HashSet<String> {
        self.roles.clone()
    }
}

/// The six operations of a CRUD endpoint, for per-operation authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOp {
    List,
    Count,
    GetOne,
    Create,
    Update,
    Delete,
}

/// Authorization gate consulted before any store access.
///
/// A denial short-circuits the request with HTTP 403 before the store is
/// touched. List, count and get-one are the read-only operations.
pub trait CrudAuthorizer: Send + Sync {
    fn authorize(&self, op: CrudOp) -> Result<(), CrudError>;
}

/// Authorizer that permits everything (the default)
pub struct AllowAll;

impl CrudAuthorizer for AllowAll {
    fn authorize(&self, _op: CrudOp) -> Result<(), CrudError> {
        Ok(())
    }
}

/// Authorizer requiring role membership per operation.
///
/// Operations without a registered role set stay open; a registered set
/// requires a logged-in user holding at least one of its roles.
pub struct RoleBasedAuthorizer {
    resolver: Arc<dyn LoggedInUserResolver>,
    required: HashMap<CrudOp, HashSet<String>>,
}

impl RoleBasedAuthorizer {
    pub fn new(resolver: Arc<dyn LoggedInUserResolver>) -> Self {
        RoleBasedAuthorizer {
            resolver,
            required: HashMap::new(),
        }
    }

    /// Require one of `roles` for `op`
    pub fn require<I, S>(mut self, op: CrudOp, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required
            .insert(op, roles.into_iter().map(Into::into).collect());
        self
    }

    /// Require one of `roles` for every operation
    pub fn require_everywhere<I, S>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String> + Clone,
    {
        let ops = [
            CrudOp::List,
            CrudOp::Count,
            CrudOp::GetOne,
            CrudOp::Create,
            CrudOp::Update,
            CrudOp::Delete,
        ];
        let roles: Vec<S> = roles.into_iter().collect();
        ops.into_iter()
            .fold(self, |acc, op| acc.require(op, roles.clone()))
    }
}

impl CrudAuthorizer for RoleBasedAuthorizer {
    fn authorize(&self, op: CrudOp) -> Result<(), CrudError> {
        let Some(required) = self.required.get(&op) else {
            return Ok(());
        };
        if self.resolver.current_user().is_none() {
            return Err(CrudError::AccessDenied);
        }
        let roles = self.resolver.current_user_roles();
        if required.iter().any(|r| roles.contains(r)) {
            Ok(())
        } else {
            Err(CrudError::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_user_resolver() {
        let resolver = NoUserResolver;
        assert_eq!(resolver.current_user(), None);
        assert!(resolver.current_user_roles().is_empty());
        assert!(!resolver.has_role("admin"));
    }

    #[test]
    fn test_fixed_user_resolver() {
        let resolver = FixedUserResolver::logged_in("dummy", ["admin", "user"]);
        assert_eq!(resolver.current_user(), Some(Principal::new("dummy")));
        assert!(resolver.has_role("admin"));
        assert!(!resolver.has_role("sales"));
    }

    #[test]
    fn test_anonymous_resolver() {
        let resolver = FixedUserResolver::anonymous();
        assert_eq!(resolver.current_user(), None);
    }

    #[test]
    fn test_allow_all() {
        assert!(AllowAll.authorize(CrudOp::Delete).is_ok());
    }

    #[test]
    fn test_unregistered_operation_stays_open() {
        let authorizer = RoleBasedAuthorizer::new(FixedUserResolver::anonymous())
            .require(CrudOp::Delete, ["admin"]);
        assert!(authorizer.authorize(CrudOp::List).is_ok());
        assert!(matches!(
            authorizer.authorize(CrudOp::Delete),
            Err(CrudError::AccessDenied)
        ));
    }

    #[test]
    fn test_role_membership_grants_access() {
        let authorizer = RoleBasedAuthorizer::new(FixedUserResolver::logged_in("joe", ["admin"]))
            .require(CrudOp::Delete, ["admin", "superuser"]);
        assert!(authorizer.authorize(CrudOp::Delete).is_ok());
    }

    #[test]
    fn test_missing_role_denies_access() {
        let authorizer = RoleBasedAuthorizer::new(FixedUserResolver::logged_in("joe", ["user"]))
            .require_everywhere(["admin"]);
        assert!(matches!(
            authorizer.authorize(CrudOp::List),
            Err(CrudError::AccessDenied)
        ));
        assert!(matches!(
            authorizer.authorize(CrudOp::Create),
            Err(CrudError::AccessDenied)
        ));
    }
}
