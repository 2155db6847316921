//! Navigation-time access checking
//!
//! Evaluates a view's access rule chain against the current user before the
//! view is shown. Anonymous visitors are sent to the login view rather than
//! refused outright; a logged-in user lacking the required roles gets a hard
//! failure that reveals nothing about whether the view exists.

use crate::core::auth::LoggedInUserResolver;
use crate::security::route::ViewRoute;
use std::sync::Arc;

/// What navigation should do with the current user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Show the view
    Allow,
    /// Anonymous user on a protected view: offer a login instead
    RedirectToLogin,
    /// Logged-in user without the required roles
    Reject { message: String },
}

/// Checks every navigation against the target view's rule chain.
///
/// The login view itself is always reachable, otherwise a logged-out user
/// could never log back in.
pub struct ViewAccessChecker {
    login_view: String,
    resolver: Arc<dyn LoggedInUserResolver>,
}

impl ViewAccessChecker {
    pub fn new(login_view: impl Into<String>, resolver: Arc<dyn LoggedInUserResolver>) -> Self {
        ViewAccessChecker {
            login_view: login_view.into(),
            resolver,
        }
    }

    pub fn check(&self, route: &ViewRoute) -> NavigationOutcome {
        if route.path == self.login_view {
            return NavigationOutcome::Allow;
        }
        let user = self.resolver.current_user();
        match user {
            None => {
                if route.rule_chain().all(|rule| rule.is_public()) {
                    NavigationOutcome::Allow
                } else {
                    tracing::debug!(path = %route.path, "anonymous user, redirecting to login");
                    NavigationOutcome::RedirectToLogin
                }
            }
            Some(principal) => {
                let roles = self.resolver.current_user_roles();
                if route.rule_chain().all(|rule| rule.accepts(Some(&roles))) {
                    NavigationOutcome::Allow
                } else {
                    tracing::debug!(
                        path = %route.path,
                        user = %principal.name,
                        "access denied"
                    );
                    NavigationOutcome::Reject {
                        message: format!(
                            "No route found for '{}': Access denied",
                            route.path
                        ),
                    }
                }
            }
        }
    }
}
