//! View-level access control

pub mod access_checker;
pub mod route;

pub use access_checker::{NavigationOutcome, ViewAccessChecker};
pub use route::{AccessRule, RouteRegistry, ViewRoute};
