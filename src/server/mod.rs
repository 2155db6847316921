//! Server-side CRUD REST exposure

pub mod builder;
pub mod rest;

pub use builder::{CrudRouterBuilder, init_tracing};
pub use rest::{CrudState, crud_routes};
