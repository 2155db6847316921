//! Core abstractions: entities, field values, filters, sorting, paging,
//! data-access traits, errors and identity resolution

pub mod entity;
pub mod field;
pub mod error;
pub mod filter;
pub mod query;
pub mod loader;
pub mod auth;

pub use auth::{
    AllowAll, CrudAuthorizer, CrudOp, FixedUserResolver, LoggedInUserResolver, NoUserResolver,
    Principal, RoleBasedAuthorizer,
};
pub use entity::CrudEntity;
pub use error::{CrudError, ErrorResponse};
pub use field::FieldValue;
pub use filter::Filter;
pub use loader::{CrudAccess, DataLoader, ListDataLoader};
pub use query::{FetchRange, SortClause, compare_by, decode_sort, encode_sort};
