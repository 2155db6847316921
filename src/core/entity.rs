//! Entity trait defining the core abstraction for CRUD-exposed types

use crate::core::error::CrudError;
use crate::core::field::FieldValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;
use validator::Validate;

/// Base trait for every type exposed over the CRUD REST protocol.
///
/// An entity is a serializable record with a store-assigned identifier and
/// named, typed properties. The identifier is `None` until the entity has
/// been persisted; on create the server clears any client-supplied value and
/// lets the store assign a fresh one.
///
/// `field_value` is the dynamic property access used by in-memory filter
/// evaluation and sort comparison. Properties not listed there simply cannot
/// be filtered or sorted on.
pub trait CrudEntity:
    Clone + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    /// The identifier type. Typically numeric, but anything ordered,
    /// hashable, printable and parsable from a path segment works.
    type Id: Clone + Eq + Ord + Hash + Display + FromStr + Serialize + Send + Sync + 'static;

    /// The plural resource name used in URLs (e.g. "people", "invoices")
    fn resource_name() -> &'static str;

    /// Get the identifier, `None` for entities not yet persisted
    fn id(&self) -> Option<Self::Id>;

    /// Set or clear the identifier
    fn set_id(&mut self, id: Option<Self::Id>);

    /// Get the value of a named property for filtering and sorting
    fn field_value(&self, property: &str) -> Option<FieldValue>;

    /// Parse a path segment into an identifier.
    ///
    /// An unparsable segment is a [`CrudError::MalformedId`], which the
    /// endpoint reports distinctly from a well-formed but absent id.
    fn parse_id(raw: &str) -> Result<Self::Id, CrudError> {
        raw.parse().map_err(|_| CrudError::MalformedId {
            id: raw.to_string(),
        })
    }
}

/// Macro to define a CRUD entity with automatic trait implementations.
///
/// Generates the struct (with a nullable `id` field), the [`CrudEntity`]
/// implementation wiring every listed field into `field_value`, and derives
/// for serde and `validator::Validate`. Field attributes pass through, so
/// `#[validate(...)]` constraints work as usual.
///
/// # Example
///
/// ```rust,ignore
/// use crudkit::prelude::*;
///
/// impl_crud_entity!(Person, "people", id: i64, {
///     #[validate(length(min = 1))]
///     name: String,
///     age: Option<i64>,
///     date_of_birth: NaiveDate,
///     alive: bool,
/// });
///
/// let p = Person {
///     id: None,
///     name: "Duke Leto Atreides".into(),
///     age: Some(45),
///     date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 1).unwrap(),
///     alive: false,
/// };
/// ```
#[macro_export]
macro_rules! impl_crud_entity {
    (
        $type:ident,
        $resource:expr,
        id: $id_ty:ty,
        {
            $(
                $( #[$fmeta:meta] )*
                $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::validator::Validate,
        )]
        pub struct $type {
            /// Identifier assigned by the store; `None` until persisted
            #[serde(default)]
            pub id: Option<$id_ty>,
            $(
                $( #[$fmeta] )*
                pub $field : $field_ty,
            )*
        }

        impl $crate::core::entity::CrudEntity for $type {
            type Id = $id_ty;

            fn resource_name() -> &'static str {
                $resource
            }

            fn id(&self) -> Option<$id_ty> {
                self.id.clone()
            }

            fn set_id(&mut self, id: Option<$id_ty>) {
                self.id = id;
            }

            fn field_value(&self, property: &str) -> Option<$crate::core::field::FieldValue> {
                match property {
                    $(
                        stringify!($field) => {
                            Some($crate::core::field::FieldValue::from(self.$field.clone()))
                        }
                    )*
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::entity::CrudEntity;
    use crate::core::field::FieldValue;
    use chrono::NaiveDate;
    use uuid::Uuid;

    impl_crud_entity!(TestPerson, "people", id: i64, {
        name: String,
        age: Option<i64>,
        date_of_birth: NaiveDate,
        alive: bool,
    });

    impl_crud_entity!(TestDocument, "documents", id: Uuid, {
        title: String,
    });

    fn person() -> TestPerson {
        TestPerson {
            id: None,
            name: "Duke Leto Atreides".to_string(),
            age: Some(45),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 1).unwrap(),
            alive: false,
        }
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(TestPerson::resource_name(), "people");
    }

    #[test]
    fn test_id_roundtrip() {
        let mut p = person();
        assert_eq!(p.id(), None);
        p.set_id(Some(7));
        assert_eq!(p.id(), Some(7));
    }

    #[test]
    fn test_field_value_access() {
        let p = person();
        assert_eq!(
            p.field_value("name"),
            Some(FieldValue::String("Duke Leto Atreides".to_string()))
        );
        assert_eq!(p.field_value("age"), Some(FieldValue::Integer(45)));
        assert_eq!(p.field_value("alive"), Some(FieldValue::Boolean(false)));
        assert_eq!(p.field_value("nonexistent"), None);
    }

    #[test]
    fn test_null_field_value_for_absent_option() {
        let mut p = person();
        p.age = None;
        assert_eq!(p.field_value("age"), Some(FieldValue::Null));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(TestPerson::parse_id("555").unwrap(), 555);
        let err = TestPerson::parse_id("foobar").unwrap_err();
        assert_eq!(err.to_string(), "Malformed ID: foobar");
    }

    #[test]
    fn test_uuid_identifier_type() {
        let id = Uuid::new_v4();
        assert_eq!(TestDocument::parse_id(&id.to_string()).unwrap(), id);
        assert!(TestDocument::parse_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_serde_skips_missing_id() {
        let p: TestPerson = serde_json::from_str(
            r#"{"name":"X","age":null,"date_of_birth":"1980-05-01","alive":true}"#,
        )
        .unwrap();
        assert_eq!(p.id, None);
    }
}
