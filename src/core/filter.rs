//! Composable filters and their URL query-parameter wire codec
//!
//! A filter is a boolean predicate over entity properties, composable via
//! AND. Each leaf serializes to exactly one query parameter keyed by the
//! property name, with the value carrying an operator prefix:
//!
//! ```text
//! age=gt:30&age=lt:60&name=iprefix:duke
//! ```
//!
//! The CRUD client encodes with [`Filter::to_query_pairs`] and the endpoint
//! decodes with [`Filter::from_query_pairs`]; the pairing is one protocol and
//! must stay in lockstep.

use crate::core::entity::CrudEntity;
use crate::core::field::FieldValue;
use std::cmp::Ordering;

/// Query parameter names that are never interpreted as filter properties.
pub const RESERVED_PARAMS: &[&str] = &["offset", "limit", "sort_by", "select"];

const OP_EQ: &str = "eq";
const OP_LT: &str = "lt";
const OP_LE: &str = "le";
const OP_GT: &str = "gt";
const OP_GE: &str = "ge";
const OP_PREFIX: &str = "prefix";
const OP_IPREFIX: &str = "iprefix";
const OP_FULLTEXT: &str = "fulltext";

/// A boolean predicate over entity properties.
///
/// Comparison leaves store the operand in its canonical wire text (see
/// [`FieldValue::to_wire`]); evaluation re-interprets that text in the type
/// of the entity's own property value.
///
/// Case-insensitive operators (`IStartsWith`, `FullText`) compare after
/// Unicode case folding with [`str::to_lowercase`] on both operands. This is
/// the collation rule of the protocol; stores backed by a database must
/// produce the same results.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Property equals the value
    Eq { property: String, value: String },
    /// Property is strictly less than the value
    Lt { property: String, value: String },
    /// Property is less than or equal to the value
    Le { property: String, value: String },
    /// Property is strictly greater than the value
    Gt { property: String, value: String },
    /// Property is greater than or equal to the value
    Ge { property: String, value: String },
    /// Property text starts with the prefix, case-sensitively
    StartsWith { property: String, prefix: String },
    /// Property text starts with the prefix, case-insensitively
    IStartsWith { property: String, prefix: String },
    /// Every query token is a case-insensitive prefix of some word of the
    /// property text; an empty query matches everything
    FullText { property: String, query: String },
    /// All child filters match
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Eq {
            property: property.into(),
            value: value.into().to_wire(),
        }
    }

    pub fn lt(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Lt {
            property: property.into(),
            value: value.into().to_wire(),
        }
    }

    pub fn le(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Le {
            property: property.into(),
            value: value.into().to_wire(),
        }
    }

    pub fn gt(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Gt {
            property: property.into(),
            value: value.into().to_wire(),
        }
    }

    pub fn ge(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Ge {
            property: property.into(),
            value: value.into().to_wire(),
        }
    }

    pub fn starts_with(property: impl Into<String>, prefix: impl Into<String>) -> Self {
        Filter::StartsWith {
            property: property.into(),
            prefix: prefix.into(),
        }
    }

    pub fn istarts_with(property: impl Into<String>, prefix: impl Into<String>) -> Self {
        Filter::IStartsWith {
            property: property.into(),
            prefix: prefix.into(),
        }
    }

    pub fn full_text(property: impl Into<String>, query: impl Into<String>) -> Self {
        Filter::FullText {
            property: property.into(),
            query: query.into(),
        }
    }

    /// Combine this filter with another via AND, flattening nested ANDs
    pub fn and(self, other: Filter) -> Filter {
        let mut children = match self {
            Filter::And(c) => c,
            leaf => vec![leaf],
        };
        match other {
            Filter::And(mut c) => children.append(&mut c),
            leaf => children.push(leaf),
        }
        Filter::And(children)
    }

    /// Combine a list of filters via AND
    pub fn all(filters: Vec<Filter>) -> Filter {
        Filter::And(filters)
    }

    /// Evaluate this filter against an entity in memory
    pub fn matches<T: CrudEntity>(&self, entity: &T) -> bool {
        match self {
            Filter::And(children) => children.iter().all(|f| f.matches(entity)),
            Filter::Eq { property, value } => {
                Self::compare(entity, property, value, |o| o == Ordering::Equal)
            }
            Filter::Lt { property, value } => {
                Self::compare(entity, property, value, |o| o == Ordering::Less)
            }
            Filter::Le { property, value } => {
                Self::compare(entity, property, value, |o| o != Ordering::Greater)
            }
            Filter::Gt { property, value } => {
                Self::compare(entity, property, value, |o| o == Ordering::Greater)
            }
            Filter::Ge { property, value } => {
                Self::compare(entity, property, value, |o| o != Ordering::Less)
            }
            Filter::StartsWith { property, prefix } => Self::text(entity, property)
                .map(|t| t.starts_with(prefix))
                .unwrap_or(false),
            Filter::IStartsWith { property, prefix } => Self::text(entity, property)
                .map(|t| t.to_lowercase().starts_with(&prefix.to_lowercase()))
                .unwrap_or(false),
            Filter::FullText { property, query } => Self::text(entity, property)
                .map(|t| full_text_matches(&t, query))
                .unwrap_or(false),
        }
    }

    fn compare<T: CrudEntity>(
        entity: &T,
        property: &str,
        raw: &str,
        accept: impl Fn(Ordering) -> bool,
    ) -> bool {
        entity
            .field_value(property)
            .and_then(|v| v.compare_to_wire(raw))
            .map(accept)
            .unwrap_or(false)
    }

    fn text<T: CrudEntity>(entity: &T, property: &str) -> Option<String> {
        entity
            .field_value(property)
            .and_then(|v| v.as_text().map(str::to_string))
    }

    /// Encode this filter into query parameters, one pair per leaf
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        match self {
            Filter::And(children) => children.iter().flat_map(|f| f.to_query_pairs()).collect(),
            Filter::Eq { property, value } => leaf_pair(property, OP_EQ, value),
            Filter::Lt { property, value } => leaf_pair(property, OP_LT, value),
            Filter::Le { property, value } => leaf_pair(property, OP_LE, value),
            Filter::Gt { property, value } => leaf_pair(property, OP_GT, value),
            Filter::Ge { property, value } => leaf_pair(property, OP_GE, value),
            Filter::StartsWith { property, prefix } => leaf_pair(property, OP_PREFIX, prefix),
            Filter::IStartsWith { property, prefix } => leaf_pair(property, OP_IPREFIX, prefix),
            Filter::FullText { property, query } => leaf_pair(property, OP_FULLTEXT, query),
        }
    }

    /// Decode a filter from query parameters.
    ///
    /// Pairs with [`RESERVED_PARAMS`] names are skipped. A value without a
    /// recognized operator prefix decodes as equality on the whole text, so
    /// a handwritten `?name=Duke` works like `?name=eq:Duke`. Returns `None`
    /// when no filterable pair is present.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Option<Filter>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut leaves: Vec<Filter> = pairs
            .into_iter()
            .filter(|(name, _)| !RESERVED_PARAMS.contains(name))
            .map(|(name, value)| parse_leaf(name, value))
            .collect();
        match leaves.len() {
            0 => None,
            1 => Some(leaves.remove(0)),
            _ => Some(Filter::And(leaves)),
        }
    }
}

fn leaf_pair(property: &str, op: &str, value: &str) -> Vec<(String, String)> {
    vec![(property.to_string(), format!("{op}:{value}"))]
}

fn parse_leaf(property: &str, raw: &str) -> Filter {
    let property = property.to_string();
    if let Some((op, value)) = raw.split_once(':') {
        let value = value.to_string();
        match op {
            OP_EQ => return Filter::Eq { property, value },
            OP_LT => return Filter::Lt { property, value },
            OP_LE => return Filter::Le { property, value },
            OP_GT => return Filter::Gt { property, value },
            OP_GE => return Filter::Ge { property, value },
            OP_PREFIX => {
                return Filter::StartsWith {
                    property,
                    prefix: value,
                };
            }
            OP_IPREFIX => {
                return Filter::IStartsWith {
                    property,
                    prefix: value,
                };
            }
            OP_FULLTEXT => {
                return Filter::FullText {
                    property,
                    query: value,
                };
            }
            _ => {}
        }
    }
    Filter::Eq {
        property,
        value: raw.to_string(),
    }
}

fn full_text_matches(text: &str, query: &str) -> bool {
    let haystack: Vec<String> = text
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .all(|token| haystack.iter().any(|word| word.starts_with(&token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_crud_entity;
    use chrono::NaiveDate;

    impl_crud_entity!(Person, "people", id: i64, {
        name: String,
        age: Option<i64>,
        date_of_birth: NaiveDate,
        alive: bool,
    });

    fn duke(age: i64) -> Person {
        Person {
            id: None,
            name: "Duke Leto Atreides".to_string(),
            age: Some(age),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 1).unwrap(),
            alive: false,
        }
    }

    #[test]
    fn test_eq_on_string() {
        let p = duke(45);
        assert!(Filter::eq("name", "Duke Leto Atreides").matches(&p));
        assert!(!Filter::eq("name", "Baron Harkonnen").matches(&p));
    }

    #[test]
    fn test_ordering_comparisons_on_integer() {
        let p = duke(45);
        assert!(Filter::lt("age", 46).matches(&p));
        assert!(!Filter::lt("age", 45).matches(&p));
        assert!(Filter::le("age", 45).matches(&p));
        assert!(Filter::gt("age", 44).matches(&p));
        assert!(Filter::ge("age", 45).matches(&p));
        assert!(!Filter::ge("age", 46).matches(&p));
    }

    #[test]
    fn test_eq_on_date() {
        let p = duke(45);
        let birthday = NaiveDate::from_ymd_opt(1980, 5, 1).unwrap();
        assert!(Filter::eq("date_of_birth", birthday).matches(&p));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let p = duke(45);
        assert!(Filter::starts_with("name", "Duke ").matches(&p));
        assert!(!Filter::starts_with("name", "duke ").matches(&p));
    }

    #[test]
    fn test_iprefix_case_folds_both_operands() {
        let p = duke(45);
        assert!(Filter::istarts_with("name", "duke ").matches(&p));
        assert!(Filter::istarts_with("name", "DUKE L").matches(&p));
        assert!(!Filter::istarts_with("name", "baron").matches(&p));
    }

    #[test]
    fn test_full_text_token_prefixes() {
        let p = duke(45);
        assert!(Filter::full_text("name", "duke").matches(&p));
        assert!(Filter::full_text("name", "atre leto").matches(&p));
        assert!(!Filter::full_text("name", "harkonnen").matches(&p));
        assert!(Filter::full_text("name", "").matches(&p));
    }

    #[test]
    fn test_and_requires_all_children() {
        let p = duke(45);
        let both = Filter::lt("age", 50).and(Filter::gt("age", 40));
        assert!(both.matches(&p));
        let contradiction = Filter::lt("age", 20).and(Filter::gt("age", 30));
        assert!(!contradiction.matches(&p));
    }

    #[test]
    fn test_missing_property_matches_nothing() {
        let p = duke(45);
        assert!(!Filter::eq("height", 180).matches(&p));
    }

    #[test]
    fn test_null_property_matches_nothing() {
        let mut p = duke(45);
        p.age = None;
        assert!(!Filter::eq("age", 45).matches(&p));
        assert!(!Filter::lt("age", 100).matches(&p));
    }

    #[test]
    fn test_encode_leaf() {
        let pairs = Filter::gt("age", 30).to_query_pairs();
        assert_eq!(pairs, vec![("age".to_string(), "gt:30".to_string())]);
    }

    #[test]
    fn test_encode_and_flattens() {
        let filter = Filter::lt("age", 20)
            .and(Filter::gt("age", 10))
            .and(Filter::istarts_with("name", "duke"));
        let pairs = filter.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("age".to_string(), "lt:20".to_string()),
                ("age".to_string(), "gt:10".to_string()),
                ("name".to_string(), "iprefix:duke".to_string()),
            ]
        );
    }

    #[test]
    fn test_wire_roundtrip() {
        let filter = Filter::lt("age", 20)
            .and(Filter::ge("age", 10))
            .and(Filter::full_text("name", "duke"));
        let pairs = filter.to_query_pairs();
        let borrowed: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(Filter::from_query_pairs(borrowed), Some(filter));
    }

    #[test]
    fn test_decode_bare_value_as_equality() {
        let decoded = Filter::from_query_pairs(vec![("name", "Duke")]);
        assert_eq!(decoded, Some(Filter::eq("name", "Duke")));
    }

    #[test]
    fn test_decode_skips_reserved_params() {
        let decoded = Filter::from_query_pairs(vec![
            ("offset", "10"),
            ("limit", "20"),
            ("sort_by", "+age"),
            ("age", "lt:30"),
        ]);
        assert_eq!(decoded, Some(Filter::lt("age", 30)));
    }

    #[test]
    fn test_decode_nothing_yields_none() {
        assert_eq!(
            Filter::from_query_pairs(vec![("offset", "0"), ("limit", "5")]),
            None
        );
    }

    #[test]
    fn test_value_containing_colon_survives_roundtrip() {
        let filter = Filter::eq("note", "eq:tricky");
        let pairs = filter.to_query_pairs();
        assert_eq!(pairs[0].1, "eq:eq:tricky");
        let borrowed: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(Filter::from_query_pairs(borrowed), Some(filter));
    }
}
