//! Sort clauses, fetch ranges and their query-parameter wire forms

use crate::core::entity::CrudEntity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// One ordering key plus direction within a multi-key sort.
///
/// An ordered list of clauses defines tie-break precedence left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    pub property: String,
    pub asc: bool,
}

impl SortClause {
    pub fn asc(property: impl Into<String>) -> Self {
        SortClause {
            property: property.into(),
            asc: true,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        SortClause {
            property: property.into(),
            asc: false,
        }
    }

    /// Wire form: `+name` ascending, `-name` descending
    pub fn to_wire(&self) -> String {
        let sign = if self.asc { '+' } else { '-' };
        format!("{sign}{}", self.property)
    }

    /// Parse the wire form; a bare property name sorts ascending
    pub fn from_wire(raw: &str) -> Option<SortClause> {
        let (asc, property) = match raw.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, raw.strip_prefix('+').unwrap_or(raw)),
        };
        if property.is_empty() {
            return None;
        }
        Some(SortClause {
            property: property.to_string(),
            asc,
        })
    }
}

/// Encode sort clauses as repeated `sort_by` query parameters
pub fn encode_sort(sort_by: &[SortClause]) -> Vec<(String, String)> {
    sort_by
        .iter()
        .map(|c| ("sort_by".to_string(), c.to_wire()))
        .collect()
}

/// Decode the values of repeated `sort_by` parameters, in order.
/// Blank values are skipped.
pub fn decode_sort<'a, I>(values: I) -> Vec<SortClause>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(SortClause::from_wire)
        .collect()
}

/// Compare two entities under an ordered list of sort clauses.
///
/// A missing property value sorts before a present one; two present but
/// incomparable values (a `Null` against an integer, or mixed variants)
/// tie as equal. Either way the comparator stays total and the resulting
/// order stable.
pub fn compare_by<T: CrudEntity>(sort_by: &[SortClause], a: &T, b: &T) -> Ordering {
    for clause in sort_by {
        let av = a.field_value(&clause.property);
        let bv = b.field_value(&clause.property);
        let ord = match (av, bv) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.partial_cmp_value(&y).unwrap_or(Ordering::Equal),
        };
        let ord = if clause.asc { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// A closed offset interval over the ordered, filtered result set.
///
/// Independent of filter and sort; [`FetchRange::ALL`] selects everything.
/// On the wire a range travels as `offset` and `limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRange {
    pub start: u64,
    pub end_inclusive: u64,
}

impl FetchRange {
    /// The unbounded range
    pub const ALL: FetchRange = FetchRange {
        start: 0,
        end_inclusive: u64::MAX,
    };

    pub fn new(start: u64, end_inclusive: u64) -> Self {
        FetchRange {
            start,
            end_inclusive,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end_inclusive < self.start
    }

    /// Number of items selected, saturating at `u64::MAX`
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.end_inclusive - self.start).saturating_add(1)
    }

    /// Build a range from wire parameters. A `limit` of 0 selects nothing.
    pub fn from_offset_limit(offset: u64, limit: u64) -> Self {
        if limit == 0 {
            return FetchRange {
                start: offset,
                end_inclusive: offset.wrapping_sub(1),
            };
        }
        FetchRange {
            start: offset,
            end_inclusive: offset.saturating_add(limit - 1),
        }
    }

    /// Wire parameters for this range; `None` for [`FetchRange::ALL`],
    /// which travels as absent parameters
    pub fn to_offset_limit(&self) -> Option<(u64, u64)> {
        if *self == FetchRange::ALL {
            return None;
        }
        Some((self.start, self.len()))
    }

    /// Slice an in-memory result set to this range
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_empty() {
            return Vec::new();
        }
        let skip = usize::try_from(self.start).unwrap_or(usize::MAX);
        let take = usize::try_from(self.len()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

impl From<RangeInclusive<u64>> for FetchRange {
    fn from(r: RangeInclusive<u64>) -> Self {
        FetchRange::new(*r.start(), *r.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_clause_wire_forms() {
        assert_eq!(SortClause::asc("age").to_wire(), "+age");
        assert_eq!(SortClause::desc("age").to_wire(), "-age");
        assert_eq!(SortClause::from_wire("+age"), Some(SortClause::asc("age")));
        assert_eq!(SortClause::from_wire("-age"), Some(SortClause::desc("age")));
        assert_eq!(SortClause::from_wire("age"), Some(SortClause::asc("age")));
        assert_eq!(SortClause::from_wire(""), None);
        assert_eq!(SortClause::from_wire("-"), None);
    }

    #[test]
    fn test_sort_codec_roundtrip() {
        let clauses = vec![SortClause::desc("age"), SortClause::asc("name")];
        let pairs = encode_sort(&clauses);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(k, _)| k == "sort_by"));
        let decoded = decode_sort(pairs.iter().map(|(_, v)| v.as_str()));
        assert_eq!(decoded, clauses);
    }

    #[test]
    fn test_range_len_and_empty() {
        assert_eq!(FetchRange::new(10, 20).len(), 11);
        assert_eq!(FetchRange::new(5, 5).len(), 1);
        assert!(FetchRange::new(5, 4).is_empty());
        assert_eq!(FetchRange::ALL.len(), u64::MAX);
    }

    #[test]
    fn test_range_offset_limit_roundtrip() {
        let range = FetchRange::from_offset_limit(10, 11);
        assert_eq!(range, FetchRange::new(10, 20));
        assert_eq!(range.to_offset_limit(), Some((10, 11)));
        assert_eq!(FetchRange::ALL.to_offset_limit(), None);
    }

    #[test]
    fn test_range_limit_saturates() {
        let range = FetchRange::from_offset_limit(1, u64::MAX);
        assert_eq!(range.end_inclusive, u64::MAX);
    }

    #[test]
    fn test_zero_limit_selects_nothing() {
        let range = FetchRange::from_offset_limit(3, 0);
        assert!(range.is_empty());
        assert_eq!(range.slice(vec![1, 2, 3, 4, 5]), Vec::<i32>::new());
    }

    #[test]
    fn test_slice() {
        let items: Vec<i32> = (0..10).collect();
        assert_eq!(FetchRange::new(2, 4).slice(items.clone()), vec![2, 3, 4]);
        assert_eq!(
            FetchRange::new(8, 100).slice(items.clone()),
            vec![8, 9]
        );
        assert_eq!(FetchRange::ALL.slice(items.clone()), items);
    }

    mod comparator {
        use super::*;
        use crate::impl_crud_entity;

        impl_crud_entity!(Row, "rows", id: i64, {
            name: String,
            age: Option<i64>,
        });

        fn row(name: &str, age: Option<i64>) -> Row {
            Row {
                id: None,
                name: name.to_string(),
                age,
            }
        }

        #[test]
        fn test_single_key() {
            let a = row("a", Some(30));
            let b = row("b", Some(20));
            let by_age = [SortClause::asc("age")];
            assert_eq!(compare_by(&by_age, &a, &b), Ordering::Greater);
            let by_age_desc = [SortClause::desc("age")];
            assert_eq!(compare_by(&by_age_desc, &a, &b), Ordering::Less);
        }

        #[test]
        fn test_tiebreak_left_to_right() {
            let a = row("alice", Some(30));
            let b = row("bob", Some(30));
            let clauses = [SortClause::asc("age"), SortClause::desc("name")];
            assert_eq!(compare_by(&clauses, &a, &b), Ordering::Greater);
        }

        #[test]
        fn test_incomparable_values_tie_as_equal() {
            // A Null from an absent Option against an integer is present
            // but incomparable: the pair ties. Name is not consulted
            // because it is not in the clause list.
            let a = row("a", None);
            let b = row("b", Some(1));
            let clauses = [SortClause::asc("age")];
            assert_eq!(compare_by(&clauses, &a, &b), Ordering::Equal);
            assert_eq!(compare_by(&clauses, &b, &a), Ordering::Equal);
        }

        #[test]
        fn test_unknown_property_ties_as_equal() {
            let a = row("a", None);
            let b = row("b", Some(1));
            let unknown = [SortClause::asc("height")];
            assert_eq!(compare_by(&unknown, &a, &b), Ordering::Equal);
        }
    }
}
