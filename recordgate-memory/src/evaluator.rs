//! Filter evaluation for in-memory row matching.
//!
//! This module provides the evaluation engine for filter expressions,
//! matching filters against stored BSON rows one document at a time.

use std::cmp::Ordering;
use bson::{Bson, datetime::DateTime, oid::ObjectId};

use recordgate_core::{
    error::{GatewayError, GatewayResult},
    filter::{FieldOp, Filter, FilterVisitor},
};

/// Type-erased, comparable representation of BSON values.
///
/// Wraps BSON values and provides comparison operations for filter
/// evaluation. Numeric types are normalized to f64 so integers and floats
/// compare naturally.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// Object id value
    ObjectId(ObjectId),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates a filter against a single stored row.
pub(crate) struct RowEvaluator<'a> {
    row: &'a Bson,
}

impl<'a> RowEvaluator<'a> {
    pub fn new(row: &'a Bson) -> Self {
        Self { row }
    }

    pub fn matches(&mut self, filter: &Filter) -> GatewayResult<bool> {
        self.visit_filter(filter)
    }

    fn get_field(&self, field: &str) -> Option<&'a Bson> {
        self.row
            .as_document()
            .and_then(|doc| doc.get(field))
    }
}

impl<'a> FilterVisitor for RowEvaluator<'a> {
    type Output = bool;
    type Error = GatewayError;

    fn visit_and(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error> {
        for filter in filters {
            if !self.visit_filter(filter)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error> {
        for filter in filters {
            if self.visit_filter(filter)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_filter(filter)?)
    }

    fn visit_exists(&mut self, field: &str, should_exist: bool) -> Result<Self::Output, Self::Error> {
        Ok(self.get_field(field).is_some() == should_exist)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        match self.get_field(field) {
            Some(field_value) => match op {
                FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
                FieldOp::Ne => Ok(Comparable::from(field_value) != Comparable::from(value)),
                FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
                    match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                        Some(ordering) => Ok(match op {
                            FieldOp::Gt => ordering == Ordering::Greater,
                            FieldOp::Gte => ordering != Ordering::Less,
                            FieldOp::Lt => ordering == Ordering::Less,
                            FieldOp::Lte => ordering != Ordering::Greater,
                            _ => unreachable!(),
                        }),
                        None => Ok(false),
                    }
                },
                FieldOp::Contains => match Comparable::from(field_value) {
                    Comparable::Array(array) => Ok(
                        array
                            .iter()
                            .any(|item| item == &Comparable::from(value))
                    ),
                    Comparable::String(left) => match Comparable::from(value) {
                        Comparable::String(right) => Ok(left.contains(right)),
                        _ => Ok(false),
                    },
                    _ => Ok(false),
                },
            },
            // Ne against a missing field matches, everything else does not
            None => Ok(matches!(op, FieldOp::Ne)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use recordgate_core::record::RecordId;

    fn row() -> Bson {
        Bson::Document(doc! {
            "name": "alice",
            "age": 30,
            "tags": ["a", "b"],
        })
    }

    fn matches(row: &Bson, filter: Filter) -> bool {
        RowEvaluator::new(row).matches(&filter).unwrap()
    }

    #[test]
    fn equality_and_ordering() {
        let row = row();

        assert!(matches(&row, Filter::eq("name", "alice")));
        assert!(!matches(&row, Filter::eq("name", "bob")));
        assert!(matches(&row, Filter::gt("age", 18)));
        assert!(matches(&row, Filter::gte("age", 30)));
        assert!(!matches(&row, Filter::lt("age", 30)));
        assert!(matches(&row, Filter::lte("age", 30)));
    }

    #[test]
    fn integer_and_double_compare_equal() {
        let row = Bson::Document(doc! { "age": 30i64 });

        assert!(matches(&row, Filter::eq("age", 30.0)));
    }

    #[test]
    fn identity_equality() {
        let id = RecordId::new();
        let row = Bson::Document(doc! { "_id": id });

        assert!(matches(&row, Filter::id(id)));
        assert!(!matches(&row, Filter::id(RecordId::new())));
    }

    #[test]
    fn combinators() {
        let row = row();

        assert!(matches(
            &row,
            Filter::eq("name", "alice").and(Filter::gt("age", 18)),
        ));
        assert!(matches(
            &row,
            Filter::eq("name", "bob").or(Filter::eq("name", "alice")),
        ));
        assert!(matches(&row, Filter::eq("name", "bob").not()));
    }

    #[test]
    fn exists_and_contains() {
        let row = row();

        assert!(matches(&row, Filter::exists("name")));
        assert!(matches(&row, Filter::not_exists("email")));
        assert!(matches(&row, Filter::contains("tags", "a")));
        assert!(!matches(&row, Filter::contains("tags", "z")));
        assert!(matches(&row, Filter::contains("name", "lic")));
    }

    #[test]
    fn missing_field_only_matches_ne() {
        let row = row();

        assert!(!matches(&row, Filter::eq("email", "x")));
        assert!(matches(&row, Filter::ne("email", "x")));
    }
}
