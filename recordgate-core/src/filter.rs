//! Filter and patch construction for record lookups and updates.
//!
//! This module provides the two declarative inputs a gateway passes through to
//! its backend: [`Filter`], a match predicate over record fields, and
//! [`Patch`], a set of field assignments plus field removals applied
//! atomically to one matched record.
//!
//! Filters are opaque to the gateway. Each backend interprets them through the
//! [`FilterVisitor`] seam: the in-memory backend evaluates them against stored
//! documents, the MongoDB backend translates them into native query documents.
//!
//! # Filter building
//!
//! ```ignore
//! use recordgate::filter::Filter;
//!
//! let filter = Filter::eq("status", "active")
//!     .and(Filter::gt("age", 18));
//! ```
//!
//! # Patch building
//!
//! ```ignore
//! use recordgate::filter::Patch;
//!
//! let patch = Patch::new()
//!     .set("tag", "y")
//!     .unset("name");
//! ```

use bson::Bson;

use crate::{error::GatewayError, record::RecordId};

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// String or array contains value.
    Contains,
}

/// A declarative match predicate over record fields.
///
/// Filters form a small expression tree that can be combined with logical
/// operators. The gateway never inspects a filter; backends interpret it via
/// [`FilterVisitor`].
///
/// # Example
///
/// ```ignore
/// use recordgate::filter::Filter;
///
/// let simple = Filter::eq("status", "active");
/// let combined = Filter::all(vec![
///     Filter::eq("status", "active"),
///     Filter::gt("age", 18),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub enum Filter {
    /// Logical AND of multiple filters (all must match).
    And(Vec<Filter>),
    /// Logical OR of multiple filters (any must match).
    Or(Vec<Filter>),
    /// Logical NOT of a filter.
    Not(Box<Filter>),
    /// Checks whether a field exists or is absent.
    Exists(String, bool),
    /// Field comparison.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Filter {
    /// Creates a field comparison filter.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Filter::Field { field, op, value }
    }

    /// Creates an identity filter matching the record with the given id.
    ///
    /// Shorthand for `Filter::eq("_id", id)`, the point-lookup shape every
    /// gateway operation on a single record reduces to.
    pub fn id(id: RecordId) -> Self {
        Filter::eq("_id", id)
    }

    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Gt, value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Lt, value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Creates a contains filter (string or array membership).
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Creates an existence filter.
    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists(field.into(), true)
    }

    /// Creates a non-existence filter.
    pub fn not_exists(field: impl Into<String>) -> Self {
        Filter::Exists(field.into(), false)
    }

    /// Combines multiple filters such that all must match.
    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Combines multiple filters such that any can match.
    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Combines this filter with another using logical AND.
    ///
    /// If this filter is already an AND, the other filter is appended to the
    /// list. Otherwise, a new AND filter is created.
    pub fn and(self, other: Filter) -> Self {
        match self {
            Filter::And(mut list) => {
                list.push(other);
                Filter::And(list)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut list) => {
                list.push(other);
                Filter::Or(list)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Negates this filter.
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }
}

/// Visitor seam for interpreting filters in a backend-specific way.
///
/// Backends implement this once: the in-memory store evaluates filters to a
/// boolean against a document, the MongoDB store translates them into query
/// documents.
pub trait FilterVisitor {
    type Output;
    type Error: Into<GatewayError>;

    fn visit_and(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, filters: &[Filter]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_filter(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error> {
        match filter {
            Filter::And(filters) => self.visit_and(filters),
            Filter::Or(filters) => self.visit_or(filters),
            Filter::Not(filter) => self.visit_not(filter),
            Filter::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Filter::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

/// A partial update instruction: fields to set plus fields to remove.
///
/// Both parts are applied atomically to one matched record. An unset of a
/// field that is absent is a no-op; identity (`_id`) is never touched by a
/// patch.
///
/// # Example
///
/// ```ignore
/// use recordgate::filter::Patch;
///
/// let patch = Patch::new()
///     .set("tag", "y")
///     .unset("name");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Patch {
    set: bson::Document,
    unset: Vec<String>,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Patch::default()
    }

    /// Adds a field assignment to this patch.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Adds a field removal to this patch.
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.unset.contains(&field) {
            self.unset.push(field);
        }
        self
    }

    /// Returns the fields this patch assigns.
    pub fn set_fields(&self) -> &bson::Document {
        &self.set
    }

    /// Returns the fields this patch removes.
    pub fn unset_fields(&self) -> &[String] {
        &self.unset
    }

    /// Returns `true` if this patch neither sets nor removes anything.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_chaining_flattens() {
        let filter = Filter::eq("a", 1)
            .and(Filter::eq("b", 2))
            .and(Filter::eq("c", 3));

        match filter {
            Filter::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn id_filter_targets_identity_key() {
        let id = RecordId::new();

        match Filter::id(id) {
            Filter::Field { field, value, .. } => {
                assert_eq!(field, "_id");
                assert_eq!(value, Bson::ObjectId(id));
            }
            other => panic!("expected Field, got {other:?}"),
        }
    }

    #[test]
    fn patch_collects_set_and_unset() {
        let patch = Patch::new()
            .set("tag", "y")
            .set("count", 3)
            .unset("name")
            .unset("name");

        assert_eq!(patch.set_fields().len(), 2);
        assert_eq!(patch.unset_fields(), ["name".to_string()]);
        assert!(!patch.is_empty());
        assert!(Patch::new().is_empty());
    }
}
