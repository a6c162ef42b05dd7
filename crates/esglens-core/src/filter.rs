//! Backend-independent filter specifications.
//!
//! Repository predicates are explicit values (field, comparator, operand)
//! rather than opaque closures, so any storage backend can translate them:
//! the DuckDB store renders parameterized `WHERE` clauses, the in-memory
//! store evaluates them against entities through [`Queryable`]. A [`Filter`]
//! is a conjunction; an empty filter matches everything.

use std::cmp::Ordering;

use serde::Serialize;

/// Comparison operator applied between a field and an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Eq,
    EqIgnoreCase,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

/// Operand carried by a condition, or a value read from an entity field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
}

impl FieldValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Text(_) => None,
        }
    }
}

/// A single field comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition<F> {
    pub field: F,
    pub comparator: Comparator,
    pub value: FieldValue,
}

/// Conjunction of conditions over entities with field set `F`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Filter<F> {
    conditions: Vec<Condition<F>>,
}

impl<F> Filter<F> {
    /// An empty filter; matches every entity.
    pub fn all() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Start a filter from a single condition.
    pub fn where_field(field: F, comparator: Comparator, value: FieldValue) -> Self {
        Self {
            conditions: vec![Condition {
                field,
                comparator,
                value,
            }],
        }
    }

    /// Add a further condition; all conditions must hold.
    pub fn and(mut self, field: F, comparator: Comparator, value: FieldValue) -> Self {
        self.conditions.push(Condition {
            field,
            comparator,
            value,
        });
        self
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Entities that expose their fields to filter evaluation.
pub trait Queryable {
    type Field: Copy;

    /// Storage-assigned identity, if the entity has been committed.
    fn entity_id(&self) -> Option<i64>;

    /// Current value of the given field.
    fn field_value(&self, field: Self::Field) -> FieldValue;
}

impl<F: Copy> Filter<F> {
    /// Evaluate the filter against an entity in memory.
    pub fn matches<T>(&self, entity: &T) -> bool
    where
        T: Queryable<Field = F>,
    {
        self.conditions
            .iter()
            .all(|condition| condition_holds(&entity.field_value(condition.field), condition))
    }
}

fn condition_holds<F>(actual: &FieldValue, condition: &Condition<F>) -> bool {
    match (actual, &condition.value) {
        (FieldValue::Text(actual), FieldValue::Text(expected)) => {
            text_holds(actual, condition.comparator, expected)
        }
        _ => match (actual.as_f64(), condition.value.as_f64()) {
            (Some(actual), Some(expected)) => numeric_holds(actual, condition.comparator, expected),
            // Mixed text/number comparisons never hold; Ne is the exception
            // since the values are certainly not equal.
            _ => condition.comparator == Comparator::Ne,
        },
    }
}

fn text_holds(actual: &str, comparator: Comparator, expected: &str) -> bool {
    match comparator {
        Comparator::Eq => actual == expected,
        Comparator::EqIgnoreCase => actual.eq_ignore_ascii_case(expected),
        Comparator::Ne => actual != expected,
        Comparator::Ge => actual >= expected,
        Comparator::Gt => actual > expected,
        Comparator::Le => actual <= expected,
        Comparator::Lt => actual < expected,
    }
}

fn numeric_holds(actual: f64, comparator: Comparator, expected: f64) -> bool {
    let Some(ordering) = actual.partial_cmp(&expected) else {
        // NaN on either side: only Ne holds.
        return comparator == Comparator::Ne;
    };

    match comparator {
        Comparator::Eq | Comparator::EqIgnoreCase => ordering == Ordering::Equal,
        Comparator::Ne => ordering != Ordering::Equal,
        Comparator::Ge => ordering != Ordering::Less,
        Comparator::Gt => ordering == Ordering::Greater,
        Comparator::Le => ordering != Ordering::Greater,
        Comparator::Lt => ordering == Ordering::Less,
    }
}
