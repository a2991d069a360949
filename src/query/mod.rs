//! Query Module
//!
//! The "select by options" predicate language shared by both stores.
//!
//! ## Predicate Form
//! An ordered list of `(attribute, value)` string pairs plus a connective:
//! - `and`: intersect the per-clause matches, left to right
//! - `or` : concatenate the per-clause matches (duplicates kept)
//! - `""` : a single clause (several clauses combine as `and`)
//! - `*`  : every active record; a `("*", "*")` pair means the same
//!
//! Attribute names resolve through `Field`; unknown names always fail.

mod evaluator;
mod selection;

pub use evaluator::{evaluate, IndexedSource};
pub use selection::Selection;

use std::fmt;

use crate::error::{CabinetError, Result};
use crate::record::{Field, FieldValue};

/// Wildcard attribute/value marking a select-all predicate
pub const WILDCARD: &str = "*";

/// How successive clauses combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
    /// No connective given
    Single,
    /// Select every active record
    All,
}

impl Connective {
    pub fn parse(text: &str) -> Result<Self> {
        match text.trim().to_lowercase().as_str() {
            "and" => Ok(Connective::And),
            "or" => Ok(Connective::Or),
            "" => Ok(Connective::Single),
            WILDCARD => Ok(Connective::All),
            other => Err(CabinetError::invalid_value(
                "connective",
                other,
                "expected 'and', 'or', '*' or nothing",
            )),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Single => "",
            Connective::All => WILDCARD,
        })
    }
}

/// One `attribute = 'value'` clause, kept as text until evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub attribute: String,
    pub value: String,
}

/// A parsed predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    conditions: Vec<Condition>,
    connective: Connective,
}

impl SearchOptions {
    /// Build from raw pairs and a connective string
    pub fn parse<I, A, V>(pairs: I, connective: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        Ok(Self::new(pairs, Connective::parse(connective)?))
    }

    pub fn new<I, A, V>(pairs: I, connective: Connective) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        let conditions = pairs
            .into_iter()
            .map(|(a, v)| Condition {
                attribute: a.into(),
                value: v.into(),
            })
            .collect();
        Self {
            conditions,
            connective,
        }
    }

    /// Every active record
    pub fn all() -> Self {
        Self {
            conditions: Vec::new(),
            connective: Connective::All,
        }
    }

    /// A single `attribute = value` clause
    pub fn single(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new([(attribute.into(), value.into())], Connective::Single)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    /// Whether this predicate bypasses the clauses entirely
    pub fn selects_all(&self) -> bool {
        self.connective == Connective::All
            || self.conditions.is_empty()
            || self
                .conditions
                .iter()
                .any(|c| c.attribute.trim() == WILDCARD && c.value.trim() == WILDCARD)
    }
}

impl fmt::Display for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selects_all() {
            return f.write_str(WILDCARD);
        }
        let joiner = match self.connective {
            Connective::Or => " or ",
            _ => " and ",
        };
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(|c| format!("{} = '{}'", c.attribute, c.value))
            .collect();
        f.write_str(&clauses.join(joiner))
    }
}

/// Parse `field = value` assignments for an update
///
/// Every name and value is checked before anything is applied: unknown
/// names fail with `UnknownField`, `id` with `ImmutableField`, and bad
/// values with `InvalidValue`.
pub fn parse_assignments<A, V>(assignments: &[(A, V)]) -> Result<Vec<FieldValue>>
where
    A: AsRef<str>,
    V: AsRef<str>,
{
    assignments
        .iter()
        .map(|(name, value)| {
            let field: Field = name.as_ref().parse()?;
            if field == Field::Id {
                return Err(CabinetError::ImmutableField(field.name().to_string()));
            }
            field.parse_value(value.as_ref())
        })
        .collect()
}
