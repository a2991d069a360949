//! Predicate evaluator
//!
//! One algorithm for both stores: each clause resolves to a candidate list
//! of locations (through the index set, or a direct id lookup), and the
//! lists fold left to right under the connective.
//!
//! ## Parse failures
//! A value that fails to parse for a date, height, cash-savings, or letter
//! clause contributes nothing under `or`, so sparse OR predicates still
//! answer. Under any other connective the failure aborts the evaluation.
//! Unknown attribute names abort under every connective.

use crate::error::Result;
use crate::index::{IndexSet, Location};
use crate::record::{Field, FieldValue};

use super::{Connective, SearchOptions};

/// A store the evaluator can run against
pub trait IndexedSource {
    type Location: Location;

    /// The store's secondary indexes
    fn index(&self) -> &IndexSet<Self::Location>;

    /// Location of the active record with `id`, if any
    fn locate_id(&mut self, id: u32) -> Result<Option<Self::Location>>;

    /// Every active record's location, in store order
    fn active_locations(&mut self) -> Result<Vec<Self::Location>>;
}

/// Resolve `options` against `source` to an ordered list of locations
///
/// `or` keeps duplicates: a record matching two clauses appears twice.
pub fn evaluate<S: IndexedSource + ?Sized>(
    source: &mut S,
    options: &SearchOptions,
) -> Result<Vec<S::Location>> {
    if options.selects_all() {
        return source.active_locations();
    }

    let connective = options.connective();
    let mut matched: Option<Vec<S::Location>> = None;

    for condition in options.conditions() {
        let field: Field = condition.attribute.parse()?;

        let candidates = match field.parse_value(&condition.value) {
            Ok(value) => resolve(source, &value)?,
            Err(e) if connective == Connective::Or && lenient_under_or(field) => {
                tracing::debug!("Clause {} = '{}' skipped: {}", field, condition.value, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        matched = Some(match matched {
            None => candidates,
            Some(mut acc) => {
                match connective {
                    Connective::Or => acc.extend(candidates),
                    _ => acc.retain(|loc| candidates.contains(loc)),
                }
                acc
            }
        });
    }

    Ok(matched.unwrap_or_default())
}

fn resolve<S: IndexedSource + ?Sized>(
    source: &mut S,
    value: &FieldValue,
) -> Result<Vec<S::Location>> {
    if let FieldValue::Id(id) = value {
        return Ok(source.locate_id(*id)?.into_iter().collect());
    }
    Ok(source
        .index()
        .lookup(value)
        .map(<[S::Location]>::to_vec)
        .unwrap_or_default())
}

fn lenient_under_or(field: Field) -> bool {
    matches!(
        field,
        Field::DateOfBirth | Field::Height | Field::CashSavings | Field::FavoriteLetter
    )
}
