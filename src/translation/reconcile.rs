/*!
 * Structural reconciliation of a locale file against the canonical unit order.
 *
 * Matching is by id only. Each canonical id can be claimed by one locale unit;
 * locale units whose id is unknown (or already claimed) are removed, surviving
 * units keep their position, and unclaimed canonical ids are appended in
 * canonical order.
 */

use std::collections::HashMap;

use crate::errors::DocumentError;
use crate::xliff::{TranslationUnit, XliffDocument};

/// Plan produced by [`reconcile`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Positions of locale units that stay
    pub keep: Vec<usize>,
    /// Positions of locale units to delete
    pub remove: Vec<usize>,
    /// Canonical ids without a locale counterpart, in canonical order
    pub append: Vec<String>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty() && self.append.is_empty()
    }
}

/// Diff the locale units against the canonical id sequence
pub fn reconcile(canonical_ids: &[String], locale_units: &[TranslationUnit]) -> Reconciliation {
    let mut available: HashMap<&str, usize> = HashMap::with_capacity(canonical_ids.len());
    for id in canonical_ids {
        *available.entry(id.as_str()).or_insert(0) += 1;
    }

    let mut plan = Reconciliation::default();
    let mut claimed: HashMap<&str, usize> = HashMap::new();

    for (position, unit) in locale_units.iter().enumerate() {
        match available.get_mut(unit.id.as_str()) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                *claimed.entry(unit.id.as_str()).or_insert(0) += 1;
                plan.keep.push(position);
            }
            _ => plan.remove.push(position),
        }
    }

    // The first occurrences of each id are the ones consumed by locale units
    for id in canonical_ids {
        match claimed.get_mut(id.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => plan.append.push(id.clone()),
        }
    }

    plan
}

/// Apply a plan to a locale document, copying new units from `canonical`
///
/// Returns `(removed, appended)`.
pub fn apply(
    plan: &Reconciliation,
    document: &mut XliffDocument,
    canonical: &XliffDocument,
) -> Result<(usize, usize), DocumentError> {
    document.remove_units(&plan.remove);

    let mut fresh = Vec::with_capacity(plan.append.len());
    for id in &plan.append {
        let element = canonical
            .unit_element(id)
            .ok_or_else(|| DocumentError::MissingElement(format!("trans-unit#{}", id)))?;
        fresh.push(element);
    }
    let appended = document.append_fresh_units(fresh)?;

    Ok((plan.remove.len(), appended))
}
