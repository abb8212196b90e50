//! Selection state and the four transitions that move it.
//!
//! Transitions are pure: they take the current state by reference and return a
//! fresh state plus a [`Transition`] descriptor, never mutating in place. The
//! catalog is the single source of truth for what a transition may pick.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use crate::catalog::model::{Catalog, Category, CategoryRole, Item};
use crate::foundation::error::{EngineError, EngineResult};
use crate::state::theme::Theme;

/// Visual side-channel of a transition, for presentation-layer animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransitionEffect {
    /// Nothing special happened.
    None,
    /// A large simultaneous layer change (costume swap, themed shuffle).
    Explode,
}

/// What a transition did: which categories moved and with what effect.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    /// Ids of every category whose selection actually changed.
    pub changed: BTreeSet<String>,
    /// Animation hint.
    pub effect: TransitionEffect,
}

impl Transition {
    fn quiet() -> Self {
        Self {
            changed: BTreeSet::new(),
            effect: TransitionEffect::None,
        }
    }
}

/// A total map from category id to selected item id.
///
/// Totality (exactly one entry per catalog category, each naming an item that
/// exists there) is established by [`SelectionState::initial`] and preserved
/// by every transition; [`SelectionState::validate`] re-checks it for states
/// that arrive from outside, e.g. deserialized snapshots.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SelectionState {
    selections: BTreeMap<String, String>,
}

impl SelectionState {
    /// The starting state: every category at its canonical default.
    pub fn initial(catalog: &Catalog) -> Self {
        let selections = catalog
            .categories()
            .iter()
            .map(|cat| (cat.id.clone(), cat.canonical_default().id.clone()))
            .collect();
        Self { selections }
    }

    /// The selected item id for a category.
    pub fn selected(&self, category_id: &str) -> EngineResult<&str> {
        self.selections
            .get(category_id)
            .map(String::as_str)
            .ok_or_else(|| {
                EngineError::invalid_selection(format!("no selection for category '{category_id}'"))
            })
    }

    /// Resolve the selected [`Item`] for a category.
    pub fn selected_item<'c>(&self, catalog: &'c Catalog, category_id: &str) -> EngineResult<&'c Item> {
        let cat = catalog.category(category_id)?;
        let item_id = self.selected(category_id)?;
        cat.item(item_id).ok_or_else(|| {
            EngineError::invalid_selection(format!(
                "selection '{item_id}' not found in category '{category_id}'"
            ))
        })
    }

    /// Check the totality invariant against a catalog.
    pub fn validate(&self, catalog: &Catalog) -> EngineResult<()> {
        for cat in catalog.categories() {
            let item_id = self.selected(&cat.id)?;
            if cat.item(item_id).is_none() {
                return Err(EngineError::invalid_selection(format!(
                    "selection '{item_id}' not found in category '{}'",
                    cat.id
                )));
            }
        }
        if self.selections.len() != catalog.categories().len() {
            return Err(EngineError::invalid_selection(
                "state holds selections for categories not in the catalog",
            ));
        }
        Ok(())
    }

    /// Iterate `(category id, item id)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn set(&mut self, changed: &mut BTreeSet<String>, category_id: &str, item_id: &str) {
        let prev = self
            .selections
            .insert(category_id.to_string(), item_id.to_string());
        if prev.as_deref() != Some(item_id) {
            changed.insert(category_id.to_string());
        }
    }
}

fn costume_is_active(catalog: &Catalog, state: &SelectionState) -> EngineResult<bool> {
    let costume = catalog.category_by_role(CategoryRole::Costume)?;
    let item = state.selected_item(catalog, &costume.id)?;
    Ok(!item.kind.is_none())
}

/// Select an item, applying toggle-to-fallback and cross-category exclusivity.
pub fn select(
    catalog: &Catalog,
    state: &SelectionState,
    category_id: &str,
    item_id: &str,
) -> EngineResult<(SelectionState, Transition)> {
    let cat = catalog.category(category_id)?;
    let item = cat.item(item_id).ok_or_else(|| {
        EngineError::invalid_selection(format!(
            "unknown item '{item_id}' in category '{category_id}'"
        ))
    })?;
    let current_id = state.selected(category_id)?;

    let mut next = state.clone();
    let mut tx = Transition::quiet();

    // Re-selecting the current item toggles to a fallback and skips all
    // cross-category side effects.
    if current_id == item_id {
        if cat.role.always_required() {
            let fallback = cat.canonical_default();
            if current_id != fallback.id {
                next.set(&mut tx.changed, category_id, &fallback.id);
            }
        } else if let Some(none) = cat.none_item() {
            if current_id != none.id {
                next.set(&mut tx.changed, category_id, &none.id);
            }
        }
        return Ok((next, tx));
    }

    next.set(&mut tx.changed, category_id, item_id);

    if cat.role == CategoryRole::Costume && !item.kind.is_none() {
        for other in catalog.categories() {
            if other.role.in_accessory_group() {
                next.set(&mut tx.changed, &other.id, &other.none_or_first().id);
            }
        }
        tx.effect = TransitionEffect::Explode;
    } else if cat.role.in_accessory_group() && costume_is_active(catalog, state)? {
        let costume = catalog.category_by_role(CategoryRole::Costume)?;
        next.set(&mut tx.changed, &costume.id, &costume.none_or_first().id);
        let body = catalog.category_by_role(CategoryRole::Body)?;
        if cat.id != body.id {
            let body_item = state.selected_item(catalog, &body.id)?;
            if body_item.kind.is_none() {
                next.set(&mut tx.changed, &body.id, &body.canonical_default().id);
            }
        }
    }

    Ok((next, tx))
}

fn eligible_pool<'c>(cat: &'c Category) -> Vec<&'c Item> {
    if cat.role == CategoryRole::Costume {
        return vec![cat.none_or_first()];
    }
    cat.items.iter().filter(|i| !i.hidden).collect()
}

/// Re-draw every category uniformly at random from its eligible pool.
///
/// Costume's pool is its `none` item only, so the exclusivity invariants hold
/// by construction and no post-correction pass is needed.
pub fn randomize<R: Rng + ?Sized>(
    catalog: &Catalog,
    state: &SelectionState,
    rng: &mut R,
) -> (SelectionState, Transition) {
    let mut next = state.clone();
    let mut tx = Transition::quiet();
    for cat in catalog.categories() {
        let pool = eligible_pool(cat);
        if pool.is_empty() {
            continue;
        }
        let pick = pool[rng.gen_range(0..pool.len())];
        next.set(&mut tx.changed, &cat.id, &pick.id);
    }
    (next, tx)
}

/// Randomize with each category's pool filtered by the theme's label
/// allow-list. An empty filtered pool leaves that category untouched.
pub fn shuffle_themed<R: Rng + ?Sized>(
    catalog: &Catalog,
    state: &SelectionState,
    theme: &Theme,
    rng: &mut R,
) -> (SelectionState, Transition) {
    let mut next = state.clone();
    let mut tx = Transition::quiet();
    for cat in catalog.categories() {
        let mut pool = eligible_pool(cat);
        if let Some(labels) = theme.rules.get(cat.id.as_str()) {
            pool.retain(|i| labels.iter().any(|l| l == &i.label));
        }
        if pool.is_empty() {
            continue;
        }
        let pick = pool[rng.gen_range(0..pool.len())];
        next.set(&mut tx.changed, &cat.id, &pick.id);
    }
    tx.effect = TransitionEffect::Explode;
    (next, tx)
}

/// Deterministic reset: required categories to their canonical defaults,
/// everything else to `none`.
pub fn clear(catalog: &Catalog, state: &SelectionState) -> (SelectionState, Transition) {
    let mut next = state.clone();
    let mut tx = Transition::quiet();
    for cat in catalog.categories() {
        let target = if cat.role.always_required() {
            cat.canonical_default()
        } else {
            cat.none_or_first()
        };
        next.set(&mut tx.changed, &cat.id, &target.id);
    }
    (next, tx)
}

#[cfg(test)]
#[path = "../../tests/unit/state/machine.rs"]
mod tests;
