//! Parent/child traversal over a hierarchy join model.
//!
//! The edges live in a separate through table whose rows carry two
//! foreign keys back to the hierarchical model. Closures run a DFS with a
//! visited set, so pre-existing cycles in the data degrade to a partial
//! closure instead of hanging.

use crate::{
    error::ValidationError,
    store::{RecordId, Store},
    value::Value,
};
use reportql_schema::prelude::*;
use std::collections::BTreeSet;

/// Direct parents of `id`, via the through table.
#[must_use]
pub fn parent_ids(store: &Store, model: &Model, id: RecordId) -> Vec<RecordId> {
    edge_ends(store, model, id, Direction::Up)
}

/// Direct children of `id`.
#[must_use]
pub fn child_ids(store: &Store, model: &Model, id: RecordId) -> Vec<RecordId> {
    edge_ends(store, model, id, Direction::Down)
}

/// Every ancestor of `id`, excluding `id` itself.
#[must_use]
pub fn ancestor_ids(store: &Store, model: &Model, id: RecordId) -> BTreeSet<RecordId> {
    closure(store, model, id, Direction::Up)
}

/// Every descendant of `id`, excluding `id` itself.
#[must_use]
pub fn descendant_ids(store: &Store, model: &Model, id: RecordId) -> BTreeSet<RecordId> {
    closure(store, model, id, Direction::Down)
}

/// True when `id` participates in at least one hierarchy edge.
#[must_use]
pub fn has_parent_or_child(store: &Store, model: &Model, id: RecordId) -> bool {
    !parent_ids(store, model, id).is_empty() || !child_ids(store, model, id).is_empty()
}

/// Write-time check for a proposed parent/child edge. Self-links are
/// rejected, as is any edge that would close a cycle, which is the case
/// exactly when the proposed parent is already a descendant of the child.
pub fn validate_link(
    store: &Store,
    model: &Model,
    parent: RecordId,
    child: RecordId,
) -> Result<(), ValidationError> {
    if parent == child {
        return Err(ValidationError::Value {
            field: "child".to_string(),
            message: "An object cannot be its own child.".to_string(),
        });
    }

    if descendant_ids(store, model, child).contains(&parent) {
        return Err(ValidationError::Value {
            field: "parent".to_string(),
            message: "The proposed parent is already a descendant of the proposed child."
                .to_string(),
        });
    }

    Ok(())
}

/// Resolve a stored textual reference to a row id: either a bare pk or a
/// `name:version` pair matched against the row values.
#[must_use]
pub fn resolve_reference(store: &Store, model: &Model, raw: &str) -> Option<RecordId> {
    if let Ok(id) = raw.parse::<RecordId>() {
        return store.record(model.ident, id).map(|record| record.id);
    }

    let (name, version) = raw.split_once(':')?;
    let table = store.table(model.ident)?;

    table
        .rows
        .values()
        .find(|row| {
            row.value("name").is_some_and(|v| v.to_string() == name)
                && row.value("version").is_some_and(|v| v.to_string() == version)
        })
        .map(|row| row.id)
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    const fn from_field(self, hierarchy: &Hierarchy) -> &'static str {
        match self {
            Self::Up => hierarchy.child_field,
            Self::Down => hierarchy.parent_field,
        }
    }

    const fn to_field(self, hierarchy: &Hierarchy) -> &'static str {
        match self {
            Self::Up => hierarchy.parent_field,
            Self::Down => hierarchy.child_field,
        }
    }
}

fn edge_ends(store: &Store, model: &Model, id: RecordId, direction: Direction) -> Vec<RecordId> {
    let Some(hierarchy) = &model.hierarchy else {
        return Vec::new();
    };
    let Some(through) = store.table(hierarchy.through) else {
        return Vec::new();
    };

    through
        .rows
        .values()
        .filter(|edge| {
            edge.value(direction.from_field(hierarchy))
                .and_then(Value::as_ref_id)
                .is_some_and(|pk| pk == id)
        })
        .filter_map(|edge| {
            edge.value(direction.to_field(hierarchy))
                .and_then(Value::as_ref_id)
        })
        .collect()
}

fn closure(store: &Store, model: &Model, id: RecordId, direction: Direction) -> BTreeSet<RecordId> {
    let mut seen = BTreeSet::new();
    let mut stack = edge_ends(store, model, id, direction);

    while let Some(next) = stack.pop() {
        if next != id && seen.insert(next) {
            stack.extend(edge_ends(store, model, next, direction));
        }
    }

    seen
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::COMPONENT, test_fixtures as fx};

    #[test]
    fn direct_edges() {
        let store = fx::store();

        assert_eq!(
            child_ids(&store, &COMPONENT, fx::COMPONENT_HTTPD),
            vec![fx::COMPONENT_APR]
        );
        assert_eq!(
            parent_ids(&store, &COMPONENT, fx::COMPONENT_EXPAT),
            vec![fx::COMPONENT_APR]
        );
        assert!(parent_ids(&store, &COMPONENT, fx::COMPONENT_HTTPD).is_empty());
    }

    #[test]
    fn closures_are_transitive_and_exclude_self() {
        let store = fx::store();

        assert_eq!(
            descendant_ids(&store, &COMPONENT, fx::COMPONENT_HTTPD),
            BTreeSet::from([fx::COMPONENT_APR, fx::COMPONENT_EXPAT])
        );
        assert_eq!(
            ancestor_ids(&store, &COMPONENT, fx::COMPONENT_EXPAT),
            BTreeSet::from([fx::COMPONENT_HTTPD, fx::COMPONENT_APR])
        );
        assert!(descendant_ids(&store, &COMPONENT, fx::COMPONENT_KERNEL).is_empty());
    }

    #[test]
    fn participation() {
        let store = fx::store();

        assert!(has_parent_or_child(&store, &COMPONENT, fx::COMPONENT_APR));
        assert!(!has_parent_or_child(&store, &COMPONENT, fx::COMPONENT_KERNEL));
    }

    #[test]
    fn link_validation_rejects_self_and_cycles() {
        let store = fx::store();

        assert!(validate_link(&store, &COMPONENT, 20, 20).is_err());

        // httpd is an ancestor of expat: expat -> httpd would close a cycle.
        assert!(
            validate_link(&store, &COMPONENT, fx::COMPONENT_EXPAT, fx::COMPONENT_HTTPD).is_err()
        );

        // A fresh edge between unrelated nodes is fine.
        assert!(
            validate_link(&store, &COMPONENT, fx::COMPONENT_KERNEL, fx::COMPONENT_EXPAT).is_ok()
        );
    }

    #[test]
    fn references_resolve_by_pk_or_name_version() {
        let store = fx::store();

        assert_eq!(
            resolve_reference(&store, &COMPONENT, "20"),
            Some(fx::COMPONENT_HTTPD)
        );
        assert_eq!(
            resolve_reference(&store, &COMPONENT, "httpd:2.4"),
            Some(fx::COMPONENT_HTTPD)
        );
        assert_eq!(resolve_reference(&store, &COMPONENT, "httpd:9.9"), None);
        assert_eq!(resolve_reference(&store, &COMPONENT, "999"), None);
    }
}
