//! Category membership resolution.
//!
//! The parent embedded in a level-2 category document is the *first* level-1
//! category listing it, which is wrong for sub-categories shared by several
//! parents. Membership resolution fixes the authoritative parent first and
//! then re-queries products and events against both keys:
//!
//! 1. **Parent**: an explicit parent id is honored only if that parent lists
//!    the category among its children. Otherwise the embedded parent is used,
//!    and without one the parent is inferred by majority vote over the level-1
//!    references of the category's products.
//! 2. **Products**: under an event parent, every active event product whose
//!    level-2 reference is the category. Otherwise products referencing both
//!    the category and the parent.
//! 3. **Events**: events referencing both the category and the parent.
//!
//! Products are ordered by `sortOrder` ascending and events by `startDate`
//! descending; entries without a key go last, ties keep store order.

use crate::date_format::parse_timestamp;
use crate::store::{ContentStore, ProductRefs, StoreError};
use crate::types::{CategoryDocument, Event, ParentCategory, Product};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use tracing::debug;

/// Authoritative parent plus the products and events shown under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Membership {
    pub parent: Option<ParentCategory>,
    pub products: Vec<Product>,
    pub events: Vec<Event>,
}

/// Resolve the parent of `category` and its products and events.
///
/// No determinable parent key yields empty products and events. An inferred
/// key with no level-1 document behind it still keys the queries, as a
/// regular parent, and leaves `parent` unset. Store failures propagate; the
/// caller decides how a page degrades.
pub fn resolve_membership(
    store: &dyn ContentStore,
    category: &CategoryDocument,
    explicit_parent: Option<&str>,
) -> Result<Membership, StoreError> {
    let id = category.id();
    let Some((parent_id, parent)) = resolve_parent(store, category, explicit_parent)? else {
        debug!(category = id, "no parent determinable, membership is empty");
        return Ok(Membership::default());
    };
    let event_parent = parent.as_ref().is_some_and(|p| p.summary.is_event);

    let (products, events) = rayon::join(
        || -> Result<Vec<Product>, StoreError> {
            if event_parent {
                let all = store.active_event_products()?;
                Ok(all.into_iter().filter(|p| p.level2_id() == Some(id)).collect())
            } else {
                store.products_in(id, &parent_id)
            }
        },
        || store.events_in(id, &parent_id),
    );

    let mut products = products?;
    let mut events = events?;
    order_products(&mut products);
    order_events(&mut events);
    debug!(
        category = id,
        parent = parent_id.as_str(),
        event_parent,
        products = products.len(),
        events = events.len(),
        "membership resolved"
    );

    Ok(Membership {
        parent,
        products,
        events,
    })
}

/// Parent key plus the parent document, when one resolves.
fn resolve_parent(
    store: &dyn ContentStore,
    category: &CategoryDocument,
    explicit_parent: Option<&str>,
) -> Result<Option<(String, Option<ParentCategory>)>, StoreError> {
    let id = category.id();
    if let Some(explicit) = explicit_parent.filter(|p| !p.is_empty()) {
        if let Some(parent) = store.parent_listing(explicit, id)? {
            debug!(category = id, parent = explicit, "explicit parent verified");
            return Ok(Some((parent.summary.id.clone(), Some(parent))));
        }
        debug!(category = id, parent = explicit, "explicit parent does not list category, ignored");
    }
    if let Some(parent) = category.parent.as_ref() {
        return Ok(Some((parent.summary.id.clone(), Some(parent.clone()))));
    }

    let refs = store.product_refs_in(id)?;
    let Some(winner) = infer_parent(&refs) else {
        return Ok(None);
    };
    debug!(category = id, parent = winner, votes = refs.len(), "parent inferred from products");
    let parent = store.parent_category(winner, id)?;
    if parent.is_none() {
        debug!(category = id, parent = winner, "inferred parent has no level-1 document");
    }
    Ok(Some((winner.to_string(), parent)))
}

/// Most frequent level-1 reference among `refs`.
///
/// Ties go to the reference encountered first.
pub fn infer_parent(refs: &[ProductRefs]) -> Option<&str> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for level1 in refs.iter().filter_map(|r| r.level1.as_deref()) {
        match tally.iter_mut().find(|(id, _)| *id == level1) {
            Some((_, count)) => *count += 1,
            None => tally.push((level1, 1)),
        }
    }
    // max_by_key returns the last maximum; scan in reverse so the first wins.
    tally
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(id, _)| id)
}

/// `sortOrder` ascending, missing last, stable.
pub fn order_products(products: &mut [Product]) {
    products.sort_by_key(|p| (p.sort_order.is_none(), p.sort_order));
}

/// `startDate` descending, missing or unparseable last, stable.
pub fn order_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        let a = a.start_date.as_deref().and_then(parse_timestamp);
        let b = b.start_date.as_deref().and_then(parse_timestamp);
        match (a, b) {
            (Some(a), Some(b)) => Reverse(a).cmp(&Reverse(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Dataset;
    use crate::test_helpers::{event, ids, product};
    use serde_json::{Value, json};

    fn refs(level1: &[Option<&str>]) -> Vec<ProductRefs> {
        level1
            .iter()
            .enumerate()
            .map(|(i, l1)| ProductRefs {
                id: format!("p{i}"),
                level1: l1.map(String::from),
                level2: Some("sub".into()),
            })
            .collect()
    }

    fn top(id: &str, is_event: bool, children: &[&str]) -> Value {
        let children: Vec<Value> = children.iter().map(|c| json!({"_ref": c})).collect();
        json!({"_id": id, "_type": "productCategory", "level": 1, "isEvent": is_event, "children": children})
    }

    fn sub(id: &str) -> Value {
        json!({"_id": id, "_type": "productCategoryLevel2", "level": 2})
    }

    fn item(id: &str, level1: &str, level2: &str, extra: Value) -> Value {
        let mut doc = json!({
            "_id": id, "_type": "productItem",
            "level1Category": {"_ref": level1}, "level2Category": {"_ref": level2}
        });
        if let (Some(doc), Value::Object(extra)) = (doc.as_object_mut(), extra) {
            doc.extend(extra);
        }
        doc
    }

    fn happening(id: &str, level1: &str, level2: &str, start: Option<&str>) -> Value {
        json!({
            "_id": id, "_type": "event", "startDate": start,
            "level1Category": {"_ref": level1}, "level2Category": {"_ref": level2}
        })
    }

    fn resolve(docs: Vec<Value>, category: &str, explicit: Option<&str>) -> Membership {
        let store = Dataset::from_documents(docs).unwrap();
        let doc = store.category(category).unwrap().unwrap();
        resolve_membership(&store, &doc, explicit).unwrap()
    }

    #[test]
    fn majority_vote_picks_most_referenced_parent() {
        let refs = refs(&[Some("catA"), Some("catB"), Some("catA")]);
        assert_eq!(infer_parent(&refs), Some("catA"));
    }

    #[test]
    fn majority_vote_tie_goes_to_first_seen() {
        let refs = refs(&[Some("catB"), Some("catA"), Some("catA"), Some("catB")]);
        assert_eq!(infer_parent(&refs), Some("catB"));
    }

    #[test]
    fn majority_vote_ignores_missing_refs() {
        assert_eq!(infer_parent(&refs(&[None, None])), None);
        assert_eq!(infer_parent(&refs(&[None, Some("catA")])), Some("catA"));
        assert_eq!(infer_parent(&[]), None);
    }

    #[test]
    fn orphan_category_infers_parent_end_to_end() {
        // No level-1 category lists "sub"; products vote 2 to 1 for catA.
        let membership = resolve(
            vec![
                top("catA", false, &[]),
                top("catB", false, &[]),
                sub("sub"),
                item("p1", "catA", "sub", json!({})),
                item("p2", "catB", "sub", json!({})),
                item("p3", "catA", "sub", json!({})),
            ],
            "sub",
            None,
        );
        assert_eq!(membership.parent.unwrap().summary.id, "catA");
        assert_eq!(ids(&membership.products), vec!["p1", "p3"]);
    }

    #[test]
    fn dangling_inferred_parent_still_keys_the_queries() {
        // "gone" is referenced by the products but has no document.
        let membership = resolve(
            vec![
                sub("sub"),
                item("p1", "gone", "sub", json!({})),
                item("p2", "gone", "sub", json!({})),
                happening("e1", "gone", "sub", None),
            ],
            "sub",
            None,
        );
        assert!(membership.parent.is_none());
        assert_eq!(ids(&membership.products), vec!["p1", "p2"]);
        assert_eq!(ids(&membership.events), vec!["e1"]);
    }

    #[test]
    fn inferred_parent_is_marked_unlisted() {
        let membership = resolve(
            vec![top("catA", false, &[]), sub("sub"), item("p1", "catA", "sub", json!({}))],
            "sub",
            None,
        );
        assert!(!membership.parent.unwrap().lists_child);
    }

    #[test]
    fn event_parent_filters_active_event_products() {
        let membership = resolve(
            vec![
                top("fair", true, &["sub"]),
                sub("sub"),
                sub("other"),
                item("keep", "anything", "sub", json!({"isEvent": true})),
                item("expired", "fair", "sub", json!({"isEvent": true, "isExpired": true})),
                item("wrong-sub", "fair", "other", json!({"isEvent": true})),
                item("not-event", "fair", "sub", json!({})),
            ],
            "sub",
            None,
        );
        assert_eq!(ids(&membership.products), vec!["keep"]);
    }

    #[test]
    fn regular_parent_requires_both_references() {
        let membership = resolve(
            vec![
                top("catA", false, &["sub"]),
                top("catB", false, &["sub"]),
                sub("sub"),
                item("a", "catA", "sub", json!({})),
                item("b", "catB", "sub", json!({})),
                happening("ea", "catA", "sub", None),
                happening("eb", "catB", "sub", None),
            ],
            "sub",
            None,
        );
        // Embedded parent is the first category listing "sub".
        assert_eq!(membership.parent.unwrap().summary.id, "catA");
        assert_eq!(ids(&membership.products), vec!["a"]);
        assert_eq!(ids(&membership.events), vec!["ea"]);
    }

    #[test]
    fn verified_explicit_parent_wins() {
        let membership = resolve(
            vec![
                top("catA", false, &["sub"]),
                top("catB", false, &["sub"]),
                sub("sub"),
                item("a", "catA", "sub", json!({})),
                item("b", "catB", "sub", json!({})),
            ],
            "sub",
            Some("catB"),
        );
        assert_eq!(membership.parent.unwrap().summary.id, "catB");
        assert_eq!(ids(&membership.products), vec!["b"]);
    }

    #[test]
    fn unverified_explicit_parent_falls_back_to_embedded() {
        let membership = resolve(
            vec![
                top("catA", false, &["sub"]),
                top("catB", false, &[]),
                sub("sub"),
            ],
            "sub",
            Some("catB"),
        );
        assert_eq!(membership.parent.unwrap().summary.id, "catA");
    }

    #[test]
    fn no_parent_means_empty_membership() {
        let membership = resolve(vec![sub("sub")], "sub", None);
        assert_eq!(membership, Membership::default());
    }

    #[test]
    fn products_sort_by_order_missing_last_stable() {
        let mut products = vec![product("none-1"), product("two"), product("none-2"), product("one")];
        products[1].sort_order = Some(2);
        products[3].sort_order = Some(1);
        order_products(&mut products);
        assert_eq!(ids(&products), vec!["one", "two", "none-1", "none-2"]);
    }

    #[test]
    fn events_sort_newest_first_missing_last_stable() {
        let mut events = vec![
            event("undated-1", None),
            event("old", Some("2023-01-01")),
            event("new", Some("2024-06-01T10:00:00Z")),
            event("undated-2", Some("someday")),
            event("mid", Some("2024-01-15")),
        ];
        order_events(&mut events);
        assert_eq!(ids(&events), vec!["new", "mid", "old", "undated-1", "undated-2"]);
    }
}
