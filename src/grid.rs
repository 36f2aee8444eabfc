//! What a category page lists, and in which order.

use crate::types::{CategoryDocument, ChildCategory, Event, Product};
use serde::Serialize;

/// One tile in a category grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum GridItem<'a> {
    Category(&'a ChildCategory),
    Product(&'a Product),
    Event(&'a Event),
}

impl GridItem<'_> {
    pub fn id(&self) -> &str {
        match self {
            GridItem::Category(c) => &c.summary.id,
            GridItem::Product(p) => &p.id,
            GridItem::Event(e) => &e.id,
        }
    }
}

/// Grid tiles for `category`.
///
/// A top-level category lists its children. A sub-category lists events
/// before products when its parent is an event category, products before
/// events otherwise.
pub fn compose_grid(category: &CategoryDocument) -> Vec<GridItem<'_>> {
    if category.is_top_level() {
        return category
            .children
            .iter()
            .flatten()
            .map(GridItem::Category)
            .collect();
    }

    let products = category.products.iter().map(GridItem::Product);
    let events = category.events.iter().map(GridItem::Event);
    let parent_is_event = category
        .parent
        .as_ref()
        .is_some_and(|p| p.summary.is_event);

    if parent_is_event {
        events.chain(products).collect()
    } else {
        products.chain(events).collect()
    }
}

/// Events shown in the side column: related events on a top-level page, the
/// category's own events on a sub-category page.
pub fn sidebar_events(category: &CategoryDocument) -> &[Event] {
    if category.is_top_level() {
        &category.related_events
    } else {
        &category.events
    }
}
