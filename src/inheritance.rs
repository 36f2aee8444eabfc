//! Sub-category field inheritance.
//!
//! A level-2 category that opts in with `inheritFromParent` borrows any empty
//! display field from its direct parent. Inheritance is one level deep, works
//! on a copy, and is idempotent: applying it to an already-resolved category
//! changes nothing.

use crate::localize::Blank;
use crate::types::{CategoryDocument, CategorySummary, ChildCategory, LEVEL_SUB};

/// Resolve inherited display fields for `category`.
///
/// Applies only to level-2 categories with a parent and `inheritFromParent`
/// set; anything else is returned unchanged. The parent is read, never
/// modified.
///
/// When the document carries nested children, each level-2 child that opts in
/// and has a parent summary inherits cover, column title and column
/// description from that summary. Related events and featured products are
/// not cascaded to children.
pub fn apply_inheritance(category: &CategoryDocument) -> CategoryDocument {
    let mut resolved = category.clone();
    let Some(parent) = category.parent.as_ref() else {
        return resolved;
    };
    if category.summary.level != Some(LEVEL_SUB) || !category.summary.inherit_from_parent {
        return resolved;
    }

    inherit_display_fields(&mut resolved.summary, &parent.summary);
    inherit_vec(&mut resolved.related_events, &parent.related_events);
    inherit_vec(&mut resolved.featured_products, &parent.featured_products);

    if let Some(children) = resolved.children.as_mut() {
        children.iter_mut().for_each(inherit_child);
    }

    resolved
}

fn inherit_child(child: &mut ChildCategory) {
    let Some(parent) = child.parent.as_ref() else {
        return;
    };
    if child.summary.level == Some(LEVEL_SUB) && child.summary.inherit_from_parent {
        inherit_display_fields(&mut child.summary, parent);
    }
}

/// Cover, column title and column description.
fn inherit_display_fields(target: &mut CategorySummary, parent: &CategorySummary) {
    if target.cover_url.as_deref().is_none_or(str::is_empty) {
        target.cover_url = parent.cover_url.clone().or(target.cover_url.take());
    }
    if target.left_column_title.is_empty() {
        target.left_column_title = parent.left_column_title.clone();
    }
    if target.left_column_description.is_empty() {
        target.left_column_description = parent.left_column_description.clone();
    }
}

fn inherit_vec<T: Clone>(own: &mut Vec<T>, parent: &[T]) {
    if own.is_blank() && !parent.is_empty() {
        *own = parent.to_vec();
    }
}
