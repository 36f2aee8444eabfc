//! Breadcrumb trails for category, product and event pages.
//!
//! The trail always starts with a Home link to the language root. Home is
//! implicit: it is rendered by the view and not stored in
//! [`Breadcrumb::segments`].

use crate::language::{LanguageKey, LanguageParam, build_language_href};
use crate::localize::pick_text;
use crate::types::{CategoryDocument, Event, Product};
use serde::Serialize;

/// One crumb. Segments with an id link to that category's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub label: String,
    pub id: Option<String>,
    /// Level-1 category listing this one among its children. Only then does
    /// a page exist for the category under that parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed_under: Option<String>,
}

impl Segment {
    fn link(label: String, id: &str) -> Self {
        Self {
            label,
            id: Some(id.to_string()),
            listed_under: None,
        }
    }

    fn child_link(label: String, id: &str, listed_under: Option<&str>) -> Self {
        Self {
            listed_under: listed_under.map(String::from),
            ..Self::link(label, id)
        }
    }

    fn plain(label: String) -> Self {
        Self {
            label,
            id: None,
            listed_under: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Breadcrumb {
    pub segments: Vec<Segment>,
}

impl Breadcrumb {
    /// Parent (when known), then the category itself.
    pub fn for_category(category: &CategoryDocument, key: LanguageKey) -> Self {
        let mut segments = Vec::with_capacity(2);
        let mut listed_under = None;
        if let Some(parent) = category.parent.as_ref() {
            segments.push(Segment::link(
                pick_text(Some(&parent.summary.title), key),
                &parent.summary.id,
            ));
            listed_under = parent.lists_child.then_some(parent.summary.id.as_str());
        }
        segments.push(Segment::child_link(
            pick_text(Some(&category.summary.title), key),
            category.id(),
            listed_under,
        ));
        Self { segments }
    }

    /// Level-1 category, level-2 category, then the product title unlinked.
    pub fn for_product(product: &Product, key: LanguageKey) -> Self {
        let mut segments = Vec::with_capacity(3);
        if let Some(level1) = product.level1_category.as_ref() {
            segments.push(Segment::link(pick_text(Some(&level1.title), key), &level1.id));
        }
        if let Some(level2) = product.level2_category.as_ref() {
            let listed_under = product.level1_id().filter(|_| product.level2_listed);
            segments.push(Segment::child_link(
                pick_text(Some(&level2.title), key),
                &level2.id,
                listed_under,
            ));
        }
        segments.push(Segment::plain(pick_text(Some(&product.title), key)));
        Self { segments }
    }

    /// The event title, unlinked.
    pub fn for_event(event: &Event, key: LanguageKey) -> Self {
        Self {
            segments: vec![Segment::plain(pick_text(Some(&event.title), key))],
        }
    }

    pub fn is_active(&self, index: usize) -> bool {
        index + 1 == self.segments.len()
    }

    /// Link target of segment `index`, if it links anywhere.
    ///
    /// A category listed by its parent links to its page under that parent.
    pub fn href(&self, lang: LanguageParam, index: usize) -> Option<String> {
        let segment = self.segments.get(index)?;
        let id = segment.id.as_deref()?;
        Some(match segment.listed_under.as_deref() {
            Some(parent) => build_language_href(lang, &["category", parent, id]),
            None => build_language_href(lang, &["category", id]),
        })
    }
}
