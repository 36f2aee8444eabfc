//! Page loaders: everything one route needs, fetched and resolved.
//!
//! Loaders are the boundary between the content store and rendering. A
//! missing entity and every store failure turn into [`PageOutcome::NotFound`];
//! failures are logged here and never propagate further.

use crate::inheritance::apply_inheritance;
use crate::language::LanguageParam;
use crate::membership::{order_events, order_products, resolve_membership};
use crate::store::{ContentStore, StoreError};
use crate::types::{CategoryDocument, Event, HomePage, Product};
use serde::Serialize;
use tracing::warn;

/// Result of loading one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "page", rename_all = "snake_case")]
pub enum PageOutcome<T> {
    Found(Page<T>),
    NotFound,
}

impl<T> PageOutcome<T> {
    pub fn found(self) -> Option<Page<T>> {
        match self {
            PageOutcome::Found(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PageOutcome::Found(_))
    }
}

/// Resolved page data in one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub lang: LanguageParam,
    /// Route segments after the language, used by the language switcher.
    pub path: Vec<String>,
    pub data: T,
}

fn found_page<T>(lang: LanguageParam, path: &[&str], data: T) -> PageOutcome<T> {
    PageOutcome::Found(Page {
        lang,
        path: path.iter().map(|s| s.to_string()).collect(),
        data,
    })
}

/// Home page sections plus the top-level categories for the channel grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeData {
    pub home: HomePage,
    pub categories: Vec<CategoryDocument>,
}

pub fn load_home(store: &dyn ContentStore, lang: LanguageParam) -> PageOutcome<HomeData> {
    let home = match store.home_page() {
        Ok(Some(home)) => home,
        Ok(None) => return PageOutcome::NotFound,
        Err(e) => return not_found("home", "", e),
    };
    let categories = store.top_level_categories().unwrap_or_else(|e| {
        warn!(error = %e, "top-level categories unavailable, home grid falls back to channel items");
        Vec::new()
    });
    found_page(lang, &[], HomeData { home, categories })
}

/// Load a category page.
///
/// Sub-categories get their authoritative parent, products and events from
/// membership resolution (honoring `parent_hint` when the parent lists the
/// category), then inherit display fields. A category flagged as an event
/// category lists every active event product instead of its own products.
pub fn load_category(
    store: &dyn ContentStore,
    lang: LanguageParam,
    id: &str,
    parent_hint: Option<&str>,
) -> PageOutcome<CategoryDocument> {
    let mut category = match store.category(id) {
        Ok(Some(category)) => category,
        Ok(None) => return PageOutcome::NotFound,
        Err(e) => return not_found("category", id, e),
    };

    if category.is_sub_category() {
        match resolve_membership(store, &category, parent_hint) {
            Ok(membership) => {
                category.parent = membership.parent;
                category.products = membership.products;
                category.events = membership.events;
            }
            Err(e) => return not_found("category", id, e),
        }
    } else {
        order_products(&mut category.products);
        order_events(&mut category.events);
    }

    let mut resolved = apply_inheritance(&category);
    if resolved.summary.is_event {
        match store.active_event_products() {
            Ok(mut products) => {
                order_products(&mut products);
                resolved.products = products;
            }
            Err(e) => return not_found("category", id, e),
        }
    }

    let verified_hint = parent_hint
        .filter(|hint| resolved.parent.as_ref().is_some_and(|p| p.summary.id == *hint));
    let path = match verified_hint {
        Some(hint) => vec!["category", hint, id],
        None => vec!["category", id],
    };
    found_page(lang, &path, resolved)
}

pub fn load_product(store: &dyn ContentStore, lang: LanguageParam, id: &str) -> PageOutcome<Product> {
    match store.product(id) {
        Ok(Some(product)) => found_page(lang, &["product", id], product),
        Ok(None) => PageOutcome::NotFound,
        Err(e) => not_found("product", id, e),
    }
}

pub fn load_event(store: &dyn ContentStore, lang: LanguageParam, id: &str) -> PageOutcome<Event> {
    match store.event(id) {
        Ok(Some(event)) => found_page(lang, &["event", id], event),
        Ok(None) => PageOutcome::NotFound,
        Err(e) => not_found("event", id, e),
    }
}

fn not_found<T>(kind: &str, id: &str, error: StoreError) -> PageOutcome<T> {
    warn!(kind, id, error = %error, "store query failed, page treated as not found");
    PageOutcome::NotFound
}
