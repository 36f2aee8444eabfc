//! Read-only access to the content store.
//!
//! The [`ContentStore`] trait lists every query the site issues. Queries are
//! parameterized by document id and return projections from [`crate::types`];
//! none of them order their results, ordering is decided by the resolvers.
//!
//! The production implementation is [`Dataset`], an in-memory index over a
//! dataset export. It is constructed explicitly from validated configuration
//! ([`Dataset::connect`]) and passed by reference into the page loaders.

mod dataset;

pub use dataset::Dataset;

use crate::types::{CategoryDocument, Event, HomePage, ParentCategory, Product};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("content store is not configured: {0}")]
    Unconfigured(String),
    #[error("dataset not found: {0}")]
    DatasetNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid document on line {line}: {source}")]
    Document {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Level-1 and level-2 references of one product, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductRefs {
    pub id: String,
    pub level1: Option<String>,
    pub level2: Option<String>,
}

/// Read-only queries against the content store.
///
/// Implementations must be `Sync`: pages are resolved in parallel and a single
/// page fans out independent queries across threads.
pub trait ContentStore: Sync {
    /// The home page singleton.
    fn home_page(&self) -> Result<Option<HomePage>, StoreError>;

    /// Every level-1 category with its children, ordered for the home grid.
    fn top_level_categories(&self) -> Result<Vec<CategoryDocument>, StoreError>;

    fn category_ids(&self) -> Result<Vec<String>, StoreError>;
    fn product_ids(&self) -> Result<Vec<String>, StoreError>;
    fn event_ids(&self) -> Result<Vec<String>, StoreError>;

    /// A category page document.
    ///
    /// Level-1 documents carry their children and the products and events
    /// referencing them as level 1. Level-2 documents carry the first level-1
    /// category listing them as `parent`, and the products and events
    /// referencing them as level 2.
    fn category(&self, id: &str) -> Result<Option<CategoryDocument>, StoreError>;

    /// The level-1 category `parent_id`, only if it lists `child_id` among its children.
    fn parent_listing(
        &self,
        parent_id: &str,
        child_id: &str,
    ) -> Result<Option<ParentCategory>, StoreError>;

    /// The level-1 category `id` projected as the parent of `child_id`, listed or not.
    fn parent_category(
        &self,
        id: &str,
        child_id: &str,
    ) -> Result<Option<ParentCategory>, StoreError>;

    /// References of every product whose level-2 category is `level2_id`, in store order.
    fn product_refs_in(&self, level2_id: &str) -> Result<Vec<ProductRefs>, StoreError>;

    /// Every product flagged as an event listing and not expired, in store order.
    fn active_event_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Products referencing both `level2_id` and `level1_id`, in store order.
    fn products_in(&self, level2_id: &str, level1_id: &str) -> Result<Vec<Product>, StoreError>;

    /// Events referencing both `level2_id` and `level1_id`, in store order.
    fn events_in(&self, level2_id: &str, level1_id: &str) -> Result<Vec<Event>, StoreError>;

    fn product(&self, id: &str) -> Result<Option<Product>, StoreError>;
    fn event(&self, id: &str) -> Result<Option<Event>, StoreError>;
}
