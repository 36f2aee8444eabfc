//! In-memory content store over a dataset export.
//!
//! A dataset export is newline-delimited JSON, one document per line, as
//! produced by `sanity dataset export`:
//!
//! ```text
//! {"_id":"cat-ceramics","_type":"productCategory","level":1,"label":{"en":"Ceramics"},"children":[{"_ref":"cat-cups"}]}
//! {"_id":"cat-cups","_type":"productCategoryLevel2","level":2,"inheritFromParent":true}
//! {"_id":"p-1","_type":"productItem","level1Category":{"_ref":"cat-ceramics"},"level2Category":{"_ref":"cat-cups"}}
//! {"_id":"image-abc","_type":"sanity.imageAsset","url":"https://cdn.example.com/abc.jpg"}
//! ```
//!
//! On load, image and file fields (`{"asset": {"_ref": ...}}`) are replaced by
//! the URL of the referenced asset document and slugs (`{"current": ...}`) by
//! their string. Draft documents (`drafts.*`) are ignored: only published
//! content is served.

use super::{ContentStore, ProductRefs, StoreError};
use crate::config::StoreConfig;
use crate::localize::{LocalizedRichText, LocalizedText, lenient};
use crate::types::{
    CategoryDocument, CategoryRef, CategorySummary, ChildCategory, Event, HomePage,
    LEVEL_SUB, LEVEL_TOP, ParentCategory, Product,
};
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const TOP_LEVEL_TYPE: &str = "productCategory";
const SUB_LEVEL_TYPE: &str = "productCategoryLevel2";
const PRODUCT_TYPE: &str = "productItem";
const EVENT_TYPE: &str = "event";
const HOME_TYPE: &str = "homePage";
const ASSET_TYPES: &[&str] = &["sanity.imageAsset", "sanity.fileAsset"];

#[derive(Debug, Clone, Deserialize)]
struct Reference {
    #[serde(rename = "_ref")]
    target: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_type")]
    kind: String,
    #[serde(default, deserialize_with = "lenient")]
    label: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    level: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    sort_order: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    is_event: bool,
    #[serde(default, deserialize_with = "lenient")]
    inherit_from_parent: bool,
    #[serde(default, rename = "coverURL", deserialize_with = "lenient")]
    cover_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    left_column_title: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    left_column_description: LocalizedRichText,
    #[serde(default, deserialize_with = "lenient")]
    related_events: Vec<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    featured_products: Vec<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    children: Vec<Reference>,
}

impl RawCategory {
    fn is_top_level(&self) -> bool {
        self.kind == TOP_LEVEL_TYPE
    }

    /// Stored level, or the level implied by the document type.
    fn effective_level(&self) -> u8 {
        self.level
            .unwrap_or(if self.is_top_level() { LEVEL_TOP } else { LEVEL_SUB })
    }

    fn lists_child(&self, child_id: &str) -> bool {
        self.children.iter().any(|c| c.target == child_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    sub_title: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    summary: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    description: LocalizedRichText,
    #[serde(default, deserialize_with = "lenient")]
    materials: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    size: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    price: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    gallery: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient")]
    video: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    video_link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    level1_category: Option<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    level2_category: Option<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    is_event: bool,
    #[serde(default, deserialize_with = "lenient")]
    is_expired: bool,
    #[serde(default, deserialize_with = "lenient")]
    sort_order: Option<i64>,
}

impl RawProduct {
    fn level1(&self) -> Option<&str> {
        self.level1_category.as_ref().map(|r| r.target.as_str())
    }

    fn level2(&self) -> Option<&str> {
        self.level2_category.as_ref().map(|r| r.target.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, deserialize_with = "lenient")]
    title: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    description: LocalizedRichText,
    #[serde(default, deserialize_with = "lenient")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    level1_category: Option<Reference>,
    #[serde(default, deserialize_with = "lenient")]
    level2_category: Option<Reference>,
}

impl RawEvent {
    fn references(&self, level2_id: &str, level1_id: &str) -> bool {
        self.level2_category.as_ref().is_some_and(|r| r.target == level2_id)
            && self.level1_category.as_ref().is_some_and(|r| r.target == level1_id)
    }
}

/// Published documents from a dataset export, indexed by id.
#[derive(Debug, Default)]
pub struct Dataset {
    categories: Vec<RawCategory>,
    products: Vec<RawProduct>,
    events: Vec<RawEvent>,
    home: Option<HomePage>,
    category_index: HashMap<String, usize>,
    product_index: HashMap<String, usize>,
    event_index: HashMap<String, usize>,
}

impl Dataset {
    /// Open the dataset named by `config`, relative to `source_root`.
    ///
    /// Fails when no dataset is configured or the file is missing, so a
    /// misconfigured build stops before rendering anything.
    pub fn connect(source_root: &Path, config: &StoreConfig) -> Result<Self, StoreError> {
        let name = config
            .dataset
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StoreError::Unconfigured("store.dataset is not set".into()))?;
        let path = source_root.join(name);
        if !path.is_file() {
            return Err(StoreError::DatasetNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        Self::from_ndjson(&content)
    }

    /// Parse newline-delimited JSON documents. Blank lines are skipped.
    pub fn from_ndjson(content: &str) -> Result<Self, StoreError> {
        let documents = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str::<Value>(line).map_err(|source| StoreError::Document {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_documents(documents)
    }

    /// Build a dataset from already-parsed documents, in store order.
    pub fn from_documents(documents: Vec<Value>) -> Result<Self, StoreError> {
        let published: Vec<Value> = documents
            .into_iter()
            .filter(|doc| !str_field(doc, "_id").is_some_and(|id| id.starts_with("drafts.")))
            .collect();

        let assets: HashMap<String, String> = published
            .iter()
            .filter(|doc| str_field(doc, "_type").is_some_and(|t| ASSET_TYPES.contains(&t)))
            .filter_map(|doc| {
                Some((
                    str_field(doc, "_id")?.to_string(),
                    str_field(doc, "url")?.to_string(),
                ))
            })
            .collect();

        let mut dataset = Self::default();
        for (position, mut doc) in published.into_iter().enumerate() {
            resolve_assets(&mut doc, &assets);
            let kind = str_field(&doc, "_type").unwrap_or_default().to_string();
            let parsed = match kind.as_str() {
                TOP_LEVEL_TYPE | SUB_LEVEL_TYPE => serde_json::from_value(doc)
                    .map(|c| dataset.push_category(c)),
                PRODUCT_TYPE => serde_json::from_value(doc).map(|p| dataset.push_product(p)),
                EVENT_TYPE => serde_json::from_value(doc).map(|e| dataset.push_event(e)),
                HOME_TYPE if dataset.home.is_none() => {
                    serde_json::from_value(doc).map(|h| dataset.home = Some(h))
                }
                _ => Ok(()),
            };
            parsed.map_err(|source| StoreError::Document {
                line: position + 1,
                source,
            })?;
        }
        Ok(dataset)
    }

    fn push_category(&mut self, category: RawCategory) {
        self.category_index
            .insert(category.id.clone(), self.categories.len());
        self.categories.push(category);
    }

    fn push_product(&mut self, product: RawProduct) {
        self.product_index
            .insert(product.id.clone(), self.products.len());
        self.products.push(product);
    }

    fn push_event(&mut self, event: RawEvent) {
        self.event_index.insert(event.id.clone(), self.events.len());
        self.events.push(event);
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn has_home_page(&self) -> bool {
        self.home.is_some()
    }

    fn raw_category(&self, id: &str) -> Option<&RawCategory> {
        self.category_index.get(id).map(|&i| &self.categories[i])
    }

    fn raw_top_level(&self, id: &str) -> Option<&RawCategory> {
        self.raw_category(id).filter(|c| c.is_top_level())
    }

    // ------------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------------

    fn summarize(&self, raw: &RawCategory) -> CategorySummary {
        CategorySummary {
            id: raw.id.clone(),
            title: raw.label.clone(),
            slug: raw.slug.clone(),
            level: Some(raw.effective_level()),
            is_event: raw.is_event,
            inherit_from_parent: raw.inherit_from_parent,
            cover_url: raw.cover_url.clone(),
            left_column_title: raw.left_column_title.clone(),
            left_column_description: raw.left_column_description.clone(),
            sort_order: raw.sort_order,
        }
    }

    fn category_ref(&self, reference: Option<&Reference>) -> Option<CategoryRef> {
        let raw = self.raw_category(&reference?.target)?;
        Some(CategoryRef {
            id: raw.id.clone(),
            title: raw.label.clone(),
            level: Some(raw.effective_level()),
            cover_url: raw.cover_url.clone(),
        })
    }

    fn project_product(&self, raw: &RawProduct) -> Product {
        Product {
            id: raw.id.clone(),
            slug: raw.slug.clone(),
            title: raw.title.clone(),
            sub_title: raw.sub_title.clone(),
            summary: raw.summary.clone(),
            description: raw.description.clone(),
            materials: raw.materials.clone(),
            size: raw.size.clone(),
            price: raw.price.clone(),
            gallery: raw.gallery.iter().flatten().cloned().collect(),
            video_url: raw.video.clone(),
            video_link: raw.video_link.clone(),
            level1_category: self.category_ref(raw.level1_category.as_ref()),
            level2_category: self.category_ref(raw.level2_category.as_ref()),
            level2_listed: raw
                .level1()
                .and_then(|id| self.raw_top_level(id))
                .zip(raw.level2())
                .is_some_and(|(level1, level2)| level1.lists_child(level2)),
            is_event: raw.is_event,
            is_expired: raw.is_expired,
            sort_order: raw.sort_order,
        }
    }

    fn project_event(&self, raw: &RawEvent) -> Event {
        Event {
            id: raw.id.clone(),
            title: raw.title.clone(),
            description: raw.description.clone(),
            start_date: raw.start_date.clone(),
            end_date: raw.end_date.clone(),
            cover: raw.cover.clone(),
            level1_category: raw.level1_category.as_ref().map(|r| r.target.clone()),
            level2_category: raw.level2_category.as_ref().map(|r| r.target.clone()),
        }
    }

    fn expand_products(&self, refs: &[Reference]) -> Vec<Product> {
        refs.iter()
            .filter_map(|r| self.product_index.get(&r.target))
            .map(|&i| self.project_product(&self.products[i]))
            .collect()
    }

    fn expand_events(&self, refs: &[Reference]) -> Vec<Event> {
        refs.iter()
            .filter_map(|r| self.event_index.get(&r.target))
            .map(|&i| self.project_event(&self.events[i]))
            .collect()
    }

    /// Project `raw` as the parent of `child_id`.
    fn as_parent(&self, raw: &RawCategory, child_id: &str) -> ParentCategory {
        ParentCategory {
            summary: self.summarize(raw),
            related_events: self.expand_events(&raw.related_events),
            featured_products: self.expand_products(&raw.featured_products),
            lists_child: raw.lists_child(child_id),
        }
    }

    fn expand_children(&self, raw: &RawCategory) -> Vec<ChildCategory> {
        let parent = self.summarize(raw);
        raw.children
            .iter()
            .filter_map(|r| self.raw_category(&r.target))
            .map(|child| ChildCategory {
                summary: self.summarize(child),
                parent: Some(parent.clone()),
            })
            .collect()
    }

    fn products_where(&self, keep: impl Fn(&RawProduct) -> bool) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| keep(p))
            .map(|p| self.project_product(p))
            .collect()
    }

    fn events_where(&self, keep: impl Fn(&RawEvent) -> bool) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| keep(e))
            .map(|e| self.project_event(e))
            .collect()
    }

    fn top_level_document(&self, raw: &RawCategory) -> CategoryDocument {
        let id = raw.id.as_str();
        CategoryDocument {
            summary: self.summarize(raw),
            related_events: self.expand_events(&raw.related_events),
            featured_products: self.expand_products(&raw.featured_products),
            parent: None,
            children: Some(self.expand_children(raw)),
            products: self.products_where(|p| p.level1() == Some(id)),
            events: self.events_where(|e| {
                e.level1_category.as_ref().is_some_and(|r| r.target == id)
            }),
        }
    }

    fn sub_level_document(&self, raw: &RawCategory) -> CategoryDocument {
        let id = raw.id.as_str();
        let parent = self
            .categories
            .iter()
            .find(|c| c.is_top_level() && c.lists_child(id))
            .map(|c| self.as_parent(c, id));
        let children = (!raw.children.is_empty()).then(|| self.expand_children(raw));
        CategoryDocument {
            summary: self.summarize(raw),
            related_events: self.expand_events(&raw.related_events),
            featured_products: self.expand_products(&raw.featured_products),
            parent,
            children,
            products: self.products_where(|p| p.level2() == Some(id)),
            events: self.events_where(|e| {
                e.level2_category.as_ref().is_some_and(|r| r.target == id)
            }),
        }
    }
}

impl ContentStore for Dataset {
    fn home_page(&self) -> Result<Option<HomePage>, StoreError> {
        Ok(self.home.clone())
    }

    fn top_level_categories(&self) -> Result<Vec<CategoryDocument>, StoreError> {
        let mut tops: Vec<&RawCategory> = self
            .categories
            .iter()
            .filter(|c| c.is_top_level() && c.effective_level() == LEVEL_TOP)
            .collect();
        tops.sort_by(|a, b| {
            compare_sort_order(a.sort_order, b.sort_order)
                .then_with(|| a.label.zh_hans.cmp(&b.label.zh_hans))
        });
        Ok(tops
            .into_iter()
            .map(|raw| CategoryDocument {
                summary: self.summarize(raw),
                children: Some(self.expand_children(raw)),
                ..CategoryDocument::default()
            })
            .collect())
    }

    fn category_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.categories.iter().map(|c| c.id.clone()).collect())
    }

    fn product_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.products.iter().map(|p| p.id.clone()).collect())
    }

    fn event_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.events.iter().map(|e| e.id.clone()).collect())
    }

    fn category(&self, id: &str) -> Result<Option<CategoryDocument>, StoreError> {
        Ok(self.raw_category(id).map(|raw| {
            if raw.is_top_level() {
                self.top_level_document(raw)
            } else {
                self.sub_level_document(raw)
            }
        }))
    }

    fn parent_listing(
        &self,
        parent_id: &str,
        child_id: &str,
    ) -> Result<Option<ParentCategory>, StoreError> {
        Ok(self
            .raw_top_level(parent_id)
            .filter(|p| p.lists_child(child_id))
            .map(|p| self.as_parent(p, child_id)))
    }

    fn parent_category(
        &self,
        id: &str,
        child_id: &str,
    ) -> Result<Option<ParentCategory>, StoreError> {
        Ok(self.raw_top_level(id).map(|p| self.as_parent(p, child_id)))
    }

    fn product_refs_in(&self, level2_id: &str) -> Result<Vec<ProductRefs>, StoreError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.level2() == Some(level2_id))
            .map(|p| ProductRefs {
                id: p.id.clone(),
                level1: p.level1().map(String::from),
                level2: p.level2().map(String::from),
            })
            .collect())
    }

    fn active_event_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products_where(|p| p.is_event && !p.is_expired))
    }

    fn products_in(&self, level2_id: &str, level1_id: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self.products_where(|p| p.level2() == Some(level2_id) && p.level1() == Some(level1_id)))
    }

    fn events_in(&self, level2_id: &str, level1_id: &str) -> Result<Vec<Event>, StoreError> {
        Ok(self.events_where(|e| e.references(level2_id, level1_id)))
    }

    fn product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self
            .product_index
            .get(id)
            .map(|&i| self.project_product(&self.products[i])))
    }

    fn event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self
            .event_index
            .get(id)
            .map(|&i| self.project_event(&self.events[i])))
    }
}

/// Ascending, documents without a sort order last.
fn compare_sort_order(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn str_field<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// Replace asset references with URLs and slug objects with strings, in place.
///
/// An asset whose document is missing becomes `null`, which the projections
/// read as "no image". Image blocks inside Portable Text arrays keep their
/// shape so the array still reads as blocks.
fn resolve_assets(value: &mut Value, assets: &HashMap<String, String>) {
    if let Some(replacement) = flatten_reference(value, assets) {
        *value = replacement;
        return;
    }
    match value {
        Value::Object(map) => map.values_mut().for_each(|v| resolve_assets(v, assets)),
        Value::Array(items) => {
            let portable_text = items.iter().any(|v| str_field(v, "_type") == Some("block"));
            for item in items.iter_mut() {
                match item {
                    Value::Object(map) if portable_text => {
                        map.values_mut().for_each(|v| resolve_assets(v, assets))
                    }
                    _ => resolve_assets(item, assets),
                }
            }
        }
        _ => {}
    }
}

fn flatten_reference(value: &Value, assets: &HashMap<String, String>) -> Option<Value> {
    if let Some(target) = value
        .get("asset")
        .and_then(|a| a.get("_ref"))
        .and_then(Value::as_str)
    {
        return Some(
            assets
                .get(target)
                .map_or(Value::Null, |url| Value::String(url.clone())),
        );
    }
    if str_field(value, "_type") == Some("slug") {
        return Some(value.get("current").cloned().unwrap_or(Value::Null));
    }
    None
}
