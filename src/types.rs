//! Content projections shared by the store, the resolvers and the views.
//!
//! These are read-only shapes assembled per page. Field names serialize in the
//! store's camelCase so a resolved page can be dumped as JSON and compared
//! against the studio.

use crate::localize::{LocalizedRichText, LocalizedText, lenient};
use serde::{Deserialize, Serialize};

pub const LEVEL_TOP: u8 = 1;
pub const LEVEL_SUB: u8 = 2;

/// Summary fields shared by every category projection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default)]
    pub is_event: bool,
    #[serde(default)]
    pub inherit_from_parent: bool,
    #[serde(default, rename = "coverURL", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub left_column_title: LocalizedText,
    #[serde(default)]
    pub left_column_description: LocalizedRichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

/// The parent of a sub-category. Never owned by the child; a fresh copy per page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCategory {
    #[serde(flatten)]
    pub summary: CategorySummary,
    #[serde(default)]
    pub related_events: Vec<Event>,
    #[serde(default)]
    pub featured_products: Vec<Product>,
    /// Lists the category it was resolved for among its children.
    #[serde(default)]
    pub lists_child: bool,
}

/// A child listed by a category, optionally carrying its own parent summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildCategory {
    #[serde(flatten)]
    pub summary: CategorySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CategorySummary>,
}

/// A category page's full document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    #[serde(flatten)]
    pub summary: CategorySummary,
    #[serde(default)]
    pub related_events: Vec<Event>,
    #[serde(default)]
    pub featured_products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentCategory>,
    /// `None` when the document was fetched without its children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ChildCategory>>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl CategoryDocument {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn level(&self) -> Option<u8> {
        self.summary.level
    }

    pub fn is_top_level(&self) -> bool {
        self.summary.level == Some(LEVEL_TOP)
    }

    pub fn is_sub_category(&self) -> bool {
        self.summary.level == Some(LEVEL_SUB)
    }
}

/// Category reference expanded on a product (used for breadcrumbs).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, rename = "coverURL", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub sub_title: LocalizedText,
    #[serde(default)]
    pub summary: LocalizedText,
    #[serde(default)]
    pub description: LocalizedRichText,
    #[serde(default)]
    pub materials: LocalizedText,
    #[serde(default)]
    pub size: LocalizedText,
    /// Display string, currency included by the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1_category: Option<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2_category: Option<CategoryRef>,
    /// The level-1 category lists the level-2 category among its children.
    #[serde(default)]
    pub level2_listed: bool,
    #[serde(default)]
    pub is_event: bool,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl Product {
    /// First gallery image, used on cards.
    pub fn thumbnail(&self) -> Option<&str> {
        self.gallery.first().map(String::as_str)
    }

    pub fn level1_id(&self) -> Option<&str> {
        self.level1_category.as_ref().map(|c| c.id.as_str())
    }

    pub fn level2_id(&self) -> Option<&str> {
        self.level2_category.as_ref().map(|c| c.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedRichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2_category: Option<String>,
}

// ============================================================================
// Home page
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HomePage {
    #[serde(default)]
    pub sections: Vec<HomeSection>,
}

/// One module of the home page, discriminated by the store's `_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum HomeSection {
    #[serde(rename = "heroModule")]
    Hero(HeroModule),
    #[serde(rename = "quoteModule")]
    Quote(QuoteModule),
    #[serde(rename = "aboutModule")]
    About(AboutModule),
    #[serde(rename = "channelGridModule")]
    ChannelGrid(ChannelGridModule),
    #[serde(rename = "contactModule")]
    Contact(ContactModule),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroModule {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub eyebrow: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub title: LocalizedText,
    /// Stored as `background`; the dataset resolves the asset to a URL.
    #[serde(default, alias = "background", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteModule {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub quote: LocalizedRichText,
    #[serde(default, deserialize_with = "lenient")]
    pub author: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub source: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutModule {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub body: LocalizedRichText,
    #[serde(default, deserialize_with = "lenient")]
    pub signature: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub label: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub description: LocalizedText,
    #[serde(default, alias = "icon", skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelGridModule {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactModule {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub studio_name: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub address: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub business_hours: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub notes: LocalizedText,
}
