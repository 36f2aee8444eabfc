//! Shared test utilities for the wauramoon-site test suite.
//!
//! Builders for the content projections (`Product`, `Event`, category
//! documents) with only the fields a test cares about, plus the fixture
//! dataset under `fixtures/content/`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = sub_category("cat-cups");
//! doc.parent = Some(parent_category("cat-ceramics", false));
//! doc.products = vec![product("p1"), product("p2")];
//! assert_eq!(ids(&doc.products), vec!["p1", "p2"]);
//!
//! let store = fixture_dataset();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::localize::{LocalizedRichText, LocalizedText};
use crate::rich_text::Block;
use crate::store::Dataset;
use crate::types::{
    CategoryDocument, CategorySummary, Event, LEVEL_SUB, LEVEL_TOP, ParentCategory, Product,
};

// ============================================================================
// Localized values
// ============================================================================

/// English-only text.
pub fn text(value: &str) -> LocalizedText {
    LocalizedText {
        en: Some(value.to_string()),
        ..LocalizedText::default()
    }
}

/// English-only rich text with a single paragraph.
pub fn rich(value: &str) -> LocalizedRichText {
    LocalizedRichText {
        en: Some(vec![paragraph(value)]),
        ..LocalizedRichText::default()
    }
}

pub fn paragraph(value: &str) -> Block {
    Block::paragraph(value)
}

// ============================================================================
// Categories
// ============================================================================

pub fn summary(id: &str, level: u8) -> CategorySummary {
    CategorySummary {
        id: id.to_string(),
        level: Some(level),
        ..CategorySummary::default()
    }
}

pub fn top_category(id: &str) -> CategoryDocument {
    CategoryDocument {
        summary: summary(id, LEVEL_TOP),
        ..CategoryDocument::default()
    }
}

pub fn sub_category(id: &str) -> CategoryDocument {
    CategoryDocument {
        summary: summary(id, LEVEL_SUB),
        ..CategoryDocument::default()
    }
}

pub fn parent_category(id: &str, is_event: bool) -> ParentCategory {
    ParentCategory {
        summary: CategorySummary {
            is_event,
            ..summary(id, LEVEL_TOP)
        },
        ..ParentCategory::default()
    }
}

// ============================================================================
// Products and events
// ============================================================================

pub fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        ..Product::default()
    }
}

pub fn event(id: &str, start_date: Option<&str>) -> Event {
    Event {
        id: id.to_string(),
        start_date: start_date.map(String::from),
        ..Event::default()
    }
}

pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Ids in order, for asserting list contents and ordering.
pub fn ids<T: HasId>(items: &[T]) -> Vec<&str> {
    items.iter().map(HasId::id).collect()
}

// ============================================================================
// Fixtures
// ============================================================================

/// The dataset export under `fixtures/content/`.
pub fn fixture_dataset() -> Dataset {
    Dataset::from_ndjson(include_str!("../fixtures/content/dataset.ndjson"))
        .expect("fixture dataset must parse")
}

/// Copy `fixtures/content/` into a temp dir and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
