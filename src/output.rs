//! CLI output formatting for the check and build commands.
//!
//! # Information-First Display
//!
//! Output is **content-centric**. Each category leads with its positional
//! index and display label in the default language; ids and counts follow as
//! indented context lines, so the output reads as a catalog inventory while
//! still letting users trace entries back to dataset documents.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Categories
//! 001 陶瓷 (3 products)
//!     Id: cat-ceramics
//!     Description: 柴烧与釉色。
//!     001 杯
//!         Id: cat-cups
//!     002 礼物
//!         Id: cat-gifts
//! 002 春季市集 (event)
//!     Id: cat-spring-fair
//!
//! Content
//!     6 categories, 7 products, 2 events
//!     Home page: present
//!
//! Config
//!     dataset.ndjson
//!     assets/
//! ```
//!
//! ## Build
//!
//! ```text
//! /en/ → en/index.html
//! /en/category/cat-ceramics/ → en/category/cat-ceramics/index.html
//! Skipped /en/category/cat-orphan/ (not found)
//! Assets: 2 files
//! Generated 54 pages, 1 skipped, 2 assets
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::generate::{GenerateEvent, GenerateReport};
use crate::language::LanguageKey;
use crate::localize::{pick_rich_text, pick_text};
use crate::rich_text::to_plain_text;
use crate::store::{ContentStore, Dataset};
use crate::types::CategoryDocument;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

/// Category header: index, label, then product count or the event marker.
///
/// ```text
/// 001 陶瓷 (3 products)
/// 002 春季市集 (event)
/// 003 Untitled
/// ```
fn category_header(index: usize, label: &str, detail: Option<String>) -> String {
    let label = if label.is_empty() { "Untitled" } else { label };
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), label, d),
        None => format!("{} {}", format_index(index), label),
    }
}

fn category_detail(category: &CategoryDocument) -> Option<String> {
    if category.summary.is_event {
        Some("event".to_string())
    } else if category.products.is_empty() {
        None
    } else {
        Some(format!("{} products", category.products.len()))
    }
}

fn format_category(category: &CategoryDocument, key: LanguageKey, lines: &mut Vec<String>) {
    lines.push(format!("{}Id: {}", indent(1), category.id()));
    let description = to_plain_text(&pick_rich_text(
        Some(&category.summary.left_column_description),
        key,
    ));
    if !description.is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(&description, 40)
        ));
    }
    for (i, child) in category.children.iter().flatten().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(1),
            category_header(i + 1, &pick_text(Some(&child.summary.title), key), None)
        ));
        lines.push(format!("{}Id: {}", indent(2), child.summary.id));
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the content inventory shown by `check`.
///
/// `categories` are the top-level categories in display order; labels are
/// picked in the configured default language.
pub fn format_check_output(
    dataset: &Dataset,
    categories: &[CategoryDocument],
    config: &SiteConfig,
) -> Vec<String> {
    let key = config.languages.default.key();
    let mut lines = Vec::new();

    if !categories.is_empty() {
        lines.push("Categories".to_string());
        for (i, category) in categories.iter().enumerate() {
            lines.push(category_header(
                i + 1,
                &pick_text(Some(&category.summary.title), key),
                category_detail(category),
            ));
            format_category(category, key, &mut lines);
        }
        lines.push(String::new());
    }

    lines.push("Content".to_string());
    lines.push(format!(
        "{}{} categories, {} products, {} events",
        indent(1),
        dataset.category_count(),
        dataset.product_count(),
        dataset.event_count()
    ));
    lines.push(format!(
        "{}Home page: {}",
        indent(1),
        if dataset.has_home_page() { "present" } else { "missing" }
    ));
    lines.push(String::new());

    lines.push("Config".to_string());
    if let Some(dataset_name) = config.store.dataset.as_deref() {
        lines.push(format!("{}{}", indent(1), dataset_name));
    }
    lines.push(format!("{}{}/", indent(1), config.build.assets_dir));

    lines
}

/// Print the check inventory to stdout.
pub fn print_check_output(dataset: &Dataset, config: &SiteConfig) {
    let categories = dataset.top_level_categories().unwrap_or_default();
    for line in format_check_output(dataset, &categories, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Output path of a site href, relative to the output directory.
fn href_to_file(href: &str) -> String {
    let trimmed = href.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

/// Format a single generation progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::PageWritten { href } => {
            vec![format!("{} \u{2192} {}", href, href_to_file(href))]
        }
        GenerateEvent::PageSkipped { href } => vec![format!("Skipped {} (not found)", href)],
        GenerateEvent::AssetsCopied { count } => vec![format!("Assets: {} files", count)],
    }
}

/// Format the closing summary of a build.
pub fn format_generate_report(report: &GenerateReport) -> Vec<String> {
    vec![format!(
        "Generated {} pages, {} skipped, {} assets",
        report.pages_written,
        report.skipped.len(),
        report.assets_copied
    )]
}

/// Print the build summary to stdout.
pub fn print_generate_report(report: &GenerateReport, output_dir: &Path) {
    for line in format_generate_report(report) {
        println!("{}", line);
    }
    println!("Output: {}", output_dir.display());
}

// ============================================================================
// Tests
// ============================================================================
