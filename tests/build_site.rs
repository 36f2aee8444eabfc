//! End-to-end build of the fixture site.
//!
//! Copies `fixtures/content/` into a temp dir, loads its config, opens the
//! dataset and generates the whole site, then checks rendered pages.

use regex::Regex;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;
use wauramoon_site::config::load_config;
use wauramoon_site::generate::{self, Route, Target};
use wauramoon_site::language::LanguageParam;
use wauramoon_site::store::{ContentStore, Dataset, StoreError};
use wauramoon_site::views::Theme;

fn copy_dir_recursive(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir_recursive(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path());
    tmp
}

fn build(tmp: &TempDir) -> std::path::PathBuf {
    let config = load_config(tmp.path()).unwrap();
    let store = Dataset::connect(tmp.path(), &config.store).unwrap();
    let output = tmp.path().join("dist");
    generate::generate(&store, &config, tmp.path(), &output, None).unwrap();
    output
}

fn read(output: &Path, relative: &str) -> String {
    fs::read_to_string(output.join(relative))
        .unwrap_or_else(|e| panic!("{relative} should exist: {e}"))
}

#[test]
fn every_language_gets_a_home_page() {
    let tmp = fixture_site();
    let output = build(&tmp);
    assert!(read(&output, "index.html").contains("/zh-hans/"));
    assert!(read(&output, "zh-hans/index.html").contains(r#"<html lang="zh-Hans">"#));
    assert!(read(&output, "zh-hant/index.html").contains(r#"<html lang="zh-Hant">"#));
    let en = read(&output, "en/index.html");
    assert!(en.contains("Clay remembers the hand."));
    assert!(en.contains("hero-2400x1200.jpg"));
    assert!(output.join("404.html").exists());
}

#[test]
fn shared_sub_category_renders_under_each_parent() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let under_ceramics = read(&output, "en/category/cat-ceramics/cat-gifts/index.html");
    let under_textiles = read(&output, "en/category/cat-textiles/cat-gifts/index.html");

    assert!(under_ceramics.contains(r#"href="/en/category/cat-ceramics/""#));
    assert!(under_ceramics.contains("Tea set gift box"));
    assert!(!under_ceramics.contains("Plant-dyed scarf"));

    assert!(under_textiles.contains(r#"href="/en/category/cat-textiles/""#));
    assert!(under_textiles.contains("Plant-dyed scarf"));
    assert!(!under_textiles.contains("Tea set gift box"));
}

#[test]
fn inheriting_sub_category_shows_parent_cover_and_events() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let cups = read(&output, "en/category/cat-cups/index.html");
    assert!(cups.contains("ceramics-1600x1600.jpg"));
    assert!(cups.contains("Kiln opening"));
    assert!(cups.contains("Wood-fired tea cup"));
}

#[test]
fn event_category_pools_active_event_products() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let fair = read(&output, "en/category/cat-spring-fair/index.html");
    assert!(fair.contains(r#"href="/en/category/cat-spring-fair/cat-fair-market/""#));

    let stalls = read(&output, "en/category/cat-fair-market/index.html");
    assert!(stalls.contains("Fair vase"));
    // Expired, and filed under another sub-category.
    assert!(!stalls.contains("Last year"));
    assert!(!stalls.contains("Fair plate"));
}

#[test]
fn product_and_event_pages_render_details() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let product = read(&output, "en/product/p-teacup/index.html");
    assert!(product.contains("teacup.mp4"));
    assert!(product.contains("¥ 380"));
    assert!(product.contains(r#"href="/en/category/cat-ceramics/cat-cups/""#));

    let event = read(&output, "en/event/e-kiln/index.html");
    assert!(event.contains("May 1, 2024 - May 3, 2024"));
    let event_zh = read(&output, "zh-hans/event/e-kiln/index.html");
    assert!(event_zh.contains("开窑日"));
}

#[test]
fn every_category_link_has_a_page() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let href = Regex::new(r#"href="(/[a-z-]+/category/[^"]*)""#).unwrap();
    let mut checked = 0;
    for entry in WalkDir::new(&output).into_iter().map(Result::unwrap) {
        if entry.path().extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let html = fs::read_to_string(entry.path()).unwrap();
        for link in href.captures_iter(&html) {
            let target = output.join(link[1].trim_matches('/')).join("index.html");
            assert!(target.exists(), "{} links to missing {}", entry.path().display(), &link[1]);
            checked += 1;
        }
    }
    assert!(checked > 0);

    // Filed under a level-1 category that does not list its level-2 category.
    let plate = read(&output, "en/product/p-fair-plate/index.html");
    assert!(plate.contains(r#"href="/en/category/cat-cups/""#));
}

#[test]
fn drafts_are_not_published() {
    let tmp = fixture_site();
    let output = build(&tmp);
    let product = read(&output, "en/product/p-teacup/index.html");
    assert!(!product.contains("Unpublished tea cup"));
    assert!(!output.join("en/product/drafts.p-teacup").exists());
}

#[test]
fn unconfigured_store_fails_before_rendering() {
    let tmp = TempDir::new().unwrap();
    let config = load_config(tmp.path()).unwrap();
    let err = Dataset::connect(tmp.path(), &config.store).unwrap_err();
    assert!(matches!(err, StoreError::Unconfigured(_)));
}

#[test]
fn missing_dataset_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[store]\ndataset = \"missing.ndjson\"\n").unwrap();
    let config = load_config(tmp.path()).unwrap();
    let err = Dataset::connect(tmp.path(), &config.store).unwrap_err();
    assert!(matches!(err, StoreError::DatasetNotFound(_)));
}

#[test]
fn single_route_renders_with_parent_hint() {
    let tmp = fixture_site();
    let config = load_config(tmp.path()).unwrap();
    let store = Dataset::connect(tmp.path(), &config.store).unwrap();
    let theme = Theme::from_config(&config);

    let route = Route::parse("/zh-hant/category/cat-textiles/cat-gifts/", LanguageParam::ZhHans).unwrap();
    assert_eq!(
        route.target,
        Target::Category {
            id: "cat-gifts".into(),
            parent: Some("cat-textiles".into()),
        }
    );
    let html = generate::render_route(&store, &theme, &route).unwrap().into_string();
    assert!(html.contains("織物"));

    let missing = Route::parse("/en/product/nope/", LanguageParam::ZhHans).unwrap();
    assert!(generate::render_route(&store, &theme, &missing).is_none());
    assert!(store.product("nope").unwrap().is_none());
}
