//! HTML site generation.
//!
//! Enumerates every route in every language, resolves each page through the
//! page loaders and writes the rendered HTML. Pages are independent, so they
//! are rendered in parallel on the rayon pool.
//!
//! ## Generated Pages
//!
//! - **Root** (`/index.html`): redirect to the default language
//! - **Home** (`/{lang}/index.html`): home sections and top-level categories
//! - **Category** (`/{lang}/category/{id}/index.html`)
//! - **Category under a parent** (`/{lang}/category/{parent}/{id}/index.html`):
//!   one per parent listing the category, resolved with that parent
//! - **Product** (`/{lang}/product/{id}/index.html`)
//! - **Event** (`/{lang}/event/{id}/index.html`)
//! - **Not found** (`/404.html`)
//!
//! Routes whose page resolves to not found are skipped and reported.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                       # Redirect to /zh-hans/
//! ├── 404.html
//! ├── favicon.ico                      # From assets/
//! ├── zh-hans/
//! │   ├── index.html
//! │   ├── category/
//! │   │   ├── cat-ceramics/index.html
//! │   │   ├── cat-cups/index.html
//! │   │   └── cat-ceramics/cat-cups/index.html
//! │   ├── product/p-teacup/index.html
//! │   └── event/e-kiln/index.html
//! ├── zh-hant/
//! └── en/
//! ```

use crate::config::SiteConfig;
use crate::language::{ALL_PARAMS, LanguageParam, build_language_href};
use crate::pages;
use crate::store::{ContentStore, StoreError};
use crate::views::{self, Theme};
use maud::Markup;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a route shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Home,
    Category { id: String, parent: Option<String> },
    Product { id: String },
    Event { id: String },
}

/// A page in one language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub lang: LanguageParam,
    pub target: Target,
}

impl Route {
    pub fn new(lang: LanguageParam, target: Target) -> Self {
        Self { lang, target }
    }

    /// Path segments after the language.
    pub fn segments(&self) -> Vec<&str> {
        match &self.target {
            Target::Home => vec![],
            Target::Category { id, parent: None } => vec!["category", id.as_str()],
            Target::Category {
                id,
                parent: Some(parent),
            } => vec!["category", parent.as_str(), id.as_str()],
            Target::Product { id } => vec!["product", id.as_str()],
            Target::Event { id } => vec!["event", id.as_str()],
        }
    }

    /// Site-relative URL, with a trailing slash.
    pub fn href(&self) -> String {
        build_language_href(self.lang, &self.segments())
    }

    /// `index.html` for this route under `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let mut path = output_dir.join(self.lang.as_str());
        for segment in self.segments() {
            path.push(segment);
        }
        path.join("index.html")
    }

    /// Parse a site path such as `/en/category/cat-1/cat-2/`.
    ///
    /// A missing language segment resolves to `default_lang`.
    pub fn parse(path: &str, default_lang: LanguageParam) -> Option<Self> {
        let mut parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.last() == Some(&"index.html") {
            parts.pop();
        }
        let (lang, rest) = match parts.split_first() {
            Some((first, rest)) => match LanguageParam::parse(first) {
                Some(lang) => (lang, rest),
                None => (default_lang, parts.as_slice()),
            },
            None => (default_lang, parts.as_slice()),
        };
        let target = match rest {
            [] => Target::Home,
            ["category", id] => Target::Category {
                id: id.to_string(),
                parent: None,
            },
            ["category", parent, id] => Target::Category {
                id: id.to_string(),
                parent: Some(parent.to_string()),
            },
            ["product", id] => Target::Product { id: id.to_string() },
            ["event", id] => Target::Event { id: id.to_string() },
            _ => return None,
        };
        Some(Self::new(lang, target))
    }
}

/// Progress reported while generating.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateEvent {
    PageWritten { href: String },
    PageSkipped { href: String },
    AssetsCopied { count: usize },
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateReport {
    pub pages_written: usize,
    /// Routes whose page resolved to not found.
    pub skipped: Vec<String>,
    pub assets_copied: usize,
}

/// Every route of the site, for every language.
///
/// Categories get one plain route plus one route per top-level parent listing
/// them, so shared sub-categories render once per parent.
pub fn enumerate_routes(store: &dyn ContentStore) -> Result<Vec<Route>, StoreError> {
    let category_ids = store.category_ids()?;
    let listings: Vec<(String, String)> = store
        .top_level_categories()?
        .into_iter()
        .flat_map(|top| {
            let parent = top.summary.id;
            top.children
                .unwrap_or_default()
                .into_iter()
                .map(move |child| (parent.clone(), child.summary.id))
        })
        .collect();
    let product_ids = store.product_ids()?;
    let event_ids = store.event_ids()?;

    let mut targets = vec![Target::Home];
    targets.extend(category_ids.into_iter().map(|id| Target::Category { id, parent: None }));
    targets.extend(listings.into_iter().map(|(parent, id)| Target::Category {
        id,
        parent: Some(parent),
    }));
    targets.extend(product_ids.into_iter().map(|id| Target::Product { id }));
    targets.extend(event_ids.into_iter().map(|id| Target::Event { id }));

    Ok(ALL_PARAMS
        .iter()
        .flat_map(|lang| targets.iter().map(move |t| Route::new(*lang, t.clone())))
        .collect())
}

/// Resolve and render one route. `None` when the page is not found.
pub fn render_route(store: &dyn ContentStore, theme: &Theme, route: &Route) -> Option<Markup> {
    let lang = route.lang;
    match &route.target {
        Target::Home => pages::load_home(store, lang)
            .found()
            .map(|page| views::render_home(&page, theme)),
        Target::Category { id, parent } => pages::load_category(store, lang, id, parent.as_deref())
            .found()
            .map(|page| views::render_category(&page, theme)),
        Target::Product { id } => pages::load_product(store, lang, id)
            .found()
            .map(|page| views::render_product(&page, theme)),
        Target::Event { id } => pages::load_event(store, lang, id)
            .found()
            .map(|page| views::render_event(&page, theme)),
    }
}

/// Resolve one route to its page data as JSON, without rendering.
///
/// Not-found pages serialize as `{"outcome": "not_found"}`.
pub fn route_json(store: &dyn ContentStore, route: &Route) -> serde_json::Result<serde_json::Value> {
    let lang = route.lang;
    match &route.target {
        Target::Home => serde_json::to_value(pages::load_home(store, lang)),
        Target::Category { id, parent } => {
            serde_json::to_value(pages::load_category(store, lang, id, parent.as_deref()))
        }
        Target::Product { id } => serde_json::to_value(pages::load_product(store, lang, id)),
        Target::Event { id } => serde_json::to_value(pages::load_event(store, lang, id)),
    }
}

/// Generate the whole site into `output_dir`.
///
/// Static assets are copied from `{source_root}/{build.assets_dir}` when that
/// directory exists.
pub fn generate(
    store: &dyn ContentStore,
    config: &SiteConfig,
    source_root: &Path,
    output_dir: &Path,
    events: Option<Sender<GenerateEvent>>,
) -> Result<GenerateReport, GenerateError> {
    let theme = Theme::from_config(config);
    let default_lang = config.languages.default;
    fs::create_dir_all(output_dir)?;

    let routes = enumerate_routes(store)?;
    info!(routes = routes.len(), "routes enumerated");

    let outcomes = routes
        .par_iter()
        .map(|route| -> Result<Option<String>, GenerateError> {
            let href = route.href();
            let Some(markup) = render_route(store, &theme, route) else {
                debug!(%href, "page not found, skipped");
                emit(&events, GenerateEvent::PageSkipped { href: href.clone() });
                return Ok(Some(href));
            };
            let path = route.output_path(output_dir);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, markup.into_string())?;
            emit(&events, GenerateEvent::PageWritten { href });
            Ok(None)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let skipped: Vec<String> = outcomes.into_iter().flatten().collect();
    let pages_written = routes.len() - skipped.len();

    let root_target = build_language_href(default_lang, &[]);
    fs::write(
        output_dir.join("index.html"),
        views::render_redirect(&root_target).into_string(),
    )?;
    fs::write(
        output_dir.join("404.html"),
        views::render_not_found(default_lang, &theme).into_string(),
    )?;

    let assets_dir = source_root.join(&config.build.assets_dir);
    let assets_copied = if assets_dir.is_dir() {
        copy_assets(&assets_dir, output_dir)?
    } else {
        0
    };
    emit(&events, GenerateEvent::AssetsCopied { count: assets_copied });

    info!(pages_written, skipped = skipped.len(), assets_copied, "site generated");
    Ok(GenerateReport {
        pages_written,
        skipped,
        assets_copied,
    })
}

fn emit(events: &Option<Sender<GenerateEvent>>, event: GenerateEvent) {
    if let Some(tx) = events {
        // A dropped receiver only silences progress output.
        tx.send(event).ok();
    }
}

/// Copy every file under `src` into `dst`, keeping relative paths.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::store::Dataset;
    use crate::test_helpers::{fixture_dataset, setup_fixtures};
    use regex::Regex;
    use serde_json::json;
    use tempfile::TempDir;

    fn category(id: &str, parent: Option<&str>) -> Target {
        Target::Category {
            id: id.into(),
            parent: parent.map(String::from),
        }
    }

    #[test]
    fn route_paths() {
        let route = Route::new(LanguageParam::ZhHant, category("cups", Some("ceramics")));
        assert_eq!(route.href(), "/zh-hant/category/ceramics/cups/");
        assert_eq!(
            route.output_path(Path::new("dist")),
            Path::new("dist/zh-hant/category/ceramics/cups/index.html")
        );
        let home = Route::new(LanguageParam::En, Target::Home);
        assert_eq!(home.href(), "/en/");
        assert_eq!(home.output_path(Path::new("dist")), Path::new("dist/en/index.html"));
    }

    #[test]
    fn parse_routes() {
        let default = LanguageParam::ZhHans;
        assert_eq!(
            Route::parse("/en/product/p1/", default),
            Some(Route::new(LanguageParam::En, Target::Product { id: "p1".into() }))
        );
        assert_eq!(
            Route::parse("/category/top/sub", default),
            Some(Route::new(default, category("sub", Some("top"))))
        );
        assert_eq!(Route::parse("/", default), Some(Route::new(default, Target::Home)));
        assert_eq!(
            Route::parse("zh-hant/event/e1/index.html", default),
            Some(Route::new(LanguageParam::ZhHant, Target::Event { id: "e1".into() }))
        );
        assert_eq!(Route::parse("/en/unknown/x", default), None);
    }

    #[test]
    fn enumerate_covers_every_language_and_parent_listing() {
        let store = fixture_dataset();
        let routes = enumerate_routes(&store).unwrap();
        for lang in ALL_PARAMS {
            assert!(routes.contains(&Route::new(lang, Target::Home)));
            assert!(routes.contains(&Route::new(lang, category("cat-gifts", None))));
            assert!(routes.contains(&Route::new(lang, category("cat-gifts", Some("cat-ceramics")))));
            assert!(routes.contains(&Route::new(lang, category("cat-gifts", Some("cat-textiles")))));
        }
        assert_eq!(routes.len() % ALL_PARAMS.len(), 0);
    }

    #[test]
    fn route_json_reports_outcome() {
        let store = fixture_dataset();
        let found = route_json(
            &store,
            &Route::new(LanguageParam::En, Target::Product { id: "p-teacup".into() }),
        )
        .unwrap();
        assert_eq!(found["outcome"], "found");
        assert_eq!(found["page"]["data"]["_id"], "p-teacup");
        assert_eq!(found["page"]["lang"], "en");

        let missing = route_json(
            &store,
            &Route::new(LanguageParam::En, Target::Event { id: "nope".into() }),
        )
        .unwrap();
        assert_eq!(missing["outcome"], "not_found");
    }

    #[test]
    fn generate_writes_pages_redirect_and_assets() {
        let store = fixture_dataset();
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        fs::create_dir_all(source.join("assets/fonts")).unwrap();
        fs::write(source.join("assets/favicon.ico"), "icon").unwrap();
        fs::write(source.join("assets/fonts/site.woff2"), "font").unwrap();
        let output = tmp.path().join("dist");

        let (tx, rx) = std::sync::mpsc::channel();
        let report = generate(&store, &SiteConfig::default(), &source, &output, Some(tx)).unwrap();

        assert!(report.pages_written > 0);
        assert_eq!(report.assets_copied, 2);
        assert!(output.join("favicon.ico").exists());
        assert!(output.join("fonts/site.woff2").exists());
        assert!(output.join("404.html").exists());
        let root = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(root.contains("/zh-hans/"));
        assert!(output.join("en/product/p-teacup/index.html").exists());
        assert!(output.join("zh-hant/category/cat-ceramics/cat-cups/index.html").exists());

        let written = rx
            .try_iter()
            .filter(|e| matches!(e, GenerateEvent::PageWritten { .. }))
            .count();
        assert_eq!(written, report.pages_written);
    }

    #[test]
    fn generate_from_fixture_content_dir() {
        let tmp = setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        let store = Dataset::connect(tmp.path(), &config.store).unwrap();
        let output = tmp.path().join("dist");

        let report = generate(&store, &config, tmp.path(), &output, None).unwrap();
        assert_eq!(report.assets_copied, 1);
        assert!(output.join("robots.txt").exists());
        let page = fs::read_to_string(output.join("zh-hans/category/cat-textiles/cat-gifts/index.html")).unwrap();
        assert!(page.contains("织物"));
    }

    #[test]
    fn generate_without_assets_dir() {
        let store = fixture_dataset();
        let tmp = TempDir::new().unwrap();
        let report = generate(
            &store,
            &SiteConfig::default(),
            tmp.path(),
            &tmp.path().join("dist"),
            None,
        )
        .unwrap();
        assert_eq!(report.assets_copied, 0);
        assert!(report.skipped.is_empty());
    }

    /// Every `/category/` href in the built site whose page was not written.
    fn dead_category_links(output: &Path) -> Vec<String> {
        let href = Regex::new(r#"href="(/[a-z-]+/category/[^"]*)""#).unwrap();
        let mut dead = Vec::new();
        for entry in WalkDir::new(output) {
            let entry = entry.unwrap();
            if entry.path().extension().is_none_or(|ext| ext != "html") {
                continue;
            }
            let html = fs::read_to_string(entry.path()).unwrap();
            for link in href.captures_iter(&html) {
                let target = output.join(link[1].trim_matches('/')).join("index.html");
                if !target.exists() {
                    let page = entry.path().strip_prefix(output).unwrap().display();
                    dead.push(format!("{page} -> {}", &link[1]));
                }
            }
        }
        dead
    }

    #[test]
    fn unlisted_parents_do_not_produce_dead_links() {
        // No level-1 category lists "sub"; its parent is inferred from products.
        let store = Dataset::from_documents(vec![
            json!({"_id": "catA", "_type": "productCategory", "level": 1}),
            json!({"_id": "catB", "_type": "productCategory", "level": 1}),
            json!({"_id": "sub", "_type": "productCategoryLevel2", "level": 2}),
            json!({"_id": "p1", "_type": "productItem",
                   "level1Category": {"_ref": "catA"}, "level2Category": {"_ref": "sub"}}),
            json!({"_id": "p2", "_type": "productItem",
                   "level1Category": {"_ref": "catA"}, "level2Category": {"_ref": "sub"}}),
            json!({"_id": "p3", "_type": "productItem",
                   "level1Category": {"_ref": "catB"}, "level2Category": {"_ref": "sub"}}),
        ])
        .unwrap();
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("dist");
        generate(&store, &SiteConfig::default(), tmp.path(), &output, None).unwrap();

        let sub = fs::read_to_string(output.join("en/category/sub/index.html")).unwrap();
        assert!(sub.contains(r#"href="/en/category/catA/""#));
        assert!(sub.contains("/en/product/p1/"));
        assert!(!sub.contains("/en/product/p3/"));
        assert_eq!(dead_category_links(&output), Vec::<String>::new());
    }

    #[test]
    fn fixture_site_has_no_dead_category_links() {
        let store = fixture_dataset();
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("dist");
        generate(&store, &SiteConfig::default(), tmp.path(), &output, None).unwrap();
        assert_eq!(dead_category_links(&output), Vec::<String>::new());
    }
}
