//! # wauramoon-site
//!
//! A static site generator for a multilingual craft gallery catalog. Content
//! (home page sections, product categories, products, events) is read from a
//! dataset export of the content studio and rendered into plain HTML in
//! Simplified Chinese, Traditional Chinese and English.
//!
//! # Architecture: Route → Loader → View
//!
//! Every page is an independent, stateless resolution:
//!
//! ```text
//! 1. Route     /en/category/cat-ceramics/cat-cups/   (generate)
//! 2. Loader    store queries → membership → inheritance   (pages)
//! 3. View      resolved page → Maud markup → index.html   (views)
//! ```
//!
//! Loaders never fail: a missing document and every store error resolve to a
//! not-found page, so one broken document never stops a build. The store itself
//! is validated up front by [`store::Dataset::connect`]; an unconfigured or
//! missing dataset stops the CLI before any page is resolved.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `ContentStore` query trait and the in-memory `Dataset` over an NDJSON export |
//! | [`types`] | Content projections shared by the store, resolvers and views |
//! | [`language`] | URL language params, content keys, language-prefixed hrefs |
//! | [`localize`] | Localized fields and the fixed `zhHans → zhHant → en` fallback |
//! | [`inheritance`] | One-level display-field fallback from a sub-category to its parent |
//! | [`membership`] | Authoritative parent resolution and member product/event queries |
//! | [`grid`] | Display order of child categories, products and events on a category page |
//! | [`breadcrumb`] | Breadcrumb trails for category, product and event pages |
//! | [`pages`] | Per-route page loaders; store failures become not found |
//! | [`rich_text`] | Portable Text blocks rendered to HTML |
//! | [`date_format`] | Localized event dates and date ranges |
//! | [`embed`] | YouTube and Vimeo links rewritten to embeddable players |
//! | [`views`] | Maud templates for every page |
//! | [`generate`] | Route enumeration, parallel rendering, asset copy |
//! | [`config`] | `config.toml` loading, validation, merging and CSS color generation |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Design Decisions
//!
//! ## Sub-Categories With Several Parents
//!
//! A level-2 category may be listed by more than one top-level category. Each
//! listing gets its own route (`/category/{parent}/{id}/`) and the parent in the
//! URL is honored when it really lists the child. Without a hint the parent is
//! the first listing category, and failing that the majority level-1 category
//! of the sub-category's own products.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are a build error, and all interpolation
//! is auto-escaped, which matters for studio-edited text.
//!
//! ## Regeneration Instead of Runtime Fetching
//!
//! The output is plain HTML with no client-side runtime. Expired event products
//! and newly published content show up by re-running `build` against a fresh
//! dataset export.

pub mod breadcrumb;
pub mod config;
pub mod date_format;
pub mod embed;
pub mod generate;
pub mod grid;
pub mod inheritance;
pub mod language;
pub mod localize;
pub mod membership;
pub mod output;
pub mod pages;
pub mod rich_text;
pub mod store;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
