//! HTML templates.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Every renderer takes a resolved [`Page`] and returns a complete document;
//! none of them touch the content store.
//!
//! The stylesheet is embedded at compile time from `static/style.css`, with
//! color variables generated from config prepended.

use crate::breadcrumb::Breadcrumb;
use crate::config::{self, SiteConfig};
use crate::date_format::format_date_range;
use crate::embed::embed_url;
use crate::grid::{GridItem, compose_grid, sidebar_events};
use crate::language::{ALL_PARAMS, LanguageKey, LanguageParam, build_language_href};
use crate::localize::{pick_rich_text, pick_text};
use crate::pages::{HomeData, Page};
use crate::rich_text;
use crate::types::{
    AboutModule, CategoryDocument, ChannelGridModule, ChildCategory, ContactModule, Event,
    HeroModule, HomeSection, Product, QuoteModule,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Site-wide rendering settings.
#[derive(Debug, Clone)]
pub struct Theme {
    pub site_name: String,
    pub css: String,
}

impl Theme {
    pub fn from_config(config: &SiteConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            site_name: config.site_name.clone(),
            css: format!("{}\n\n{}", color_css, CSS_STATIC),
        }
    }

    /// `"{title} - {site_name}"`, or the site name alone for an empty title.
    pub fn page_title(&self, title: &str) -> String {
        if title.is_empty() {
            self.site_name.clone()
        } else {
            format!("{} - {}", title, self.site_name)
        }
    }
}

/// Fixed interface strings.
struct Labels {
    home: &'static str,
    events: &'static str,
    materials: &'static str,
    size: &'static str,
    price: &'static str,
    no_image: &'static str,
    no_video: &'static str,
    address: &'static str,
    hours: &'static str,
    not_found: &'static str,
    back_home: &'static str,
}

fn labels(key: LanguageKey) -> &'static Labels {
    const ZH_HANS: Labels = Labels {
        home: "首页",
        events: "店内活动",
        materials: "材质",
        size: "尺寸",
        price: "价格",
        no_image: "暂无图片",
        no_video: "您的浏览器不支持视频播放",
        address: "地址:",
        hours: "营业时间:",
        not_found: "页面不存在",
        back_home: "返回首页",
    };
    const ZH_HANT: Labels = Labels {
        home: "首頁",
        events: "店內活動",
        materials: "材質",
        size: "尺寸",
        price: "價格",
        no_image: "暫無圖片",
        no_video: "您的瀏覽器不支援影片播放",
        address: "地址:",
        hours: "營業時間:",
        not_found: "頁面不存在",
        back_home: "返回首頁",
    };
    const EN: Labels = Labels {
        home: "Home",
        events: "Events",
        materials: "Materials",
        size: "Size",
        price: "Price",
        no_image: "No image",
        no_video: "Your browser does not support video playback",
        address: "Address:",
        hours: "Opening hours:",
        not_found: "Page not found",
        back_home: "Back to home",
    };
    match key {
        LanguageKey::ZhHans => &ZH_HANS,
        LanguageKey::ZhHant => &ZH_HANT,
        LanguageKey::En => &EN,
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    lang: LanguageParam,
    title: &str,
    theme: &Theme,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang.html_lang()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(&theme.css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Links to the same page in every language.
pub fn language_switcher(current: LanguageParam, path: &[String]) -> Markup {
    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
    html! {
        nav.language-switcher {
            @for (idx, option) in ALL_PARAMS.iter().enumerate() {
                @if idx > 0 {
                    span.language-separator { "★" }
                }
                a href=(build_language_href(*option, &segments))
                    class=[(*option == current).then_some("active")]
                    hreflang=(option.html_lang()) {
                    (option.label())
                }
            }
        }
    }
}

/// Home link followed by the breadcrumb segments; the last one is active.
fn render_breadcrumb(crumb: &Breadcrumb, lang: LanguageParam) -> Markup {
    let home = labels(lang.key()).home;
    html! {
        nav.breadcrumb {
            a href=(build_language_href(lang, &[])) { (home) }
            @for (idx, segment) in crumb.segments.iter().enumerate() {
                span.breadcrumb-separator { "/" }
                @let active = crumb.is_active(idx).then_some("active");
                @if let Some(href) = crumb.href(lang, idx) {
                    a href=(href) class=[active] { (segment.label) }
                } @else {
                    span class=[active] { (segment.label) }
                }
            }
        }
    }
}

fn site_header<T>(page: &Page<T>, breadcrumb: Option<&Breadcrumb>) -> Markup {
    html! {
        header.site-header {
            @if let Some(crumb) = breadcrumb {
                (render_breadcrumb(crumb, page.lang))
            }
            (language_switcher(page.lang, &page.path))
        }
    }
}

fn event_card(event: &Event, lang: LanguageParam, in_grid: bool) -> Markup {
    let key = lang.key();
    let title = pick_text(Some(&event.title), key);
    let dates = format_date_range(event.start_date.as_deref(), event.end_date.as_deref(), key);
    html! {
        a.card.event-card.grid-card[in_grid] href=(build_language_href(lang, &["event", event.id.as_str()])) {
            @if let Some(cover) = event.cover.as_deref().filter(|c| !c.is_empty()) {
                img src=(cover) alt=(title) loading="lazy";
            }
            span.card-title { (title) }
            @if !dates.is_empty() {
                span.card-meta { (dates) }
            }
        }
    }
}

fn product_card(product: &Product, lang: LanguageParam) -> Markup {
    let key = lang.key();
    let title = pick_text(Some(&product.title), key);
    html! {
        a.card.product-card href=(build_language_href(lang, &["product", product.id.as_str()])) {
            @if let Some(thumbnail) = product.thumbnail() {
                img src=(thumbnail) alt=(title) loading="lazy";
            } @else {
                span.card-placeholder { (labels(key).no_image) }
            }
            span.card-title { (title) }
            @if let Some(price) = product.price.as_deref().filter(|p| !p.is_empty()) {
                span.card-meta { (price) }
            }
            @if product.is_event {
                span.badge { (labels(key).events) }
            }
        }
    }
}

fn category_card(child: &ChildCategory, lang: LanguageParam) -> Markup {
    let title = pick_text(Some(&child.summary.title), lang.key());
    let href = match child.parent.as_ref() {
        Some(parent) => build_language_href(lang, &["category", parent.id.as_str(), child.summary.id.as_str()]),
        None => build_language_href(lang, &["category", child.summary.id.as_str()]),
    };
    html! {
        a.card.category-card href=(href) {
            @if let Some(cover) = child.summary.cover_url.as_deref().filter(|c| !c.is_empty()) {
                img src=(cover) alt=(title) loading="lazy";
            }
            span.card-title { (title) }
        }
    }
}

fn grid_card(item: &GridItem<'_>, lang: LanguageParam) -> Markup {
    match item {
        GridItem::Category(child) => category_card(child, lang),
        GridItem::Product(product) => product_card(product, lang),
        GridItem::Event(event) => event_card(event, lang, true),
    }
}

// ============================================================================
// Home sections
// ============================================================================

fn render_hero(section: &HeroModule, page: &Page<HomeData>) -> Markup {
    let title = pick_text(Some(&section.title), page.lang.key());
    let eyebrow = pick_text(Some(&section.eyebrow), page.lang.key());
    html! {
        section.hero {
            @if let Some(background) = section.background_image.as_deref() {
                img.hero-image src=(background) alt=(title);
            }
            div.hero-content {
                (language_switcher(page.lang, &page.path))
                @if !eyebrow.is_empty() {
                    p.hero-eyebrow { (eyebrow) }
                }
                @if !title.is_empty() {
                    h1.hero-title { (title) }
                }
            }
        }
    }
}

fn render_quote(section: &QuoteModule, key: LanguageKey) -> Markup {
    let quote = pick_rich_text(Some(&section.quote), key);
    let author = pick_text(Some(&section.author), key);
    let source = pick_text(Some(&section.source), key);
    html! {
        @if !quote.is_empty() {
            section.quote {
                blockquote { (rich_text::render(&quote)) }
                @if !author.is_empty() || !source.is_empty() {
                    p.quote-author {
                        (author)
                        @if !source.is_empty() {
                            "，《" (source) "》"
                        }
                    }
                }
            }
        }
    }
}

fn render_about(section: &AboutModule, key: LanguageKey) -> Markup {
    let title = pick_text(Some(&section.title), key);
    let signature = pick_text(Some(&section.signature), key);
    html! {
        section.about {
            @if !title.is_empty() {
                h2 { (title) }
            }
            div.rich-text { (rich_text::render(&pick_rich_text(Some(&section.body), key))) }
            @if !signature.is_empty() {
                p.about-signature { (signature) }
            }
        }
    }
}

/// Top-level categories when there are any, the module's own items otherwise.
fn render_channel_grid(
    section: &ChannelGridModule,
    categories: &[CategoryDocument],
    lang: LanguageParam,
) -> Markup {
    let key = lang.key();
    html! {
        @if !categories.is_empty() {
            section.channel-grid {
                @for category in categories {
                    @let label = pick_text(Some(&category.summary.title), key);
                    a.channel-item href=(build_language_href(lang, &["category", category.id()])) {
                        @if let Some(cover) = category.summary.cover_url.as_deref() {
                            img.channel-icon src=(cover) alt=(label) loading="lazy";
                        }
                        span.channel-star { "★" }
                        span.channel-label { (label) }
                    }
                }
            }
        } @else if !section.items.is_empty() {
            section.channel-grid {
                @for item in &section.items {
                    @let label = pick_text(Some(&item.label), key);
                    @let description = pick_text(Some(&item.description), key);
                    div.channel-item {
                        @if let Some(icon) = item.icon_url.as_deref() {
                            img.channel-icon src=(icon) alt=(label) loading="lazy";
                        }
                        @if let Some(link) = item.link.as_deref() {
                            a.channel-label href=(link) { (label) }
                        } @else {
                            span.channel-label { (label) }
                        }
                        @if !description.is_empty() {
                            p.channel-description { (description) }
                        }
                    }
                }
            }
        }
    }
}

fn render_contact(section: &ContactModule, key: LanguageKey) -> Markup {
    let text = labels(key);
    let studio = pick_text(Some(&section.studio_name), key);
    let address = pick_text(Some(&section.address), key);
    let hours = pick_text(Some(&section.business_hours), key);
    let notes = pick_text(Some(&section.notes), key);
    html! {
        section.contact {
            dl {
                @if !studio.is_empty() {
                    dt.contact-studio { (studio) }
                }
                @if !address.is_empty() {
                    dt { (text.address) } dd { (address) }
                }
                @if let Some(phone) = section.phone.as_deref() {
                    dt { "TEL:" }
                    dd {
                        (phone)
                        @if let Some(mobile) = section.mobile.as_deref() {
                            " / " (mobile)
                        }
                    }
                }
                @if let Some(email) = section.email.as_deref() {
                    dt { "EMAIL:" }
                    dd { a href={ "mailto:" (email) } { (email) } }
                }
                @if !hours.is_empty() {
                    dt { (text.hours) } dd { (hours) }
                }
                @if !notes.is_empty() {
                    dd.contact-notes { (notes) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_section(section: &HomeSection, page: &Page<HomeData>, key: LanguageKey) -> Markup {
    match section {
        HomeSection::Hero(hero) => render_hero(hero, page),
        HomeSection::Quote(quote) => render_quote(quote, key),
        HomeSection::About(about) => render_about(about, key),
        HomeSection::ChannelGrid(grid) => render_channel_grid(grid, &page.data.categories, page.lang),
        HomeSection::Contact(contact) => render_contact(contact, key),
        HomeSection::Unsupported => html! {},
    }
}

pub fn render_home(page: &Page<HomeData>, theme: &Theme) -> Markup {
    let key = page.lang.key();
    let has_hero = page
        .data
        .home
        .sections
        .iter()
        .any(|s| matches!(s, HomeSection::Hero(_)));
    let content = html! {
        @if !has_hero {
            header.site-header { (language_switcher(page.lang, &page.path)) }
        }
        main.home-page {
            @for section in &page.data.home.sections {
                (render_section(section, page, key))
            }
        }
    };
    base_document(page.lang, &theme.site_name, theme, Some("home"), content)
}

pub fn render_category(page: &Page<CategoryDocument>, theme: &Theme) -> Markup {
    let key = page.lang.key();
    let category = &page.data;
    let title = pick_text(Some(&category.summary.title), key);
    let column_title = pick_text(Some(&category.summary.left_column_title), key);
    let description = pick_rich_text(Some(&category.summary.left_column_description), key);
    let events = sidebar_events(category);
    let crumb = Breadcrumb::for_category(category, key);

    let content = html! {
        (site_header(page, Some(&crumb)))
        main.category-page {
            aside.column {
                @if let Some(cover) = category.summary.cover_url.as_deref().filter(|c| !c.is_empty()) {
                    img.cover src=(cover) alt=(title);
                }
                @if !column_title.is_empty() {
                    p.column-title { (column_title) }
                }
                h1 { (title) }
                div.rich-text { (rich_text::render(&description)) }
                @if !events.is_empty() {
                    section.sidebar-events {
                        p.column-title { (labels(key).events) }
                        @for event in events {
                            (event_card(event, page.lang, false))
                        }
                    }
                }
            }
            div.grid {
                @for item in compose_grid(category) {
                    (grid_card(&item, page.lang))
                }
            }
        }
    };
    base_document(page.lang, &theme.page_title(&title), theme, None, content)
}

pub fn render_product(page: &Page<Product>, theme: &Theme) -> Markup {
    let key = page.lang.key();
    let text = labels(key);
    let product = &page.data;
    let title = pick_text(Some(&product.title), key);
    let sub_title = pick_text(Some(&product.sub_title), key);
    let summary = pick_text(Some(&product.summary), key);
    let description = pick_rich_text(Some(&product.description), key);
    let materials = pick_text(Some(&product.materials), key);
    let size = pick_text(Some(&product.size), key);
    let price = product.price.as_deref().filter(|p| !p.is_empty());
    let video_url = product.video_url.as_deref().filter(|v| !v.is_empty());
    let video_link = product.video_link.as_deref().filter(|v| !v.is_empty());
    let crumb = Breadcrumb::for_product(product, key);

    let content = html! {
        (site_header(page, Some(&crumb)))
        main.product-page {
            aside.column.media {
                @if let Some(src) = video_url {
                    video.video src=(src) controls playsinline { (text.no_video) }
                } @else if let Some(link) = video_link {
                    iframe.video src=(embed_url(link)) title=(title)
                        allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                        allowfullscreen {}
                }
                @for (idx, image) in product.gallery.iter().enumerate() {
                    img src=(image) alt={ (title) " - " (idx + 1) } loading="lazy";
                }
                @if product.gallery.is_empty() && video_url.is_none() && video_link.is_none() {
                    div.card-placeholder { (text.no_image) }
                }
            }
            article.details {
                h1 { (title) }
                @if !sub_title.is_empty() {
                    p.subtitle { (sub_title) }
                }
                @if !summary.is_empty() {
                    p.summary { (summary) }
                }
                div.rich-text { (rich_text::render(&description)) }
                dl.facts {
                    @if !materials.is_empty() {
                        dt { (text.materials) } dd { (materials) }
                    }
                    @if !size.is_empty() {
                        dt { (text.size) } dd { (size) }
                    }
                    @if let Some(price) = price {
                        dt { (text.price) } dd.price { (price) }
                    }
                }
            }
        }
    };
    base_document(page.lang, &theme.page_title(&title), theme, None, content)
}

pub fn render_event(page: &Page<Event>, theme: &Theme) -> Markup {
    let key = page.lang.key();
    let event = &page.data;
    let title = pick_text(Some(&event.title), key);
    let dates = format_date_range(event.start_date.as_deref(), event.end_date.as_deref(), key);
    let description = pick_rich_text(Some(&event.description), key);
    let crumb = Breadcrumb::for_event(event, key);

    let content = html! {
        (site_header(page, Some(&crumb)))
        main.event-page {
            aside.column.media {
                @if let Some(cover) = event.cover.as_deref().filter(|c| !c.is_empty()) {
                    img.cover src=(cover) alt=(title);
                }
            }
            article.details {
                h1 { (title) }
                @if !dates.is_empty() {
                    p.dates { (dates) }
                }
                div.rich-text { (rich_text::render(&description)) }
            }
        }
    };
    base_document(page.lang, &theme.page_title(&title), theme, None, content)
}

/// Not-found page in the default language.
pub fn render_not_found(lang: LanguageParam, theme: &Theme) -> Markup {
    let text = labels(lang.key());
    let content = html! {
        main.not-found {
            h1 { "404" }
            p { (text.not_found) }
            a href=(build_language_href(lang, &[])) { (text.back_home) }
        }
    };
    base_document(lang, &theme.page_title(text.not_found), theme, Some("not-found"), content)
}

/// Root page sending visitors to the default language.
pub fn render_redirect(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta http-equiv="refresh" content={ "0; url=" (target) };
                link rel="canonical" href=(target);
                title { "Redirecting" }
            }
            body {
                a href=(target) { (target) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
