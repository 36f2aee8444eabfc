//! Portable Text blocks and their HTML rendering.
//!
//! Rich text fields are stored as a sequence of Portable Text blocks. Only the
//! subset the studio schema can produce is rendered: block styles, decorator
//! marks, link annotations and bullet/number lists. Anything else is skipped.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// A single Portable Text block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mark_defs: Vec<MarkDef>,
}

/// Inline run of text with decorator marks or annotation keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

/// Annotation definition referenced from span marks by `_key`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Block {
    /// Plain paragraph with one unmarked span.
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: "block".to_string(),
            style: Some("normal".to_string()),
            children: vec![Span {
                text: text.to_string(),
                marks: vec![],
            }],
            ..Self::default()
        }
    }

    fn is_text_block(&self) -> bool {
        self.kind == "block"
    }

    /// Concatenated text of every span.
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Plain text of a block sequence, paragraphs separated by blank lines.
pub fn to_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| b.is_text_block())
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render blocks to HTML. Empty input renders nothing.
pub fn render(blocks: &[Block]) -> Markup {
    html! {
        @for group in group_lists(blocks) {
            (render_group(&group))
        }
    }
}

fn render_group(group: &Group<'_>) -> Markup {
    match group {
        Group::Single(block) => render_block(block),
        Group::List {
            ordered: true,
            items,
        } => html! { ol { @for item in items { li { (render_spans(item)) } } } },
        Group::List {
            ordered: false,
            items,
        } => html! { ul { @for item in items { li { (render_spans(item)) } } } },
    }
}

enum Group<'a> {
    Single(&'a Block),
    List { ordered: bool, items: Vec<&'a Block> },
}

/// Collapse consecutive list-item blocks of the same kind into one list.
fn group_lists(blocks: &[Block]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    for block in blocks.iter().filter(|b| b.is_text_block()) {
        let Some(list_item) = block.list_item.as_deref() else {
            groups.push(Group::Single(block));
            continue;
        };
        let ordered = list_item == "number";
        match groups.last_mut() {
            Some(Group::List {
                ordered: current,
                items,
            }) if *current == ordered => items.push(block),
            _ => groups.push(Group::List {
                ordered,
                items: vec![block],
            }),
        }
    }
    groups
}

fn render_block(block: &Block) -> Markup {
    let content = render_spans(block);
    match block.style.as_deref().unwrap_or("normal") {
        "h1" => html! { h1 { (content) } },
        "h2" => html! { h2 { (content) } },
        "h3" => html! { h3 { (content) } },
        "h4" => html! { h4 { (content) } },
        "blockquote" => html! { blockquote { (content) } },
        _ => html! { p { (content) } },
    }
}

fn render_spans(block: &Block) -> Markup {
    html! {
        @for span in &block.children {
            (render_span(span, &block.mark_defs))
        }
    }
}

/// Wrap a span's text in its marks, innermost mark last.
fn render_span(span: &Span, mark_defs: &[MarkDef]) -> Markup {
    let mut markup = html! { (span.text) };
    for mark in span.marks.iter().rev() {
        markup = match mark.as_str() {
            "strong" => html! { strong { (markup) } },
            "em" => html! { em { (markup) } },
            "underline" => html! { u { (markup) } },
            "code" => html! { code { (markup) } },
            "strike-through" => html! { s { (markup) } },
            key => match mark_defs.iter().find(|d| d.key == key) {
                Some(MarkDef {
                    href: Some(href), ..
                }) => html! { a href=(href) rel="noopener" { (markup) } },
                _ => markup,
            },
        };
    }
    markup
}
