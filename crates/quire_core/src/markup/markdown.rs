//! Default markdown-backed markup parser.
//!
//! Walks the pulldown-cmark event stream into the core tree shapes. Events
//! with no counterpart in the tree model (footnotes, tables, metadata) are
//! skipped rather than erroring.

use crate::markup::{MarkupBlock, MarkupInline, MarkupListItem, MarkupParser};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Markdown parser with task lists, strikethrough and math enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl MarkupParser for MarkdownParser {
    fn parse(&self, text: &str) -> Vec<MarkupBlock> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_MATH);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        let mut events = Parser::new_ext(text, options);
        collect_blocks(&mut events, None)
    }
}

fn collect_blocks(events: &mut Parser<'_>, until: Option<TagEnd>) -> Vec<MarkupBlock> {
    let mut blocks = Vec::new();
    while let Some(event) = events.next() {
        match event {
            Event::End(end) => {
                if Some(end) == until {
                    break;
                }
            }
            Event::Start(Tag::Paragraph) => blocks.push(MarkupBlock::Paragraph {
                children: collect_inlines(events, TagEnd::Paragraph),
            }),
            Event::Start(Tag::HtmlBlock) => blocks.push(MarkupBlock::Paragraph {
                children: collect_inlines(events, TagEnd::HtmlBlock),
            }),
            Event::Start(Tag::Heading { level, .. }) => blocks.push(MarkupBlock::Heading {
                level: level as u8,
                children: collect_inlines(events, TagEnd::Heading(level)),
            }),
            Event::Start(Tag::BlockQuote(_)) => blocks.push(MarkupBlock::Quote {
                children: collect_blocks(events, Some(TagEnd::BlockQuote)),
            }),
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(language) => {
                        Some(language.into_string()).filter(|value| !value.is_empty())
                    }
                    CodeBlockKind::Indented => None,
                };
                blocks.push(MarkupBlock::CodeBlock {
                    language,
                    code: collect_code(events),
                });
            }
            Event::Start(Tag::List(start)) => blocks.push(list_block(events, start)),
            Event::Rule => blocks.push(MarkupBlock::Rule),
            _ => {}
        }
    }
    blocks
}

fn collect_code(events: &mut Parser<'_>) -> String {
    let mut code = String::new();
    for event in events.by_ref() {
        match event {
            Event::Text(text) | Event::Code(text) => code.push_str(&text),
            Event::End(TagEnd::CodeBlock) => break,
            _ => {}
        }
    }
    code
}

fn list_block(events: &mut Parser<'_>, start: Option<u64>) -> MarkupBlock {
    match start {
        Some(start) => MarkupBlock::OrderedList {
            start,
            items: collect_list(events, true),
        },
        None => MarkupBlock::UnorderedList {
            items: collect_list(events, false),
        },
    }
}

fn collect_list(events: &mut Parser<'_>, ordered: bool) -> Vec<MarkupListItem> {
    let mut items = Vec::new();
    while let Some(event) = events.next() {
        match event {
            Event::End(TagEnd::List(done_ordered)) if done_ordered == ordered => break,
            Event::Start(Tag::List(start)) => items.push(match start {
                Some(start) => MarkupListItem::Ordered {
                    start,
                    items: collect_list(events, true),
                },
                None => MarkupListItem::Unordered {
                    items: collect_list(events, false),
                },
            }),
            Event::Start(Tag::Item) => items.push(collect_item(events)),
            _ => {}
        }
    }
    items
}

fn collect_item(events: &mut Parser<'_>) -> MarkupListItem {
    let mut checked = None;
    let mut children = Vec::new();
    while let Some(event) = events.next() {
        match event {
            Event::End(TagEnd::Item) => break,
            Event::TaskListMarker(value) => checked = Some(value),
            other => push_inline(other, events, &mut children),
        }
    }
    MarkupListItem::Item { checked, children }
}

fn collect_inlines(events: &mut Parser<'_>, until: TagEnd) -> Vec<MarkupInline> {
    let mut inlines = Vec::new();
    while let Some(event) = events.next() {
        if let Event::End(end) = event {
            if end == until {
                break;
            }
            continue;
        }
        push_inline(event, events, &mut inlines);
    }
    inlines
}

fn push_inline<'a>(event: Event<'a>, events: &mut Parser<'a>, out: &mut Vec<MarkupInline>) {
    match event {
        Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
            out.push(MarkupInline::Text {
                text: text.into_string(),
            });
        }
        Event::Code(text) => out.push(MarkupInline::Code {
            text: text.into_string(),
        }),
        Event::InlineMath(text) => out.push(MarkupInline::Math {
            text: text.into_string(),
            display: false,
        }),
        Event::DisplayMath(text) => out.push(MarkupInline::Math {
            text: text.into_string(),
            display: true,
        }),
        Event::HardBreak => out.push(MarkupInline::HardBreak),
        Event::Start(Tag::Emphasis) => out.push(MarkupInline::Emphasis {
            children: collect_inlines(events, TagEnd::Emphasis),
        }),
        Event::Start(Tag::Strong) => out.push(MarkupInline::Strong {
            children: collect_inlines(events, TagEnd::Strong),
        }),
        Event::Start(Tag::Strikethrough) => out.push(MarkupInline::Strike {
            children: collect_inlines(events, TagEnd::Strikethrough),
        }),
        Event::Start(Tag::Link { dest_url, .. }) => out.push(MarkupInline::Link {
            url: dest_url.into_string(),
            children: collect_inlines(events, TagEnd::Link),
        }),
        Event::Start(Tag::Image { dest_url, .. }) => out.push(MarkupInline::Image {
            url: dest_url.into_string(),
            alt: collect_alt_text(events),
        }),
        _ => {}
    }
}

fn collect_alt_text(events: &mut Parser<'_>) -> String {
    let mut alt = String::new();
    for event in events.by_ref() {
        match event {
            Event::End(TagEnd::Image) => break,
            Event::Text(text) => alt.push_str(&text),
            _ => {}
        }
    }
    alt
}
