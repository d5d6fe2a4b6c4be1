//! Markdown to RSX conversion.
//!
//! Assistant responses arrive as Markdown; this walks the pulldown-cmark
//! event stream and builds a tree of Dioxus elements from it. A stack of
//! opening tags is kept alongside the child stack so containers that carry
//! data at their start (link targets, image sources, list numbering, fence
//! info) can be rebuilt when they close.

use dioxus::prelude::*;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

pub fn markdown_to_rsx(md: &str) -> Element {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(md, options);

    // children[0] is the top level; every Start pushes a level, every End
    // pops it and wraps it in the element for the matching tag.
    let mut children: Vec<Vec<Element>> = vec![vec![]];
    let mut open_tags: Vec<Tag> = vec![];

    for event in parser {
        match event {
            Event::Start(tag) => {
                children.push(vec![]);
                open_tags.push(tag);
            }
            Event::End(end) => {
                let inner = children.pop().unwrap_or_default().into_iter();
                let opened = open_tags.pop();
                let node = match end {
                    TagEnd::Paragraph => rsx! {
                        p { {inner} }
                    },
                    TagEnd::Heading(level) => match level {
                        HeadingLevel::H1 => rsx! { h1 { {inner} } },
                        HeadingLevel::H2 => rsx! { h2 { {inner} } },
                        HeadingLevel::H3 => rsx! { h3 { {inner} } },
                        HeadingLevel::H4 => rsx! { h4 { {inner} } },
                        HeadingLevel::H5 => rsx! { h5 { {inner} } },
                        _ => rsx! { h6 { {inner} } },
                    },
                    TagEnd::BlockQuote(_) => rsx! {
                        blockquote { {inner} }
                    },
                    TagEnd::CodeBlock => {
                        let lang = match opened {
                            Some(Tag::CodeBlock(pulldown_cmark::CodeBlockKind::Fenced(info))) => {
                                info.to_string()
                            }
                            _ => String::new(),
                        };
                        rsx! {
                            pre {
                                code { class: "language-{lang}", {inner} }
                            }
                        }
                    }
                    TagEnd::List(ordered) => {
                        if ordered {
                            rsx! {
                                ol { {inner} }
                            }
                        } else {
                            rsx! {
                                ul { {inner} }
                            }
                        }
                    }
                    TagEnd::Item => rsx! {
                        li { {inner} }
                    },
                    TagEnd::Table => rsx! {
                        table { {inner} }
                    },
                    TagEnd::TableHead => rsx! {
                        thead { {inner} }
                    },
                    TagEnd::TableRow => rsx! {
                        tr { {inner} }
                    },
                    TagEnd::TableCell => rsx! {
                        td { {inner} }
                    },
                    TagEnd::Emphasis => rsx! {
                        em { {inner} }
                    },
                    TagEnd::Strong => rsx! {
                        strong { {inner} }
                    },
                    TagEnd::Strikethrough => rsx! {
                        del { {inner} }
                    },
                    TagEnd::Link => {
                        let href = match opened {
                            Some(Tag::Link { dest_url, .. }) => dest_url.to_string(),
                            _ => String::new(),
                        };
                        rsx! {
                            a { href: "{href}", target: "_blank", {inner} }
                        }
                    }
                    TagEnd::Image => {
                        let src = match opened {
                            Some(Tag::Image { dest_url, .. }) => dest_url.to_string(),
                            _ => String::new(),
                        };
                        rsx! {
                            img { src: "{src}" }
                        }
                    }
                    // anything unhandled renders as a bare container
                    _ => rsx! {
                        div { {inner} }
                    },
                };
                if let Some(level) = children.last_mut() {
                    level.push(node);
                }
            }
            Event::Text(text) => {
                if let Some(level) = children.last_mut() {
                    level.push(rsx! { "{text}" });
                }
            }
            Event::Code(code) => {
                if let Some(level) = children.last_mut() {
                    level.push(rsx! {
                        code { "{code}" }
                    });
                }
            }
            Event::Rule => {
                if let Some(level) = children.last_mut() {
                    level.push(rsx! {
                        hr {}
                    });
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(level) = children.last_mut() {
                    level.push(rsx! {
                        br {}
                    });
                }
            }
            // raw HTML, footnotes and task markers are dropped
            _ => {}
        }
    }

    let flattened = children.into_iter().flatten();
    rsx! {
        div { class: "markdown", {flattened} }
    }
}
