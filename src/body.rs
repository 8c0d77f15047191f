//! Block-structured rich text, as stored in a post body.
//!
//! A body is an ordered list of blocks. Text blocks carry inline spans, image
//! blocks carry an asset reference, and anything else is kept verbatim so it can
//! be handed back to the presentation layer untouched. Block order drives
//! everything derived here: the plain-text rendering, the gallery and the HTML.

use indexmap::IndexSet;
use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::asset::{AssetRef, AssetResolver};
use crate::page::Html;

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Document(Vec<Block>);

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),

    #[serde(rename = "image")]
    Image(ImageBlock),

    /// Unknown kinds and blocks that failed to decode.
    #[serde(untagged)]
    Other(Value),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(rename = "markDefs", default, skip_serializing_if = "Vec::is_empty")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(rename = "listItem", default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Span {
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<String>,
}

/// Annotation referenced from a span's `marks` by key.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ImageBlock {
    #[serde(rename = "_key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        Ok(Document(raw.into_iter().map(Block::from_value).collect()))
    }
}

impl Block {
    /// Never fails: whatever cannot be understood becomes [`Block::Other`].
    pub fn from_value(value: Value) -> Block {
        let decoded = match value.get("_type").and_then(Value::as_str) {
            Some("block") => TextBlock::deserialize(&value).map(Block::Text),
            Some("image") => ImageBlock::deserialize(&value).map(Block::Image),
            _ => return Block::Other(value),
        };

        decoded.unwrap_or_else(|err| {
            tracing::trace!(%err, "keeping undecodable block as-is");
            Block::Other(value)
        })
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Document(blocks)
    }
}

impl Document {
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every block joined by newlines, trimmed. Non-text blocks join as empty
    /// lines.
    pub fn plain_text(&self) -> String {
        let texts: Vec<String> = self
            .0
            .iter()
            .map(|block| match block {
                Block::Text(text) => text.text(),
                Block::Image(_) | Block::Other(_) => String::new(),
            })
            .collect();

        texts.join("\n").trim().to_string()
    }

    /// Image URLs in block order, each URL kept once.
    pub fn extract_images(&self, assets: &AssetResolver) -> Vec<String> {
        let mut gallery = IndexSet::new();

        for block in &self.0 {
            match block {
                Block::Image(image) => {
                    match image.asset.as_ref().and_then(|asset| assets.resolve(asset)) {
                        Some(url) => {
                            gallery.insert(url);
                        }
                        None => tracing::trace!(key = ?image.key, "image block without asset"),
                    }
                }

                Block::Text(_) => {}

                Block::Other(raw) => {
                    tracing::trace!(kind = ?raw.get("_type"), "skipping block");
                }
            }
        }

        gallery.into_iter().collect()
    }

    /// Renders text blocks to HTML. Images are left to the gallery.
    pub fn render_html(&self) -> Html {
        let mut events = Vec::new();
        let mut open_list: Option<bool> = None;

        for block in &self.0 {
            let Block::Text(text) = block else {
                continue;
            };

            let ordered = text.list_item.as_deref().map(|kind| kind == "number");
            if ordered != open_list {
                if let Some(was_ordered) = open_list {
                    events.push(Event::End(TagEnd::List(was_ordered)));
                }
                if let Some(ordered) = ordered {
                    events.push(Event::Start(Tag::List(ordered.then_some(1))));
                }
                open_list = ordered;
            }

            text.push_events(&mut events);
        }

        if let Some(was_ordered) = open_list {
            events.push(Event::End(TagEnd::List(was_ordered)));
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        Html(html)
    }
}

enum Container {
    Paragraph,
    Heading(HeadingLevel),
    Quote,
    Item,
}

enum Mark<'a> {
    Strong,
    Emphasis,
    Strikethrough,
    Link(&'a str),
}

impl<'a> Mark<'a> {
    fn start(&self) -> Event<'a> {
        Event::Start(match self {
            Mark::Strong => Tag::Strong,
            Mark::Emphasis => Tag::Emphasis,
            Mark::Strikethrough => Tag::Strikethrough,
            Mark::Link(href) => Tag::Link {
                link_type: LinkType::Inline,
                dest_url: CowStr::Borrowed(href),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            },
        })
    }

    fn end(&self) -> Event<'a> {
        Event::End(match self {
            Mark::Strong => TagEnd::Strong,
            Mark::Emphasis => TagEnd::Emphasis,
            Mark::Strikethrough => TagEnd::Strikethrough,
            Mark::Link(_) => TagEnd::Link,
        })
    }
}

impl TextBlock {
    /// Span texts concatenated; spans without text count as empty.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map(|span| span.text.as_deref().unwrap_or(""))
            .collect()
    }

    fn container(&self) -> Container {
        if self.list_item.is_some() {
            return Container::Item;
        }

        match self.style.as_deref() {
            Some("h1") => Container::Heading(HeadingLevel::H1),
            Some("h2") => Container::Heading(HeadingLevel::H2),
            Some("h3") => Container::Heading(HeadingLevel::H3),
            Some("h4") => Container::Heading(HeadingLevel::H4),
            Some("h5") => Container::Heading(HeadingLevel::H5),
            Some("h6") => Container::Heading(HeadingLevel::H6),
            Some("blockquote") => Container::Quote,
            _ => Container::Paragraph,
        }
    }

    fn mark<'a>(&'a self, name: &'a str) -> Option<Mark<'a>> {
        match name {
            "strong" => Some(Mark::Strong),
            "em" => Some(Mark::Emphasis),
            "strike-through" => Some(Mark::Strikethrough),
            _ => self
                .mark_defs
                .iter()
                .find(|def| def.key == name && def.kind == "link")
                .and_then(|def| def.href.as_deref())
                .map(Mark::Link),
        }
    }

    fn push_events<'a>(&'a self, events: &mut Vec<Event<'a>>) {
        let container = self.container();
        events.push(match container {
            Container::Paragraph => Event::Start(Tag::Paragraph),
            Container::Heading(level) => Event::Start(Tag::Heading {
                level,
                id: None,
                classes: Vec::new(),
                attrs: Vec::new(),
            }),
            Container::Quote => Event::Html(CowStr::Borrowed("<blockquote>")),
            Container::Item => Event::Start(Tag::Item),
        });

        for span in &self.children {
            let text = span.text.as_deref().unwrap_or("");
            if text.is_empty() {
                continue;
            }

            let marks: Vec<Mark> = span
                .marks
                .iter()
                .filter_map(|name| self.mark(name))
                .collect();

            events.extend(marks.iter().map(Mark::start));
            if span.marks.iter().any(|name| name == "code") {
                events.push(Event::Code(CowStr::Borrowed(text)));
            } else {
                events.push(Event::Text(CowStr::Borrowed(text)));
            }
            events.extend(marks.iter().rev().map(Mark::end));
        }

        events.push(match container {
            Container::Paragraph => Event::End(TagEnd::Paragraph),
            Container::Heading(level) => Event::End(TagEnd::Heading(level)),
            Container::Quote => Event::Html(CowStr::Borrowed("</blockquote>\n")),
            Container::Item => Event::End(TagEnd::Item),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn resolver() -> AssetResolver {
        let cdn = Url::parse("https://cdn.sanity.io/").unwrap();
        AssetResolver::new(&cdn, "p", "d").unwrap()
    }

    fn text(spans: &[&str]) -> Value {
        json!({
            "_type": "block",
            "style": "normal",
            "children": spans
                .iter()
                .map(|text| json!({ "_type": "span", "text": text }))
                .collect::<Vec<_>>(),
        })
    }

    fn image(url: &str) -> Value {
        json!({ "_type": "image", "asset": { "url": url } })
    }

    fn doc(blocks: Vec<Value>) -> Document {
        serde_json::from_value(Value::Array(blocks)).unwrap()
    }

    #[test]
    fn empty_document() {
        let document = doc(vec![]);
        assert_eq!(document.plain_text(), "");
        assert!(document.extract_images(&resolver()).is_empty());
        assert_eq!(document.render_html(), Html(String::new()));
    }

    #[test]
    fn plain_text_joins_blocks_and_trims() {
        let document = doc(vec![
            text(&["  Hello, ", "world"]),
            image("https://img/1.jpg"),
            text(&["Second"]),
            text(&[]),
            text(&["Third  "]),
        ]);
        assert_eq!(document.plain_text(), "Hello, world\n\nSecond\n\nThird");
    }

    #[test]
    fn non_text_blocks_join_as_empty_lines() {
        let document = doc(vec![
            text(&["a"]),
            image("https://img/1.jpg"),
            json!({ "_type": "youtube", "url": "https://yt/x" }),
            text(&["b"]),
        ]);
        assert_eq!(document.plain_text(), "a\n\n\nb");

        let leading = doc(vec![image("https://img/1.jpg"), text(&["only"])]);
        assert_eq!(leading.plain_text(), "only");
    }

    #[test]
    fn span_without_text_is_empty() {
        let document = doc(vec![json!({
            "_type": "block",
            "children": [{ "_type": "inlineWidget" }, { "_type": "span", "text": "x" }],
        })]);
        assert_eq!(document.plain_text(), "x");
    }

    #[test]
    fn images_keep_block_order_and_dedupe() {
        let document = doc(vec![
            image("https://img/b.jpg"),
            text(&["between"]),
            image("https://img/a.jpg"),
            image("https://img/b.jpg"),
            image("https://img/b.jpg"),
        ]);
        let gallery = document.extract_images(&resolver());
        assert_eq!(gallery, vec!["https://img/b.jpg", "https://img/a.jpg"]);
        assert_eq!(document.extract_images(&resolver()), gallery);
    }

    #[test]
    fn images_resolve_references() {
        let document = doc(vec![json!({
            "_type": "image",
            "asset": { "_ref": "image-abc-10x20-png", "_type": "reference" },
        })]);
        assert_eq!(
            document.extract_images(&resolver()),
            vec!["https://cdn.sanity.io/images/p/d/abc-10x20.png"]
        );
    }

    #[test]
    fn malformed_and_unknown_blocks_are_skipped() {
        let document = doc(vec![
            json!({ "_type": "youtube", "url": "https://yt/x" }),
            json!({ "_type": "image" }),
            json!({ "_type": "image", "asset": { "_ref": "garbage" } }),
            json!({ "_type": "block", "children": "not a list" }),
            json!("just a string"),
            text(&["kept"]),
        ]);
        assert_eq!(document.plain_text(), "kept");
        assert!(document.extract_images(&resolver()).is_empty());
        assert!(matches!(document.blocks()[0], Block::Other(_)));
        assert!(matches!(document.blocks()[3], Block::Other(_)));
    }

    #[test]
    fn unknown_blocks_serialize_verbatim() {
        let raw = json!({ "_type": "youtube", "url": "https://yt/x" });
        let document = doc(vec![raw.clone(), text(&["a"])]);
        let back = serde_json::to_value(&document).unwrap();
        assert_eq!(back[0], raw);
        assert_eq!(back[1]["_type"], "block");
        assert_eq!(back[1]["children"][0]["text"], "a");
    }

    #[test]
    fn render_styles_and_marks() {
        let document = doc(vec![
            json!({
                "_type": "block",
                "style": "h2",
                "children": [{ "_type": "span", "text": "Title" }],
            }),
            json!({
                "_type": "block",
                "style": "normal",
                "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://a.b/" }],
                "children": [
                    { "_type": "span", "text": "bold", "marks": ["strong"] },
                    { "_type": "span", "text": " & " },
                    { "_type": "span", "text": "site", "marks": ["l1", "em"] },
                    { "_type": "span", "text": "x<y", "marks": ["code"] },
                ],
            }),
            image("https://img/a.jpg"),
        ]);

        let Html(html) = document.render_html();
        assert!(html.contains("<h2>Title</h2>"), "{html}");
        assert!(html.contains("<strong>bold</strong>"), "{html}");
        assert!(html.contains(" &amp; "), "{html}");
        assert!(html.contains(r#"<a href="https://a.b/"><em>site</em></a>"#), "{html}");
        assert!(html.contains("<code>x&lt;y</code>"), "{html}");
        assert!(!html.contains("img/a.jpg"), "{html}");
    }

    #[test]
    fn render_groups_list_items() {
        let item = |kind: &str, text: &str| {
            json!({
                "_type": "block",
                "listItem": kind,
                "level": 1,
                "children": [{ "_type": "span", "text": text }],
            })
        };
        let document = doc(vec![
            item("bullet", "a"),
            item("bullet", "b"),
            item("number", "one"),
            text(&["after"]),
        ]);

        let Html(html) = document.render_html();
        assert_eq!(html.matches("<ul>").count(), 1, "{html}");
        assert_eq!(html.matches("</ul>").count(), 1, "{html}");
        assert_eq!(html.matches("<ol>").count(), 1, "{html}");
        assert!(html.contains("<li>a</li>"), "{html}");
        assert!(html.contains("<li>one</li>"), "{html}");
        assert!(html.ends_with("<p>after</p>\n"), "{html}");
    }

    #[test]
    fn render_blockquote() {
        let document = doc(vec![json!({
            "_type": "block",
            "style": "blockquote",
            "children": [{ "_type": "span", "text": "quoted" }],
        })]);
        let Html(html) = document.render_html();
        assert_eq!(html, "<blockquote>quoted</blockquote>\n");
    }
}
