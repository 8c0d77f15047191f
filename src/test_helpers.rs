//! Shared fixtures for unit tests.

use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::body::Document;
use crate::page::Post;

/// A post published `day` days after the epoch, with a one-line body.
pub fn post(slug: &str, day: i64, categories: &[&str]) -> Post {
    Post {
        id: format!("id-{slug}"),
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        published: OffsetDateTime::UNIX_EPOCH + time::Duration::days(day),
        body: body(vec![text_block(&format!("Body of {slug}"))]),
        main_image: None,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        author: None,
    }
}

pub fn body(blocks: Vec<Value>) -> Document {
    serde_json::from_value(Value::Array(blocks)).unwrap()
}

pub fn text_block(text: &str) -> Value {
    json!({ "_type": "block", "children": [{ "_type": "span", "text": text }] })
}

pub fn image_block(url: &str) -> Value {
    json!({ "_type": "image", "asset": { "url": url } })
}

/// The record wire shape, as a content snapshot would hold it.
pub fn record(slug: &str, published: &str, categories: &[&str], blocks: Vec<Value>) -> Value {
    json!({
        "_id": format!("id-{slug}"),
        "title": format!("Post {slug}"),
        "slug": { "current": slug },
        "publishedAt": published,
        "body": blocks,
        "categories": categories.iter().map(|title| json!({ "title": title })).collect::<Vec<_>>(),
        "author": { "name": "Redakcja" },
    })
}
