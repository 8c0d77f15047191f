use serde::Serialize;
use time::OffsetDateTime;

use crate::body::Document;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct Html(pub String);

/// A post after saturation: every field the pipeline relies on is present.
#[derive(Serialize, Clone, Debug)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
    pub body: Document,
    pub main_image: Option<String>,
    /// Distinct, non-empty category titles in authored order.
    pub categories: Vec<String>,
    pub author: Option<String>,
}

impl Post {
    pub fn in_category(&self, title: &str) -> bool {
        self.categories.iter().any(|category| category == title)
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            published: self.published,
        }
    }
}

/// Lightweight entry of the navigation context.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
}

/// Anything that can be located by slug in an ordered collection.
pub trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for Post {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for PostSummary {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// Sorts newest first, the listing order.
pub fn sort_recent<T: Published>(items: &mut [T]) {
    items.sort_by(|a, b| b.published().cmp(&a.published()));
}

/// Sorts oldest first, the navigation order.
pub fn sort_chronological<T: Published>(items: &mut [T]) {
    items.sort_by_key(|item| item.published());
}

pub trait Published {
    fn published(&self) -> OffsetDateTime;
}

impl Published for Post {
    fn published(&self) -> OffsetDateTime {
        self.published
    }
}

impl Published for PostSummary {
    fn published(&self) -> OffsetDateTime {
        self.published
    }
}
