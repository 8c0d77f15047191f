use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::asset::{AssetRef, AssetResolver};
use crate::body::Document;
use crate::page::{Post, PostSummary};

/// A post as the content source delivers it. Anything may be missing or null.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DbPost {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<DbSlug>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub body: Option<Document>,
    #[serde(default)]
    pub main_image: Option<DbImage>,
    #[serde(default)]
    pub categories: Option<Vec<Option<DbCategory>>>,
    #[serde(default)]
    pub author: Option<DbAuthor>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DbSlug {
    #[serde(default)]
    pub current: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DbImage {
    #[serde(default)]
    pub asset: Option<AssetRef>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DbCategory {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DbAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub enum ValidateError {
    MissingTitle,
    MissingPublished,
    /// Holds the slug derived in its place.
    MissingSlug(String),
    EmptyCategory,
    DuplicateCategory(String),
    DuplicateSlug(String),
}

impl DbPost {
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .and_then(|slug| slug.current.as_deref())
            .filter(|slug| !slug.is_empty())
    }

    pub fn saturate(self, assets: &AssetResolver) -> (Post, Vec<ValidateError>) {
        let mut errors = Vec::new();

        let title = self.title.clone().unwrap_or_else(|| {
            errors.push(ValidateError::MissingTitle);
            String::new()
        });

        let published = self.published_at.unwrap_or_else(|| {
            errors.push(ValidateError::MissingPublished);
            OffsetDateTime::UNIX_EPOCH
        });

        let slug = match self.slug() {
            Some(slug) => slug.to_string(),
            None => {
                let derived = derive_slug(published, &title);
                errors.push(ValidateError::MissingSlug(derived.clone()));
                derived
            }
        };

        let mut categories = IndexSet::new();
        for category in self.categories.into_iter().flatten() {
            match category.and_then(|category| category.title) {
                Some(title) if !title.is_empty() => {
                    if categories.contains(&title) {
                        errors.push(ValidateError::DuplicateCategory(title));
                    } else {
                        categories.insert(title);
                    }
                }
                _ => errors.push(ValidateError::EmptyCategory),
            }
        }

        let post = Post {
            id: self.id,
            title,
            slug,
            published,
            body: self.body.unwrap_or_default(),
            main_image: self
                .main_image
                .and_then(|image| image.asset)
                .and_then(|asset| assets.resolve(&asset)),
            categories: categories.into_iter().collect(),
            author: self.author.and_then(|author| author.name),
        };

        (post, errors)
    }

    /// The navigation subset. A missing date sorts at the epoch and a missing
    /// slug is derived, both as in [`DbPost::saturate`].
    pub fn summarize(&self) -> PostSummary {
        let title = self.title.clone().unwrap_or_default();
        let published = self.published_at.unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let slug = match self.slug() {
            Some(slug) => slug.to_string(),
            None => derive_slug(published, &title),
        };

        PostSummary {
            id: self.id.clone(),
            slug,
            title,
            published,
        }
    }
}

/// One error per slug shared by more than one record. Lookups by slug resolve
/// to the first of them.
pub fn duplicate_slugs(records: &[DbPost]) -> Vec<ValidateError> {
    let mut seen = IndexSet::new();
    let mut duplicates = IndexSet::new();

    for slug in records.iter().filter_map(DbPost::slug) {
        if !seen.insert(slug) {
            duplicates.insert(slug);
        }
    }

    duplicates
        .into_iter()
        .map(|slug| ValidateError::DuplicateSlug(slug.to_string()))
        .collect()
}

fn derive_slug(published: OffsetDateTime, title: &str) -> String {
    let date = published.date();
    slug::slugify(format!(
        "{:04}-{:02}-{:02}-{}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        title
    ))
}
