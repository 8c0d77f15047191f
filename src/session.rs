//! Page loading over a content source, and the per-article viewer session.

use serde::Serialize;

use crate::assemble::{self, DetailPage, ListingPage};
use crate::asset::AssetResolver;
use crate::config::ListingConfig;
use crate::gallery::GalleryViewer;
use crate::model::network::{ListOrder, PageQuery};
use crate::model::record::DbPost;
use crate::model::Error;
use crate::page::{sort_chronological, sort_recent, Post, PostSummary};
use crate::source::ContentSource;

/// What the presentation layer shows. A failed fetch or a missing post stays
/// `Loading`; nothing retries.
#[derive(Serialize, Debug)]
#[serde(tag = "status", content = "page", rename_all = "lowercase")]
pub enum View<T> {
    Loading,
    Ready(T),
}

impl<T> View<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            View::Ready(page) => Some(page),
            View::Loading => None,
        }
    }
}

pub struct Site<S> {
    source: S,
    assets: AssetResolver,
    listing: ListingConfig,
}

impl<S: ContentSource> Site<S> {
    pub fn new(source: S, assets: AssetResolver, listing: ListingConfig) -> Self {
        Site {
            source,
            assets,
            listing,
        }
    }

    pub async fn listing(&self, query: &PageQuery) -> View<ListingPage> {
        let posts = match self.recent_posts().await {
            Ok(posts) => posts,
            Err(err) => {
                tracing::warn!(%err, "listing fetch failed");
                return View::Loading;
            }
        };

        ready(assemble::listing(
            &posts,
            query.category.as_deref(),
            &self.listing,
        ))
    }

    /// Sidebar and navigation fetches degrade to empty collections; only the
    /// post itself decides whether the page is ready.
    pub async fn detail(&self, slug: &str, query: &PageQuery) -> View<DetailPage> {
        let (post, posts, navigation) = tokio::join!(
            self.source.post_by_slug(slug),
            self.recent_posts(),
            self.navigation(),
        );

        let post = match post {
            Ok(Some(record)) => self.saturate(record),
            Ok(None) => {
                tracing::info!(slug, "post not found");
                return View::Loading;
            }
            Err(err) => {
                tracing::warn!(%err, slug, "post fetch failed");
                return View::Loading;
            }
        };

        let posts = posts.unwrap_or_else(|err| {
            tracing::warn!(%err, "sidebar fetch failed");
            Vec::new()
        });
        let navigation = navigation.unwrap_or_else(|err| {
            tracing::warn!(%err, "navigation fetch failed");
            Vec::new()
        });

        ready(assemble::detail(
            &post,
            &posts,
            &navigation,
            query.category.as_deref(),
            &self.listing,
            &self.assets,
        ))
    }

    async fn recent_posts(&self) -> Result<Vec<Post>, Error> {
        let records = self.source.list_posts(ListOrder::Recent).await?;
        let mut posts: Vec<Post> = records
            .into_iter()
            .map(|record| self.saturate(record))
            .collect();
        sort_recent(&mut posts);
        Ok(posts)
    }

    async fn navigation(&self) -> Result<Vec<PostSummary>, Error> {
        let records = self.source.list_posts(ListOrder::Chronological).await?;
        let mut summaries: Vec<PostSummary> =
            records.iter().map(DbPost::summarize).collect();
        sort_chronological(&mut summaries);
        Ok(summaries)
    }

    fn saturate(&self, record: DbPost) -> Post {
        let (post, errors) = record.saturate(&self.assets);
        if !errors.is_empty() {
            tracing::warn!(slug = %post.slug, ?errors, "record has problems");
        }
        post
    }
}

fn ready<T>(page: Result<T, Error>) -> View<T> {
    match page {
        Ok(page) => View::Ready(page),
        Err(err) => {
            tracing::warn!(%err, "could not assemble page");
            View::Loading
        }
    }
}

/// The article currently on screen and the gallery viewer that belongs to it.
#[derive(Debug, Default)]
pub struct DetailSession {
    slug: Option<String>,
    viewer: GalleryViewer,
}

impl DetailSession {
    /// Switching to another post reloads the viewer, which closes it. Showing
    /// the same post again keeps the viewer as it is.
    pub fn show(&mut self, page: &DetailPage) {
        if self.slug.as_deref() == Some(page.slug.as_str()) {
            return;
        }

        self.slug = Some(page.slug.clone());
        self.viewer.load(page.gallery.clone());
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn viewer(&self) -> &GalleryViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut GalleryViewer {
        &mut self.viewer
    }
}
