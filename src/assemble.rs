//! View models for the listing and article pages.

use serde::Serialize;
use time::{macros::format_description, OffsetDateTime};

use crate::asset::AssetResolver;
use crate::body::Document;
use crate::config::ListingConfig;
use crate::facet;
use crate::model::network::{PageQuery, PostStub};
use crate::model::Error;
use crate::navigation;
use crate::page::{Html, Post, PostSummary};

pub const ELLIPSIS: &str = "...";

/// Cuts `text` after `budget` characters and marks the cut. Text that already
/// fits is returned unchanged.
pub fn excerpt(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FacetEntry {
    /// `None` for the entry covering all posts.
    pub category: Option<String>,
    pub count: usize,
    pub active: bool,
    pub href: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
    pub date: String,
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub main_image: Option<String>,
    pub excerpt: String,
    pub href: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct ListingPage {
    pub selected_category: Option<String>,
    pub posts: Vec<PostCard>,
    pub facets: Vec<FacetEntry>,
    pub recent: Vec<PostStub>,
}

#[derive(Serialize, Clone, Debug)]
pub struct DetailPage {
    pub slug: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
    pub date: String,
    pub categories: Vec<String>,
    pub author: Option<String>,
    pub main_image: Option<String>,
    pub body: Document,
    pub html: Html,
    pub gallery: Vec<String>,
    pub previous: Option<PostStub>,
    pub next: Option<PostStub>,
    pub facets: Vec<FacetEntry>,
    pub recent: Vec<PostStub>,
}

/// Builds the listing from newest-first `posts`.
pub fn listing(
    posts: &[Post],
    selected: Option<&str>,
    config: &ListingConfig,
) -> Result<ListingPage, Error> {
    let query = PageQuery::category(selected);

    let shown: Vec<&Post> = match selected {
        Some(title) => facet::filter_by_category(posts, title),
        None => posts.iter().collect(),
    };

    let cards = shown
        .into_iter()
        .map(|post| {
            Ok(PostCard {
                slug: post.slug.clone(),
                title: post.title.clone(),
                published: post.published,
                date: display_date(post.published),
                categories: post.categories.clone(),
                author: post.author.clone(),
                main_image: post.main_image.clone(),
                excerpt: excerpt(&post.body.plain_text(), config.excerpt_chars),
                href: query.href(&post_path(&post.slug))?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    tracing::debug!(
        total = posts.len(),
        shown = cards.len(),
        category = selected,
        "assembled listing"
    );

    Ok(ListingPage {
        selected_category: selected.map(str::to_string),
        posts: cards,
        facets: facets(posts, selected)?,
        recent: recent(posts, config.recent_count),
    })
}

/// Builds the article page. `posts` is the whole newest-first collection and
/// only feeds the sidebar; `navigation` is oldest-first.
pub fn detail(
    post: &Post,
    posts: &[Post],
    navigation: &[PostSummary],
    selected: Option<&str>,
    config: &ListingConfig,
    assets: &AssetResolver,
) -> Result<DetailPage, Error> {
    let neighbors = navigation::locate(navigation, &post.slug);
    let gallery = post.body.extract_images(assets);

    tracing::debug!(
        slug = %post.slug,
        images = gallery.len(),
        previous = neighbors.previous.map(|p| p.slug.as_str()),
        next = neighbors.next.map(|p| p.slug.as_str()),
        "assembled detail"
    );

    Ok(DetailPage {
        slug: post.slug.clone(),
        title: post.title.clone(),
        published: post.published,
        date: display_date(post.published),
        categories: post.categories.clone(),
        author: post.author.clone(),
        main_image: post.main_image.clone(),
        body: post.body.clone(),
        html: post.body.render_html(),
        gallery,
        previous: neighbors.previous.map(summary_stub),
        next: neighbors.next.map(summary_stub),
        facets: facets(posts, selected)?,
        recent: recent(posts, config.recent_count),
    })
}

/// The "all posts" entry followed by one entry per category.
pub fn facets(posts: &[Post], selected: Option<&str>) -> Result<Vec<FacetEntry>, Error> {
    let mut entries = vec![FacetEntry {
        category: None,
        count: posts.len(),
        active: selected.is_none(),
        href: "/".to_string(),
    }];

    for (title, count) in facet::aggregate(posts) {
        entries.push(FacetEntry {
            active: selected == Some(title.as_str()),
            href: PageQuery::category(Some(&title)).href("/")?,
            category: Some(title),
            count,
        });
    }

    Ok(entries)
}

fn recent(posts: &[Post], count: usize) -> Vec<PostStub> {
    posts
        .iter()
        .take(count)
        .map(|post| PostStub {
            slug: post.slug.clone(),
            title: post.title.clone(),
            href: post_path(&post.slug),
            image: post.main_image.clone(),
        })
        .collect()
}

fn summary_stub(summary: &PostSummary) -> PostStub {
    PostStub {
        slug: summary.slug.clone(),
        title: summary.title.clone(),
        href: post_path(&summary.slug),
        image: None,
    }
}

fn post_path(slug: &str) -> String {
    format!("/post/{slug}")
}

fn display_date(published: OffsetDateTime) -> String {
    let format = format_description!("[day].[month].[year]");
    published
        .date()
        .format(&format)
        .unwrap_or_else(|_| published.date().to_string())
}
