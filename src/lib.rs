//! Content pipeline for a small editorial blog.
//!
//! Post records come from a content store whose bodies are block-structured
//! rich text. From them the crate derives what the two pages need:
//!
//! - the listing: post cards with plain-text excerpts, category facets, and a
//!   recent-posts sidebar ([`assemble::listing`]);
//! - the article: rendered body, the image gallery pulled out of the body,
//!   previous/next links in publication order ([`assemble::detail`]);
//! - the modal gallery viewer driven by the reader ([`gallery::GalleryViewer`]).
//!
//! Everything past the fetch in [`source`] is synchronous and pure.

pub mod assemble;
pub mod asset;
pub mod body;
pub mod config;
pub mod facet;
pub mod gallery;
pub mod model;
pub mod navigation;
pub mod page;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
