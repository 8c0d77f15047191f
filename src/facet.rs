use indexmap::{IndexMap, IndexSet};

use crate::page::Post;

/// Counts posts per category title, in order of first appearance.
///
/// A post counts once per distinct title, however often it lists it. Empty
/// titles are ignored.
pub fn aggregate<'p>(posts: impl IntoIterator<Item = &'p Post>) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();

    for post in posts {
        let distinct: IndexSet<&str> = post
            .categories
            .iter()
            .map(String::as_str)
            .filter(|title| !title.is_empty())
            .collect();

        for title in distinct {
            *counts.entry(title.to_string()).or_insert(0) += 1;
        }
    }

    counts
}

/// Posts tagged with exactly `title` (case-sensitive), order preserved.
pub fn filter_by_category<'p>(posts: &'p [Post], title: &str) -> Vec<&'p Post> {
    posts.iter().filter(|post| post.in_category(title)).collect()
}
