use std::path::Path;

use crate::model::network::ListOrder;
use crate::model::record::{self, DbPost};
use crate::model::Error;

/// Read-only access to the post records of the content store.
#[allow(async_fn_in_trait)]
pub trait ContentSource {
    /// `Recent` yields full records newest first; `Chronological` yields only
    /// id, title, slug and date, oldest first.
    async fn list_posts(&self, order: ListOrder) -> Result<Vec<DbPost>, Error>;

    async fn post_by_slug(&self, slug: &str) -> Result<Option<DbPost>, Error>;
}

/// Content source backed by a JSON export of every record.
#[derive(Debug, Default)]
pub struct Snapshot {
    records: Vec<DbPost>,
}

impl Snapshot {
    pub fn new(records: Vec<DbPost>) -> Self {
        let duplicates = record::duplicate_slugs(&records);
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "snapshot has duplicate slugs");
        }
        Snapshot { records }
    }

    pub async fn load(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| Error::io(path, err))?;
        let records: Vec<DbPost> = serde_json::from_slice(&bytes)?;
        tracing::info!(path = %path.display(), records = records.len(), "loaded snapshot");
        Ok(Snapshot::new(records))
    }
}

impl ContentSource for Snapshot {
    async fn list_posts(&self, order: ListOrder) -> Result<Vec<DbPost>, Error> {
        let mut records = match order {
            ListOrder::Recent => self.records.clone(),
            ListOrder::Chronological => self
                .records
                .iter()
                .map(|record| DbPost {
                    id: record.id.clone(),
                    title: record.title.clone(),
                    slug: record.slug.clone(),
                    published_at: record.published_at,
                    ..DbPost::default()
                })
                .collect(),
        };

        match order {
            ListOrder::Recent => records.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
            ListOrder::Chronological => records.sort_by_key(|record| record.published_at),
        }

        Ok(records)
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<DbPost>, Error> {
        Ok(self
            .records
            .iter()
            .find(|record| record.slug() == Some(slug))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, text_block};
    use serde_json::Value;

    fn snapshot() -> Snapshot {
        let records = Value::Array(vec![
            record("b", "2025-02-01T00:00:00Z", &["Film"], vec![text_block("b")]),
            record("a", "2025-01-01T00:00:00Z", &["Film"], vec![text_block("a")]),
            record("c", "2025-03-01T00:00:00Z", &["Kids"], vec![text_block("c")]),
        ]);
        Snapshot::new(serde_json::from_value(records).unwrap())
    }

    fn slugs(records: &[DbPost]) -> Vec<&str> {
        records.iter().filter_map(DbPost::slug).collect()
    }

    #[tokio::test]
    async fn recent_is_newest_first_with_bodies() {
        let records = snapshot().list_posts(ListOrder::Recent).await.unwrap();
        assert_eq!(slugs(&records), vec!["c", "b", "a"]);
        assert!(records.iter().all(|record| record.body.is_some()));
    }

    #[tokio::test]
    async fn chronological_is_oldest_first_and_light() {
        let records = snapshot().list_posts(ListOrder::Chronological).await.unwrap();
        assert_eq!(slugs(&records), vec!["a", "b", "c"]);
        assert!(records.iter().all(|record| record.body.is_none()));
        assert!(records.iter().all(|record| record.categories.is_none()));
        assert!(records.iter().all(|record| record.title.is_some()));
    }

    #[tokio::test]
    async fn lookup_by_slug() {
        let source = snapshot();
        let found = source.post_by_slug("b").await.unwrap();
        assert_eq!(found.and_then(|r| r.title), Some("Post b".to_string()));
        assert!(source.post_by_slug("B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_slug_resolves_to_first_record() {
        let mut second = record("a", "2025-02-01T00:00:00Z", &[], vec![]);
        second["title"] = "Second a".into();
        let records = Value::Array(vec![record("a", "2025-01-01T00:00:00Z", &[], vec![]), second]);
        let source = Snapshot::new(serde_json::from_value(records).unwrap());

        let found = source.post_by_slug("a").await.unwrap();
        assert_eq!(found.and_then(|r| r.title), Some("Post a".to_string()));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let records = Value::Array(vec![record("a", "2025-01-01T00:00:00Z", &[], vec![])]);
        std::fs::write(&path, serde_json::to_vec(&records).unwrap()).unwrap();

        let source = Snapshot::load(&path).await.unwrap();
        assert_eq!(source.list_posts(ListOrder::Recent).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Snapshot::load(&path).await, Err(Error::Json(_))));
        assert!(matches!(
            Snapshot::load(&dir.path().join("missing.json")).await,
            Err(Error::Io { .. })
        ));
    }
}
