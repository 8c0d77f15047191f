use serde::{Deserialize, Serialize};

use crate::model::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListOrder {
    /// Newest first, full records.
    Recent,
    /// Oldest first, navigation subset only.
    Chronological,
}

/// Page-level navigation state carried in links.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PageQuery {
    pub fn category(category: Option<&str>) -> Self {
        PageQuery {
            category: category.map(str::to_string),
        }
    }

    pub fn from_query_str(query: &str) -> Result<Self, Error> {
        Ok(serde_urlencoded::from_str(query)?)
    }

    /// `path` with this query appended, or `path` alone when there is nothing
    /// to carry.
    pub fn href(&self, path: &str) -> Result<String, Error> {
        let query = serde_urlencoded::to_string(self)?;
        if query.is_empty() {
            Ok(path.to_string())
        } else {
            Ok(format!("{path}?{query}"))
        }
    }
}

/// Link target for the previous/next buttons and sidebar lists.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PostStub {
    pub slug: String,
    pub title: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
