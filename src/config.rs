use serde::{de::Visitor, Deserialize};
use std::{
    ops::Deref,
    path::{Path, PathBuf},
};
use url::Url;

use crate::asset::AssetResolver;
use crate::model::Error;

#[derive(Deserialize, Debug)]
pub struct SourceConfig {
    /// JSON export of post records.
    pub snapshot_file: ValidPath,
    pub project_id: String,
    pub dataset: String,
    /// Image CDN, `https://cdn.sanity.io/` when unset.
    #[serde(default)]
    pub cdn: Option<Url>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            excerpt_chars: default_excerpt_chars(),
            recent_count: default_recent_count(),
        }
    }
}

const DEFAULT_CDN: &str = "https://cdn.sanity.io/";

fn default_excerpt_chars() -> usize {
    250
}

fn default_recent_count() -> usize {
    5
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Ok(toml::from_str(&text)?)
    }

    pub fn assets(&self) -> Result<AssetResolver, Error> {
        let cdn = match &self.source.cdn {
            Some(cdn) => cdn.clone(),
            None => Url::parse(DEFAULT_CDN)?,
        };
        Ok(AssetResolver::new(&cdn, &self.source.project_id, &self.source.dataset)?)
    }
}

#[derive(Debug)]
pub struct ValidPath(PathBuf);

impl<'de> Deserialize<'de> for ValidPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ValidPathVisitor;
        impl Visitor<'_> for ValidPathVisitor {
            type Value = ValidPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a path to an existing file")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ValidPath(
                    PathBuf::from(v).canonicalize().map_err(E::custom)?,
                ))
            }
        }

        deserializer.deserialize_str(ValidPathVisitor)
    }
}

impl Deref for ValidPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.0.as_path()
    }
}
