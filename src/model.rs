use std::path::PathBuf;

pub mod network;
pub mod record;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid cdn url: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not build link: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    #[error("invalid query: {0}")]
    QueryParse(#[from] serde_urlencoded::de::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
