use serde::{Deserialize, Serialize};
use url::Url;

/// An image asset as it appears in a record: either already dereferenced to a
/// `url`, or a bare `_ref` to be resolved against the CDN.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetRef {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AssetResolver {
    images: Url,
}

impl AssetResolver {
    pub fn new(cdn: &Url, project_id: &str, dataset: &str) -> Result<Self, url::ParseError> {
        let images = cdn.join(&format!("images/{project_id}/{dataset}/"))?;
        Ok(AssetResolver { images })
    }

    /// Returns `None` for empty or unparseable references.
    pub fn resolve(&self, asset: &AssetRef) -> Option<String> {
        if let Some(url) = asset.url.as_deref().filter(|url| !url.is_empty()) {
            return Some(url.to_string());
        }

        let file = image_file_name(asset.reference.as_deref()?)?;
        self.images.join(&file).ok().map(String::from)
    }
}

/// `image-<id>-<W>x<H>-<ext>` becomes `<id>-<W>x<H>.<ext>`.
fn image_file_name(reference: &str) -> Option<String> {
    let rest = reference.strip_prefix("image-")?;
    let (stem, ext) = rest.rsplit_once('-')?;
    let (id, dimensions) = stem.rsplit_once('-')?;

    let (width, height) = dimensions.split_once('x')?;
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if id.is_empty() || ext.is_empty() || !numeric(width) || !numeric(height) {
        return None;
    }

    Some(format!("{id}-{dimensions}.{ext}"))
}
