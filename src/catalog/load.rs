use serde::Deserialize;

use crate::config::CatalogSettings;

use super::model::{Catalog, CatalogError, Track};

const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

impl Catalog {
    /// Parse a catalog from TOML made of `[[tracks]]` tables.
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.tracks)
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Use the configured tracks when there are any, the builtin list otherwise.
    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        if settings.tracks.is_empty() {
            tracing::debug!("no tracks configured, using builtin catalog");
            Self::builtin()
        } else {
            tracing::debug!(count = settings.tracks.len(), "using configured catalog");
            Self::new(settings.tracks.clone())
        }
    }
}
