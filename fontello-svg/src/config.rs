use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A Fontello `config.json` file.
///
/// Only the fields needed to locate glyph artwork are read, everything else is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct FontelloConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub css_prefix_text: Option<String>,
    pub glyphs: Vec<GlyphConfigEntry>,
}
impl FontelloConfig {
    /// Parses a config from its JSON text. `path` is only used for error reporting.
    pub fn parse(path: &Path, data: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(data)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Reads and parses a config file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from '{}'...", path.display());
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::parse(path, &data)
    }
}

/// A single glyph selected in the Fontello web interface.
#[derive(Clone, Debug, Deserialize)]
pub struct GlyphConfigEntry {
    #[serde(default)]
    pub uid: Option<String>,
    /// The glyph name, also used as its CSS class suffix.
    #[serde(alias = "name")]
    pub css: String,
    #[serde(default)]
    pub code: Option<u32>,
    /// The collection the glyph comes from, such as `fontawesome` or `custom_icons`.
    #[serde(alias = "collection")]
    pub src: String,
    #[serde(default = "default_selected")]
    pub selected: bool,
    #[serde(default)]
    pub svg: Option<EmbeddedSvg>,
}

fn default_selected() -> bool {
    true
}

/// The outline of a user-uploaded glyph, drawn on a 1000 unit em square.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EmbeddedSvg {
    pub path: String,
    pub width: f64,
}

/// An ordered mapping from color labels to fill values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorMap(Vec<(String, String)>);
impl ColorMap {
    pub fn new() -> Self {
        ColorMap(Vec::new())
    }

    /// A map containing only `black: #000000`.
    pub fn black() -> Self {
        let mut map = ColorMap::new();
        map.insert("black", "#000000");
        map
    }

    /// Adds a color. Reusing a label replaces its value but keeps its original position.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let label = label.into();
        let value = value.into();
        match self.0.iter_mut().find(|(x, _)| *x == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.iter().find(|(x, _)| x == label).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColorMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ColorMap::new();
        for (label, value) in iter {
            map.insert(label, value);
        }
        map
    }
}
