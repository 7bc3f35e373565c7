use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "bloom.json";

/// Top-level bloom.json schema.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloomConfig {
    #[serde(default)]
    pub image: ImageHost,

    #[serde(default)]
    pub math: MathSettings,

    #[serde(default)]
    pub fences: FenceSettings,
}

/// Where published images are served from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHost {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub base_url_path: String,
}

impl Default for ImageHost {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: None,
            base_url_path: String::new(),
        }
    }
}

fn default_scheme() -> String {
    "http".to_string()
}

impl ImageHost {
    /// Public URL for an image file belonging to `article`.
    ///
    /// Only the file name of `uri` is kept; any local directory part is dropped.
    pub fn public_url(&self, article: &str, uri: &str) -> Result<String> {
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .context("image.host is not set in bloom.json")?;
        let file_name = uri.rsplit(['/', '\\']).next().unwrap_or(uri);

        let mut path = String::new();
        for segment in [self.base_url_path.as_str(), article, file_name] {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                path.push('/');
                path.push_str(segment);
            }
        }
        Ok(format!("{}://{}{}", self.scheme, host, path))
    }
}

/// Math block rewriting.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathSettings {
    #[serde(default = "default_newline_replacement")]
    pub newline_replacement: String,
}

impl Default for MathSettings {
    fn default() -> Self {
        Self {
            newline_replacement: default_newline_replacement(),
        }
    }
}

fn default_newline_replacement() -> String {
    r"\newline".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FenceSettings {
    #[serde(default)]
    pub lenient: bool,
}

/// Load config from `explicit`, or from bloom.json in `dir`.
///
/// An explicitly named file must exist; the implicit one falls back to defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<BloomConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                log::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
                return Ok(BloomConfig::default());
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: BloomConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}
