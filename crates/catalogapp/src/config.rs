//! # Configuration
//!
//! Catalog configuration is a typed [`confique`] struct, loaded in layers.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Environment variables**: `CATALOG_STORE_URL`, `CATALOG_STORE_KEY`, ...
//! 2. **Explicit file**: the path given with `--config`.
//! 3. **Working directory**: `./catalog.toml`.
//! 4. **User config**: OS-appropriate config directory (via `directories`).
//! 5. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Env |
//! |-----|---------|-----|
//! | `store.backend` | `rest` | `CATALOG_STORE_BACKEND` |
//! | `store.url` | – | `CATALOG_STORE_URL` |
//! | `store.api_key` | – | `CATALOG_STORE_KEY` |
//! | `store.table` | `products` | `CATALOG_STORE_TABLE` |
//! | `store.file` | – | `CATALOG_STORE_FILE` |
//! | `store.timeout_secs` | `30` | – |
//! | `artifact.path` | `src/data/products.ts` | `CATALOG_ARTIFACT` |
//! | `artifact.header` | `export const products: Product[] =` | – |
//! | `artifact.terminator` | `];` | – |
//! | `categories.aliases` | `{ accessories = "accessory" }` | – |
//! | `categories.known` | – (no closed set) | – |
//!
//! Credentials are passed through to the store untouched; nothing here
//! validates them.

use crate::error::{CatalogError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "catalog.toml";

/// Which [`crate::store::RemoteStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Rest,
    File,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    #[config(nested)]
    pub store: StoreConfig,

    #[config(nested)]
    pub artifact: ArtifactConfig,

    #[config(nested)]
    pub categories: CategoryConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// "rest" for a PostgREST endpoint, "file" for a local JSON table.
    #[config(env = "CATALOG_STORE_BACKEND", default = "rest")]
    pub backend: String,

    /// Base URL of the PostgREST service (without `/rest/v1`).
    #[config(env = "CATALOG_STORE_URL")]
    pub url: Option<String>,

    #[config(env = "CATALOG_STORE_KEY")]
    pub api_key: Option<String>,

    #[config(env = "CATALOG_STORE_TABLE", default = "products")]
    pub table: String,

    /// JSON file used by the "file" backend.
    #[config(env = "CATALOG_STORE_FILE")]
    pub file: Option<PathBuf>,

    #[config(default = 30)]
    pub timeout_secs: u64,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArtifactConfig {
    /// The source file embedding the product list.
    #[config(env = "CATALOG_ARTIFACT", default = "src/data/products.ts")]
    pub path: PathBuf,

    /// Token opening the declaration block.
    #[config(default = "export const products: Product[] =")]
    pub header: String,

    /// Token closing the declaration block. Only matched at the start of a line.
    #[config(default = "];")]
    pub terminator: String,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CategoryConfig {
    /// Closed set of canonical tags. Categories outside it are reported as warnings.
    pub known: Option<Vec<String>>,

    /// Extra or replacement aliases, keyed by lower-cased raw value.
    /// When absent, the built-in table is used.
    pub aliases: Option<BTreeMap<String, String>>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "rest".to_string(),
            url: None,
            api_key: None,
            table: "products".to_string(),
            file: None,
            timeout_secs: 30,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("src/data/products.ts"),
            header: "export const products: Product[] =".to_string(),
            terminator: "];".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            artifact: ArtifactConfig::default(),
            categories: CategoryConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Resolve configuration from env, an optional explicit file, the working
    /// directory and the user config directory, in that priority order.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut builder = Self::builder().env();

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CatalogError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.file(path);
        }

        builder = builder.file(cwd.join(CONFIG_FILE_NAME));

        if let Some(dirs) = ProjectDirs::from("com", "catalog", "catalog") {
            builder = builder.file(dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        builder
            .load()
            .map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Artifact path, resolved against `base` when relative.
    pub fn artifact_path(&self, base: &Path) -> PathBuf {
        if self.artifact.path.is_absolute() {
            self.artifact.path.clone()
        } else {
            base.join(&self.artifact.path)
        }
    }
}

impl StoreConfig {
    pub fn backend(&self) -> Result<StoreBackend> {
        match self.backend.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "file" => Ok(StoreBackend::File),
            other => Err(CatalogError::Config(format!(
                "unknown store backend '{}' (expected \"rest\" or \"file\")",
                other
            ))),
        }
    }

    pub fn require_url(&self) -> Result<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::Config(
                    "store.url is required for the rest backend (or set CATALOG_STORE_URL)"
                        .to_string(),
                )
            })
    }

    pub fn require_file(&self) -> Result<&Path> {
        self.file.as_deref().ok_or_else(|| {
            CatalogError::Config(
                "store.file is required for the file backend (or set CATALOG_STORE_FILE)"
                    .to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.store.table, "products");
        assert_eq!(config.store.backend().unwrap(), StoreBackend::Rest);
        assert_eq!(config.artifact.terminator, "];");
        assert!(config.categories.aliases.is_none());
    }

    #[test]
    fn test_from_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[store]
backend = "file"
file = "products.json"

[categories]
known = ["accessory", "top"]

[categories.aliases]
accessories = "accessory"
tees = "top"
"#,
        )
        .unwrap();

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.store.backend().unwrap(), StoreBackend::File);
        assert_eq!(config.store.table, "products");
        assert_eq!(config.store.timeout_secs, 30);
        assert_eq!(
            config.artifact.header,
            "export const products: Product[] ="
        );
        let aliases = config.categories.aliases.unwrap();
        assert_eq!(aliases.get("tees").map(String::as_str), Some("top"));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let store = StoreConfig {
            backend: "mysql".into(),
            ..Default::default()
        };
        assert!(matches!(store.backend(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_rest_backend_requires_url() {
        let store = StoreConfig::default();
        assert!(store.require_url().is_err());

        let store = StoreConfig {
            url: Some("https://example.test".into()),
            ..Default::default()
        };
        assert_eq!(store.require_url().unwrap(), "https://example.test");
    }

    #[test]
    fn test_relative_artifact_path_is_joined() {
        let config = CatalogConfig::default();
        let resolved = config.artifact_path(Path::new("/srv/shop"));
        assert_eq!(resolved, PathBuf::from("/srv/shop/src/data/products.ts"));
    }
}
