//! # Context Initialization
//!
//! Turns a resolved [`CatalogConfig`] into a ready [`CatalogApi`]: picks the
//! store backend, resolves the artifact path and builds the category table.
//!
//! Relative paths (artifact, file store) are resolved against `base`, which
//! the CLI sets to the working directory.

use crate::api::CatalogApi;
use crate::artifact::ArtifactTarget;
use crate::config::{CatalogConfig, StoreBackend};
use crate::error::Result;
use crate::normalize::CategoryAliases;
use crate::store::fs_backend::FileStore;
use crate::store::rest::RestStore;
use crate::store::RemoteStore;
use std::path::Path;
use tracing::debug;

pub type DynStore = Box<dyn RemoteStore>;

pub fn build_store(config: &CatalogConfig, base: &Path) -> Result<DynStore> {
    let store: DynStore = match config.store.backend()? {
        StoreBackend::Rest => {
            let store = RestStore::new(&config.store)?;
            debug!(endpoint = store.endpoint(), "using rest store");
            Box::new(store)
        }
        StoreBackend::File => {
            let file = config.store.require_file()?;
            let path = if file.is_absolute() {
                file.to_path_buf()
            } else {
                base.join(file)
            };
            debug!(path = %path.display(), "using file store");
            Box::new(FileStore::new(path))
        }
    };
    Ok(store)
}

pub fn initialize(config: &CatalogConfig, base: &Path) -> Result<CatalogApi<DynStore>> {
    let store = build_store(config, base)?;
    let target = ArtifactTarget::from_config(&config.artifact, config.artifact_path(base));
    let aliases = CategoryAliases::from_config(&config.categories);
    Ok(CatalogApi::new(store, target, aliases))
}
