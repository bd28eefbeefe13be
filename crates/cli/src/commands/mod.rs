//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod orders;

use bakehouse_cart::{CartStore, FileStorage};

use crate::config::CliConfig;

/// Open the persisted cart under the configured data directory.
pub fn open_cart(config: &CliConfig) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::new(&config.data_dir))
}
