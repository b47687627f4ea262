//! State store for the Orbit social demo.
//!
//! [`Store`] owns posts, comments, conversations, notifications and
//! connection suggestions, seeded from [`SeedData`]. [`StoreHandle`] moves a
//! store into its own tokio task so several consumers can share it and
//! auto-replies are delivered on time.

#[macro_use]
pub mod logging;

pub mod clipboard;
pub mod config;
pub mod error;
pub mod formatting;
pub mod handle;
pub mod ids;
pub mod seed;
pub mod storage;
pub mod store;
pub mod theme;

pub use config::{ConfigManager, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use handle::StoreHandle;
pub use seed::SeedData;
pub use storage::{FilePreferenceStorage, MemoryPreferenceStorage, PreferenceStorage};
pub use store::{AppState, Store, StoreSnapshot};

/// Build a store from the on-disk configuration: `config.json` for tunables
/// and `preferences.json` for the persisted theme, both under the `.orbit`
/// directory. Logging is set up from the `logging` block of `config.json`.
pub fn open_default(seed: SeedData) -> anyhow::Result<Store> {
    let manager = ConfigManager::new()?;
    let config = manager.load_config()?;
    // Only one global logger per process; keep whichever was installed first.
    if let Err(e) = logging::init_logging(&config.logging) {
        log::warn!("Logging not initialized: {}", e);
    }
    let storage = FilePreferenceStorage::from_config(&manager);
    Ok(Store::new(seed, config, Box::new(storage))?)
}
