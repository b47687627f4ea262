use log::LevelFilter;
use orbit_store::config::CONFIG_DIR_ENV;
use orbit_store::ids::seed_id;
use orbit_store::logging::LogConfig;
use orbit_store::{open_default, ConfigManager, SeedData, StoreConfig};
use std::env;
use std::fs;
use tempfile::TempDir;

// The global logger can only be installed once, so this binary holds a
// single test.
#[test]
fn test_open_default_writes_configured_log_file() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("orbit_store.log");
    let original = env::var(CONFIG_DIR_ENV).ok();
    env::set_var(CONFIG_DIR_ENV, dir.path());

    ConfigManager::new()
        .unwrap()
        .save_config(&StoreConfig {
            logging: LogConfig {
                log_file: log_file.clone(),
                level: LevelFilter::Debug,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    let mut store = open_default(SeedData::demo()).unwrap();
    store.toggle_like(seed_id(101)).unwrap();

    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("Logging initialized"));
    assert!(contents.contains("Store initialised"));
    assert!(contents.contains("toggle_like"));

    match original {
        Some(value) => env::set_var(CONFIG_DIR_ENV, value),
        None => env::remove_var(CONFIG_DIR_ENV),
    }
}
