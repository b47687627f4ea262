use std::env;

use orbit_types::Theme;

use crate::error::StoreResult;
use crate::storage::PreferenceStorage;

/// Environment variable standing in for the platform colour-scheme preference
pub const PREFERS_DARK_ENV: &str = "ORBIT_PREFERS_DARK";

/// Platform preference used when nothing has been persisted yet
pub fn preferred_theme() -> Theme {
    match env::var(PREFERS_DARK_ENV) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "" | "0" | "false" | "no" => Theme::Light,
            _ => Theme::Dark,
        },
        Err(_) => Theme::Light,
    }
}

/// Theme flag plus the storage it is persisted to
pub struct ThemeSettings {
    current: Theme,
    key: String,
    storage: Box<dyn PreferenceStorage>,
}

impl ThemeSettings {
    /// Read the persisted theme once; unreadable or unknown values fall back
    /// to the platform preference
    pub fn load(storage: Box<dyn PreferenceStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match storage.get(&key) {
            Ok(Some(saved)) => Theme::parse(&saved).unwrap_or_else(|| {
                log::warn!("Ignoring unknown saved theme {:?}", saved);
                preferred_theme()
            }),
            Ok(None) => preferred_theme(),
            Err(e) => {
                log::warn!("Failed to read saved theme: {:#}", e);
                preferred_theme()
            }
        };

        Self {
            current,
            key,
            storage,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme. The new value is written before it takes effect, so a
    /// failed write leaves the theme unchanged.
    pub fn toggle(&mut self) -> StoreResult<Theme> {
        let next = self.current.toggled();
        self.storage.set(&self.key, next.as_str())?;
        self.current = next;
        Ok(next)
    }
}

impl std::fmt::Debug for ThemeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeSettings")
            .field("current", &self.current)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
