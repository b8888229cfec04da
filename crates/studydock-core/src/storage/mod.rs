mod config;
mod database;
mod keys;
mod store;

pub use config::{Config, StorageConfig, TimerConfig};
pub use database::SqliteStore;
pub use keys::StoreKey;
pub use store::{MemoryStore, Store, StoreExt};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `STUDYDOCK_DATA_DIR` overrides the location. Otherwise it is
/// `~/.config/studydock`, or `~/.config/studydock-dev` when
/// `STUDYDOCK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("STUDYDOCK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYDOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studydock-dev")
            } else {
                base_dir.join("studydock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
