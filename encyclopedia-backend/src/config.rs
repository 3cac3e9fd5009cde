use std::env;
use std::path::{Path, PathBuf};

use crate::entries::file_ops;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "ENCYCLOPEDIA_HOST";
    pub const PORT: &str = "PORT";
    /// Directory holding one `<title>.md` file per entry
    pub const ENTRIES_DIR: &str = "ENCYCLOPEDIA_ENTRIES_DIR";
    pub const STATIC_DIR: &str = "ENCYCLOPEDIA_STATIC_DIR";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8000;
    pub const ENTRIES_DIR: &str = "entries";
    pub const SEED_ENTRIES_DIR: &str = "seed_entries";
    pub const STATIC_DIR: &str = "static";
}

/// Returns the absolute path to the encyclopedia-backend directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it resolves the same way
/// regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the bundled seed entries directory (read-only source)
pub fn seed_entries_dir() -> PathBuf {
    backend_dir().join(defaults::SEED_ENTRIES_DIR)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub entries_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = match env::var(env_vars::PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!(
                    "{}={:?} is not a valid port ({}), using {}",
                    env_vars::PORT,
                    raw,
                    e,
                    defaults::PORT
                );
                defaults::PORT
            }),
            Err(_) => defaults::PORT,
        };

        Self {
            host: env::var(env_vars::HOST).unwrap_or_else(|_| defaults::HOST.to_string()),
            port,
            entries_dir: env::var(env_vars::ENTRIES_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| backend_dir().join(defaults::ENTRIES_DIR)),
            static_dir: env::var(env_vars::STATIC_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| backend_dir().join(defaults::STATIC_DIR)),
        }
    }
}

/// Create the entries directory and, when it holds no entries yet, copy the
/// seed entries into it. Existing files are never overwritten.
pub fn initialize_entries_dir(entries_dir: &Path, seed_dir: &Path) -> std::io::Result<usize> {
    std::fs::create_dir_all(entries_dir)?;

    if !file_ops::list_entry_files(entries_dir)?.is_empty() {
        log::info!("Using existing entries in {:?}", entries_dir);
        return Ok(0);
    }

    if !seed_dir.exists() {
        log::debug!("Seed entries not found at {:?}, starting empty", seed_dir);
        return Ok(0);
    }

    let mut copied = 0;
    for seed in file_ops::list_entry_files(seed_dir)? {
        let Some(name) = seed.file_name() else {
            continue;
        };
        let target = entries_dir.join(name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&seed, &target)?;
        copied += 1;
    }

    log::info!("Initialized {} entries from {:?} into {:?}", copied, seed_dir, entries_dir);
    Ok(copied)
}
