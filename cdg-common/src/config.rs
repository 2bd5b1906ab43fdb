//! Configuration loading and database path resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Master seed used when nothing else is configured. Chosen once and kept
/// stable so default demo databases are comparable across machines.
pub const DEFAULT_MASTER_SEED: u64 = 42;

/// Database write batch size. Bounds single-call payload size, not a
/// concurrency knob.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Resolved configuration for one seeding run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Master seed; each seeder adds its own offset (see `rng::offsets`).
    pub master_seed: u64,
    /// SQLite database file to populate.
    pub db_path: PathBuf,
    /// Records per write batch.
    pub chunk_size: usize,
    /// Upgrade lenient pool/chain no-ops to typed errors.
    pub strict: bool,
}

impl SeedConfig {
    /// Resolve configuration following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Compiled default (fallback)
    pub fn resolve(
        cli_seed: Option<u64>,
        cli_db: Option<&str>,
        cli_chunk: Option<usize>,
        strict: bool,
    ) -> Result<Self> {
        let file = read_config_file();

        let master_seed = match cli_seed {
            Some(seed) => seed,
            None => match std::env::var("CDG_SEED") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|_| Error::Config(format!("CDG_SEED is not an integer: {raw}")))?,
                Err(_) => file
                    .as_ref()
                    .and_then(|c| c.get("seed"))
                    .and_then(|v| v.as_integer())
                    .map(|v| v as u64)
                    .unwrap_or(DEFAULT_MASTER_SEED),
            },
        };

        let db_path = resolve_db_path(cli_db, file.as_ref());

        let chunk_size = cli_chunk
            .or_else(|| {
                file.as_ref()
                    .and_then(|c| c.get("chunk_size"))
                    .and_then(|v| v.as_integer())
                    .map(|v| v as usize)
            })
            .unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".to_string()));
        }

        Ok(Self {
            master_seed,
            db_path,
            chunk_size,
            strict,
        })
    }
}

/// Database path resolution, same priority order as seeds:
/// CLI argument, then `CDG_DB`, then the config file's `db_path`, then the
/// platform data directory.
fn resolve_db_path(cli_arg: Option<&str>, file: Option<&toml::Value>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("CDG_DB") {
        return PathBuf::from(path);
    }
    if let Some(path) = file
        .and_then(|c| c.get("db_path"))
        .and_then(|v| v.as_str())
    {
        return PathBuf::from(path);
    }
    default_db_path()
}

/// Parse `~/.config/cdg/config.toml` (platform equivalent) if present.
fn read_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("cdg").join("config.toml");
    let raw = std::fs::read_to_string(path).ok()?;
    toml::from_str(&raw).ok()
}

/// Platform data directory default, e.g. `~/.local/share/cdg/demo.db`.
fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cdg"))
        .unwrap_or_else(|| PathBuf::from("./cdg_data"))
        .join("demo.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_beats_env_and_default() {
        std::env::set_var("CDG_SEED", "7");
        let config = SeedConfig::resolve(Some(99), Some("/tmp/x.db"), None, false).unwrap();
        assert_eq!(config.master_seed, 99);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        std::env::remove_var("CDG_SEED");
    }

    #[test]
    #[serial]
    fn env_beats_default() {
        std::env::set_var("CDG_SEED", "7");
        std::env::set_var("CDG_DB", "/tmp/env.db");
        let config = SeedConfig::resolve(None, None, None, false).unwrap();
        assert_eq!(config.master_seed, 7);
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.db"));
        std::env::remove_var("CDG_SEED");
        std::env::remove_var("CDG_DB");
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_set() {
        std::env::remove_var("CDG_SEED");
        std::env::remove_var("CDG_DB");
        let config = SeedConfig::resolve(None, Some("/tmp/d.db"), None, false).unwrap();
        assert_eq!(config.master_seed, DEFAULT_MASTER_SEED);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!config.strict);
    }

    #[test]
    #[serial]
    fn malformed_env_seed_is_a_config_error() {
        std::env::set_var("CDG_SEED", "not-a-number");
        let result = SeedConfig::resolve(None, Some("/tmp/d.db"), None, false);
        assert!(matches!(result, Err(Error::Config(_))));
        std::env::remove_var("CDG_SEED");
    }

    #[test]
    #[serial]
    fn zero_chunk_size_is_rejected() {
        std::env::remove_var("CDG_SEED");
        let result = SeedConfig::resolve(None, Some("/tmp/d.db"), Some(0), false);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
