use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::difficulty::Difficulty;
use crate::leaderboard::DEFAULT_LEADERBOARD_SIZE;

pub const DEFAULT_TICK_RATE_MS: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Name prefilled in the menu
    pub player_name: Option<String>,
    pub difficulty: Difficulty,
    pub leaderboard_size: usize,
    pub tick_rate_ms: u64,
    pub ledger_path: Option<PathBuf>,
    pub corpus_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: None,
            difficulty: Difficulty::Easy,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            ledger_path: None,
            corpus_dir: None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            player_name: Some("Ann".into()),
            difficulty: Difficulty::Hard,
            leaderboard_size: 5,
            tick_rate_ms: 250,
            ledger_path: Some(PathBuf::from("/tmp/scores.txt")),
            corpus_dir: Some(PathBuf::from("/tmp/corpus")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"difficulty": "medium"}"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();

        assert_eq!(loaded.difficulty, Difficulty::Medium);
        assert_eq!(loaded.leaderboard_size, 10);
        assert_eq!(loaded.tick_rate_ms, 100);
    }

    #[test]
    fn garbage_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }
}
