/// Remembered-database configuration
///
/// The shell remembers which database was open so the next launch lands in
/// the same place. Stored as JSON in the platform config directory:
/// - Linux: ~/.config/tooth-seeker/config.json
/// - macOS: ~/Library/Application Support/tooth-seeker/config.json
/// - Windows: %APPDATA%\tooth-seeker\config.json
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SeekerResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The last database the user had open
    pub db_path: Option<PathBuf>,
    /// Name of the images table inside it
    pub table_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: None,
            table_name: "images".to_string(),
        }
    }
}

impl Config {
    /// Where the config file lives
    pub fn file_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("tooth-seeker");
        path.push("config.json");
        path
    }

    /// Load the remembered configuration. A missing or unreadable file just
    /// means "nothing remembered": the shell starts with no database open.
    pub fn load() -> Self {
        Self::load_from(&Self::file_path())
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Persist the configuration.
    pub fn save(&self) -> SeekerResult<()> {
        self.save_to(&Self::file_path())
    }

    pub fn save_to(&self, path: &Path) -> SeekerResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Record a newly selected database and persist immediately, so a crash
    /// later in the session cannot lose the selection.
    pub fn remember_database(&mut self, db_path: &Path) {
        self.db_path = Some(db_path.to_path_buf());
        if let Err(error) = self.save() {
            eprintln!("⚠️  Could not save config: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.json");

        let config = Config {
            db_path: Some(PathBuf::from("/data/teeth.db")),
            table_name: "images".to_string(),
        };
        config.save_to(&file).unwrap();

        assert_eq!(Config::load_from(&file), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_garbage_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.json");
        std::fs::write(&file, "not json").unwrap();
        assert_eq!(Config::load_from(&file), Config::default());
    }
}
