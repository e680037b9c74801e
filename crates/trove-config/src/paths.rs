//! Application paths management.

use directories::ProjectDirs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "trove.db";

/// Manages all application paths following platform conventions.
///
/// The config file always lives under the platform config directory so
/// it can be found before anything else is read. The data directory,
/// and with it the database, can be redirected through `general.data_dir`
/// in that config file.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    pub fn new() -> Option<Self> {
        Self::with_data_dir(None)
    }

    /// Create paths with the data directory overridden, as configured
    /// by `general.data_dir`. A leading `~` expands to the home
    /// directory; `None` keeps the platform default.
    pub fn with_data_dir(data_dir: Option<&str>) -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "trove", "trove")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = match data_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            None => proj_dirs.data_dir().to_path_buf(),
        };

        Some(Self {
            config_file: config_dir.join(CONFIG_FILE),
            database_file: data_dir.join(DATABASE_FILE),
            config_dir,
            data_dir,
        })
    }

    /// Create all necessary directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Check if trove has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_paths_creation() {
        let paths = AppPaths::new();
        assert!(paths.is_some());

        let paths = paths.unwrap();
        assert!(paths.config_file.to_string_lossy().contains("config.toml"));
        assert!(paths.database_file.to_string_lossy().contains("trove.db"));
    }

    #[test]
    fn test_data_dir_override_moves_database_not_config() {
        let paths = AppPaths::with_data_dir(Some("/srv/trove-data")).unwrap();
        assert_eq!(paths.data_dir, PathBuf::from("/srv/trove-data"));
        assert_eq!(
            paths.database_file,
            PathBuf::from("/srv/trove-data/trove.db")
        );
        assert_eq!(paths.config_file, AppPaths::new().unwrap().config_file);
    }

    #[test]
    fn test_data_dir_override_expands_tilde() {
        let paths = AppPaths::with_data_dir(Some("~/trove-data")).unwrap();
        assert!(!paths.data_dir.to_string_lossy().starts_with('~'));
        assert!(paths.data_dir.ends_with("trove-data"));
    }
}
