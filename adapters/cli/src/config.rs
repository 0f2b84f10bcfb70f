use std::{
    fs, io,
    path::{Path, PathBuf},
};

use horde_simulation::Config;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("could not read configuration file {}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("could not parse configuration file {}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Reads a TOML configuration file; absent keys keep their defaults.
pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_core::{Equipment, MeleeWeapon};
    use tempfile::TempDir;

    fn scratch_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("scratch file writes");
        path
    }

    #[test]
    fn loads_partial_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch_file(
            &dir,
            "partial.toml",
            "seed = 12\narena_width = 800.0\n\n[starting_equipment]\nkind = \"melee\"\nweapon = \"crowbar\"\ndamage = 2\n",
        );

        let config = load(&path).expect("config loads");

        assert_eq!(config.seed, 12);
        assert_eq!(config.arena_width, 800.0);
        assert_eq!(config.arena_height, Config::default().arena_height);
        assert_eq!(
            config.starting_equipment,
            Equipment::Melee {
                weapon: MeleeWeapon::Crowbar,
                damage: 2,
            }
        );
    }

    #[test]
    fn reports_missing_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.toml");

        assert!(matches!(load(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn reports_malformed_files() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch_file(&dir, "malformed.toml", "seed = \"not a number\"");

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }
}
