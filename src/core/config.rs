//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;

/// Equipment tag the mass range table uses for balances and scales
pub const DEFAULT_MASS_EQUIPMENT: &str = "Balances & Scales";

/// Calibration assistant configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Certificate dataset path
    pub certificates: Option<PathBuf>,

    /// Mass range table path
    pub mass_ranges: Option<PathBuf>,

    /// Thermodynamic range table path
    pub thermo_ranges: Option<PathBuf>,

    /// Equipment tag for mass targets
    pub mass_equipment: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

/// Resolved locations of the three reference datasets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub certificates: PathBuf,
    pub mass_ranges: PathBuf,
    pub thermo_ranges: PathBuf,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/cala/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.cala/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.cala_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        let only_comments = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if only_comments {
            return None;
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        Config {
            certificates: std::env::var_os("CALA_CERTIFICATES").map(PathBuf::from),
            mass_ranges: std::env::var_os("CALA_MASS_RANGES").map(PathBuf::from),
            thermo_ranges: std::env::var_os("CALA_THERMO_RANGES").map(PathBuf::from),
            mass_equipment: std::env::var("CALA_MASS_EQUIPMENT").ok(),
            default_format: std::env::var("CALA_FORMAT").ok(),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cala")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.certificates.is_some() {
            self.certificates = other.certificates;
        }
        if other.mass_ranges.is_some() {
            self.mass_ranges = other.mass_ranges;
        }
        if other.thermo_ranges.is_some() {
            self.thermo_ranges = other.thermo_ranges;
        }
        if other.mass_equipment.is_some() {
            self.mass_equipment = other.mass_equipment;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Equipment tag for mass targets
    pub fn mass_equipment(&self) -> &str {
        self.mass_equipment
            .as_deref()
            .unwrap_or(DEFAULT_MASS_EQUIPMENT)
    }

    /// Resolve dataset paths; relative paths are taken from `root`
    pub fn data_paths(&self, root: &Path) -> DataPaths {
        let resolve = |configured: &Option<PathBuf>, default: &str| -> PathBuf {
            match configured {
                Some(path) if path.is_absolute() => path.clone(),
                Some(path) => root.join(path),
                None => root.join("data").join(default),
            }
        };

        DataPaths {
            certificates: resolve(&self.certificates, "certificates.json"),
            mass_ranges: resolve(&self.mass_ranges, "mass_ranges.json"),
            thermo_ranges: resolve(&self.thermo_ranges, "thermo_ranges.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_paths() {
        let config = Config::default();
        let paths = config.data_paths(Path::new("/lab"));
        assert_eq!(paths.certificates, PathBuf::from("/lab/data/certificates.json"));
        assert_eq!(paths.mass_ranges, PathBuf::from("/lab/data/mass_ranges.json"));
        assert_eq!(paths.thermo_ranges, PathBuf::from("/lab/data/thermo_ranges.json"));
        assert_eq!(config.mass_equipment(), DEFAULT_MASS_EQUIPMENT);
    }

    #[test]
    fn test_configured_paths() {
        let config: Config = serde_yml::from_str(
            "certificates: doc/LabRoweDatalogger.json\nthermo_ranges: /srv/thermo.json\nmass_equipment: Scales\n",
        )
        .unwrap();
        let paths = config.data_paths(Path::new("/lab"));
        assert_eq!(paths.certificates, PathBuf::from("/lab/doc/LabRoweDatalogger.json"));
        assert_eq!(paths.thermo_ranges, PathBuf::from("/srv/thermo.json"));
        assert_eq!(config.mass_equipment(), "Scales");
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            certificates: Some(PathBuf::from("a.json")),
            mass_equipment: Some("A".to_string()),
            ..Default::default()
        };
        base.merge(Config {
            certificates: Some(PathBuf::from("b.json")),
            ..Default::default()
        });
        assert_eq!(base.certificates, Some(PathBuf::from("b.json")));
        assert_eq!(base.mass_equipment.as_deref(), Some("A"));
    }

    #[test]
    fn test_commented_project_config_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        assert!(Config::read_file(&project.cala_dir().join("config.yaml")).is_none());
    }
}
