//! Project discovery and structure
//!
//! A project is any directory containing a `.cala/` folder. Dataset paths in
//! the project config are resolved relative to the project root.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the marker directory
pub const PROJECT_DIR: &str = ".cala";

/// Represents a calibration-assistant project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .cala/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        let project = Self { root };
        project.write_structure()?;
        Ok(project)
    }

    /// Force initialization even if .cala/ exists (rewrites the config)
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let project = Self { root };
        project.write_structure()?;
        Ok(project)
    }

    fn write_structure(&self) -> Result<(), ProjectError> {
        let cala_dir = self.cala_dir();
        std::fs::create_dir_all(&cala_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(cala_dir.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# Calibration Assistant project configuration

# Certificates with datasheets (array of certificate objects)
# certificates: data/certificates.json

# CMC range table for balances and scales
# mass_ranges: data/mass_ranges.json

# CMC range table for temperature and humidity sensors
# thermo_ranges: data/thermo_ranges.json

# Equipment tag used for mass targets in the mass range table
# mass_equipment: "Balances & Scales"

# Default output format (auto, json, yaml, tsv, csv, md)
# default_format: auto
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .cala configuration directory
    pub fn cala_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Get the default data directory
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a calibration assistant project (searched from {searched_from:?}). Run 'cala init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
