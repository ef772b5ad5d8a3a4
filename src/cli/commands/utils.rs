//! Shared utilities for CLI commands

use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::dataset::ReferenceData;
use crate::core::project::{Project, ProjectError};

/// What a data command needs: its configuration and the loaded reference data
pub struct Session {
    pub config: Config,
    pub data: ReferenceData,
}

impl Session {
    /// Discover the project, layer the configuration and load all datasets
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let project = discover_project(global)?;
        let config = Config::load(project.as_ref());

        let root = match &project {
            Some(project) => project.root().to_path_buf(),
            None => std::env::current_dir().into_diagnostic()?,
        };
        let paths = config.data_paths(&root);
        tracing::debug!(?paths, "dataset paths");

        let data = ReferenceData::load(&paths)?.with_mass_equipment(config.mass_equipment());

        Ok(Self { config, data })
    }

    /// Resolve `--format auto` using the configured default, then `auto`
    pub fn format(&self, global: &GlobalOpts, auto: OutputFormat) -> OutputFormat {
        resolve_format(global.format, self.config.default_format.as_deref(), auto)
    }
}

fn discover_project(global: &GlobalOpts) -> Result<Option<Project>> {
    let found = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };

    match found {
        Ok(project) => Ok(Some(project)),
        // An explicit --project must exist
        Err(e) if global.project.is_some() => Err(miette::miette!("{}", e)),
        Err(ProjectError::NotFound { searched_from }) => {
            tracing::debug!(?searched_from, "no project found, using current directory");
            Ok(None)
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

/// Pick the output format: explicit flag, then config default, then `auto`
pub fn resolve_format(flag: OutputFormat, configured: Option<&str>, auto: OutputFormat) -> OutputFormat {
    if flag != OutputFormat::Auto {
        return flag;
    }
    match configured.and_then(OutputFormat::from_config) {
        Some(OutputFormat::Auto) | None => auto,
        Some(format) => format,
    }
}
