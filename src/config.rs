//! Generator Configuration
//!
//! Plugin options are a camelCase JSON document. Paths in it are relative
//! to the project root.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::contact::OrganizationInfo;
use crate::encoder::EscapeMode;
use crate::writer::CollisionPolicy;

pub const DEFAULT_OUTPUT_ROOT: &str = "public";
pub const VCARD_DIR: &str = "vcards";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read options {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Option `query` is required")]
    MissingQuery,
}

/// Options recognized by the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub organization: Option<String>,
    /// Logo path, relative to the project root
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PluginOptions {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options: PluginOptions = serde_json::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.trim().is_empty() {
            return Err(ConfigError::MissingQuery);
        }
        Ok(())
    }
}

/// Everything one run needs besides the data itself.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub options: PluginOptions,
    pub project_root: PathBuf,
    pub output_root: PathBuf,
    pub escape: EscapeMode,
    pub collisions: CollisionPolicy,
}

impl GeneratorConfig {
    pub fn new(options: PluginOptions, project_root: impl Into<PathBuf>) -> Self {
        Self {
            options,
            project_root: project_root.into(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            escape: EscapeMode::default(),
            collisions: CollisionPolicy::default(),
        }
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_escape(mut self, escape: EscapeMode) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_collisions(mut self, collisions: CollisionPolicy) -> Self {
        self.collisions = collisions;
        self
    }

    /// `<project_root>/<output_root>/vcards`
    pub fn output_dir(&self) -> PathBuf {
        self.project_root.join(&self.output_root).join(VCARD_DIR)
    }

    /// Resolve a configured or record-supplied path against the project root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn organization(&self) -> OrganizationInfo {
        OrganizationInfo {
            name: self.options.organization.clone(),
            logo_path: self
                .options
                .logo
                .as_deref()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| self.resolve_path(p)),
            url: self.options.url.clone(),
        }
    }
}
