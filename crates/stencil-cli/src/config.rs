//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `STENCIL__SECTION__KEY`
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use stencil_core::domain::ParameterSet;

/// Environment prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "STENCIL";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates come from and where dry runs happen.
    pub templates: TemplateConfig,
    /// User-level defaults for template parameters (e.g. `github_username`).
    pub preferences: BTreeMap<String, String>,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Installation directory for templates named without a path.
    pub dir: PathBuf,
    /// Scratch directory for dry runs.
    pub scratch_dir: PathBuf,
    /// Rendering engine that expands each template.
    pub engine: Engine,
}

/// Rendering engines the CLI can drive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// In-process placeholder substitution.
    #[default]
    Builtin,
    /// The external `cookiecutter` program.
    Cookiecutter,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Cookiecutter => "cookiecutter",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
            scratch_dir: stencil_core::application::services::default_scratch_dir(),
            engine: Engine::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates: TemplateConfig::default(),
            preferences: BTreeMap::new(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let file = match config_file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::from(Self::config_path().as_path()).required(false),
        };

        let loaded = config::Config::builder()
            .add_source(defaults)
            .add_source(file.format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?;

        loaded
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stencil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stencil.toml"))
    }

    /// Preferences as template parameters, lowest priority of all sources.
    pub fn preference_parameters(&self) -> ParameterSet {
        self.preferences
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Look up a dotted key such as `templates.dir` or
    /// `preferences.github_username`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "templates.dir" => Some(self.templates.dir.display().to_string()),
            "templates.scratch_dir" => Some(self.templates.scratch_dir.display().to_string()),
            "templates.engine" => Some(self.templates.engine.as_str().to_string()),
            "output.no_color" => Some(self.output.no_color.to_string()),
            _ => key
                .strip_prefix("preferences.")
                .and_then(|name| self.preferences.get(name).cloned()),
        }
    }
}

/// Templates shipped next to the executable, else those in the source tree.
fn default_templates_dir() -> PathBuf {
    let installed = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("templates")));

    match installed {
        Some(dir) if dir.is_dir() => dir,
        _ => Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates")).to_path_buf(),
    }
}
