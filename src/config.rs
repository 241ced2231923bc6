//! Configuration loader.
//!
//! `defaults/countersheet.default.toml` is embedded into the crate so the
//! documented defaults and runtime behavior stay in sync. Callers layer
//! user files and single-key overrides on top via [`Loader`] before
//! deserializing into [`CounterSheetConfig`].

use crate::layout::LayoutSettings;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/countersheet.default.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CounterSheetConfig {
    pub layout: LayoutConfig,
    pub export: ExportConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutConfig {
    pub box_margin: f64,
    pub spacing: f64,
    pub registration_marks_len: f64,
    pub one_sided: bool,
    pub front_rotation: f64,
    pub back_rotation: f64,
}

impl LayoutConfig {
    /// Engine settings for a document `sheet_width` wide.
    pub fn settings(&self, sheet_width: f64) -> LayoutSettings {
        LayoutSettings {
            box_margin: self.box_margin,
            spacing: self.spacing,
            registration_marks_len: self.registration_marks_len,
            one_sided: self.one_sided,
            front_rotation: self.front_rotation,
            back_rotation: self.back_rotation,
            sheet_width,
        }
    }
}

/// Raster export of counters with an id. The export itself is done by
/// the rendering layer; these travel along with the layout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub bitmap_width: u32,
    pub bitmap_height: u32,
    pub bitmap_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<CounterSheetConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<CounterSheetConfig, ConfigError> {
    Loader::new().build()
}
