//! Crate-level error.
use crate::definition::DefinitionError;
use crate::layout::LayoutError;
use crate::template::TemplateError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("cannot find {name}, looked in: {}", display_paths(.searched))]
    DataFileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
