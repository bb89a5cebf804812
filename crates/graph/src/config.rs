use crate::error::{GraphError, Result};
use crate::extract::DEFAULT_REFERENCE_SUFFIXES;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Conventional location of the source tree below the working directory.
pub const DEFAULT_SOURCE_SUBPATH: &str = "src/main/java";

/// Environment variable overriding the scanned source root.
pub const GRAPH_ROOT_ENV: &str = "CONTEXT_GRAPH_ROOT";

/// Configuration for building a [`DependencyGraph`](crate::DependencyGraph)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Directory that is walked for source files
    pub source_root: PathBuf,

    /// File extensions (without dot, case-insensitive) that are scanned
    pub extensions: Vec<String>,

    /// Identifier suffixes that turn a mention into an edge
    pub reference_suffixes: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from(DEFAULT_SOURCE_SUBPATH),
            extensions: vec!["java".to_string()],
            reference_suffixes: DEFAULT_REFERENCE_SUFFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl GraphConfig {
    /// Config rooted at `<working_dir>/src/main/java`
    pub fn from_working_dir(working_dir: impl AsRef<Path>) -> Self {
        Self {
            source_root: working_dir.as_ref().join(DEFAULT_SOURCE_SUBPATH),
            ..Self::default()
        }
    }

    /// Config rooted at `$CONTEXT_GRAPH_ROOT`, or below the current directory.
    pub fn from_env() -> Self {
        Self::from_root_override(std::env::var_os(GRAPH_ROOT_ENV), || {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }

    /// A non-empty `root_override` is used as is; otherwise the conventional
    /// subpath below `working_dir()`.
    fn from_root_override(
        root_override: Option<OsString>,
        working_dir: impl FnOnce() -> PathBuf,
    ) -> Self {
        match root_override {
            Some(root) if !root.is_empty() => Self {
                source_root: PathBuf::from(root),
                ..Self::default()
            },
            _ => Self::from_working_dir(working_dir()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(GraphError::InvalidConfig(
                "extensions must not be empty".to_string(),
            ));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(GraphError::InvalidConfig(format!(
                "extension {ext:?} must be non-empty and given without a leading dot"
            )));
        }
        if self.reference_suffixes.is_empty() {
            return Err(GraphError::InvalidConfig(
                "reference_suffixes must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
