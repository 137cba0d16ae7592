//! `unbrace.toml` configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use ub_ast::QuoteStyle;

/// Name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = "unbrace.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Extensions picked up when walking directories.
    pub extensions: Vec<String>,
    /// Repeat the pass until nothing changes.
    pub fixpoint: bool,
    /// Carry comments through and apply the brace-comment policy.
    pub comments: bool,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Quote style for string literals in the output.
    pub quote: QuoteStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: ["js", "jsx", "mjs", "cjs", "ts", "tsx"]
                .into_iter()
                .map(String::from)
                .collect(),
            fixpoint: false,
            comments: true,
            skip_dirs: vec!["node_modules".to_string(), ".git".to_string()],
            quote: QuoteStyle::Single,
        }
    }
}

impl Config {
    /// Load `explicit`, or `unbrace.toml` from the working directory if it
    /// exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn wants_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}
