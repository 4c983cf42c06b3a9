//! The book and analysis files verseface opens when started without
//! arguments, stored as TOML in `~/.config/verseface/config.toml`.
//!
//! ```toml
//! book_path = "~/bibles/en/58-PHM.usfm"
//! analysis_path = "$DATA/philemon_face_ground_truth.csv"
//! ```
//!
//! Both paths may use `~` and environment variables; they are expanded on
//! load.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot expand {field} `{value}` in {config_path}: {reason}")]
    Expand {
        config_path: PathBuf,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to write config file at {config_path}: {source}")]
    Write {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub book_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_path: Option<PathBuf>,
}

impl Config {
    pub fn new(book_path: impl Into<PathBuf>, analysis_path: Option<PathBuf>) -> Self {
        Self {
            book_path: book_path.into(),
            analysis_path,
        }
    }

    /// `Ok(None)` when there is no config file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        let raw: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;
        raw.expanded(config_path).map(Some)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> Result<(), ConfigError> {
        let config_path = config_path.as_ref();
        let write_error = |source| ConfigError::Write {
            config_path: config_path.to_path_buf(),
            source,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content).map_err(write_error)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/verseface");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expanded(self, config_path: &Path) -> Result<Self, ConfigError> {
        let expand = |field: &'static str, path: &Path| {
            let value = path.to_string_lossy();
            shellexpand::full(&value)
                .map(|expanded| PathBuf::from(expanded.as_ref()))
                .map_err(|e| ConfigError::Expand {
                    config_path: config_path.to_path_buf(),
                    field,
                    value: value.to_string(),
                    reason: e.to_string(),
                })
        };

        Ok(Self {
            book_path: expand("book_path", &self.book_path)?,
            analysis_path: self
                .analysis_path
                .as_deref()
                .map(|path| expand("analysis_path", path))
                .transpose()?,
        })
    }
}
