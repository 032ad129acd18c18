use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::reader::{PlainTextReader, Reader, TabularReader};
use crate::registry::Registry;

/// Environment variable naming an optional TOML file of extra readers
pub const CONFIG_ENV: &str = "FILE_READER_CONFIG";

/// One `[extensions.<ext>]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReaderSpec {
    Tabular {
        #[serde(default = "default_delimiter")]
        delimiter: String,
    },
    PlainText,
}

fn default_delimiter() -> String {
    ",".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReaderConfig {
    #[serde(default)]
    pub extensions: BTreeMap<String, ReaderSpec>,
}

impl ReaderConfig {
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        debug!(path = %path.display(), entries = config.extensions.len(), "loaded reader config");
        Ok(config)
    }

    /// Load from the file named by `FILE_READER_CONFIG`, or an empty config when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(&PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// Validated `(extension, reader)` pairs in key order
    pub fn readers(&self) -> Result<Vec<(String, Reader)>, ConfigError> {
        self.extensions
            .iter()
            .map(|(extension, spec)| {
                if extension.is_empty() || extension.starts_with('.') {
                    return Err(ConfigError::InvalidExtension(extension.clone()));
                }
                Ok((extension.clone(), spec.to_reader(extension)?))
            })
            .collect()
    }

    /// Register every configured reader on top of what `registry` already holds
    pub fn apply(&self, registry: &mut Registry) -> Result<(), ConfigError> {
        for (extension, reader) in self.readers()? {
            registry.register(extension, reader);
        }
        Ok(())
    }
}

impl ReaderSpec {
    pub fn to_reader(&self, extension: &str) -> Result<Reader, ConfigError> {
        match self {
            ReaderSpec::PlainText => Ok(Reader::PlainText(PlainTextReader)),
            ReaderSpec::Tabular { delimiter } => match delimiter.as_bytes() {
                [byte] if byte.is_ascii() => Ok(Reader::Tabular(TabularReader::with_delimiter(*byte))),
                _ => Err(ConfigError::InvalidDelimiter {
                    extension: extension.to_string(),
                    delimiter: delimiter.clone(),
                }),
            },
        }
    }
}
