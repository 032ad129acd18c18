//! Extension-keyed reader dispatch: pick a handler by file extension and
//! print the file through it.

pub mod config;
pub mod error;
pub mod logging;
pub mod reader;
pub mod registry;

use std::io::Write;
use std::path::Path;

pub use config::{ReaderConfig, ReaderSpec, CONFIG_ENV};
pub use error::{ConfigError, ReaderError};
pub use reader::{PlainTextReader, Reader, Record, TabularReader};
pub use registry::{extension_of, Registry};

/// Register every configured reader into the process-wide registry
pub fn install(config: &ReaderConfig) -> Result<(), ConfigError> {
    for (extension, reader) in config.readers()? {
        registry::register(extension, reader);
    }
    Ok(())
}

/// Resolve `path` against the process-wide registry and print it to `out`
pub fn read_and_print<W: Write>(path: &Path, out: &mut W) -> Result<(), ReaderError> {
    registry::resolve(path)?.read_and_print(path, out)
}
