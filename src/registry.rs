use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;
use tracing::debug;

use crate::error::ReaderError;
use crate::reader::Reader;

/// Extension of the file-name component, without the dot.
///
/// `data.csv` gives `csv`, `archive.tar.gz` gives `gz`, while `README`,
/// `file.` and `.bashrc` all give an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Mapping from extension to the handler that reads it
#[derive(Debug, Clone, Default)]
pub struct Registry {
    readers: HashMap<String, Reader>,
}

impl Registry {
    /// `csv` as tabular, `txt` as plain text
    pub fn with_builtin() -> Self {
        let mut registry = Self::default();
        registry.register("csv", Reader::tabular());
        registry.register("txt", Reader::plain_text());
        registry
    }

    /// Add or overwrite the handler for `extension`, returning the one it replaced
    pub fn register(&mut self, extension: impl Into<String>, reader: Reader) -> Option<Reader> {
        let extension = extension.into();
        debug!(%extension, kind = reader.kind(), "registering reader");
        self.readers.insert(extension, reader)
    }

    pub fn get(&self, extension: &str) -> Option<Reader> {
        self.readers.get(extension).copied()
    }

    /// Handler for the extension of `path`; never touches the file
    pub fn resolve(&self, path: &Path) -> Result<Reader, ReaderError> {
        let extension = extension_of(path);
        match self.get(&extension) {
            Some(reader) => {
                debug!(path = %path.display(), %extension, kind = reader.kind(), "resolved reader");
                Ok(reader)
            }
            None => Err(ReaderError::unknown_extension(extension, self.extensions())),
        }
    }

    /// Registered extensions, sorted
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.readers.keys().cloned().collect();
        extensions.sort();
        extensions
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

lazy_static! {
    static ref REGISTRY: RwLock<Registry> = RwLock::new(Registry::with_builtin());
}

/// Register into the process-wide registry. Meant for startup, before any `resolve`.
pub fn register(extension: impl Into<String>, reader: Reader) -> Option<Reader> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(extension, reader)
}

/// Resolve against the process-wide registry
pub fn resolve(path: impl AsRef<Path>) -> Result<Reader, ReaderError> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::TabularReader;

    #[test]
    fn test_extension_extraction() {
        assert_eq!(extension_of(Path::new("data.csv")), "csv");
        assert_eq!(extension_of(Path::new("dir.d/archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("/tmp/notes.md")), "md");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new("file.")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
        assert_eq!(extension_of(Path::new("DATA.CSV")), "CSV");
    }

    #[test]
    fn test_builtin_resolution() {
        let registry = Registry::with_builtin();
        assert_eq!(registry.resolve(Path::new("data.csv")).unwrap(), Reader::tabular());
        assert_eq!(registry.resolve(Path::new("notes.txt")).unwrap(), Reader::plain_text());
        assert_eq!(registry.extensions(), vec!["csv", "txt"]);
    }

    #[test]
    fn test_unknown_extension_names_it() {
        let registry = Registry::with_builtin();
        let err = registry.resolve(Path::new("notes.md")).unwrap_err();
        assert_eq!(err.extension(), Some("md"));

        let err = registry.resolve(Path::new("README")).unwrap_err();
        assert_eq!(err.extension(), Some(""));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = Registry::with_builtin();
        let err = registry.resolve(Path::new("DATA.CSV")).unwrap_err();
        assert_eq!(err.extension(), Some("CSV"));
    }

    #[test]
    fn test_unknown_extension_opens_nothing() {
        // the path does not exist, so any open attempt would surface FileNotFound
        let registry = Registry::with_builtin();
        let err = registry
            .resolve(Path::new("/definitely/not/here/notes.md"))
            .unwrap_err();
        assert!(matches!(err, ReaderError::UnknownExtension { .. }));
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = Registry::with_builtin();
        let tsv = Reader::Tabular(TabularReader::with_delimiter(b'\t'));
        assert_eq!(registry.register("tsv", tsv), None);
        assert_eq!(registry.register("txt", Reader::tabular()), Some(Reader::plain_text()));
        assert_eq!(registry.resolve(Path::new("a.tsv")).unwrap(), tsv);
        assert_eq!(registry.resolve(Path::new("a.txt")).unwrap(), Reader::tabular());
        assert_eq!(registry.extensions(), vec!["csv", "tsv", "txt"]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let registry = Registry::with_builtin();
        let first = registry.resolve(Path::new("data.csv")).unwrap();
        let second = registry.resolve(Path::new("data.csv")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_global_registry() {
        register("global-only", Reader::plain_text());
        assert_eq!(resolve("x.global-only").unwrap(), Reader::plain_text());
        assert_eq!(resolve("data.csv").unwrap(), Reader::tabular());
    }
}
