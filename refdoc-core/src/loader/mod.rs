//! Document Loader
//!
//! Turns one file into a [`Document`] in three steps, each with its own
//! failure class:
//!
//! ```text
//! path --read--> bytes --UTF-8--> text --MarkupBackend--> Tree
//!       (io)           (encoding)       (malformed-markup)
//! ```
//!
//! The backend either returns a complete tree or an error; rules never see
//! a partially built document.

#[cfg(feature = "xhtml-backend")]
pub mod xhtml;

#[cfg(feature = "xhtml-backend")]
pub use xhtml::XhtmlBackend;

use crate::document::{Document, Tree};
use crate::error::{FixupError, LoadError};
use std::fs;
use std::path::Path;

/// Backend trait for markup parsing
///
/// Implementations build a complete [`Tree`] from decoded page text, or fail
/// with [`LoadError::MalformedMarkup`].
pub trait MarkupBackend: Send + Sync {
    fn parse(&self, text: &str) -> Result<Tree, LoadError>;

    /// Backend identifier for logging/debugging
    fn name(&self) -> &str;

    /// Check if backend is healthy/ready
    fn is_healthy(&self) -> bool;
}

/// Backend compiled into this build
#[cfg(feature = "xhtml-backend")]
pub fn default_backend() -> Result<Box<dyn MarkupBackend>, FixupError> {
    Ok(Box::new(XhtmlBackend::new()))
}

/// Fallback when no backend is compiled in
#[cfg(not(feature = "xhtml-backend"))]
pub fn default_backend() -> Result<Box<dyn MarkupBackend>, FixupError> {
    Err(FixupError::BackendUnavailable(
        "no markup backend compiled in; rebuild with --features xhtml-backend".to_string(),
    ))
}

pub struct DocumentLoader {
    backend: Box<dyn MarkupBackend>,
}

impl DocumentLoader {
    /// Fails with [`FixupError::BackendUnavailable`] if the backend reports
    /// itself unhealthy.
    pub fn new(backend: Box<dyn MarkupBackend>) -> Result<Self, FixupError> {
        if !backend.is_healthy() {
            return Err(FixupError::BackendUnavailable(format!(
                "backend {} is not ready",
                backend.name()
            )));
        }
        Ok(Self { backend })
    }

    /// Loader over the compiled-in backend
    pub fn with_default_backend() -> Result<Self, FixupError> {
        Self::new(default_backend()?)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn load(&self, path: &Path) -> Result<Document, LoadError> {
        let bytes = fs::read(path)?;
        let source = String::from_utf8(bytes)?;
        let tree = self.backend.parse(&source)?;
        Ok(Document::new(path, source, tree))
    }
}
