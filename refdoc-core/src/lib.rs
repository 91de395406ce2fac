// refdoc-fixup Core Library
//
// Post-processes generated reference documentation: pages produced with a
// QML type template for non-QML APIs are rewritten to look like generic
// reference pages. Main interface is BatchRunner over a directory of pages.

pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod rewriter;
pub mod rules;
pub mod runner;
pub mod types;

// Re-export main types and functions for easy use
pub use config::FixupConfig;
pub use document::Document;
pub use error::{FixupError, LoadError, RewriteError};
pub use loader::{default_backend, DocumentLoader, MarkupBackend};
pub use rewriter::Rewriter;
pub use rules::{ContentRule, RuleEngine};
pub use runner::BatchRunner;
pub use types::*;

// Re-export backends for direct use
#[cfg(feature = "xhtml-backend")]
pub use loader::XhtmlBackend;
