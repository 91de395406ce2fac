// All core functionality is in refdoc-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod logging;
pub mod report;

// Re-export core types for convenience
pub use refdoc_core::*;
