// Main rules module - delegates to semantic sub-modules
// - engine.rs: ContentRule trait and the config-driven RuleEngine
// - title_suffix.rs: strips the template suffix from title and heading
// - import_statement.rs: drops the import-statement metadata row

pub mod engine;
pub mod import_statement;
pub mod title_suffix;

pub use engine::*;
pub use import_statement::ImportStatementRule;
pub use title_suffix::TitleSuffixRule;
