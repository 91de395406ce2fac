use super::import_statement::ImportStatementRule;
use super::title_suffix::TitleSuffixRule;
use crate::config::{FixupConfig, IMPORT_STATEMENT_RULE, TITLE_SUFFIX_RULE};
use crate::document::Document;
use tracing::{debug, warn};

// Sequential rule pipeline infrastructure
pub trait ContentRule {
    /// Apply the rule in place. Returns true only if the document changed.
    fn apply(&self, document: &mut Document) -> bool;
    fn name(&self) -> &str;
    /// Human-readable action label for the end-of-run summary
    fn label(&self) -> &str;
}

/// Runs the configured rules once each, in pipeline order, over one document.
pub struct RuleEngine<'a> {
    rules: Vec<Box<dyn ContentRule + 'a>>,
}

impl<'a> RuleEngine<'a> {
    pub fn new(config: &'a FixupConfig) -> Self {
        let mut rules: Vec<Box<dyn ContentRule + 'a>> = Vec::new();

        for rule_config in &config.pipeline.rules {
            if !rule_config.enabled {
                debug!(rule = %rule_config.name, "skipping disabled rule");
                continue;
            }
            if rules.iter().any(|r| r.name() == rule_config.name) {
                warn!(rule = %rule_config.name, "rule listed twice in pipeline; running it once");
                continue;
            }
            match Self::rule_by_name(&rule_config.name, config) {
                Some(rule) => rules.push(rule),
                None => warn!(rule = %rule_config.name, "unknown rule, skipping"),
            }
        }

        Self { rules }
    }

    fn rule_by_name(name: &str, config: &'a FixupConfig) -> Option<Box<dyn ContentRule + 'a>> {
        match name {
            TITLE_SUFFIX_RULE => Some(Box::new(TitleSuffixRule::new(&config.title_suffix))),
            IMPORT_STATEMENT_RULE => {
                Some(Box::new(ImportStatementRule::new(&config.import_statement)))
            }
            _ => None,
        }
    }

    /// Names of active rules, in pipeline order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn label_for(&self, name: &str) -> Option<&str> {
        self.rules.iter().find(|r| r.name() == name).map(|r| r.label())
    }

    /// Apply every rule to `document` and return the names of those that
    /// fired. The document is marked modified iff the list is non-empty.
    pub fn apply(&self, document: &mut Document) -> Vec<String> {
        let mut fired = Vec::new();
        for rule in &self.rules {
            if rule.apply(document) {
                debug!(rule = rule.name(), path = %document.path().display(), "rule fired");
                fired.push(rule.name().to_string());
            }
        }
        if !fired.is_empty() {
            document.mark_modified();
        }
        fired
    }
}
