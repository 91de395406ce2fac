use crate::error::FixupError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Rule names understood by the engine
pub const TITLE_SUFFIX_RULE: &str = "TitleSuffixStrip";
pub const IMPORT_STATEMENT_RULE: &str = "ImportStatementRemoval";

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "html".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixupConfig {
    /// File extension (without the dot) selecting candidate pages
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub title_suffix: TitleSuffixConfig,
    #[serde(default)]
    pub import_statement: ImportStatementConfig,
    /// Pipeline configuration - defines which rules to run and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Print a progress dot every 1/16th of the batch
    #[serde(default = "default_true")]
    pub progress: bool,
    /// Report what would change without writing any file
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSuffixConfig {
    /// Literal marker stripped from the page title and the first title heading
    pub marker: String,
    /// Tag name of the heading to clean up
    pub heading_tag: String,
    /// Class token the heading must carry
    pub heading_class: String,
}

impl Default for TitleSuffixConfig {
    fn default() -> Self {
        Self {
            marker: " QML Type".to_string(),
            heading_tag: "h1".to_string(),
            heading_class: "title".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStatementConfig {
    /// Literal label identifying the import-statement row by its first cell
    pub marker: String,
}

impl Default for ImportStatementConfig {
    fn default() -> Self {
        Self {
            marker: "Import Statement:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of rules to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleConfig {
                    name: TITLE_SUFFIX_RULE.to_string(),
                    enabled: true,
                },
                RuleConfig {
                    name: IMPORT_STATEMENT_RULE.to_string(),
                    enabled: true,
                },
            ],
        }
    }
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            title_suffix: TitleSuffixConfig::default(),
            import_statement: ImportStatementConfig::default(),
            pipeline: PipelineConfig::default(),
            progress: true,
            dry_run: false,
        }
    }
}

impl FixupConfig {
    /// Load config from file path
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FixupConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, or the defaults when no path is given. A
    /// config file that cannot be read, parsed or validated is an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, FixupError> {
        let Some(p) = path else {
            return Ok(Self::default());
        };
        Self::load_from_file(p).map_err(|e| {
            e.downcast::<FixupError>()
                .unwrap_or_else(|e| FixupError::Config(format!("{p}: {e}")))
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Markers are matched against escaped source text, so they must not
    /// contain characters that change meaning under escaping.
    pub fn validate(&self) -> Result<(), FixupError> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(FixupError::Config(format!(
                "extension must be non-empty and given without a leading dot, got {:?}",
                self.extension
            )));
        }
        for (field, marker) in [
            ("title_suffix.marker", &self.title_suffix.marker),
            ("import_statement.marker", &self.import_statement.marker),
        ] {
            if marker.is_empty() {
                return Err(FixupError::Config(format!("{field} must be non-empty")));
            }
            if marker.contains(['<', '>', '&']) {
                return Err(FixupError::Config(format!(
                    "{field} must not contain markup characters, got {marker:?}"
                )));
            }
        }
        if self.title_suffix.heading_tag.trim().is_empty() {
            return Err(FixupError::Config(
                "title_suffix.heading_tag must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}
