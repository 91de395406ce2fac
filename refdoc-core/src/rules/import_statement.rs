use super::engine::ContentRule;
use crate::config::{ImportStatementConfig, IMPORT_STATEMENT_RULE};
use crate::document::Document;
use tracing::debug;

// ImportStatementRule - removes the import-statement row from the first
// metadata table that carries one
pub struct ImportStatementRule<'a> {
    config: &'a ImportStatementConfig,
}

impl<'a> ImportStatementRule<'a> {
    pub fn new(config: &'a ImportStatementConfig) -> Self {
        Self { config }
    }
}

impl ContentRule for ImportStatementRule<'_> {
    fn apply(&self, document: &mut Document) -> bool {
        let marker = self.config.marker.as_str();

        // Scanning stops at the first matching table, even if later ones match too
        let row = document.tables().find_map(|table| {
            let cell = document.first_cell(table)?;
            if document.text(cell).contains(marker) {
                document.row_of(cell)
            } else {
                None
            }
        });

        match row {
            Some(row) => {
                debug!(row, "removing import statement row");
                document.remove(row)
            }
            None => false,
        }
    }

    fn name(&self) -> &str {
        IMPORT_STATEMENT_RULE
    }

    fn label(&self) -> &str {
        "Removed import statement"
    }
}
