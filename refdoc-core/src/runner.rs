//! Batch Runner
//!
//! Drives Loader -> RuleEngine -> Rewriter over the direct children of one
//! directory. Per-file failures are recorded and never stop the batch; the
//! ledger and failure tallies live only for the duration of one `run`.

use crate::config::FixupConfig;
use crate::error::{FixupError, FixupResult};
use crate::loader::DocumentLoader;
use crate::rewriter::Rewriter;
use crate::rules::RuleEngine;
use crate::types::{BatchSummary, FailureCategory, FileFailure, Ledger, RuleTally};
use chrono::Utc;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct BatchRunner<'a> {
    config: &'a FixupConfig,
    loader: DocumentLoader,
    engine: RuleEngine<'a>,
    rewriter: Rewriter,
}

/// Cross-file state for one batch
#[derive(Default)]
struct BatchState {
    ledger: Ledger,
    files_modified: usize,
    failure_counts: BTreeMap<FailureCategory, usize>,
    failures: Vec<FileFailure>,
}

impl BatchState {
    fn record_failure(&mut self, path: &Path, category: FailureCategory, message: String) {
        warn!(path = %path.display(), %category, "{message}");
        *self.failure_counts.entry(category).or_insert(0) += 1;
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            category,
            message,
        });
    }
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a FixupConfig, loader: DocumentLoader) -> FixupResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loader,
            engine: RuleEngine::new(config),
            rewriter: Rewriter::new(),
        })
    }

    pub fn engine(&self) -> &RuleEngine<'a> {
        &self.engine
    }

    /// Direct children of `dir` with the configured extension, sorted by
    /// file name. Subdirectories are skipped.
    pub fn collect_candidates(&self, dir: &Path) -> FixupResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(FixupError::InvalidInput(dir.to_path_buf()));
        }

        let scan_error = |source| FixupError::Scan {
            path: dir.to_path_buf(),
            source,
        };
        let extension = OsStr::new(&self.config.extension);
        let mut candidates = Vec::new();
        for entry in fs::read_dir(dir).map_err(scan_error)? {
            let path = entry.map_err(scan_error)?.path();
            if path.is_dir() {
                continue;
            }
            if path.extension() == Some(extension) {
                candidates.push(path);
            }
        }
        candidates.sort();
        Ok(candidates)
    }

    pub fn run(&self, dir: &Path) -> FixupResult<BatchSummary> {
        let started_at = Utc::now();
        let candidates = self.collect_candidates(dir)?;
        debug!(
            dir = %dir.display(),
            candidates = candidates.len(),
            backend = self.loader.backend_name(),
            "starting batch"
        );

        let mut state = BatchState::default();
        let progress_step = candidates.len().max(16) / 16;
        let mut printed_progress = false;

        for (index, path) in candidates.iter().enumerate() {
            if self.config.progress && (index + 1) % progress_step == 0 {
                print!(".");
                let _ = std::io::stdout().flush();
                printed_progress = true;
            }
            self.process_file(path, &mut state);
        }
        if printed_progress {
            println!();
        }

        let rules = self
            .engine
            .rule_names()
            .into_iter()
            .filter_map(|name| {
                let files = state.ledger.count(name);
                (files > 0).then(|| RuleTally {
                    rule: name.to_string(),
                    label: self.engine.label_for(name).unwrap_or(name).to_string(),
                    files,
                })
            })
            .collect();

        Ok(BatchSummary {
            directory: dir.to_path_buf(),
            started_at,
            dry_run: self.config.dry_run,
            files_scanned: candidates.len(),
            files_modified: state.files_modified,
            ledger: state.ledger,
            rules,
            failure_counts: state.failure_counts,
            failures: state.failures,
        })
    }

    fn process_file(&self, path: &Path, state: &mut BatchState) {
        let mut document = match self.loader.load(path) {
            Ok(document) => document,
            Err(e) => {
                state.record_failure(path, e.category(), format!("Failed to parse: {e}"));
                return;
            }
        };

        let fired = self.engine.apply(&mut document);
        if fired.is_empty() {
            return;
        }

        if !self.config.dry_run {
            if let Err(e) = self.rewriter.rewrite(&document) {
                state.record_failure(path, e.category(), e.to_string());
                return;
            }
        }

        state.files_modified += 1;
        for name in &fired {
            state.ledger.record(name);
        }
    }
}

#[cfg(all(test, feature = "xhtml-backend"))]
mod tests {
    use super::*;
    use crate::config::{IMPORT_STATEMENT_RULE, TITLE_SUFFIX_RULE};

    const QML_PAGE: &str = "<html><head><title>Foo QML Type</title></head><body>\
        <h1 class=\"title\">Foo QML Type</h1>\
        <table><tr><td>Import Statement:</td><td>import Foo</td></tr></table></body></html>";

    fn quiet_config() -> FixupConfig {
        FixupConfig {
            progress: false,
            ..FixupConfig::default()
        }
    }

    fn runner(config: &FixupConfig) -> BatchRunner<'_> {
        BatchRunner::new(config, DocumentLoader::with_default_backend().unwrap()).unwrap()
    }

    #[test]
    fn selects_direct_children_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.html"), "").unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();
        fs::write(dir.path().join("c.htm"), "").unwrap();
        fs::write(dir.path().join("d.HTML"), "").unwrap();
        fs::create_dir(dir.path().join("sub.html")).unwrap();
        fs::write(dir.path().join("sub.html").join("e.html"), "").unwrap();

        let config = quiet_config();
        let names: Vec<_> = runner(&config)
            .collect_candidates(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config();
        let err = runner(&config).run(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FixupError::InvalidInput(_)));
    }

    #[test]
    fn file_instead_of_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, QML_PAGE).unwrap();
        let config = quiet_config();

        assert!(matches!(runner(&config).run(&file), Err(FixupError::InvalidInput(_))));
        assert_eq!(fs::read_to_string(&file).unwrap(), QML_PAGE);
    }

    #[test]
    fn dry_run_counts_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.html");
        fs::write(&path, QML_PAGE).unwrap();
        let config = FixupConfig {
            dry_run: true,
            ..quiet_config()
        };

        let summary = runner(&config).run(dir.path()).unwrap();
        assert!(summary.dry_run);
        assert_eq!(summary.files_modified, 1);
        assert_eq!(summary.ledger.count(TITLE_SUFFIX_RULE), 1);
        assert_eq!(summary.ledger.count(IMPORT_STATEMENT_RULE), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), QML_PAGE);
    }

    #[test]
    fn failed_rewrite_is_recorded_without_counting() {
        let dir = tempfile::tempdir().unwrap();
        // The sibling temp name for this page exceeds the file name limit
        let unwritable = dir.path().join(format!("{}.html", "q".repeat(240)));
        fs::write(&unwritable, QML_PAGE).unwrap();
        fs::write(dir.path().join("ok.html"), QML_PAGE).unwrap();
        let config = quiet_config();

        let summary = runner(&config).run(dir.path()).unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.failures_in(FailureCategory::Write), 1);
        assert_eq!(summary.failures[0].path, unwritable);
        assert_eq!(summary.files_modified, 1);
        assert_eq!(summary.ledger.count(TITLE_SUFFIX_RULE), 1);
        assert_eq!(summary.ledger.count(IMPORT_STATEMENT_RULE), 1);
        assert_eq!(fs::read_to_string(&unwritable).unwrap(), QML_PAGE);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn summary_lists_rules_in_pipeline_order_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.html"), QML_PAGE).unwrap();
        let config = quiet_config();

        let summary = runner(&config).run(dir.path()).unwrap();
        let lines: Vec<_> = summary
            .rules
            .iter()
            .map(|t| (t.rule.as_str(), t.label.as_str(), t.files))
            .collect();
        assert_eq!(
            lines,
            vec![
                (TITLE_SUFFIX_RULE, "Removed QML type suffix", 1),
                (IMPORT_STATEMENT_RULE, "Removed import statement", 1),
            ]
        );
    }
}
