use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::preprocessors::{file_extension, DocxPreprocessor, JsonPreprocessor, LocationTagger, Preprocessor};
use crate::report::Report;
use crate::rules::RuleEngine;
use crate::types::{Block, SourceDocument};
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckStages {
    pub document: SourceDocument,
    pub blocks: Vec<Block>,
    pub report: Report,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        info!(step = step_name, elapsed_ms = elapsed.as_millis() as u64, "step finished");
        self.timings.push((step_name.to_string(), elapsed));
        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    /// Multi-line table of step timings with their share of the total
    pub fn summary(&self) -> String {
        if !self.enabled || self.timings.is_empty() {
            return String::new();
        }

        let total = self.total();
        let mut out = String::from("Performance Summary:\n");
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            out.push_str(&format!(
                "   {:.<35} {:.0}ms ({:.1}%)\n",
                step,
                duration.as_millis(),
                percentage
            ));
        }
        out.push_str(&format!("   {:.<35} {:.0}ms\n", "Total", total.as_millis()));
        out
    }
}

/// End-to-end check of one document: pick a preprocessor by file extension,
/// extract, tag locations, then run the rule engine.
pub struct DocumentChecker {
    preprocessors: Vec<Box<dyn Preprocessor>>,
}

impl Default for DocumentChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentChecker {
    /// DOCX and JSON model input
    pub fn new() -> Self {
        Self::new_with_preprocessors(vec![
            Box::new(DocxPreprocessor::new()),
            Box::new(JsonPreprocessor::new()),
        ])
    }

    pub fn new_with_preprocessors(preprocessors: Vec<Box<dyn Preprocessor>>) -> Self {
        Self { preprocessors }
    }

    pub fn preprocessor_for(&self, path: &Path) -> Result<&dyn Preprocessor, CheckError> {
        if let Some(p) = self.preprocessors.iter().find(|p| p.supports_file_type(path)) {
            return Ok(p.as_ref());
        }
        let name = path.display().to_string();
        match file_extension(path).as_deref() {
            Some("doc") => Err(CheckError::LegacyFormat(name)),
            _ => Err(CheckError::UnsupportedFormat(name)),
        }
    }

    /// Check a document on disk
    pub fn check_file(&self, input_path: &str, config: &CheckConfig) -> Result<Report> {
        self.check_file_with_profiling(input_path, config, false)
    }

    /// Check a document on disk, optionally timing each step
    pub fn check_file_with_profiling(
        &self,
        input_path: &str,
        config: &CheckConfig,
        enable_profiling: bool,
    ) -> Result<Report> {
        let mut profiler = StepProfiler::new(enable_profiling);
        let report = self.check_file_with_profiler(input_path, config, &mut profiler)?;
        Ok(report)
    }

    pub fn check_file_with_profiler(
        &self,
        input_path: &str,
        config: &CheckConfig,
        profiler: &mut StepProfiler,
    ) -> Result<Report> {
        config.validate()?;
        let path = Path::new(input_path);
        self.preprocessor_for(path)?;
        let bytes = profiler.time_step("1. Read", || std::fs::read(path))?;
        self.check_bytes_with_profiler(&bytes, input_path, config, profiler)
    }

    /// Check an in-memory document. `file_name` selects the preprocessor.
    pub fn check_bytes(&self, bytes: &[u8], file_name: &str, config: &CheckConfig) -> Result<Report> {
        self.check_bytes_with_profiler(bytes, file_name, config, &mut StepProfiler::new(false))
    }

    pub fn check_bytes_with_profiler(
        &self,
        bytes: &[u8],
        file_name: &str,
        config: &CheckConfig,
        profiler: &mut StepProfiler,
    ) -> Result<Report> {
        Ok(self.run(bytes, file_name, config, profiler)?.report)
    }

    /// Check an in-memory document and keep every intermediate stage
    pub fn check_bytes_capture_stages(
        &self,
        bytes: &[u8],
        file_name: &str,
        config: &CheckConfig,
    ) -> Result<CheckStages> {
        let stages = self.run(bytes, file_name, config, &mut StepProfiler::new(false))?;
        info!(
            paragraphs = stages.document.paragraph_count(),
            blocks = stages.blocks.len(),
            "stages captured"
        );
        Ok(stages)
    }

    /// Check a document on disk and keep every intermediate stage
    pub fn check_file_capture_stages(&self, input_path: &str, config: &CheckConfig) -> Result<CheckStages> {
        config.validate()?;
        let bytes = std::fs::read(input_path)?;
        self.check_bytes_capture_stages(&bytes, input_path, config)
    }

    fn run(
        &self,
        bytes: &[u8],
        file_name: &str,
        config: &CheckConfig,
        profiler: &mut StepProfiler,
    ) -> Result<CheckStages> {
        config.validate()?;
        let preprocessor = self.preprocessor_for(Path::new(file_name))?;
        if bytes.is_empty() {
            return Err(CheckError::EmptyDocument.into());
        }
        info!(file = file_name, preprocessor = preprocessor.name(), "checking document");

        // A package without paragraphs is still checked: every phrase is missing.
        let document = profiler.time_step("2. Extract", || preprocessor.extract(bytes))?;

        let blocks = profiler.time_step("3. Tag locations", || {
            LocationTagger::tag_document(&document, config.scan_headers_footers)
        });

        let engine = RuleEngine::new(config)?;
        let report = profiler.time_step("4. Rules", || engine.check(&blocks));

        info!(
            blocks = blocks.len(),
            found = report.stats.found,
            missing = report.stats.missing,
            "check complete"
        );

        Ok(CheckStages {
            document,
            blocks,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(phrases: &[&str]) -> CheckConfig {
        CheckConfig {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    const MODEL: &str = r#"{"body": [{"type": "paragraph", "text": "Dự toán mua sắm: mua sắm thiết bị"}]}"#;

    #[test]
    fn picks_preprocessor_by_extension() {
        let checker = DocumentChecker::new();
        assert_eq!(checker.preprocessor_for(Path::new("a.docx")).unwrap().name(), "docx");
        assert_eq!(checker.preprocessor_for(Path::new("a.json")).unwrap().name(), "json");
        assert!(matches!(
            checker.preprocessor_for(Path::new("old.DOC")),
            Err(CheckError::LegacyFormat(_))
        ));
        assert!(matches!(
            checker.preprocessor_for(Path::new("notes.txt")),
            Err(CheckError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn check_bytes_runs_whole_pipeline() {
        let report = DocumentChecker::new()
            .check_bytes(MODEL.as_bytes(), "model.json", &config(&["mua sắm", "gói thầu"]))
            .unwrap();
        assert_eq!(report.found, vec!["mua sắm".to_string()]);
        assert_eq!(report.missing, vec!["gói thầu".to_string()]);
    }

    #[test]
    fn empty_phrase_list_is_rejected_before_reading() {
        let err = DocumentChecker::new()
            .check_bytes(MODEL.as_bytes(), "model.json", &config(&[" "]))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<CheckError>(), Some(CheckError::EmptyPhraseList)));
    }

    #[test]
    fn empty_input_is_rejected() {
        let checker = DocumentChecker::new();
        let err = checker.check_bytes(b"", "a.docx", &config(&["x"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<CheckError>(), Some(CheckError::EmptyDocument)));
    }

    #[test]
    fn document_without_paragraphs_reports_all_missing() {
        let report = DocumentChecker::new()
            .check_bytes(b"{}", "a.json", &config(&["x", "y"]))
            .unwrap();
        assert!(report.found.is_empty());
        assert_eq!(report.missing, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(report.stats.misspellings_total, 0);
    }

    #[test]
    fn profiler_records_steps_only_when_enabled() {
        let mut off = StepProfiler::new(false);
        assert_eq!(off.time_step("x", || 1), 1);
        assert!(off.timings().is_empty());
        assert!(off.summary().is_empty());

        let mut on = StepProfiler::new(true);
        on.time_step("x", || ());
        on.time_step("y", || ());
        assert_eq!(on.timings().len(), 2);
        assert!(on.summary().contains("Total"));
    }
}
