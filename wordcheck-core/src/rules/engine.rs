use super::capitalization::{find_mixed_case_words, find_sentence_start_not_capitalized};
use super::lexical::{check_format_rule, scan_forbidden_words};
use super::matching::{Finding, TextMatch};
use super::phrases::PhraseScanner;
use super::spelling::TypoTarget;
use crate::classifier::{BlockClass, BlockClassifier};
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::report::{Report, ReportAggregator};
use crate::types::Block;
use rayon::prelude::*;
use tracing::{debug, info};

/// Everything the per-block scanners found in one block, before location is
/// attached. Phrase matches are indexed by phrase position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockFindings {
    pub phrase_matches: Vec<Vec<TextMatch>>,
    pub misspellings: Vec<Finding>,
    pub rule_violations: Vec<Finding>,
    pub capitalization: Vec<Finding>,
}

impl BlockFindings {
    pub fn alert_count(&self) -> usize {
        self.misspellings.len() + self.rule_violations.len() + self.capitalization.len()
    }
}

/// Runs every scanner over a block sequence and reduces the results into a
/// Report. Built once per request from a normalized config.
pub struct RuleEngine {
    config: CheckConfig,
    scanner: PhraseScanner,
    classifier: BlockClassifier,
}

impl RuleEngine {
    pub fn new(config: &CheckConfig) -> Result<Self, CheckError> {
        let config = config.normalized();
        let scanner = PhraseScanner::new(&config.phrases, config.case_sensitive, config.whole_word)?;
        Ok(Self {
            config,
            scanner,
            classifier: BlockClassifier::new(),
        })
    }

    /// The normalized config this engine runs with
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn phrases(&self) -> &[String] {
        &self.config.phrases
    }

    /// Pure per-block step: phrase matches plus every enabled alert scanner
    pub fn scan_block(&self, block: &Block) -> BlockFindings {
        let text = block.text.as_str();
        let phrase_matches = self.scanner.scan(text);
        if text.is_empty() {
            return BlockFindings {
                phrase_matches,
                ..Default::default()
            };
        }

        let rule_violations = if self.config.check_format_rule {
            check_format_rule(text)
        } else {
            Vec::new()
        };

        let capitalization = match self.classifier.classify(block) {
            BlockClass::Heading => Vec::new(),
            BlockClass::Body => {
                let mut found = find_mixed_case_words(text);
                found.extend(find_sentence_start_not_capitalized(text));
                found
            }
        };

        BlockFindings {
            phrase_matches,
            misspellings: scan_forbidden_words(text),
            rule_violations,
            capitalization,
        }
    }

    pub fn check(&self, blocks: &[Block]) -> Report {
        info!(
            blocks = blocks.len(),
            phrases = self.config.phrases.len(),
            "running rule engine"
        );

        // Map in parallel; collect keeps traversal order for the reduce.
        let per_block: Vec<BlockFindings> = blocks.par_iter().map(|b| self.scan_block(b)).collect();

        let mut aggregator = ReportAggregator::new(&self.config.phrases);
        for (block, findings) in blocks.iter().zip(per_block) {
            aggregator.absorb(block, findings);
        }

        if self.config.spellcheck_vi {
            self.collect_typo_suspects(blocks, &mut aggregator);
        }

        let report = aggregator.finish();
        debug!(
            found = report.stats.found,
            missing = report.stats.missing,
            misspellings = report.stats.misspellings_total,
            rule_violations = report.stats.rule_violations_total,
            capitalization = report.stats.capitalization_total,
            "rule engine finished"
        );
        report
    }

    fn collect_typo_suspects(&self, blocks: &[Block], aggregator: &mut ReportAggregator) {
        let max_dist = self.config.spell_max_distance;
        for index in aggregator.missing_indices() {
            let Some(target) = TypoTarget::new(&aggregator.phrases()[index]) else {
                continue;
            };
            let per_block: Vec<(&Block, Vec<_>)> = blocks
                .par_iter()
                .map(|block| (block, target.find_in(&block.text, max_dist)))
                .filter(|(_, hits)| !hits.is_empty())
                .collect();
            debug!(
                phrase = %aggregator.phrases()[index],
                blocks = per_block.len(),
                "typo suspects collected"
            );
            aggregator.set_typo_suspects(index, per_block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertKind, Area, BlockKind, Location, StructuralIndices};
    use pretty_assertions::assert_eq;

    fn body(index: u32, text: &str) -> Block {
        Block {
            text: text.to_string(),
            location: Location {
                area: Area::Body,
                kind: BlockKind::Paragraph,
                page_est: Some(1),
                indices: StructuralIndices {
                    paragraph_index: Some(index),
                    ..Default::default()
                },
                style_name: None,
            },
        }
    }

    fn config(phrases: &[&str]) -> CheckConfig {
        CheckConfig {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn literal_phrase_is_found_with_snippet() {
        let engine = RuleEngine::new(&config(&["mua sắm"])).unwrap();
        let report = engine.check(&[body(1, "Dự toán mua sắm thiết bị")]);
        assert_eq!(report.found, vec!["mua sắm".to_string()]);
        let hits = report.hits_for("mua sắm").unwrap();
        assert!(hits.count >= 1);
        assert!(hits.occurrences[0].snippet.contains("mua sắm"));
    }

    #[test]
    fn phrases_are_deduplicated_before_scanning() {
        let engine = RuleEngine::new(&config(&["Foo", "foo", "Foo"])).unwrap();
        assert_eq!(engine.phrases(), &["Foo".to_string()]);
        let report = engine.check(&[body(1, "FOO foo")]);
        assert_eq!(report.stats.phrases_total, 1);
        assert_eq!(report.hits[0].count, 2);
    }

    #[test]
    fn format_rule_only_runs_when_enabled() {
        let blocks = [body(1, "dự toán mua sắm thiết bị")];
        let off = RuleEngine::new(&config(&["x"])).unwrap().check(&blocks);
        assert_eq!(off.stats.rule_violations_total, 0);

        let mut cfg = config(&["x"]);
        cfg.check_format_rule = true;
        let on = RuleEngine::new(&cfg).unwrap().check(&blocks);
        assert_eq!(on.stats.rule_violations_total, 1);
        assert!(matches!(on.alerts.rule_violations[0].kind, AlertKind::FormatRule { .. }));
    }

    #[test]
    fn headings_skip_capitalization() {
        let engine = RuleEngine::new(&config(&["x"])).unwrap();
        let mut heading = body(1, "Xong. rồi SƠn");
        heading.location.style_name = Some("Heading 1".to_string());
        let report = engine.check(&[heading, body(2, "Xong. rồi SƠn")]);
        assert_eq!(report.stats.capitalization_total, 2);
        assert!(report
            .alerts
            .capitalization
            .iter()
            .all(|a| a.location.location.indices.paragraph_index == Some(2)));
    }

    #[test]
    fn forbidden_words_always_scanned() {
        let engine = RuleEngine::new(&config(&["x"])).unwrap();
        let report = engine.check(&[body(1, "Bảng táon chi tiết")]);
        assert_eq!(report.stats.misspellings_total, 1);
    }

    #[test]
    fn typo_suspects_only_for_missing_phrases() {
        let mut cfg = config(&["toán", "sắm"]);
        cfg.spellcheck_vi = true;
        let engine = RuleEngine::new(&cfg).unwrap();
        let report = engine.check(&[body(1, "Bảng táon"), body(2, "mua sắm")]);

        let toan = report.hits_for("toán").unwrap();
        assert_eq!(toan.typo_suspects.len(), 1);
        assert_eq!(toan.typo_suspects[0].typed_in_doc, "táon");
        assert!(report.hits_for("sắm").unwrap().typo_suspects.is_empty());
        assert_eq!(report.stats.typo_suspects_phrases, 1);
    }

    #[test]
    fn literal_occurrence_suppresses_typo_suspects() {
        let mut cfg = config(&["toán"]);
        cfg.spellcheck_vi = true;
        let engine = RuleEngine::new(&cfg).unwrap();
        let report = engine.check(&[body(1, "Bảng táon"), body(2, "dự toán")]);
        assert!(report.hits[0].typo_suspects.is_empty());
    }

    #[test]
    fn results_follow_block_order() {
        let engine = RuleEngine::new(&config(&["a"])).unwrap();
        let blocks: Vec<Block> = (1..=200).map(|i| body(i, "a")).collect();
        let report = engine.check(&blocks);
        let indices: Vec<u32> = report.hits[0]
            .occurrences
            .iter()
            .filter_map(|o| o.location.location.indices.paragraph_index)
            .collect();
        assert_eq!(indices, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn empty_block_only_contributes_nothing() {
        let engine = RuleEngine::new(&config(&["a"])).unwrap();
        let findings = engine.scan_block(&body(1, ""));
        assert_eq!(findings.phrase_matches, vec![Vec::new()]);
        assert_eq!(findings.alert_count(), 0);
    }
}
