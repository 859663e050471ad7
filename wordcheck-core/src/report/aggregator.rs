use super::*;
use crate::rules::engine::BlockFindings;
use crate::rules::matching::{Finding, TextMatch};
use crate::rules::spelling::TypoMatch;
use crate::types::{Block, MatchLocation};

/// Reduce step: folds per-block scanner output, in traversal order, into a
/// Report. The per-phrase tables are sized up front from the phrase list.
pub struct ReportAggregator {
    phrases: Vec<String>,
    occurrences: Vec<Vec<Occurrence>>,
    typo_suspects: Vec<Vec<TypoSuspect>>,
    misspellings: Vec<Alert>,
    rule_violations: Vec<Alert>,
    capitalization: Vec<Alert>,
}

impl ReportAggregator {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: phrases.to_vec(),
            occurrences: vec![Vec::new(); phrases.len()],
            typo_suspects: vec![Vec::new(); phrases.len()],
            misspellings: Vec::new(),
            rule_violations: Vec::new(),
            capitalization: Vec::new(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Fold in one block's findings. Must be called in traversal order.
    pub fn absorb(&mut self, block: &Block, findings: BlockFindings) {
        for (index, matches) in findings.phrase_matches.into_iter().enumerate() {
            self.add_occurrences(index, block, matches);
        }
        self.misspellings.extend(to_alerts(block, findings.misspellings));
        self.rule_violations.extend(to_alerts(block, findings.rule_violations));
        self.capitalization.extend(to_alerts(block, findings.capitalization));
    }

    pub fn add_occurrences(&mut self, phrase_index: usize, block: &Block, matches: Vec<TextMatch>) {
        let phrase = &self.phrases[phrase_index];
        self.occurrences[phrase_index].extend(matches.into_iter().map(|m| Occurrence {
            phrase: phrase.clone(),
            location: MatchLocation::new(&block.location, m.line),
            span: m.span,
            snippet: m.snippet,
            text: block.text.clone(),
        }));
    }

    pub fn occurrence_count(&self, phrase_index: usize) -> usize {
        self.occurrences[phrase_index].len()
    }

    /// Phrase indices with no literal occurrence so far
    pub fn missing_indices(&self) -> Vec<usize> {
        (0..self.phrases.len())
            .filter(|&i| self.occurrences[i].is_empty())
            .collect()
    }

    /// Record fuzzy suspects for one phrase, given per-block results in
    /// traversal order. Keeps the nearest suspects, ties broken by token.
    pub fn set_typo_suspects(&mut self, phrase_index: usize, per_block: Vec<(&Block, Vec<TypoMatch>)>) {
        let expected = &self.phrases[phrase_index];
        let mut keyed: Vec<(usize, String, TypoSuspect)> = per_block
            .into_iter()
            .flat_map(|(block, hits)| {
                hits.into_iter().map(move |hit| {
                    let key = hit.typed_in_doc.to_lowercase();
                    let suspect = TypoSuspect {
                        expected: expected.clone(),
                        typed_in_doc: hit.typed_in_doc,
                        distance: hit.distance,
                        location: MatchLocation::new(&block.location, hit.hit.line),
                        span: hit.hit.span,
                        snippet: hit.hit.snippet,
                    };
                    (hit.distance, key, suspect)
                })
            })
            .collect();

        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        keyed.truncate(MAX_TYPO_SUSPECTS_PER_PHRASE);
        self.typo_suspects[phrase_index] = keyed.into_iter().map(|(_, _, s)| s).collect();
    }

    pub fn finish(self) -> Report {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        let mut hits = Vec::with_capacity(self.phrases.len());
        let mut typo_suspects_phrases = 0;

        let per_phrase = self
            .phrases
            .into_iter()
            .zip(self.occurrences)
            .zip(self.typo_suspects);

        for ((phrase, mut occurrences), typo_suspects) in per_phrase {
            let count = occurrences.len();
            if count > 0 {
                found.push(phrase.clone());
            } else {
                missing.push(phrase.clone());
            }
            if !typo_suspects.is_empty() {
                typo_suspects_phrases += 1;
            }
            occurrences.truncate(MAX_OCCURRENCES_PER_PHRASE);
            hits.push(PhraseHits {
                phrase,
                found: count > 0,
                count,
                occurrences,
                typo_suspects,
            });
        }

        let alerts = Alerts {
            misspellings_total: self.misspellings.len(),
            rule_violations_total: self.rule_violations.len(),
            capitalization_total: self.capitalization.len(),
            misspellings: capped(self.misspellings),
            rule_violations: capped(self.rule_violations),
            capitalization: capped(self.capitalization),
        };

        let stats = Stats {
            phrases_total: found.len() + missing.len(),
            found: found.len(),
            missing: missing.len(),
            typo_suspects_phrases,
            misspellings_total: alerts.misspellings_total,
            rule_violations_total: alerts.rule_violations_total,
            capitalization_total: alerts.capitalization_total,
        };

        Report {
            stats,
            found,
            missing,
            hits,
            alerts,
            notes: Notes::default(),
        }
    }
}

fn to_alerts(block: &Block, findings: Vec<Finding>) -> impl Iterator<Item = Alert> + '_ {
    findings.into_iter().map(move |f| Alert {
        kind: f.kind,
        location: MatchLocation::new(&block.location, f.hit.line),
        span: f.hit.span,
        snippet: f.hit.snippet,
    })
}

fn capped(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.truncate(MAX_ALERTS_PER_CATEGORY);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlertKind, Area, BlockKind, Location, MatchSpan, StructuralIndices};
    use pretty_assertions::assert_eq;

    fn block(index: u32, text: &str) -> Block {
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

    fn text_match(start: usize, end: usize) -> TextMatch {
        TextMatch {
            span: MatchSpan { start, end },
            line: 1,
            snippet: String::new(),
        }
    }

    fn typo(token: &str, distance: usize) -> TypoMatch {
        TypoMatch {
            typed_in_doc: token.to_string(),
            distance,
            hit: text_match(0, token.chars().count()),
        }
    }

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn found_and_missing_partition_phrases_in_order() {
        let mut agg = ReportAggregator::new(&phrases(&["a", "b", "c"]));
        let b1 = block(1, "c a");
        agg.add_occurrences(2, &b1, vec![text_match(0, 1)]);
        agg.add_occurrences(0, &b1, vec![text_match(2, 3)]);
        assert_eq!(agg.missing_indices(), vec![1]);

        let report = agg.finish();
        assert_eq!(report.found, phrases(&["a", "c"]));
        assert_eq!(report.missing, phrases(&["b"]));
        assert_eq!(report.stats.phrases_total, 3);
        assert_eq!(report.hits.iter().map(|h| h.found).collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn occurrence_count_is_uncapped_but_list_is_capped() {
        let mut agg = ReportAggregator::new(&phrases(&["x"]));
        let b1 = block(1, "x");
        let matches = (0..MAX_OCCURRENCES_PER_PHRASE + 25).map(|i| text_match(i, i + 1)).collect();
        agg.add_occurrences(0, &b1, matches);

        let report = agg.finish();
        let hits = report.hits_for("x").unwrap();
        assert_eq!(hits.count, MAX_OCCURRENCES_PER_PHRASE + 25);
        assert_eq!(hits.occurrences.len(), MAX_OCCURRENCES_PER_PHRASE);
        assert_eq!(hits.occurrences[0].span.start, 0);
    }

    #[test]
    fn alert_totals_count_before_truncation() {
        let mut agg = ReportAggregator::new(&phrases(&["x"]));
        let b1 = block(1, "SƠn");
        let findings = BlockFindings {
            phrase_matches: vec![Vec::new()],
            misspellings: Vec::new(),
            rule_violations: Vec::new(),
            capitalization: (0..MAX_ALERTS_PER_CATEGORY + 1)
                .map(|_| Finding {
                    kind: AlertKind::MixedCase {
                        word: "SƠn".to_string(),
                        message: String::new(),
                    },
                    hit: text_match(0, 3),
                })
                .collect(),
        };
        agg.absorb(&b1, findings);

        let report = agg.finish();
        assert_eq!(report.alerts.capitalization_total, MAX_ALERTS_PER_CATEGORY + 1);
        assert_eq!(report.stats.capitalization_total, MAX_ALERTS_PER_CATEGORY + 1);
        assert_eq!(report.alerts.capitalization.len(), MAX_ALERTS_PER_CATEGORY);
    }

    #[test]
    fn typo_suspects_sorted_across_blocks_and_counted() {
        let mut agg = ReportAggregator::new(&phrases(&["toán", "sắm"]));
        let b1 = block(1, "toan");
        let b2 = block(2, "táon tan");
        agg.set_typo_suspects(0, vec![(&b1, vec![typo("toan", 1)]), (&b2, vec![typo("táon", 1), typo("tan", 2)])]);

        let report = agg.finish();
        let suspects = &report.hits_for("toán").unwrap().typo_suspects;
        let tokens: Vec<&str> = suspects.iter().map(|s| s.typed_in_doc.as_str()).collect();
        assert_eq!(tokens, vec!["toan", "táon", "tan"]);
        assert_eq!(suspects[1].location.location.indices.paragraph_index, Some(2));
        assert_eq!(report.stats.typo_suspects_phrases, 1);
    }

    #[test]
    fn typo_suspects_capped_per_phrase() {
        let mut agg = ReportAggregator::new(&phrases(&["toán"]));
        let b1 = block(1, "toan");
        let hits = (0..MAX_TYPO_SUSPECTS_PER_PHRASE + 5).map(|_| typo("toan", 1)).collect();
        agg.set_typo_suspects(0, vec![(&b1, hits)]);
        let report = agg.finish();
        assert_eq!(report.hits[0].typo_suspects.len(), MAX_TYPO_SUSPECTS_PER_PHRASE);
    }

    #[test]
    fn clean_report_needs_all_phrases_and_no_alerts() {
        let b1 = block(1, "x");

        let mut agg = ReportAggregator::new(&phrases(&["x"]));
        agg.add_occurrences(0, &b1, vec![text_match(0, 1)]);
        assert!(agg.finish().is_clean());

        let missing = ReportAggregator::new(&phrases(&["x"])).finish();
        assert!(!missing.is_clean());

        let mut agg = ReportAggregator::new(&phrases(&["x"]));
        agg.absorb(
            &b1,
            BlockFindings {
                phrase_matches: vec![vec![text_match(0, 1)]],
                misspellings: vec![Finding {
                    kind: AlertKind::ForbiddenWord {
                        wrong_word: "qá".to_string(),
                        canonical: "qá".to_string(),
                    },
                    hit: text_match(0, 2),
                }],
                ..Default::default()
            },
        );
        assert!(!agg.finish().is_clean());
    }
}
