use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::text::extract_keywords;
use super::{AnalysisConfig, Query, RankedSection, ScoredSection};

const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdStats {
    pub mean: f64,
    pub std_dev: f64,
    pub threshold: f64,
}

impl ThresholdStats {
    /// Population mean and standard deviation; an empty list gets the
    /// default threshold.
    pub fn from_scores(scores: &[f64], stddev_factor: f64) -> Self {
        if scores.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                threshold: DEFAULT_THRESHOLD,
            };
        }

        let count = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / count;
        let variance = scores
            .iter()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / count;
        let std_dev = variance.sqrt();

        Self {
            mean,
            std_dev,
            threshold: mean + stddev_factor * std_dev,
        }
    }

    pub fn admits(&self, score: f64) -> bool {
        score >= self.threshold
    }
}

#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub ranked: Vec<RankedSection>,
    pub stats: ThresholdStats,
    pub candidate_count: usize,
    pub above_threshold_count: usize,
}

fn descending(left: f64, right: f64) -> Ordering {
    right.total_cmp(&left)
}

/// Sorts, thresholds, boosts and caps the scored sections. The threshold is
/// computed once from the unboosted scores of every candidate.
pub fn rank_sections(
    mut scored: Vec<ScoredSection>,
    query: &Query,
    config: &AnalysisConfig,
) -> RankingOutcome {
    let candidate_count = scored.len();
    if scored.is_empty() {
        return RankingOutcome {
            ranked: Vec::new(),
            stats: ThresholdStats::from_scores(&[], config.threshold_stddev_factor),
            candidate_count,
            above_threshold_count: 0,
        };
    }

    scored.sort_by(|left, right| descending(left.signals.combined, right.signals.combined));

    let scores = scored
        .iter()
        .map(|entry| entry.signals.combined)
        .collect::<Vec<f64>>();
    let stats = ThresholdStats::from_scores(&scores, config.threshold_stddev_factor);
    scored.retain(|entry| stats.admits(entry.signals.combined));
    let above_threshold_count = scored.len();

    let persona_keywords = extract_keywords(&query.persona);
    let task_keywords = extract_keywords(&query.task);

    let mut boosted = scored
        .into_iter()
        .map(|entry| {
            let content = entry.section.content.to_lowercase();
            let hits = persona_keywords
                .iter()
                .chain(&task_keywords)
                .filter(|keyword| content.contains(keyword.as_str()))
                .count();
            let relevance_score = if hits > 0 {
                entry.signals.combined * (1.0 + config.boost_per_hit * hits as f64)
            } else {
                entry.signals.combined
            };
            (entry, relevance_score)
        })
        .collect::<Vec<(ScoredSection, f64)>>();

    boosted.sort_by(|left, right| descending(left.1, right.1));
    boosted.truncate(config.max_ranked_sections);

    debug!(
        candidates = candidate_count,
        above_threshold = above_threshold_count,
        kept = boosted.len(),
        threshold = stats.threshold,
        "ranked sections"
    );

    let ranked = boosted
        .into_iter()
        .enumerate()
        .map(|(index, (entry, relevance_score))| RankedSection {
            section: entry.section,
            signals: entry.signals,
            relevance_score,
            importance_rank: index + 1,
        })
        .collect();

    RankingOutcome {
        ranked,
        stats,
        candidate_count,
        above_threshold_count,
    }
}
