//! Persona-driven section ranking and extractive summarization.
//!
//! Pages flow through four stages, each producing a new record type:
//! [`Section`] from the segmenter, [`ScoredSection`] from the relevance
//! scorer, [`RankedSection`] from the ranking filter and [`SectionSummary`]
//! from the summarizer.

use serde::Serialize;
use thiserror::Error;

mod pipeline;
mod ranking;
mod relevance;
mod segment;
mod summarize;
mod text;

pub use pipeline::{PipelineOutput, run_pipeline};
pub use ranking::{RankingOutcome, ThresholdStats, rank_sections};
pub use relevance::score_sections;
pub use segment::Segmenter;
pub use summarize::Summarizer;

/// One page of plain text from a source document.
#[derive(Debug, Clone)]
pub struct PageText {
    pub document_name: String,
    /// 1-based.
    pub page_number: usize,
    pub text: String,
}

/// All pages of one document, in order. Pages that could not be decoded are
/// empty strings so numbering stays stable.
#[derive(Debug, Clone)]
pub struct DocumentPages {
    pub name: String,
    pub pages: Vec<String>,
}

impl DocumentPages {
    pub fn page_texts(&self) -> impl Iterator<Item = PageText> + '_ {
        self.pages.iter().enumerate().map(|(index, text)| PageText {
            document_name: self.name.clone(),
            page_number: index + 1,
            text: text.clone(),
        })
    }

    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|page| !page.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub document_name: String,
    pub page_number: usize,
    pub section_title: String,
    pub content: String,
    pub content_preview: String,
    pub word_count: usize,
    pub section_id: String,
}

/// Persona plus job-to-be-done, the comparison target for every signal.
#[derive(Debug, Clone)]
pub struct Query {
    pub persona: String,
    pub task: String,
}

impl Query {
    pub fn new(persona: &str, task: &str) -> Result<Self, AnalysisError> {
        let persona = persona.trim();
        let task = task.trim();
        if persona.is_empty() {
            return Err(AnalysisError::MissingPersona);
        }
        if task.is_empty() {
            return Err(AnalysisError::MissingTask);
        }
        Ok(Self {
            persona: persona.to_string(),
            task: task.to_string(),
        })
    }

    pub fn text(&self) -> String {
        format!("{} {}", self.persona, self.task)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalScores {
    pub lexical: f64,
    pub keyword: f64,
    pub entity: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSection {
    pub section: Section,
    pub signals: SignalScores,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedSection {
    pub section: Section,
    pub signals: SignalScores,
    /// Combined score after the persona/task boost.
    pub relevance_score: f64,
    /// 1-based position in the final ordering.
    pub importance_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub document_name: String,
    pub page_number: usize,
    pub section_title: String,
    pub refined_extracted_text: String,
    pub original_length: usize,
    pub summary_length: usize,
    pub compression_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalWeights {
    pub lexical: f64,
    pub keyword: f64,
    pub entity: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            lexical: 0.5,
            keyword: 0.3,
            entity: 0.2,
        }
    }
}

impl SignalWeights {
    pub fn combine(&self, lexical: f64, keyword: f64, entity: f64) -> f64 {
        self.lexical * lexical + self.keyword * keyword + self.entity * entity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub min_section_length: usize,
    pub max_summary_length: usize,
    pub min_sentence_length: usize,
    pub max_ranked_sections: usize,
    pub summary_limit: usize,
    pub threshold_stddev_factor: f64,
    pub boost_per_hit: f64,
    pub weights: SignalWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_section_length: 100,
            max_summary_length: 500,
            min_sentence_length: 10,
            max_ranked_sections: 20,
            summary_limit: 10,
            threshold_stddev_factor: 0.5,
            boost_per_hit: 0.1,
            weights: SignalWeights::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("persona must not be empty")]
    MissingPersona,
    #[error("job to be done must not be empty")]
    MissingTask,
    #[error("no documents were supplied")]
    NoInput,
    #[error("no text could be extracted from any of the {attempted} documents")]
    NoExtractableText { attempted: usize },
    #[error("no sections could be extracted from {documents} documents")]
    NoSections { documents: usize },
    #[error("none of the {candidates} extracted sections survived relevance ranking")]
    NothingSurvivedRanking { candidates: usize },
}
