use tracing::{info, warn};

use super::ranking::{ThresholdStats, rank_sections};
use super::relevance::score_sections;
use super::{
    AnalysisConfig, AnalysisError, DocumentPages, Query, RankedSection, Section, SectionSummary,
    Segmenter, Summarizer,
};

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub ranked: Vec<RankedSection>,
    pub summaries: Vec<SectionSummary>,
    pub threshold: ThresholdStats,
    pub sections_extracted: usize,
    pub documents_processed: usize,
}

/// Segments every usable document, ranks the pooled sections against the
/// query and summarizes the best of them. Documents without any text are
/// skipped; the run fails only when nothing usable remains.
pub fn run_pipeline(
    documents: &[DocumentPages],
    query: &Query,
    segmenter: &Segmenter,
    config: &AnalysisConfig,
) -> Result<PipelineOutput, AnalysisError> {
    if documents.is_empty() {
        return Err(AnalysisError::NoInput);
    }

    let usable = documents
        .iter()
        .filter(|document| {
            let has_text = document.has_text();
            if !has_text {
                warn!(document = %document.name, "document has no extractable text; skipping");
            }
            has_text
        })
        .collect::<Vec<&DocumentPages>>();
    if usable.is_empty() {
        return Err(AnalysisError::NoExtractableText {
            attempted: documents.len(),
        });
    }

    let sections = usable
        .iter()
        .copied()
        .flat_map(DocumentPages::page_texts)
        .flat_map(|page| segmenter.segment_page(page))
        .collect::<Vec<Section>>();
    let sections_extracted = sections.len();
    info!(
        documents = usable.len(),
        sections = sections_extracted,
        "segmented documents"
    );
    if sections.is_empty() {
        return Err(AnalysisError::NoSections {
            documents: usable.len(),
        });
    }

    let scored = score_sections(sections, query, &config.weights);
    let outcome = rank_sections(scored, query, config);
    if outcome.ranked.is_empty() {
        return Err(AnalysisError::NothingSurvivedRanking {
            candidates: outcome.candidate_count,
        });
    }
    info!(
        ranked = outcome.ranked.len(),
        threshold = outcome.stats.threshold,
        "ranked sections"
    );

    let summarizer = Summarizer::new(config);
    let summaries = outcome
        .ranked
        .iter()
        .take(config.summary_limit)
        .map(|entry| summarizer.summarize_section(&entry.section))
        .collect::<Vec<SectionSummary>>();

    Ok(PipelineOutput {
        ranked: outcome.ranked,
        summaries,
        threshold: outcome.stats,
        sections_extracted,
        documents_processed: usable.len(),
    })
}
