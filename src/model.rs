use serde::{Deserialize, Serialize};

use crate::analysis::{RankedSection, SectionSummary, SignalScores, ThresholdStats};

/// Pre-extracted page text, one entry per document.
#[derive(Debug, Clone, Deserialize)]
pub struct PagesManifest {
    pub documents: Vec<PagesManifestDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesManifestDocument {
    pub name: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceDocument {
    pub name: String,
    pub path: Option<String>,
    pub sha256: Option<String>,
    pub page_count: usize,
    pub backend: Option<String>,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
    pub processing_time: f64,
    pub total_sections_extracted: usize,
    pub total_documents_processed: usize,
    pub relevance_threshold: ThresholdStats,
    pub sources: Vec<SourceDocument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedSection {
    pub document_name: String,
    pub page_number: usize,
    pub section_title: String,
    pub content: String,
    pub content_preview: String,
    pub word_count: usize,
    pub section_id: String,
    pub relevance_score: f64,
    pub importance_rank: usize,
    pub signals: SignalScores,
}

impl From<RankedSection> for ExtractedSection {
    fn from(entry: RankedSection) -> Self {
        let section = entry.section;
        Self {
            document_name: section.document_name,
            page_number: section.page_number,
            section_title: section.section_title,
            content: section.content,
            content_preview: section.content_preview,
            word_count: section.word_count,
            section_id: section.section_id,
            relevance_score: entry.relevance_score,
            importance_rank: entry.importance_rank,
            signals: entry.signals,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: RunMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SectionSummary>,
}
