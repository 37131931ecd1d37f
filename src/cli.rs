use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::analysis::{AnalysisConfig, SignalWeights};

#[derive(Parser, Debug)]
#[command(
    name = "docpersona",
    version,
    about = "Persona-driven section ranking and summarization for PDF collections"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Analyze(AnalyzeArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExtractorMode {
    Auto,
    Pdftotext,
    PdfExtract,
}

impl ExtractorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pdftotext => "pdftotext",
            Self::PdfExtract => "pdf-extract",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub persona: String,

    #[arg(long = "job", alias = "job-to-be-done")]
    pub job: String,

    #[arg(long = "pdf")]
    pub pdfs: Vec<PathBuf>,

    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    #[arg(long)]
    pub pages_json: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, value_enum, default_value_t = ExtractorMode::Auto)]
    pub extractor: ExtractorMode,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub clean_pages: bool,

    #[arg(long, default_value_t = 100)]
    pub min_section_length: usize,

    #[arg(long, default_value_t = 500)]
    pub max_summary_length: usize,

    #[arg(long, default_value_t = 20)]
    pub max_sections: usize,

    #[arg(long, default_value_t = 10)]
    pub summary_limit: usize,
}

impl AnalyzeArgs {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_section_length: self.min_section_length,
            max_summary_length: self.max_summary_length.max(1),
            max_ranked_sections: self.max_sections.max(1),
            summary_limit: self.summary_limit,
            weights: SignalWeights::default(),
            ..AnalysisConfig::default()
        }
    }

    pub fn has_input(&self) -> bool {
        !self.pdfs.is_empty() || self.input_dir.is_some() || self.pages_json.is_some()
    }
}
