use super::*;

pub(super) fn write_json_response(report: &AnalysisReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize analysis json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

pub(super) fn write_text_response(report: &AnalysisReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    render_text_report(&mut output, report)?;
    output.flush()?;
    Ok(())
}

pub(super) fn render_text_report<W: Write>(output: &mut W, report: &AnalysisReport) -> Result<()> {
    let metadata = &report.metadata;

    writeln!(output, "Persona: {}", metadata.persona)?;
    writeln!(output, "Job: {}", metadata.job_to_be_done)?;
    writeln!(
        output,
        "Run: id={} documents={}/{} sections={} threshold={:.6} duration_s={:.3}",
        metadata.run_id,
        metadata.total_documents_processed,
        metadata.input_documents.len(),
        metadata.total_sections_extracted,
        metadata.relevance_threshold.threshold,
        metadata.processing_time,
    )?;
    for source in metadata.sources.iter().filter(|source| source.failure_reason.is_some()) {
        writeln!(
            output,
            "Skipped: {} ({})",
            source.name,
            source.failure_reason.as_deref().unwrap_or_default()
        )?;
    }

    writeln!(output, "Sections: {}", report.extracted_sections.len())?;
    for section in &report.extracted_sections {
        writeln!(
            output,
            "{}.\t{}\tpage {}\t{}",
            section.importance_rank, section.document_name, section.page_number, section.section_title
        )?;
        writeln!(
            output,
            "\tscore={:.6} lexical={:.6} keyword={:.6} entity={:.6} section_id={}",
            section.relevance_score,
            section.signals.lexical,
            section.signals.keyword,
            section.signals.entity,
            section.section_id
        )?;
        writeln!(output, "\tpreview: {}", section.content_preview)?;
    }

    writeln!(output, "Summaries: {}", report.subsection_analysis.len())?;
    for (index, summary) in report.subsection_analysis.iter().enumerate() {
        writeln!(
            output,
            "{}.\t{}\tpage {}\t{}\tcompression={:.3}",
            index + 1,
            summary.document_name,
            summary.page_number,
            summary.section_title,
            summary.compression_ratio
        )?;
        writeln!(output, "\t{}", summary.refined_extracted_text)?;
    }

    Ok(())
}
