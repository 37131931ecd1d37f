use super::*;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    if !args.has_input() {
        bail!("no input documents; pass --pdf, --input-dir or --pages-json");
    }

    let started = Instant::now();
    let run_id = format!("run-{}", utc_compact_string(Utc::now()));
    let query = Query::new(&args.persona, &args.job)?;
    let config = args.analysis_config();

    info!(
        run_id = %run_id,
        extractor = args.extractor.as_str(),
        "starting persona analysis"
    );

    let inputs = load_inputs(&args)?;
    let segmenter = Segmenter::new(config.min_section_length)?;
    let output = run_pipeline(&inputs.documents, &query, &segmenter, &config)
        .with_context(|| format!("analysis run {run_id} failed"))?;

    let report = build_report(
        run_id,
        &query,
        inputs,
        output,
        started.elapsed().as_secs_f64(),
    );
    info!(
        sections = report.extracted_sections.len(),
        summaries = report.subsection_analysis.len(),
        duration_s = report.metadata.processing_time,
        "analysis completed"
    );

    if let Some(path) = &args.output {
        write_json_pretty(path, &report)?;
        info!(path = %path.display(), "wrote analysis report");
    }

    if args.json {
        write_json_response(&report)
    } else {
        write_text_response(&report)
    }
}

pub(super) fn build_report(
    run_id: String,
    query: &Query,
    inputs: LoadedInputs,
    output: PipelineOutput,
    processing_time: f64,
) -> AnalysisReport {
    let metadata = RunMetadata {
        run_id,
        input_documents: inputs
            .documents
            .iter()
            .map(|document| document.name.clone())
            .collect(),
        persona: query.persona.clone(),
        job_to_be_done: query.task.clone(),
        processing_timestamp: utc_rfc3339_string(Utc::now()),
        processing_time,
        total_sections_extracted: output.sections_extracted,
        total_documents_processed: output.documents_processed,
        relevance_threshold: output.threshold,
        sources: inputs.sources,
    };

    AnalysisReport {
        metadata,
        extracted_sections: output
            .ranked
            .into_iter()
            .map(ExtractedSection::from)
            .collect(),
        subsection_analysis: output.summaries,
    }
}
