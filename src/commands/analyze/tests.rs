use super::*;

use tempfile::tempdir;

use super::run::build_report;

fn analyze_args(pages_json: Option<PathBuf>) -> AnalyzeArgs {
    AnalyzeArgs {
        persona: "Travel Planner".to_string(),
        job: "Plan a trip of 4 days for a group of 10 college friends".to_string(),
        pdfs: Vec::new(),
        input_dir: None,
        pages_json,
        output: None,
        json: true,
        extractor: ExtractorMode::Auto,
        max_pages_per_doc: None,
        clean_pages: false,
        min_section_length: 100,
        max_summary_length: 500,
        max_sections: 20,
        summary_limit: 10,
    }
}

fn write_travel_manifest(dir: &Path) -> PathBuf {
    let manifest = serde_json::json!({
        "documents": [
            {
                "name": "south_of_france_cities.pdf",
                "pages": [
                    "1. Nice\nNice is a coastal city with a long promenade, budget hostels and lively nightlife that groups of college friends enjoy on a short trip.\n2. Avignon\nAvignon is known for its papal palace and medieval walls, and the summer theatre festival draws visitors from across Europe every July.",
                    ""
                ]
            },
            {
                "name": "south_of_france_tips.pdf",
                "pages": [
                    "1. Packing\nPack light layers, comfortable walking shoes and a reusable bottle; a group of friends can share chargers and toiletries to save space on a trip."
                ]
            },
            { "name": "scanned.pdf" }
        ]
    });
    let path = dir.join("pages.json");
    fs::write(&path, serde_json::to_vec_pretty(&manifest).expect("serialize manifest"))
        .expect("write manifest");
    path
}

#[test]
fn pages_manifest_accepts_documents_without_pages() {
    let dir = tempdir().expect("tempdir");
    let path = write_travel_manifest(dir.path());

    let documents = load_pages_manifest(&path).expect("manifest should parse");
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0].pages.len(), 2);
    assert!(documents[2].pages.is_empty());
    assert!(!documents[2].has_text());
}

#[test]
fn malformed_pages_manifest_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"documents\": 3}").expect("write manifest");

    let error = load_pages_manifest(&path).expect_err("manifest should be rejected");
    assert!(format!("{error:#}").contains("broken.json"));
}

#[test]
fn collect_pdf_paths_skips_non_pdfs_and_dedupes() {
    let dir = tempdir().expect("tempdir");
    for name in ["b.pdf", "A.PDF", "notes.txt"] {
        fs::write(dir.path().join(name), b"stub").expect("write fixture");
    }
    fs::create_dir(dir.path().join("nested.pdf")).expect("create dir");

    let explicit = vec![dir.path().join("b.pdf"), dir.path().join("notes.txt")];
    let paths = collect_pdf_paths(&explicit, Some(dir.path())).expect("collect paths");

    assert_eq!(
        paths,
        vec![dir.path().join("b.pdf"), dir.path().join("A.PDF")]
    );
}

#[test]
fn missing_input_dir_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let result = collect_pdf_paths(&[], Some(&dir.path().join("absent")));
    assert!(result.is_err());
}

#[test]
fn clean_pages_removes_running_headers_and_merges_hyphenation() {
    let mut pages = (1..=3)
        .map(|page| {
            format!(
                "Regional Travel Guide\nDay {page} covers the inter-\nnational airport transfer.\nPage footer text"
            )
        })
        .collect::<Vec<String>>();

    let stats = clean_pages(&mut pages);

    assert_eq!(stats.header_lines_removed, 3);
    assert_eq!(stats.footer_lines_removed, 3);
    assert_eq!(stats.dehyphenation_merges, 3);
    assert_eq!(pages.len(), 3);
    assert_eq!(
        pages[0],
        "Day 1 covers the international airport transfer."
    );
}

#[test]
fn clean_pages_keeps_edges_seen_on_too_few_pages() {
    let mut pages = vec![
        "Shared heading\nFirst body line".to_string(),
        "Shared heading\nSecond body line".to_string(),
    ];

    let stats = clean_pages(&mut pages);

    assert_eq!(stats, PageCleanupStats::default());
    assert!(pages[0].starts_with("Shared heading"));
}

#[test]
fn pdftotext_output_keeps_blank_pages_and_drops_final_terminator() {
    let pages = split_pdftotext_pages("page one\u{000C}\u{000C}page\u{0000} three\u{000C}");
    assert_eq!(pages, vec!["page one", "", "page three"]);

    let trailing_blank = split_pdftotext_pages("only text\u{000C}\u{000C}");
    assert_eq!(trailing_blank, vec!["only text", ""]);

    assert!(split_pdftotext_pages("").is_empty());
}

#[test]
fn unreadable_pdf_fails_in_process_extraction() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("garbage.pdf");
    fs::write(&path, b"this is not a pdf").expect("write fixture");

    let result = extract_pdf_pages(&path, ExtractorMode::PdfExtract, None);
    assert!(result.is_err());
}

#[test]
fn unreadable_pdf_is_kept_with_failure_reason() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("garbage.pdf");
    fs::write(&path, b"this is not a pdf").expect("write fixture");

    let mut args = analyze_args(None);
    args.pdfs = vec![path];
    args.extractor = ExtractorMode::PdfExtract;

    let inputs = load_inputs(&args).expect("load inputs");
    assert_eq!(inputs.documents.len(), 1);
    assert!(inputs.documents[0].pages.is_empty());
    assert!(inputs.sources[0].failure_reason.is_some());
    assert!(inputs.sources[0].sha256.is_some());
}

#[test]
fn pages_manifest_run_builds_report() {
    let dir = tempdir().expect("tempdir");
    let args = analyze_args(Some(write_travel_manifest(dir.path())));
    let query = Query::new(&args.persona, &args.job).expect("query");
    let config = args.analysis_config();

    let inputs = load_inputs(&args).expect("load inputs");
    assert_eq!(inputs.sources.len(), 3);
    assert!(
        inputs
            .sources
            .iter()
            .all(|source| source.backend.as_deref() == Some("pages-json"))
    );

    let segmenter = Segmenter::new(config.min_section_length).expect("segmenter");
    let output =
        run_pipeline(&inputs.documents, &query, &segmenter, &config).expect("pipeline");
    let report = build_report("run-test".to_string(), &query, inputs, output, 0.25);

    assert_eq!(report.metadata.input_documents.len(), 3);
    assert_eq!(report.metadata.total_documents_processed, 2);
    assert_eq!(report.metadata.total_sections_extracted, 3);
    assert!(report.metadata.processing_timestamp.ends_with('Z'));
    assert!(!report.extracted_sections.is_empty());
    assert_eq!(report.extracted_sections[0].importance_rank, 1);

    let json = serde_json::to_value(&report).expect("report json");
    assert_eq!(json["metadata"]["persona"], "Travel Planner");
    assert!(json["subsection_analysis"].is_array());

    let mut rendered = Vec::new();
    render_text_report(&mut rendered, &report).expect("render text");
    let rendered = String::from_utf8(rendered).expect("utf8 output");
    assert!(rendered.starts_with("Persona: Travel Planner\n"));
    assert!(rendered.contains("Sections: "));
    assert!(rendered.contains("Summaries: "));
}

#[test]
fn run_writes_report_file() {
    let dir = tempdir().expect("tempdir");
    let mut args = analyze_args(Some(write_travel_manifest(dir.path())));
    let output_path = dir.path().join("out").join("report.json");
    args.output = Some(output_path.clone());

    run(args).expect("run should succeed");

    let raw = fs::read(&output_path).expect("report written");
    let json: serde_json::Value = serde_json::from_slice(&raw).expect("valid json");
    assert!(
        json["metadata"]["run_id"]
            .as_str()
            .is_some_and(|id| id.starts_with("run-"))
    );
    assert!(
        !json["extracted_sections"]
            .as_array()
            .expect("sections array")
            .is_empty()
    );
}

#[test]
fn run_without_inputs_fails_before_loading() {
    let error = run(analyze_args(None)).expect_err("missing inputs must fail");
    assert!(error.to_string().contains("no input documents"));
}
