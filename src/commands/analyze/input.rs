use super::*;

/// Documents handed to the pipeline plus the provenance recorded for each.
#[derive(Debug, Default)]
pub(super) struct LoadedInputs {
    pub(super) documents: Vec<DocumentPages>,
    pub(super) sources: Vec<SourceDocument>,
}

pub(super) fn load_inputs(args: &AnalyzeArgs) -> Result<LoadedInputs> {
    let mut inputs = LoadedInputs::default();

    if let Some(pages_json) = &args.pages_json {
        for document in load_pages_manifest(pages_json)? {
            inputs.sources.push(SourceDocument {
                name: document.name.clone(),
                path: Some(pages_json.display().to_string()),
                sha256: None,
                page_count: document.pages.len(),
                backend: Some("pages-json".to_string()),
                failure_reason: None,
            });
            inputs.documents.push(document);
        }
    }

    for pdf_path in collect_pdf_paths(&args.pdfs, args.input_dir.as_deref())? {
        let (document, source) = load_pdf(&pdf_path, args)?;
        inputs.documents.push(document);
        inputs.sources.push(source);
    }

    Ok(inputs)
}

/// A document that fails extraction is still returned, with no pages, so the
/// pipeline can account for it.
fn load_pdf(pdf_path: &Path, args: &AnalyzeArgs) -> Result<(DocumentPages, SourceDocument)> {
    let name = pdf_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", pdf_path.display()))?;
    let sha256 = match sha256_file(pdf_path) {
        Ok(hash) => Some(hash),
        Err(error) => {
            warn!(document = %name, error = %format!("{error:#}"), "failed to fingerprint document");
            None
        }
    };

    let (pages, backend, failure_reason) =
        match extract_pdf_pages(pdf_path, args.extractor, args.max_pages_per_doc) {
            Ok(mut extracted) => {
                if args.clean_pages {
                    let stats = clean_pages(&mut extracted.pages);
                    info!(
                        document = %name,
                        header_lines_removed = stats.header_lines_removed,
                        footer_lines_removed = stats.footer_lines_removed,
                        dehyphenation_merges = stats.dehyphenation_merges,
                        "cleaned pages"
                    );
                }
                let failure_reason = (!pages_have_text(&extracted.pages))
                    .then(|| "no text on any page".to_string());
                (extracted.pages, Some(extracted.backend.to_string()), failure_reason)
            }
            Err(error) => {
                warn!(document = %name, error = %format!("{error:#}"), "text extraction failed");
                (Vec::new(), None, Some(format!("{error:#}")))
            }
        };

    info!(
        document = %name,
        pages = pages.len(),
        backend = backend.as_deref().unwrap_or("none"),
        "extracted document"
    );

    let source = SourceDocument {
        name: name.clone(),
        path: Some(pdf_path.display().to_string()),
        sha256,
        page_count: pages.len(),
        backend,
        failure_reason,
    };
    Ok((DocumentPages { name, pages }, source))
}

pub(super) fn load_pages_manifest(path: &Path) -> Result<Vec<DocumentPages>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: PagesManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(manifest
        .documents
        .into_iter()
        .map(|document| DocumentPages {
            name: document.name,
            pages: document.pages,
        })
        .collect())
}

/// Explicit paths first, then the sorted PDFs of `input_dir`. Non-PDF paths
/// are skipped and duplicates collapse.
pub(super) fn collect_pdf_paths(pdfs: &[PathBuf], input_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut candidates = pdfs.to_vec();
    if let Some(dir) = input_dir {
        let mut discovered = discover_pdfs(dir)?;
        discovered.sort();
        candidates.extend(discovered);
    }

    let mut seen = HashSet::<PathBuf>::new();
    let mut paths = Vec::with_capacity(candidates.len());
    for path in candidates {
        if !is_pdf(&path) {
            warn!(path = %path.display(), "skipping non-PDF input");
            continue;
        }
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }

    Ok(paths)
}

fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if is_pdf(&path) {
            pdfs.push(path);
        }
    }

    Ok(pdfs)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
