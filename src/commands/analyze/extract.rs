use super::*;

#[derive(Debug)]
pub(super) struct ExtractedPages {
    pub(super) pages: Vec<String>,
    pub(super) backend: &'static str,
}

/// Per-page text for one PDF. Pages that fail to decode are empty strings.
/// In auto mode a pdftotext failure or an all-blank result falls back to the
/// in-process extractor.
pub(super) fn extract_pdf_pages(
    pdf_path: &Path,
    mode: ExtractorMode,
    max_pages_per_doc: Option<usize>,
) -> Result<ExtractedPages> {
    match mode {
        ExtractorMode::Pdftotext => Ok(ExtractedPages {
            pages: extract_pages_with_pdftotext(pdf_path, max_pages_per_doc)?,
            backend: "pdftotext",
        }),
        ExtractorMode::PdfExtract => Ok(ExtractedPages {
            pages: extract_pages_with_pdf_extract(pdf_path, max_pages_per_doc)?,
            backend: "pdf-extract",
        }),
        ExtractorMode::Auto => {
            let primary = match extract_pages_with_pdftotext(pdf_path, max_pages_per_doc) {
                Ok(pages) if pages_have_text(&pages) => {
                    return Ok(ExtractedPages {
                        pages,
                        backend: "pdftotext",
                    });
                }
                Ok(_) => anyhow!("pdftotext produced no text"),
                Err(error) => error,
            };

            warn!(
                path = %pdf_path.display(),
                reason = %primary,
                "primary extraction failed; trying pdf-extract"
            );
            let pages = extract_pages_with_pdf_extract(pdf_path, max_pages_per_doc)
                .with_context(|| format!("fallback extraction failed after: {primary}"))?;
            Ok(ExtractedPages {
                pages,
                backend: "pdf-extract",
            })
        }
    }
}

pub(super) fn pages_have_text(pages: &[String]) -> bool {
    pages.iter().any(|page| !page.trim().is_empty())
}

fn extract_pages_with_pdftotext(
    pdf_path: &Path,
    max_pages_per_doc: Option<usize>,
) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages_per_doc {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pdftotext_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// One entry per form-feed-terminated page. Blank pages are kept so page
/// numbers match the source.
pub(super) fn split_pdftotext_pages(raw: &str) -> Vec<String> {
    let mut pages = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    // pdftotext terminates every page with a form feed, leaving one empty tail.
    if pages.last().is_some_and(|page| page.trim().is_empty()) {
        pages.pop();
    }

    pages
}

fn extract_pages_with_pdf_extract(
    pdf_path: &Path,
    max_pages_per_doc: Option<usize>,
) -> Result<Vec<String>> {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(pdf_path)
    }));

    let mut pages = match outcome {
        Ok(Ok(pages)) => pages,
        Ok(Err(error)) => bail!("pdf-extract failed for {}: {error}", pdf_path.display()),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|value| value.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            bail!("pdf-extract panicked for {}: {message}", pdf_path.display());
        }
    };

    if let Some(max_pages) = max_pages_per_doc {
        pages.truncate(max_pages);
    }

    Ok(pages
        .into_iter()
        .map(|page| page.replace('\u{0000}', ""))
        .collect())
}
