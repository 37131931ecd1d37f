use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use super::text::{
    ELLIPSIS, char_len, char_prefix, clip_at_word_boundary, condense_whitespace,
};
use super::{PageText, Section};

const TITLE_MAX_CHARS: usize = 100;
const TITLE_MAX_WORDS: usize = 12;
const TITLE_SENTENCE_MAX_CHARS: usize = 80;
const TITLE_FALLBACK_CHARS: usize = 50;
const PREVIEW_MAX_CHARS: usize = 200;
const PARAGRAPH_MIN_COUNT: usize = 4;
const PARAGRAPH_MIN_CHARS: usize = 50;

/// Boundary patterns in priority order. The first one that matches anywhere
/// in the page decides the split.
const BOUNDARY_PATTERNS: &[(&str, &str)] = &[
    ("numbered", r"\n\s*\d+\.\s+"),
    ("title_line", r"\n\s*[A-Z][^.\n]{20,}\n"),
    ("all_caps", r"\n\s*[A-Z]{2,}[:\s]"),
    ("chapter_marker", r"\n\s*\w+\s+\d+\s*\n"),
    ("markdown", r"\n\s*#+\s+"),
    ("introduction", r"(?i)\n\s*introduction\s*\n"),
    ("conclusion", r"(?i)\n\s*conclusion\s*\n"),
    ("abstract", r"(?i)\n\s*abstract\s*\n"),
    ("references", r"(?i)\n\s*references\s*\n"),
    ("methods", r"(?i)\n\s*methods\s*\n"),
    ("results", r"(?i)\n\s*results\s*\n"),
];

#[derive(Debug)]
struct BoundaryPattern {
    name: &'static str,
    regex: Regex,
}

impl BoundaryPattern {
    /// Non-empty trimmed fragments, or `None` when the pattern never matches.
    fn split(&self, text: &str) -> Option<Vec<String>> {
        if !self.regex.is_match(text) {
            return None;
        }

        Some(
            self.regex
                .split(text)
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        )
    }
}

#[derive(Debug)]
pub struct Segmenter {
    patterns: Vec<BoundaryPattern>,
    paragraph_break: Regex,
    min_section_length: usize,
}

impl Segmenter {
    pub fn new(min_section_length: usize) -> Result<Self> {
        let patterns = BOUNDARY_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile {name} boundary regex"))
                    .map(|regex| BoundaryPattern { name, regex })
            })
            .collect::<Result<Vec<BoundaryPattern>>>()?;

        Ok(Self {
            patterns,
            paragraph_break: Regex::new(r"\n\s*\n")
                .context("failed to compile paragraph break regex")?,
            min_section_length,
        })
    }

    /// Lazily yields the sections of one page. Candidates shorter than the
    /// minimum section length are dropped and do not consume an ordinal.
    pub fn segment_page(&self, page: PageText) -> impl Iterator<Item = Section> + '_ {
        let candidates = if page.text.trim().is_empty() {
            Vec::new()
        } else {
            self.split_candidates(&page.text)
        };

        candidates
            .into_iter()
            .map(|candidate| candidate.trim().to_string())
            .filter(|candidate| char_len(candidate) >= self.min_section_length)
            .enumerate()
            .map(move |(ordinal, content)| build_section(&page, ordinal, content))
    }

    fn split_candidates(&self, text: &str) -> Vec<String> {
        for pattern in &self.patterns {
            if let Some(fragments) = pattern.split(text) {
                debug!(
                    pattern = pattern.name,
                    fragments = fragments.len(),
                    "page split on boundary pattern"
                );
                return fragments;
            }
        }

        let paragraphs = self.paragraph_break.split(text).collect::<Vec<&str>>();
        if paragraphs.len() >= PARAGRAPH_MIN_COUNT {
            return paragraphs
                .into_iter()
                .map(str::trim)
                .filter(|paragraph| char_len(paragraph) > PARAGRAPH_MIN_CHARS)
                .map(ToOwned::to_owned)
                .collect();
        }

        vec![text.to_string()]
    }
}

fn build_section(page: &PageText, ordinal: usize, content: String) -> Section {
    Section {
        document_name: page.document_name.clone(),
        page_number: page.page_number,
        section_title: generate_title(&content),
        content_preview: generate_preview(&content),
        word_count: content.split_whitespace().count(),
        section_id: format!(
            "{}_p{}_s{}",
            page.document_name, page.page_number, ordinal
        ),
        content,
    }
}

fn generate_title(content: &str) -> String {
    let trimmed = content.trim();
    let first_line = trimmed.split('\n').next().unwrap_or_default().trim();
    if char_len(first_line) < TITLE_MAX_CHARS
        && !first_line.ends_with('.')
        && first_line.split_whitespace().count() < TITLE_MAX_WORDS
    {
        return first_line.to_string();
    }

    let first_sentence = trimmed
        .split(['.', '!', '?'])
        .next()
        .unwrap_or_default()
        .trim();
    if first_sentence.is_empty() {
        return format!(
            "{}{ELLIPSIS}",
            char_prefix(trimmed, TITLE_FALLBACK_CHARS).trim()
        );
    }

    if char_len(first_sentence) > TITLE_SENTENCE_MAX_CHARS {
        return format!(
            "{}{ELLIPSIS}",
            char_prefix(first_sentence, TITLE_SENTENCE_MAX_CHARS)
        );
    }

    first_sentence.to_string()
}

fn generate_preview(content: &str) -> String {
    clip_at_word_boundary(&condense_whitespace(content), PREVIEW_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> PageText {
        PageText {
            document_name: "guide.pdf".to_string(),
            page_number: 3,
            text: text.to_string(),
        }
    }

    fn segment(text: &str) -> Vec<Section> {
        let segmenter = Segmenter::new(100).expect("segmenter should build");
        segmenter.segment_page(page(text)).collect()
    }

    #[test]
    fn splits_on_numbered_markers() {
        let text = "1. Introduction\nThis is a test of enough length to pass the minimum threshold for a section body, padded out well past one hundred characters.\n2. Methods\nAnother section with sufficient length to pass the minimum threshold filter as well, again padded beyond the limit.";
        let sections = segment(text);

        assert_eq!(sections.len(), 2);
        assert!(sections[0].content.starts_with("1. Introduction\nThis is a test"));
        assert!(sections[1].content.starts_with("Methods\nAnother section"));
        assert_eq!(sections[0].section_title, "1. Introduction");
        assert_eq!(sections[1].section_title, "Methods");
        assert_eq!(sections[0].section_id, "guide.pdf_p3_s0");
        assert_eq!(sections[1].section_id, "guide.pdf_p3_s1");
        assert_eq!(sections[1].page_number, 3);
    }

    const BODY: &str = "the body of this part describes local markets, quiet beaches and the best times to visit for small groups of friends.";

    #[test]
    fn splits_on_title_lines() {
        let text = format!("{BODY}\nBest Coastal Walks For Groups Of Friends\n{BODY}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|section| section.content == BODY));
    }

    #[test]
    fn splits_on_all_caps_labels() {
        let text = format!("{BODY}\nTIPS: {BODY}\nFOOD {BODY}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 3);
        assert!(sections.iter().all(|section| section.content == BODY));
    }

    #[test]
    fn structural_patterns_are_case_sensitive() {
        let text = format!("{BODY}\ntips: {BODY}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, text);
    }

    #[test]
    fn splits_on_chapter_markers() {
        let text = format!("{BODY}\nDay 2\n{BODY}\nDay 3\n{BODY}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 3);
        assert!(sections.iter().all(|section| section.content == BODY));
    }

    #[test]
    fn splits_on_markdown_headers() {
        let text = format!("{BODY}\n## Getting around\n{BODY}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, BODY);
        assert_eq!(sections[1].content, format!("Getting around\n{BODY}"));
        assert_eq!(sections[1].section_title, "Getting around");
    }

    #[test]
    fn academic_headings_match_in_any_case() {
        for heading in ["results", "Results"] {
            let text = format!("{BODY}\n{heading}\n{BODY}");
            let sections = segment(&text);

            assert_eq!(sections.len(), 2, "{heading}");
            assert!(sections.iter().all(|section| section.content == BODY));
        }
    }

    #[test]
    fn earliest_matching_pattern_decides_the_split() {
        let caps_over_markdown = format!("{BODY}\n# Overview\n{BODY}\nNOTES: {BODY}");
        let sections = segment(&caps_over_markdown);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, format!("{BODY}\n# Overview\n{BODY}"));
        assert_eq!(sections[1].content, BODY);

        let title_over_caps =
            format!("{BODY}\nWhere To Stay In The Old Town\n{BODY}\nTIPS: {BODY}");
        let sections = segment(&title_over_caps);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, BODY);
        assert_eq!(sections[1].content, format!("{BODY}\nTIPS: {BODY}"));
    }

    #[test]
    fn title_falls_back_to_prefix_when_no_sentence_precedes_punctuation() {
        let content = format!("...{}", "word ".repeat(30));
        assert_eq!(generate_title(&content), format!("{}...", &content[..50]));
    }

    #[test]
    fn blank_page_yields_nothing() {
        assert!(segment("   \n\t ").is_empty());
    }

    #[test]
    fn short_candidates_are_dropped_without_consuming_ordinals() {
        let long = "x ".repeat(80);
        let text = format!("{long}\n1. tiny\n2. {long}");
        let sections = segment(&text);

        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|section| section.content.chars().count() >= 100));
        assert_eq!(sections[1].section_id, "guide.pdf_p3_s1");
    }

    #[test]
    fn falls_back_to_paragraphs_when_no_pattern_matches() {
        let paragraph = "the quick brown fox jumps over the lazy dog again and again, ";
        let body = paragraph.repeat(2);
        let text = format!("{body}\n\n{body}\n\n{body}\n\nshort one");
        let sections = segment(&text);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].content, body.trim());
    }

    #[test]
    fn whole_page_is_one_candidate_as_last_resort() {
        let text = "plain lowercase text without any structure. ".repeat(4);
        let sections = segment(&text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, text.trim());
        assert_eq!(sections[0].word_count, 24);
    }

    #[test]
    fn title_uses_first_sentence_when_first_line_is_prose() {
        let content = "This opening line is a long sentence that reads like prose rather than a heading at all. More text.";
        assert_eq!(
            generate_title(content),
            "This opening line is a long sentence that reads like prose rather than a heading..."
        );

        let short = "A short opening sentence ends here. And then more words follow on the same line to exceed limits.";
        assert_eq!(generate_title(short), "A short opening sentence ends here");
    }

    #[test]
    fn preview_collapses_whitespace_and_clips_on_word_boundary() {
        let content = format!("{}\n\n{}", "alpha ".repeat(30), "omega ".repeat(30));
        let preview = generate_preview(&content);

        assert!(preview.ends_with("..."));
        assert!(!preview.contains('\n'));
        assert!(preview.chars().count() <= 203);
        assert!(!preview.trim_end_matches("...").ends_with(' '));
    }
}
