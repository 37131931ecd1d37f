use std::collections::HashMap;

use super::text::{
    IMPORTANCE_KEYWORDS, char_len, clip_at_word_boundary, is_content_word, lowercase_words,
};
use super::{AnalysisConfig, Section, SectionSummary};

const FREQUENCY_WEIGHT: f64 = 0.4;
const POSITION_WEIGHT: f64 = 0.2;
const LENGTH_WEIGHT: f64 = 0.1;
const KEYWORD_WEIGHT: f64 = 0.3;
const SHORT_CONTENT_SENTENCES: usize = 3;

/// Extractive summarizer. Stateless across sections.
#[derive(Debug, Clone)]
pub struct Summarizer {
    max_summary_length: usize,
    min_sentence_length: usize,
}

impl Summarizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_summary_length: config.max_summary_length,
            min_sentence_length: config.min_sentence_length,
        }
    }

    pub fn summarize_section(&self, section: &Section) -> SectionSummary {
        let content = section.content.as_str();
        let summary = self.summarize_text(content);
        let original_length = char_len(content);
        let summary_length = char_len(&summary);

        SectionSummary {
            document_name: section.document_name.clone(),
            page_number: section.page_number,
            section_title: section.section_title.clone(),
            refined_extracted_text: summary,
            original_length,
            summary_length,
            compression_ratio: if original_length == 0 {
                0.0
            } else {
                summary_length as f64 / original_length as f64
            },
        }
    }

    pub fn summarize_text(&self, text: &str) -> String {
        let sentences = self.split_sentences(text);
        if sentences.len() <= SHORT_CONTENT_SENTENCES {
            return text.to_string();
        }

        let frequencies = word_frequencies(text);
        let scores = sentences
            .iter()
            .enumerate()
            .map(|(position, sentence)| {
                score_sentence(sentence, position, sentences.len(), &frequencies)
            })
            .collect::<Vec<f64>>();

        let summary = select_sentences(&scores)
            .into_iter()
            .map(|index| sentences[index].as_str())
            .collect::<Vec<&str>>()
            .join(" ");

        clip_at_word_boundary(&summary, self.max_summary_length)
    }

    /// Sentences of at least the minimum length, each ending in a period.
    fn split_sentences(&self, text: &str) -> Vec<String> {
        text.split(['.', '!', '?'])
            .map(str::trim)
            .filter(|sentence| char_len(sentence) >= self.min_sentence_length)
            .map(|sentence| {
                if sentence.ends_with(['.', '!', '?']) {
                    sentence.to_string()
                } else {
                    format!("{sentence}.")
                }
            })
            .collect()
    }
}

/// Relative frequency of each content word over the whole text.
fn word_frequencies(text: &str) -> HashMap<String, f64> {
    let words = lowercase_words(text)
        .into_iter()
        .filter(|word| is_content_word(word))
        .collect::<Vec<String>>();
    let total = words.len() as f64;

    let mut counts = HashMap::<String, usize>::new();
    for word in words {
        *counts.entry(word).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(word, count)| (word, count as f64 / total))
        .collect()
}

fn score_sentence(
    sentence: &str,
    position: usize,
    total: usize,
    frequencies: &HashMap<String, f64>,
) -> f64 {
    let words = lowercase_words(sentence);

    let frequency = if words.is_empty() {
        0.0
    } else {
        words
            .iter()
            .map(|word| frequencies.get(word).copied().unwrap_or(0.0))
            .sum::<f64>()
            / words.len() as f64
    };

    FREQUENCY_WEIGHT * frequency
        + POSITION_WEIGHT * position_score(position, total)
        + LENGTH_WEIGHT * length_score(words.len())
        + KEYWORD_WEIGHT * keyword_density(&words)
}

fn position_score(position: usize, total: usize) -> f64 {
    if total <= 1 {
        return 1.0;
    }

    if position == 0 || position == total - 1 {
        1.0
    } else if position == 1 || position == total - 2 {
        0.8
    } else {
        0.5
    }
}

fn length_score(word_count: usize) -> f64 {
    match word_count {
        10..=30 => 1.0,
        5..=50 => 0.7,
        _ => 0.3,
    }
}

fn keyword_density(words: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let hits = words
        .iter()
        .filter(|word| IMPORTANCE_KEYWORDS.contains(word.as_str()))
        .count();
    (hits as f64 / words.len() as f64 * 10.0).min(1.0)
}

/// Indices of the `max(3, n / 3)` best sentences, in original order. Equal
/// scores favour the earlier sentence.
fn select_sentences(scores: &[f64]) -> Vec<usize> {
    let target = SHORT_CONTENT_SENTENCES.max(scores.len() / 3);
    let mut order = (0..scores.len()).collect::<Vec<usize>>();
    order.sort_by(|left, right| scores[*right].total_cmp(&scores[*left]));
    order.truncate(target);
    order.sort_unstable();
    order
}
