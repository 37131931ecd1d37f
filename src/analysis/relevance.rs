use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, warn};

use super::text::{
    ENGLISH_STOP_WORDS, extract_entities, extract_keywords, jaccard, normalize_text, word_tokens,
};
use super::{Query, ScoredSection, Section, SignalScores, SignalWeights};

const MAX_FEATURES: usize = 1000;
const MAX_DOCUMENT_FREQUENCY: f64 = 0.8;

#[derive(Debug, Error, PartialEq)]
pub(super) enum VectorSpaceError {
    #[error("corpus is empty")]
    EmptyCorpus,
    #[error("empty vocabulary; documents contain only stop words")]
    EmptyVocabulary,
    #[error("no terms remain after document-frequency pruning")]
    AllTermsPruned,
}

/// TF-IDF space over unigrams and bigrams, fitted on one run's pooled
/// sections plus the query.
#[derive(Debug)]
struct VectorSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl VectorSpace {
    fn fit(documents: &[Vec<String>]) -> Result<Self, VectorSpaceError> {
        if documents.is_empty() {
            return Err(VectorSpaceError::EmptyCorpus);
        }

        let mut document_frequency = HashMap::<&str, usize>::new();
        let mut term_frequency = HashMap::<&str, usize>::new();
        for terms in documents {
            let mut seen = HashSet::<&str>::new();
            for term in terms {
                *term_frequency.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        if document_frequency.is_empty() {
            return Err(VectorSpaceError::EmptyVocabulary);
        }

        let corpus_size = documents.len();
        let max_document_count = MAX_DOCUMENT_FREQUENCY * corpus_size as f64;
        let mut kept = document_frequency
            .iter()
            .filter(|(_, df)| (**df as f64) <= max_document_count)
            .map(|(term, df)| (*term, *df, term_frequency.get(term).copied().unwrap_or(0)))
            .collect::<Vec<(&str, usize, usize)>>();

        if kept.is_empty() {
            return Err(VectorSpaceError::AllTermsPruned);
        }

        kept.sort_by(|left, right| right.2.cmp(&left.2).then(left.0.cmp(right.0)));
        kept.truncate(MAX_FEATURES);
        kept.sort_by(|left, right| left.0.cmp(right.0));

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df, _)) in kept.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), index);
            idf.push(((1.0 + corpus_size as f64) / (1.0 + df as f64)).ln() + 1.0);
        }

        Ok(Self { vocabulary, idf })
    }

    fn transform(&self, terms: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0_f64; self.idf.len()];
        for term in terms {
            if let Some(index) = self.vocabulary.get(term) {
                vector[*index] += 1.0;
            }
        }

        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = vector.iter().map(|value| value * value).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

/// Unigrams of two or more word characters with stop words removed, followed
/// by the bigrams of the remaining sequence.
fn analyze_terms(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let unigrams = word_tokens(&normalized)
        .filter(|token| token.chars().count() >= 2 && !ENGLISH_STOP_WORDS.contains(token))
        .collect::<Vec<&str>>();

    let mut terms = unigrams
        .iter()
        .map(|token| token.to_string())
        .collect::<Vec<String>>();
    terms.extend(
        unigrams
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1])),
    );
    terms
}

fn cosine(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).map(|(a, b)| a * b).sum::<f64>()
}

pub(super) fn lexical_similarity(
    texts: &[&str],
    query_text: &str,
) -> Result<Vec<f64>, VectorSpaceError> {
    let mut documents = texts
        .iter()
        .map(|text| analyze_terms(text))
        .collect::<Vec<Vec<String>>>();
    documents.push(analyze_terms(query_text));

    let space = VectorSpace::fit(&documents)?;
    debug!(terms = space.idf.len(), "fitted lexical vector space");

    let query_vector = documents
        .last()
        .map(|terms| space.transform(terms))
        .unwrap_or_default();

    Ok(documents[..documents.len() - 1]
        .iter()
        .map(|terms| cosine(&query_vector, &space.transform(terms)))
        .collect())
}

pub(super) fn keyword_overlap(texts: &[&str], query_text: &str) -> Vec<f64> {
    let query_keywords = extract_keywords(query_text)
        .into_iter()
        .collect::<HashSet<String>>();

    texts
        .iter()
        .map(|text| {
            let keywords = extract_keywords(text).into_iter().collect::<HashSet<String>>();
            jaccard(&query_keywords, &keywords)
        })
        .collect()
}

pub(super) fn entity_overlap(texts: &[&str], query_text: &str) -> Vec<f64> {
    let query_entities = extract_entities(query_text);
    texts
        .iter()
        .map(|text| jaccard(&query_entities, &extract_entities(text)))
        .collect()
}

/// Per-text signal scores against `query_text`, in input order.
pub(super) fn compute_signals(
    texts: &[&str],
    query_text: &str,
    weights: &SignalWeights,
) -> Vec<SignalScores> {
    let lexical = lexical_similarity(texts, query_text).unwrap_or_else(|error| {
        warn!(error = %error, "lexical similarity unavailable; scoring it as zero");
        vec![0.0; texts.len()]
    });
    let keyword = keyword_overlap(texts, query_text);
    let entity = entity_overlap(texts, query_text);

    lexical
        .into_iter()
        .zip(keyword)
        .zip(entity)
        .map(|((lexical, keyword), entity)| SignalScores {
            lexical,
            keyword,
            entity,
            combined: weights.combine(lexical, keyword, entity),
        })
        .collect()
}

pub fn score_sections(
    sections: Vec<Section>,
    query: &Query,
    weights: &SignalWeights,
) -> Vec<ScoredSection> {
    let query_text = query.text();
    let texts = sections
        .iter()
        .map(|section| section.content.as_str())
        .collect::<Vec<&str>>();
    let signals = compute_signals(&texts, &query_text, weights);

    sections
        .into_iter()
        .zip(signals)
        .map(|(section, signals)| ScoredSection { section, signals })
        .collect()
}
