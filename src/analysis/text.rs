use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

pub const ELLIPSIS: &str = "...";

const MAX_KEYWORDS: usize = 20;

/// Stopwords dropped before keyword and word-frequency counting.
pub static KEYWORD_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
        "those",
    ]
    .into_iter()
    .collect()
});

/// English stop words removed before building the lexical vector space.
pub static ENGLISH_STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
        "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
        "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
        "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
        "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de",
        "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
        "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever", "every",
        "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty", "fill",
        "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found", "four",
        "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt", "have",
        "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers",
        "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in",
        "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter",
        "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might",
        "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must", "my",
        "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine", "no",
        "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often",
        "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
        "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put", "rather",
        "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she",
        "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
        "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
        "take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
        "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
        "thick", "thin", "third", "this", "those", "though", "three", "through", "throughout",
        "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty",
        "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
        "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
        "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
        "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Cue words that mark a sentence as summary-worthy.
pub static IMPORTANCE_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "important", "key", "main", "primary", "essential", "critical", "significant", "major",
        "central", "fundamental", "crucial", "conclusion", "summary", "overview", "introduction",
        "background", "method", "approach", "technique", "strategy", "solution",
    ]
    .into_iter()
    .collect()
});

pub fn is_word_char(character: char) -> bool {
    character.is_alphanumeric() || character == '_'
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Lowercases, replaces every non-word, non-space character with a space and
/// collapses whitespace runs.
pub fn normalize_text(input: &str) -> String {
    let replaced = input
        .to_lowercase()
        .chars()
        .map(|character| {
            if is_word_char(character) || character.is_whitespace() {
                character
            } else {
                ' '
            }
        })
        .collect::<String>();
    condense_whitespace(&replaced)
}

pub fn word_tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|character: char| !is_word_char(character))
        .filter(|token| !token.is_empty())
}

pub fn lowercase_words(input: &str) -> Vec<String> {
    word_tokens(&input.to_lowercase())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn is_content_word(word: &str) -> bool {
    word.chars().count() > 2 && !KEYWORD_STOPWORDS.contains(word)
}

/// Up to twenty most frequent content words, most frequent first. Ties keep
/// first-occurrence order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let mut order = Vec::<&str>::new();
    let mut counts = HashMap::<&str, usize>::new();

    for word in word_tokens(&normalized).filter(|word| is_content_word(word)) {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked = order
        .into_iter()
        .enumerate()
        .map(|(position, word)| (word, counts.get(word).copied().unwrap_or(0), position))
        .collect::<Vec<(&str, usize, usize)>>();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then(left.2.cmp(&right.2)));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Capitalized words (`[A-Z][a-z]+` spanning a whole token) used as a crude
/// proper-noun proxy.
pub fn extract_entities(text: &str) -> HashSet<String> {
    word_tokens(text)
        .filter(|token| {
            let mut characters = token.chars();
            let leading_upper = characters
                .next()
                .map(|character| character.is_ascii_uppercase())
                .unwrap_or(false);
            let rest = characters.as_str();
            leading_upper
                && !rest.is_empty()
                && rest.chars().all(|character| character.is_ascii_lowercase())
        })
        .map(ToOwned::to_owned)
        .collect()
}

pub fn jaccard<T: Eq + std::hash::Hash>(left: &HashSet<T>, right: &HashSet<T>) -> f64 {
    let union = left.union(right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / union as f64
}

pub fn char_len(input: &str) -> usize {
    input.chars().count()
}

pub fn char_prefix(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &input[..byte_index],
        None => input,
    }
}

/// Cuts `input` to `max_chars`, backing off to the last space when it lies
/// past 80% of the limit, and appends an ellipsis. Input within the limit is
/// returned unchanged.
pub fn clip_at_word_boundary(input: &str, max_chars: usize) -> String {
    if char_len(input) <= max_chars {
        return input.to_string();
    }

    let mut clipped = char_prefix(input, max_chars);
    if let Some(byte_index) = clipped.rfind(' ') {
        let space_position = char_len(&clipped[..byte_index]);
        if space_position as f64 > max_chars as f64 * 0.8 {
            clipped = &clipped[..byte_index];
        }
    }

    format!("{clipped}{ELLIPSIS}")
}
