use super::*;

const REPEATED_EDGE_LINE_MIN_PAGES: usize = 3;
const EDGE_LINE_MAX_CHARS: usize = 120;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct PageCleanupStats {
    pub(super) header_lines_removed: usize,
    pub(super) footer_lines_removed: usize,
    pub(super) dehyphenation_merges: usize,
}

/// Drops running headers and footers that repeat on several pages and joins
/// words hyphenated across line breaks. Page count never changes.
pub(super) fn clean_pages(pages: &mut [String]) -> PageCleanupStats {
    let headers = repeated_edge_lines(pages, true);
    let footers = repeated_edge_lines(pages, false);
    let mut stats = PageCleanupStats::default();

    for page in pages.iter_mut() {
        let mut lines = page.lines().map(ToOwned::to_owned).collect::<Vec<String>>();

        if let Some(index) = lines.iter().position(|line| !line.trim().is_empty()) {
            if headers.contains(&edge_key(&lines[index])) {
                lines.remove(index);
                stats.header_lines_removed += 1;
            }
        }

        if let Some(index) = lines.iter().rposition(|line| !line.trim().is_empty()) {
            if footers.contains(&edge_key(&lines[index])) {
                lines.remove(index);
                stats.footer_lines_removed += 1;
            }
        }

        let (merged, merges) = merge_hyphenated_lines(lines);
        stats.dehyphenation_merges += merges;
        *page = merged.join("\n");
    }

    stats
}

fn repeated_edge_lines(pages: &[String], header: bool) -> HashSet<String> {
    let mut counts = HashMap::<String, usize>::new();
    for page in pages {
        let mut lines = page.lines().map(str::trim).filter(|line| !line.is_empty());
        let candidate = if header { lines.next() } else { lines.next_back() };
        let Some(candidate) = candidate else {
            continue;
        };

        let key = edge_key(candidate);
        if key.chars().count() <= EDGE_LINE_MAX_CHARS {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= REPEATED_EDGE_LINE_MIN_PAGES)
        .map(|(key, _)| key)
        .collect()
}

fn edge_key(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

fn merge_hyphenated_lines(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut merged = Vec::<String>::with_capacity(lines.len());
    let mut merges = 0usize;

    for line in lines {
        match merged.last_mut() {
            Some(previous) if joins_hyphenated_word(previous, &line) => {
                let head = previous.trim_end().trim_end_matches('-').to_string();
                *previous = format!("{head}{}", line.trim_start());
                merges += 1;
            }
            _ => merged.push(line),
        }
    }

    (merged, merges)
}

fn joins_hyphenated_word(current: &str, next: &str) -> bool {
    let left = current.trim_end();
    if !left.ends_with('-') {
        return false;
    }

    let next_starts_lowercase = next
        .trim_start()
        .chars()
        .next()
        .is_some_and(|character| character.is_lowercase());
    let word_before_hyphen = left
        .trim_end_matches('-')
        .chars()
        .last()
        .is_some_and(|character| character.is_alphabetic());

    next_starts_lowercase && word_before_hyphen
}
