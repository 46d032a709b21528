//! Utterance normalization, span splitting and vocabulary matching.

use once_cell::sync::Lazy;
use regex::Regex;

/// Homophones and variant characters rewritten before routing and parsing.
const VARIANTS: &[(&str, &str)] = &[("飯團", "飯糰"), ("結賬", "結帳")];

static DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[、，,；;]|跟|還要|再來|另外|然後").expect("delimiter regex")
});

/// `再` only separates items when a count follows: `再一杯豆漿`.
static AGAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"再([0-9一二兩三四五六七八九十])").expect("again regex"));

/// Rewrites variant characters and full-width digits, then trims.
pub fn normalize_text(text: &str) -> String {
    let mut normalized: String = text
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '\u{3000}' => ' ',
            other => other,
        })
        .collect();
    for (from, to) in VARIANTS {
        normalized = normalized.replace(from, to);
    }
    normalized.trim().to_string()
}

/// Splits an utterance into at most `max_segments` non-empty spans.
///
/// Spans beyond the limit are folded into the last one.
pub fn split_spans(text: &str, max_segments: usize) -> Vec<String> {
    let max_segments = max_segments.max(1);
    let marked = AGAIN_RE.replace_all(text, "、$1");
    let mut spans: Vec<String> = DELIMITER_RE
        .split(&marked)
        .map(str::trim)
        .filter(|span| !span.is_empty())
        .map(String::from)
        .collect();

    if spans.len() > max_segments {
        tracing::debug!(
            "[Splitter] {} spans exceed limit {}, folding the rest",
            spans.len(),
            max_segments
        );
        let rest = spans.split_off(max_segments - 1).join("，");
        spans.push(rest);
    }
    spans
}

/// Surface-form to canonical-name table matched longest surface first.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<(String, String)>,
}

impl Lexicon {
    pub fn new<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(surface, canonical)| (surface.into(), canonical.into()))
            .filter(|(surface, _)| !surface.is_empty())
            .collect();
        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        Self { entries }
    }

    /// Longest surface form contained in `text`, with its canonical name.
    pub fn find(&self, text: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(surface, _)| text.contains(surface.as_str()))
            .map(|(surface, canonical)| (surface.as_str(), canonical.as_str()))
    }
}

/// Pulls `加X` modifiers out of `text` for every `X` in `names`.
///
/// Returns the text with the modifiers removed and the matched names in
/// order of appearance, without duplicates.
pub fn extract_addons(text: &str, names: &[&str]) -> (String, Vec<String>) {
    let mut names: Vec<&str> = names.iter().copied().filter(|n| !n.is_empty()).collect();
    names.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));

    let mut rest = String::with_capacity(text.len());
    let mut found: Vec<String> = Vec::new();
    let mut remaining = text;
    while let Some(pos) = remaining.find('加') {
        let (before, from_marker) = remaining.split_at(pos);
        rest.push_str(before);
        let after = &from_marker['加'.len_utf8()..];
        let trimmed = after.trim_start();
        match names.iter().find(|name| trimmed.starts_with(**name)) {
            Some(name) => {
                if !found.iter().any(|f| f == name) {
                    found.push((*name).to_string());
                }
                remaining = &trimmed[name.len()..];
            }
            None => {
                rest.push('加');
                remaining = after;
            }
        }
    }
    rest.push_str(remaining);
    (rest, found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text(" 我要一個飯團 "), "我要一個飯糰");
        assert_eq!(normalize_text("刪除第２項"), "刪除第2項");
    }

    #[test]
    fn test_split_on_delimiters() {
        assert_eq!(
            split_spans("一個鮪魚飯糰、一杯豆漿跟薯餅", 6),
            vec!["一個鮪魚飯糰", "一杯豆漿", "薯餅"]
        );
        assert_eq!(
            split_spans("熱狗還要紅茶，再來蘿蔔糕", 6),
            vec!["熱狗", "紅茶", "蘿蔔糕"]
        );
    }

    #[test]
    fn test_again_needs_a_count() {
        assert_eq!(split_spans("薯餅再一杯豆漿", 6), vec!["薯餅", "一杯豆漿"]);
        assert_eq!(split_spans("再說一次", 6), vec!["再說一次"]);
    }

    #[test]
    fn test_split_is_bounded() {
        let spans = split_spans("a、b、c、d、e", 3);
        assert_eq!(spans, vec!["a", "b", "c，d，e"]);
        assert_eq!(split_spans("、、", 6), Vec::<String>::new());
    }

    #[test]
    fn test_lexicon_prefers_longest() {
        let lexicon = Lexicon::new([("奶茶", "純鮮奶茶"), ("黑糖奶茶", "黑糖純鮮奶茶")]);
        assert_eq!(lexicon.find("我要黑糖奶茶"), Some(("黑糖奶茶", "黑糖純鮮奶茶")));
        assert_eq!(lexicon.find("奶茶大杯"), Some(("奶茶", "純鮮奶茶")));
        assert_eq!(lexicon.find("豆漿"), None);
    }

    #[test]
    fn test_extract_addons() {
        let (rest, addons) = extract_addons("火腿蛋吐司加起司 加 培根加大", &["起司", "培根"]);
        assert_eq!(rest, "火腿蛋吐司 加大");
        assert_eq!(addons, vec!["起司", "培根"]);
    }
}
