//! Digit and Chinese-numeral helpers: quantities and ordinals.

use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER_PATTERN: &str = r"[0-9]+|[一二兩三四五六七八九十]+";

/// Counted quantity: a number directly followed by a measure word.
///
/// Price-like numbers (`5元`) are never quantities.
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"({})\s*(?:杯|個|顆|份|片|條|盒|碗|根)",
        NUMBER_PATTERN
    ))
    .expect("quantity regex")
});

/// Menu names carry counts of their own: `麥克雞塊(5個)`.
static PARENTHETICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[(（][^)）]*[)）]").expect("parenthetical regex"));

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"第\s*({})", NUMBER_PATTERN)).expect("ordinal regex")
});

fn digit_value(c: char) -> Option<u32> {
    match c {
        '一' => Some(1),
        '二' | '兩' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Converts Chinese numerals up to 99 (`三`, `十`, `十二`, `二十五`).
pub fn chinese_to_number(s: &str) -> Option<u32> {
    let chars: Vec<char> = s.chars().collect();
    match chars.as_slice() {
        [] => None,
        [c] if *c == '十' => Some(10),
        [c] => digit_value(*c),
        ['十', unit] => digit_value(*unit).map(|u| 10 + u),
        [tens, '十'] => digit_value(*tens).map(|t| t * 10),
        [tens, '十', unit] => Some(digit_value(*tens)? * 10 + digit_value(*unit)?),
        _ => None,
    }
}

/// Parses ASCII digits or Chinese numerals.
pub fn parse_number(s: &str) -> Option<u32> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        chinese_to_number(s)
    }
}

/// Largest count one line may carry.
pub const MAX_QUANTITY: u32 = 99;

/// Finds a counted quantity such as `兩杯` or `3個`. Zero is ignored, and so
/// are counts inside parentheses and counts above [`MAX_QUANTITY`].
pub fn parse_quantity(text: &str) -> Option<u32> {
    let text = PARENTHETICAL_RE.replace_all(text, "");
    QUANTITY_RE
        .captures_iter(&text)
        .filter_map(|caps| parse_number(caps.get(1)?.as_str()))
        .find(|n| (1..=MAX_QUANTITY).contains(n))
}

/// True when the text states a count above [`MAX_QUANTITY`]. Digit runs too
/// long for a `u32` count as oversized.
pub fn oversized_quantity(text: &str) -> bool {
    let text = PARENTHETICAL_RE.replace_all(text, "");
    QUANTITY_RE.captures_iter(&text).any(|caps| {
        let raw = &caps[1];
        match parse_number(raw) {
            Some(n) => n > MAX_QUANTITY,
            None => raw.chars().all(|c| c.is_ascii_digit()),
        }
    })
}

/// Finds a 1-based ordinal such as `第2項` or `第三個`.
pub fn parse_ordinal(text: &str) -> Option<usize> {
    let caps = ORDINAL_RE.captures(text)?;
    parse_number(caps.get(1)?.as_str())
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_numbers() {
        assert_eq!(chinese_to_number("一"), Some(1));
        assert_eq!(chinese_to_number("兩"), Some(2));
        assert_eq!(chinese_to_number("十"), Some(10));
        assert_eq!(chinese_to_number("十二"), Some(12));
        assert_eq!(chinese_to_number("三十"), Some(30));
        assert_eq!(chinese_to_number("二十五"), Some(25));
        assert_eq!(chinese_to_number("十十"), None);
    }

    #[test]
    fn test_quantity_needs_measure_word() {
        assert_eq!(parse_quantity("我要兩杯豆漿"), Some(2));
        assert_eq!(parse_quantity("3個飯糰"), Some(3));
        assert_eq!(parse_quantity("薯餅 算我5元"), None);
        assert_eq!(parse_quantity("十穀漿"), None);
        assert_eq!(parse_quantity("0杯 2杯"), Some(2));
        assert_eq!(parse_quantity("麥克雞塊(5個)"), None);
        assert_eq!(parse_quantity("兩份麥克雞塊(5個)"), Some(2));
    }

    #[test]
    fn test_oversized_quantity() {
        assert_eq!(parse_quantity("我要200000000杯冰豆漿"), None);
        assert!(oversized_quantity("我要200000000杯冰豆漿"));
        assert!(oversized_quantity("99999999999999999999杯"));
        assert!(oversized_quantity("100個飯糰"));
        assert!(!oversized_quantity("99個飯糰"));
        assert!(!oversized_quantity("九十九杯豆漿"));
        assert!(!oversized_quantity("麥克雞塊(500個)"));
        assert!(!oversized_quantity("薯餅 算我500元"));
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(parse_ordinal("刪除第2項"), Some(2));
        assert_eq!(parse_ordinal("取消第一項"), Some(1));
        assert_eq!(parse_ordinal("第十個"), Some(10));
        assert_eq!(parse_ordinal("第0項"), None);
        assert_eq!(parse_ordinal("刪除"), None);
    }
}
