//! Keyword router.
//!
//! Routes a span by substring matching against fixed keyword tables, in a
//! fixed priority order. The first rule that matches decides the category.

use once_cell::sync::Lazy;
use regex::Regex;
use stall_core::router::{RouteCategory, RouteDecision, Router};

use crate::drink::mentions_drink;
use crate::jam_toast::JAM_FLAVORS;
use crate::snack::SNACK_KEYWORDS;
use crate::text::normalize_text;

const CHECKOUT: &[&str] = &["結帳", "買單", "就這樣", "這樣就好"];
const CLEAR_ALL: &[&str] = &["清空", "全部取消", "全部不要", "全部刪除"];
const CANCEL_LAST: &[&str] = &["取消上一個", "撤銷", "上一個不要", "剛剛那個不要", "取消剛剛"];
const CANCEL_GENERIC: &[&str] = &["取消", "不要了"];
const COMBO: &[&str] = &["套餐", "兒童餐"];
const SINGLE_ITEM: &[&str] = &["單點", "單獨"];
const JAM_TOAST: &[&str] = &["果醬", "厚片", "薄片"];
const CARRIER: &[&str] = &["漢堡", "吐司", "饅頭"];
const RICE: &[&str] = &["白米", "紫米", "混米", "白飯", "紫飯"];
const DRINK_WORDS: &[&str] = &["飲料", "咖啡", "漿"];
const RICEBALL_HINTS: &[&str] = &["源味", "里肌", "半甜鹹", "燒肉", "鹹蛋", "嫩雞"];
/// Drink attributes that only make sense as an answer once a main dish is ordered.
const DRINK_ATTRIBUTES: &[&str] = &[
    "冰的", "溫的", "熱的", "去冰", "少冰", "大杯", "中杯", "無糖", "半糖",
];

static REMOVE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:刪除|刪掉|取消|不要|拿掉|去掉)\s*第\s*(?:[0-9]+|[一二兩三四五六七八九十]+)|第\s*(?:[0-9]+|[一二兩三四五六七八九十]+)\s*(?:項|個|份|杯|樣)?\s*(?:不要|刪掉|刪除|取消|拿掉)",
    )
    .expect("remove index regex")
});

fn first_hit(text: &str, keywords: &[&str]) -> Option<String> {
    keywords
        .iter()
        .find(|keyword| text.contains(**keyword))
        .map(|keyword| keyword.to_string())
}

/// Deterministic substring router.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRouter;

impl KeywordRouter {
    pub fn new() -> Self {
        Self
    }
}

impl Router for KeywordRouter {
    fn route(&self, text: &str, current_cart_has_main_item: bool) -> RouteDecision {
        let t = normalize_text(text);
        let decision = |category: RouteCategory, keyword: String| {
            tracing::debug!("[Router] '{}' -> {} (hit: {})", t, category, keyword);
            RouteDecision::new(category, keyword)
        };

        if let Some(k) = first_hit(&t, CHECKOUT) {
            return decision(RouteCategory::Checkout, k);
        }
        if let Some(k) = first_hit(&t, CLEAR_ALL) {
            return decision(RouteCategory::ClearAll, k);
        }
        if let Some(m) = REMOVE_INDEX_RE.find(&t) {
            return decision(RouteCategory::RemoveIndex, m.as_str().to_string());
        }
        if let Some(k) = first_hit(&t, CANCEL_LAST) {
            return decision(RouteCategory::CancelLast, k);
        }
        if let Some(k) = first_hit(&t, CANCEL_GENERIC) {
            return decision(RouteCategory::CancelGeneric, k);
        }
        if let Some(k) = first_hit(&t, COMBO) {
            return decision(RouteCategory::Combo, k);
        }
        // A riceball that happens to contain the word for egg pancake.
        if t.contains("蛋餅飯糰") {
            return decision(RouteCategory::Riceball, "蛋餅飯糰".to_string());
        }
        if let Some(k) = first_hit(&t, SINGLE_ITEM) {
            return decision(RouteCategory::Snack, k);
        }
        if t.contains("飯糰") {
            return decision(RouteCategory::Riceball, "飯糰".to_string());
        }
        if let Some(k) = first_hit(&t, JAM_TOAST) {
            return decision(RouteCategory::JamToast, k);
        }
        if t.contains("吐司") {
            if let Some(k) = first_hit(&t, JAM_FLAVORS) {
                return decision(RouteCategory::JamToast, k);
            }
        }
        if t.contains("蛋餅") {
            return decision(RouteCategory::EggPancake, "蛋餅".to_string());
        }
        if let Some(k) = first_hit(&t, CARRIER) {
            return decision(RouteCategory::Carrier, k);
        }
        if let Some(k) = first_hit(&t, RICE) {
            return decision(RouteCategory::Riceball, k);
        }
        if mentions_drink(&t) {
            return decision(RouteCategory::Drink, "drink alias".to_string());
        }
        if let Some(k) = first_hit(&t, DRINK_WORDS) {
            return decision(RouteCategory::Drink, k);
        }
        if let Some(k) = first_hit(&t, SNACK_KEYWORDS) {
            return decision(RouteCategory::Snack, k);
        }
        if let Some(k) = first_hit(&t, RICEBALL_HINTS) {
            return decision(RouteCategory::Riceball, k);
        }
        if current_cart_has_main_item {
            if let Some(k) = first_hit(&t, DRINK_ATTRIBUTES) {
                return decision(RouteCategory::Drink, k);
            }
        }

        tracing::debug!("[Router] '{}' -> unknown", t);
        RouteDecision::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(text: &str) -> RouteCategory {
        KeywordRouter::new().route(text, false).category
    }

    #[test]
    fn test_item_routes() {
        assert_eq!(route("我要一個飯團"), RouteCategory::Riceball);
        assert_eq!(route("我要一杯豆漿"), RouteCategory::Drink);
        assert_eq!(route("我要一個饅頭"), RouteCategory::Carrier);
        assert_eq!(route("黑糖奶茶"), RouteCategory::Drink);
        assert_eq!(route("我要單點薯餅"), RouteCategory::Snack);
        assert_eq!(route("我要薯餅 算我5元"), RouteCategory::Snack);
        assert_eq!(route("薯餅蛋餅"), RouteCategory::EggPancake);
        assert_eq!(route("草莓吐司厚片"), RouteCategory::JamToast);
        assert_eq!(route("火腿蛋吐司"), RouteCategory::Carrier);
        assert_eq!(route("紫米黑椒"), RouteCategory::Riceball);
        assert_eq!(route("我要套餐二"), RouteCategory::Combo);
    }

    #[test]
    fn test_egg_pancake_riceball_guard() {
        assert_eq!(route("蛋餅飯糰"), RouteCategory::Riceball);
    }

    #[test]
    fn test_commands_come_first() {
        assert_eq!(route("好 結帳"), RouteCategory::Checkout);
        assert_eq!(route("全部取消"), RouteCategory::ClearAll);
        assert_eq!(route("刪除第2項"), RouteCategory::RemoveIndex);
        assert_eq!(route("第三個不要"), RouteCategory::RemoveIndex);
        assert_eq!(route("取消上一個"), RouteCategory::CancelLast);
        assert_eq!(route("豆漿不要了"), RouteCategory::CancelGeneric);
        assert_eq!(route("取消"), RouteCategory::CancelGeneric);
    }

    #[test]
    fn test_bare_attributes_need_a_main_item() {
        let router = KeywordRouter::new();
        assert_eq!(router.route("冰的", false).category, RouteCategory::Unknown);
        assert_eq!(router.route("冰的", true).category, RouteCategory::Drink);
    }

    #[test]
    fn test_unknown() {
        let decision = KeywordRouter::new().route("今天天氣不錯", false);
        assert_eq!(decision, RouteDecision::unknown());
    }
}
