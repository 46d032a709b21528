//! Jam toast parser.

use std::sync::Arc;

use stall_core::error::Result;
use stall_core::item::{ItemKind, ItemType, JAM_TOAST_THICK, JAM_TOAST_THIN, JamToastAttrs, ParsedFrame};
use stall_core::menu::{MenuCatalog, category};
use stall_core::parser::CategoryParser;

use crate::numerals::parse_quantity;

/// Jam flavours, used by the router before the menu is consulted.
pub const JAM_FLAVORS: &[&str] = &["草莓", "花生", "蒜香", "奶酥", "巧克力"];

/// Flavour of a `果醬吐司(草莓/薄片)` menu entry.
fn flavor_of(name: &str) -> Option<&str> {
    let inner = name.strip_prefix("果醬吐司(")?.strip_suffix(')')?;
    inner.split('/').next().filter(|f| !f.is_empty())
}

pub struct JamToastParser {
    menu: Arc<dyn MenuCatalog>,
}

impl JamToastParser {
    pub fn new(menu: Arc<dyn MenuCatalog>) -> Self {
        Self { menu }
    }

    fn flavors(&self) -> Result<Vec<String>> {
        let mut flavors: Vec<String> = Vec::new();
        for item in self.menu.items_in(category::JAM_TOAST)? {
            if let Some(flavor) = flavor_of(&item.name) {
                if !flavors.iter().any(|f| f == flavor) {
                    flavors.push(flavor.to_string());
                }
            }
        }
        flavors.sort_by_key(|f| std::cmp::Reverse(f.chars().count()));
        Ok(flavors)
    }
}

impl CategoryParser for JamToastParser {
    fn item_type(&self) -> ItemType {
        ItemType::JamToast
    }

    fn parse(&self, text: &str) -> Result<ParsedFrame> {
        let flavor = self
            .flavors()?
            .into_iter()
            .find(|flavor| text.contains(flavor.as_str()));
        let size = [JAM_TOAST_THICK, JAM_TOAST_THIN]
            .into_iter()
            .find(|size| text.contains(*size))
            .map(String::from);

        let attrs = JamToastAttrs {
            flavor,
            size,
            no_toast: text.contains("不烤"),
            cut_edge: text.contains("切邊"),
        };
        Ok(ParsedFrame::new(ItemKind::JamToast(attrs)).with_quantity(parse_quantity(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_core::item::ItemFrame;
    use stall_infrastructure::JsonMenuCatalog;

    fn parse(text: &str) -> ParsedFrame {
        JamToastParser::new(Arc::new(JsonMenuCatalog::bundled()))
            .parse(text)
            .unwrap()
    }

    fn attrs(frame: ParsedFrame) -> JamToastAttrs {
        match frame.kind {
            ItemKind::JamToast(attrs) => attrs,
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_flavor_defaults_to_thin() {
        let attrs = attrs(parse("草莓果醬吐司"));
        assert_eq!(attrs.flavor.as_deref(), Some("草莓"));
        assert_eq!(attrs.size, None);
        assert_eq!(attrs.menu_name().as_deref(), Some("果醬吐司(草莓/薄片)"));
    }

    #[test]
    fn test_thick_slice_options() {
        let attrs = attrs(parse("巧克力厚片 不烤 切邊"));
        assert_eq!(attrs.flavor.as_deref(), Some("巧克力"));
        assert_eq!(attrs.size.as_deref(), Some(JAM_TOAST_THICK));
        assert!(attrs.no_toast);
        assert!(attrs.cut_edge);
    }

    #[test]
    fn test_cut_edge_dropped_on_thin_slice() {
        let frame = ItemFrame::from_parsed(parse("花生薄片切邊"));
        match frame.kind {
            ItemKind::JamToast(attrs) => assert!(!attrs.cut_edge),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_menu_flavor_extraction() {
        assert_eq!(flavor_of("果醬吐司(奶酥/厚片)"), Some("奶酥"));
        assert_eq!(flavor_of("火腿蛋吐司"), None);
    }
}
