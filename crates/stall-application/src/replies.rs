//! Fixed response texts.

use stall_core::item::{DrinkSize, ItemFrame, ItemType, SwapOffer};
use stall_core::slot::Slot;

use crate::pricing::Quote;

pub const ALREADY_SUBMITTED: &str = "訂單已送出，如需修改請洽店員。";
pub const UNKNOWN: &str = "想點哪一類？飯糰、蛋餅、吐司、漢堡、饅頭、飲料或單點？";
pub const EMPTY_CART: &str = "目前沒有品項，請先點餐～";
pub const CONFIRM_CLEAR: &str = "確定要清空購物車嗎？（是/否）";
pub const CLEARED: &str = "已為您清空購物車。";
pub const CLEAR_KEPT: &str = "好的，保留訂單。";
pub const CHECKOUT_DECLINED: &str = "好的，請繼續點餐。";
pub const NOTHING_TO_CANCEL: &str = "目前沒有品項可以取消。";
pub const SUBMIT_FAILED: &str = "訂單暫時無法送出，請再說一次「確定」重試，或洽店員協助。";
pub const SWAP_NOT_DRINK: &str = "套餐的飲料只能換成菜單上的飲料，請問要換哪一種？";
pub const SWAP_KEPT: &str = "好的，飲料維持原本的。";

/// `1份 豆漿(大杯, 冰)`
pub fn portion(frame: &ItemFrame) -> String {
    format!("{}份 {}", frame.quantity, frame.label())
}

pub fn added(portions: &[String]) -> String {
    format!("好的，{}，還需要什麼嗎？", portions.join("、"))
}

/// Acknowledges completed items ahead of a follow-up question.
pub fn added_then(portions: &[String], question: &str) -> String {
    format!("好的，{}。{}", portions.join("、"), question)
}

pub fn checkout_summary(quote: &Quote) -> String {
    let lines: Vec<String> = quote
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            format!(
                "{}. {} x{} {}元",
                i + 1,
                line.name,
                line.quantity,
                line.subtotal
            )
        })
        .collect();
    format!(
        "這樣一共 {}，共 {} 個品項，共 {}元。確定要送出訂單嗎？（是/否）",
        lines.join("、"),
        quote.unit_count(),
        quote.total
    )
}

pub fn submitted(order_id: &str, total: u32) -> String {
    format!("訂單已送出！訂單編號：{}，總金額 {}元。", order_id, total)
}

pub fn unpriceable(item: &str) -> String {
    format!("抱歉，{} 無法計價，請洽店員協助。", item)
}

pub fn menu_unavailable(item_type: ItemType) -> String {
    format!("{}菜單讀取失敗，請洽服務人員。", item_type.label())
}

/// Short cart listing after an edit.
pub fn cart_listing(cart: &[ItemFrame]) -> String {
    if cart.is_empty() {
        "目前購物車是空的。".to_string()
    } else {
        let items: Vec<String> = cart.iter().map(|f| f.label()).collect();
        format!("目前購物車：{}。", items.join("、"))
    }
}

pub fn removed_index(index: usize, frame: &ItemFrame, cart: &[ItemFrame]) -> String {
    format!("已刪除第{}項：{}。{}", index, frame.label(), cart_listing(cart))
}

pub fn remove_index_range(len: usize) -> String {
    format!("請確認要刪除第幾項（目前共 {} 項）。", len)
}

pub fn cancelled(frame: &ItemFrame) -> String {
    format!("已取消：{}。", frame.label())
}

pub fn cancelled_combo(name: &str) -> String {
    format!("已取消剛剛的{}。", name)
}

pub fn which_combo(names: &[String]) -> String {
    format!("請問要哪一個套餐？{}", names.join("、"))
}

pub fn swap_applied(combo: &str, to: &str, delta: u32) -> String {
    if delta == 0 {
        format!("{}的飲料已換成{}，不用加價。", combo, to)
    } else {
        format!("{}的飲料已換成{}，加{}元。", combo, to, delta)
    }
}

pub fn resized(combo: &str, drink: &str, size: DrinkSize, delta: u32) -> String {
    if delta == 0 {
        format!("{}的{}改成{}，不用加價。", combo, drink, size.label())
    } else {
        format!("{}的{}改成{}，加{}元。", combo, drink, size.label(), delta)
    }
}

pub fn too_many(max: u32) -> String {
    format!("一次最多只能點{}份，請再說一次數量。", max)
}

/// Price-bearing question for a pending drink swap.
pub fn swap_offer(offer: &SwapOffer) -> String {
    let options: Vec<String> = offer
        .candidates
        .iter()
        .map(|c| format!("{} {}元（+{}元）", c.size.label(), c.price, c.delta))
        .collect();
    format!(
        "{}的飲料換成{}：{}，請問確認換哪一種？",
        offer.combo_name,
        offer.target,
        options.join("、")
    )
}

/// Built-in question for a missing slot.
pub fn question(frame: &ItemFrame, slot: Slot) -> String {
    use stall_core::item::ItemKind;

    match (&frame.kind, slot) {
        (ItemKind::Drink(attrs), Slot::SwapConfirm) => match &attrs.swap_offer {
            Some(offer) => swap_offer(offer),
            None => "請問飲料要換哪一種？".to_string(),
        },
        (ItemKind::Riceball(_), Slot::Flavor) => {
            "請問飯糰要什麼口味？（例如：源味傳統、醬燒里肌…）".to_string()
        }
        (ItemKind::Riceball(attrs), Slot::Rice) => {
            format!("請問{}要白米、紫米還是混米？", attrs.display_name())
        }
        (ItemKind::Drink(_), Slot::Drink) => "請問要喝什麼飲料？".to_string(),
        (ItemKind::Drink(attrs), Slot::Temp) => format!(
            "請問{}要冰的、溫的還是熱的？",
            attrs.drink.as_deref().unwrap_or("飲料")
        ),
        (ItemKind::Drink(attrs), Slot::Size) => format!(
            "請問{}要中杯還是大杯？",
            attrs.drink.as_deref().unwrap_or("飲料")
        ),
        (ItemKind::Carrier(_), Slot::Carrier) => "請問要吐司、漢堡還是饅頭？".to_string(),
        (ItemKind::Carrier(attrs), Slot::Flavor) => format!(
            "請問{}要什麼口味？",
            attrs.carrier.as_deref().unwrap_or("吐司")
        ),
        (ItemKind::Snack(_), Slot::Snack) => "請問要什麼點心？".to_string(),
        (ItemKind::EggPancake(_), Slot::Flavor) => "請問要什麼口味的蛋餅？".to_string(),
        (ItemKind::JamToast(_), Slot::Flavor) => {
            "請問果醬吐司要什麼口味？草莓、花生、奶酥、巧克力還是蒜香？".to_string()
        }
        _ => format!("請問{}還需要補充什麼？", frame.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_core::item::{DrinkAttrs, ItemKind, ParsedFrame, RiceballAttrs, SwapCandidate};
    use stall_core::order::OrderLine;

    #[test]
    fn test_rice_question_names_flavor() {
        let frame = ItemFrame::from_parsed(ParsedFrame::new(ItemKind::Riceball(RiceballAttrs {
            flavor: Some("源味傳統".into()),
            ..Default::default()
        })));
        assert_eq!(
            question(&frame, Slot::Rice),
            "請問源味傳統飯糰要白米、紫米還是混米？"
        );
    }

    #[test]
    fn test_swap_offer_lists_prices() {
        let offer = SwapOffer {
            combo_name: "套餐六".into(),
            target: "花生糙米漿".into(),
            candidates: vec![
                SwapCandidate {
                    size: DrinkSize::Medium,
                    menu_name: "花生糙米漿(中)".into(),
                    price: 25,
                    delta: 0,
                },
                SwapCandidate {
                    size: DrinkSize::Large,
                    menu_name: "花生糙米漿(大)".into(),
                    price: 30,
                    delta: 5,
                },
            ],
        };
        assert_eq!(
            swap_offer(&offer),
            "套餐六的飲料換成花生糙米漿：中杯 25元（+0元）、大杯 30元（+5元），請問確認換哪一種？"
        );

        let frame = ItemFrame::from_parsed(ParsedFrame::new(ItemKind::Drink(DrinkAttrs {
            drink: Some("精選紅茶".into()),
            swap_offer: Some(offer),
            ..Default::default()
        })));
        assert!(question(&frame, Slot::SwapConfirm).starts_with("套餐六的飲料換成花生糙米漿"));
    }

    #[test]
    fn test_checkout_summary() {
        let quote = Quote {
            lines: vec![
                OrderLine {
                    name: "薯餅(1片)".into(),
                    quantity: 1,
                    unit_price: 20,
                    subtotal: 20,
                },
                OrderLine {
                    name: "豆漿(大杯, 冰)".into(),
                    quantity: 2,
                    unit_price: 25,
                    subtotal: 50,
                },
            ],
            total: 70,
        };
        assert_eq!(
            checkout_summary(&quote),
            "這樣一共 1. 薯餅(1片) x1 20元、2. 豆漿(大杯, 冰) x2 50元，共 3 個品項，共 70元。確定要送出訂單嗎？（是/否）"
        );
    }
}
