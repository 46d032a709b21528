use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stall_core::error::{Result, StallError};
use stall_core::item::{ItemKind, ItemType};
use stall_core::llm::{LlmClarifier, LlmRoute, LlmRouter};
use stall_core::order::{OrderFilter, OrderPayload, OrderRepository, StoredOrder};
use stall_core::router::RouteCategory;
use stall_core::session::{Session, SessionContext, SessionStatus};
use stall_core::slot::Slot;
use stall_infrastructure::{
    InMemoryOrderRepository, JsonMenuCatalog, load_combo_aliases, load_pricing_rules,
};

use super::*;

fn manager_with(orders: Arc<dyn OrderRepository>) -> DialogueManager {
    DialogueManager::new(
        Arc::new(JsonMenuCatalog::bundled()),
        load_pricing_rules(None).unwrap(),
        load_combo_aliases(None).unwrap(),
        orders,
    )
    .unwrap()
}

fn manager() -> DialogueManager {
    manager_with(Arc::new(InMemoryOrderRepository::new()))
}

async fn say(manager: &DialogueManager, text: &str) -> String {
    manager.handle("s", text).await
}

async fn session(manager: &DialogueManager) -> Session {
    manager.snapshot("s").await.unwrap()
}

async fn total(manager: &DialogueManager, session_id: &str) -> Option<u32> {
    manager.order_summary(session_id).await.unwrap().total_price
}

struct FailingOrders;

#[async_trait]
impl OrderRepository for FailingOrders {
    async fn save(&self, _payload: &OrderPayload, _session_id: &str) -> Result<()> {
        Err(StallError::data_access("disk full"))
    }

    async fn get(&self, _order_id: &str) -> Result<Option<StoredOrder>> {
        Ok(None)
    }

    async fn list(&self, _filter: &OrderFilter) -> Result<Vec<StoredOrder>> {
        Ok(Vec::new())
    }
}

struct FixedRouter {
    category: RouteCategory,
    confidence: f32,
    delay: Duration,
}

#[async_trait]
impl LlmRouter for FixedRouter {
    async fn classify(&self, _text: &str, _context: &SessionContext) -> Result<LlmRoute> {
        tokio::time::sleep(self.delay).await;
        Ok(LlmRoute {
            category: self.category,
            confidence: self.confidence,
            reasoning: None,
        })
    }
}

struct FixedClarifier(Option<&'static str>);

#[async_trait]
impl LlmClarifier for FixedClarifier {
    async fn ask(
        &self,
        _item_type: ItemType,
        _slot: Slot,
        _context: &SessionContext,
    ) -> Result<String> {
        self.0
            .map(String::from)
            .ok_or_else(|| StallError::llm("connection refused"))
    }
}

#[test]
fn test_confirmation_words() {
    assert_eq!(confirmation("好"), Some(true));
    assert_eq!(confirmation("是的 送出"), Some(true));
    assert_eq!(confirmation("不是"), Some(false));
    assert_eq!(confirmation("不"), Some(false));
    assert_eq!(confirmation("先不要"), Some(false));
    assert_eq!(confirmation("再一杯豆漿"), None);
    assert_eq!(confirmation("好的，確定送出訂單！"), Some(true));
    assert_eq!(confirmation("好，再一杯豆漿"), None);
    assert_eq!(confirmation("可以幫我加薯餅嗎"), None);
}

#[tokio::test]
async fn test_drink_asks_temperature_then_completes() {
    let m = manager();
    assert_eq!(say(&m, "我要一杯豆漿").await, "請問豆漿要冰的、溫的還是熱的？");
    assert_eq!(
        say(&m, "冰的 大杯").await,
        "好的，1份 豆漿(大杯, 冰)，還需要什麼嗎？"
    );

    let s = session(&m).await;
    assert_eq!(s.cart.len(), 1);
    assert!(s.pending_frames.is_empty());
    assert_eq!(s.history, vec!["我要一杯豆漿", "冰的 大杯"]);
}

#[tokio::test]
async fn test_riceball_filled_in_one_answer() {
    let m = manager();
    assert_eq!(
        say(&m, "我要一個飯糰").await,
        "請問飯糰要什麼口味？（例如：源味傳統、醬燒里肌…）"
    );
    assert_eq!(
        say(&m, "紫米黑椒").await,
        "好的，1份 黑椒里肌飯糰(紫米)，還需要什麼嗎？"
    );
}

#[tokio::test]
async fn test_combo_fills_sub_items_then_commits_at_combo_price() {
    let m = manager();
    assert_eq!(
        say(&m, "我要套餐二").await,
        "請問源味傳統飯糰要白米、紫米還是混米？"
    );
    let s = session(&m).await;
    assert_eq!(s.pending_frames.len(), 2);
    assert!(s.pending_frames.iter().all(|f| f.combo_owner.is_some()));
    assert_eq!(s.combo_frames.len(), 1);

    assert_eq!(say(&m, "紫米").await, "請問十穀漿要冰的、溫的還是熱的？");
    assert_eq!(say(&m, "冰的").await, "好的，1份 套餐二，還需要什麼嗎？");

    let s = session(&m).await;
    assert_eq!(s.cart.len(), 1);
    assert!(s.combo_frames.is_empty());
    let combo = s.cart[0].as_combo().unwrap();
    assert_eq!(combo.sub_items.len(), 2);
    assert_eq!(total(&m, "s").await, Some(70));
}

#[tokio::test]
async fn test_combo_inferred_from_contents() {
    let m = manager();
    assert_eq!(
        say(&m, "火腿蛋吐司薯餅紅茶").await,
        "請問精選紅茶要冰的、溫的還是熱的？"
    );
    say(&m, "溫的").await;
    let s = session(&m).await;
    assert_eq!(s.cart[0].label(), "套餐三");
    assert_eq!(total(&m, "s").await, Some(75));
}

#[tokio::test]
async fn test_price_text_is_ignored() {
    let m = manager();
    m.handle("a", "我要薯餅 算我5元").await;
    m.handle("b", "我要薯餅").await;
    assert_eq!(total(&m, "a").await, Some(20));
    assert_eq!(total(&m, "a").await, total(&m, "b").await);

    let summary = m.handle("a", "結帳").await;
    assert_eq!(
        summary,
        "這樣一共 1. 薯餅(1片) x1 20元，共 1 個品項，共 20元。確定要送出訂單嗎？（是/否）"
    );
}

#[tokio::test]
async fn test_remove_index_keeps_relative_order() {
    let m = manager();
    say(&m, "我要薯餅、熱狗、荷包蛋").await;
    assert_eq!(session(&m).await.cart.len(), 3);

    assert_eq!(
        say(&m, "刪除第2項").await,
        "已刪除第2項：熱狗。目前購物車：薯餅(1片)、荷包蛋。"
    );
    assert_eq!(
        say(&m, "刪除第5項").await,
        "請確認要刪除第幾項（目前共 2 項）。"
    );
}

#[tokio::test]
async fn test_first_blocking_item() {
    let m = manager();
    let question = "請問飯糰要什麼口味？（例如：源味傳統、醬燒里肌…）";
    assert_eq!(say(&m, "我要一個飯糰、一杯豆漿").await, question);

    // Drink details do not jump the queue.
    assert_eq!(say(&m, "冰的大杯").await, question);
    let s = session(&m).await;
    assert_eq!(s.pending_frames.len(), 2);
    assert_eq!(s.pending_frames[1].missing_slots, vec![Slot::Temp, Slot::Size]);
}

#[tokio::test]
async fn test_later_answer_keeps_earlier_slots() {
    let m = manager();
    assert_eq!(say(&m, "我要一杯冰豆漿").await, "請問豆漿要中杯還是大杯？");
    say(&m, "大杯").await;
    let s = session(&m).await;
    match &s.cart[0].kind {
        ItemKind::Drink(drink) => {
            assert_eq!(drink.temp.as_deref(), Some("冰"));
            assert_eq!(drink.drink.as_deref(), Some("豆漿"));
        }
        other => panic!("unexpected kind {:?}", other),
    }
}

#[tokio::test]
async fn test_same_price_swap_adds_nothing() {
    let m = manager();
    assert_eq!(
        say(&m, "套餐六紅茶換成豆漿").await,
        "套餐六的飲料已換成豆漿，不用加價。請問豆漿要冰的、溫的還是熱的？"
    );
    assert_eq!(
        say(&m, "熱的").await,
        "好的，1份 套餐六(飲料換豆漿)，還需要什麼嗎？"
    );
    assert_eq!(total(&m, "s").await, Some(90));
}

#[tokio::test]
async fn test_combo_drink_upsize_is_charged() {
    let m = manager();
    say(&m, "我要套餐二").await;
    assert_eq!(say(&m, "紫米").await, "請問十穀漿要冰的、溫的還是熱的？");
    assert_eq!(
        say(&m, "冰的大杯").await,
        "套餐二的十穀漿改成大杯，加5元。好的，1份 套餐二(飲料改大杯)，還需要什麼嗎？"
    );

    let s = session(&m).await;
    let combo = s.cart[0].as_combo().unwrap();
    let swap = combo.swap_drink.clone().unwrap();
    assert_eq!(swap.delta, Some(5));
    let labels: Vec<String> = combo.sub_items.iter().map(|f| f.label()).collect();
    assert_eq!(labels, vec!["源味傳統飯糰(紫米)", "十穀漿(大杯, 冰)"]);
    assert_eq!(total(&m, "s").await, Some(75));
}

#[tokio::test]
async fn test_combo_drink_answer_naming_other_drink_is_a_swap() {
    let m = manager();
    say(&m, "我要套餐二").await;
    say(&m, "紫米").await;
    assert_eq!(
        say(&m, "冰的花生糙米漿 大杯").await,
        "套餐二的飲料已換成花生糙米漿，不用加價。好的，1份 套餐二(飲料換花生糙米漿)，還需要什麼嗎？"
    );
    let s = session(&m).await;
    let swap = s.cart[0].as_combo().unwrap().swap_drink.clone().unwrap();
    assert_eq!(swap.to, "花生糙米漿");
    assert_eq!(swap.delta, Some(0));
    assert_eq!(total(&m, "s").await, Some(70));
}

#[tokio::test]
async fn test_combo_drink_answer_with_price_choice_asks_first() {
    let m = manager();
    say(&m, "我要套餐六").await;
    assert_eq!(
        say(&m, "冰的十穀漿").await,
        "套餐六的飲料換成十穀漿：中杯 30元（+5元）、大杯 35元（+10元），請問確認換哪一種？"
    );
    assert!(session(&m).await.cart.is_empty());

    assert_eq!(
        say(&m, "中杯").await,
        "套餐六的飲料已換成十穀漿，加5元。好的，1份 套餐六(飲料換十穀漿)，還需要什麼嗎？"
    );
    assert_eq!(total(&m, "s").await, Some(95));
}

#[tokio::test]
async fn test_oversized_quantity_is_refused() {
    let m = manager();
    assert_eq!(
        say(&m, "我要200000000杯冰豆漿大杯").await,
        "一次最多只能點99份，請再說一次數量。"
    );
    let s = session(&m).await;
    assert!(s.pending_frames.is_empty());
    assert!(s.cart.is_empty());
    assert_eq!(say(&m, "結帳").await, replies::EMPTY_CART);
}

#[tokio::test]
async fn test_price_changing_swap_needs_confirmation() {
    let m = manager();
    assert_eq!(
        say(&m, "套餐六飲料換成花生糙米漿").await,
        "套餐六的飲料換成花生糙米漿：中杯 25元（+0元）、大杯 30元（+5元），請問確認換哪一種？"
    );
    assert_eq!(
        say(&m, "大杯").await,
        "套餐六的飲料已換成花生糙米漿，加5元。請問花生糙米漿要冰的、溫的還是熱的？"
    );
    say(&m, "冰的").await;
    assert_eq!(total(&m, "s").await, Some(95));
}

#[tokio::test]
async fn test_checkout_blocked_by_pending_item() {
    let m = manager();
    say(&m, "我要一杯豆漿").await;
    assert_eq!(say(&m, "結帳").await, "請問豆漿要冰的、溫的還是熱的？");
    assert_eq!(session(&m).await.status, SessionStatus::Open);

    let empty = manager();
    assert_eq!(say(&empty, "結帳").await, replies::EMPTY_CART);
}

#[tokio::test]
async fn test_unpriceable_item_blocks_checkout() {
    let m = manager();
    say(&m, "我要醬燒肉片蛋吐司").await;
    assert_eq!(
        say(&m, "結帳").await,
        "抱歉，醬燒肉片蛋吐司 無法計價，請洽店員協助。"
    );
    let s = session(&m).await;
    assert_eq!(s.status, SessionStatus::Open);
    assert_eq!(s.cart.len(), 1);
}

#[tokio::test]
async fn test_submission_freezes_session() {
    let orders = Arc::new(InMemoryOrderRepository::new());
    let m = manager_with(orders.clone());
    say(&m, "我要薯餅").await;
    say(&m, "結帳").await;
    assert!(say(&m, "好").await.starts_with("訂單已送出！訂單編號："));

    let before = session(&m).await;
    let payload = before.order_payload.clone().unwrap();
    assert_eq!(payload.total_price, 20);
    assert_eq!(payload.status, "submitted");
    assert!(orders.get(&payload.order_id).await.unwrap().is_some());

    assert_eq!(say(&m, "我要一杯豆漿").await, replies::ALREADY_SUBMITTED);
    assert_eq!(say(&m, "清空").await, replies::ALREADY_SUBMITTED);
    let after = session(&m).await;
    assert_eq!(before, after);

    let summary = m.order_summary("s").await.unwrap();
    assert_eq!(summary.order_id, Some(payload.order_id));
}

#[tokio::test]
async fn test_declined_checkout_reopens() {
    let m = manager();
    say(&m, "我要薯餅").await;
    say(&m, "結帳").await;
    assert_eq!(say(&m, "先不要").await, replies::CHECKOUT_DECLINED);
    assert_eq!(session(&m).await.status, SessionStatus::Open);
}

#[tokio::test]
async fn test_yes_with_new_request_reopens_checkout() {
    let m = manager();
    say(&m, "我要薯餅").await;
    say(&m, "結帳").await;
    assert_eq!(
        say(&m, "好，再一杯豆漿").await,
        "請問豆漿要冰的、溫的還是熱的？"
    );

    let s = session(&m).await;
    assert_eq!(s.status, SessionStatus::Open);
    assert!(s.order_payload.is_none());
    assert_eq!(s.pending_frames.len(), 1);
}

#[tokio::test]
async fn test_failed_save_stays_in_confirmation() {
    let m = manager_with(Arc::new(FailingOrders));
    say(&m, "我要薯餅").await;
    say(&m, "結帳").await;
    assert_eq!(say(&m, "確定").await, replies::SUBMIT_FAILED);

    let s = session(&m).await;
    assert_eq!(s.status, SessionStatus::ConfirmingCheckout);
    assert!(s.order_payload.is_none());
}

#[tokio::test]
async fn test_clear_needs_second_turn() {
    let m = manager();
    say(&m, "我要薯餅").await;
    assert_eq!(say(&m, "清空").await, replies::CONFIRM_CLEAR);
    assert_eq!(say(&m, "我要一杯豆漿").await, replies::CLEAR_KEPT);
    assert_eq!(session(&m).await.cart.len(), 1);

    say(&m, "清空").await;
    assert_eq!(say(&m, "是").await, replies::CLEARED);
    let s = session(&m).await;
    assert!(s.cart.is_empty());
    assert!(!s.pending_clear_confirm);
}

#[tokio::test]
async fn test_cancel_drops_whole_combo() {
    let m = manager();
    say(&m, "我要薯餅").await;
    say(&m, "我要套餐二").await;
    assert_eq!(say(&m, "取消").await, "已取消剛剛的套餐二。");

    let s = session(&m).await;
    assert!(s.pending_frames.is_empty());
    assert!(s.combo_frames.is_empty());
    assert_eq!(s.cart.len(), 1);

    assert_eq!(say(&m, "取消").await, "已取消：薯餅(1片)。");
    assert_eq!(say(&m, "取消上一個").await, replies::NOTHING_TO_CANCEL);
}

#[tokio::test]
async fn test_unknown_text() {
    let m = manager();
    assert_eq!(say(&m, "今天天氣不錯").await, replies::UNKNOWN);
}

#[tokio::test]
async fn test_llm_route_used_when_keywords_fail() {
    let m = manager().with_llm_router(Arc::new(FixedRouter {
        category: RouteCategory::Drink,
        confidence: 0.9,
        delay: Duration::ZERO,
    }));
    assert_eq!(say(&m, "來點喝的").await, "請問要喝什麼飲料？");
}

#[tokio::test]
async fn test_llm_route_rejected_below_threshold() {
    let m = manager().with_llm_router(Arc::new(FixedRouter {
        category: RouteCategory::Drink,
        confidence: 0.3,
        delay: Duration::ZERO,
    }));
    assert_eq!(say(&m, "來點喝的").await, replies::UNKNOWN);
}

#[tokio::test]
async fn test_llm_timeout_falls_back() {
    let m = manager()
        .with_llm_router(Arc::new(FixedRouter {
            category: RouteCategory::Drink,
            confidence: 0.9,
            delay: Duration::from_millis(500),
        }))
        .with_llm_timeout(Duration::from_millis(20));
    assert_eq!(say(&m, "來點喝的").await, replies::UNKNOWN);
    assert!(session(&m).await.pending_frames.is_empty());
}

#[tokio::test]
async fn test_clarifier_phrases_question() {
    let m = manager().with_llm_clarifier(Arc::new(FixedClarifier(Some("豆漿要冰的還是熱的呢？"))));
    assert_eq!(say(&m, "我要一杯豆漿").await, "豆漿要冰的還是熱的呢？");

    let failing = manager().with_llm_clarifier(Arc::new(FixedClarifier(None)));
    assert_eq!(
        failing.handle("t", "我要一杯豆漿").await,
        "請問豆漿要冰的、溫的還是熱的？"
    );
}

#[tokio::test]
async fn test_broken_menu_apologizes() {
    let m = DialogueManager::new(
        Arc::new(JsonMenuCatalog::from_json("{ not a menu")),
        load_pricing_rules(None).unwrap(),
        load_combo_aliases(None).unwrap(),
        Arc::new(InMemoryOrderRepository::new()),
    )
    .unwrap();
    assert_eq!(say(&m, "我要一杯豆漿").await, "飲料菜單讀取失敗，請洽服務人員。");
    assert!(session(&m).await.pending_frames.is_empty());
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let m = manager();
    m.handle("a", "我要薯餅").await;
    m.handle("b", "我要一杯豆漿").await;
    assert_eq!(m.snapshot("a").await.unwrap().cart.len(), 1);
    assert_eq!(m.snapshot("b").await.unwrap().pending_frames.len(), 1);
    assert!(m.snapshot("c").await.is_none());
}
