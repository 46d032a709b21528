//! Prompt templates for the LLM collaborators, rendered with minijinja.

use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use stall_core::error::{Result, StallError};
use stall_core::item::ItemType;
use stall_core::session::SessionContext;
use stall_core::slot::Slot;

const ROUTER_SYSTEM: &str = r#"你是早餐店點餐系統的路由分類器。你的工作是理解顧客的點餐意圖，並分類到正確的商品類別。

商品類別:
- riceball (飯糰): 飯糰、米種、飯糰口味
- egg_pancake (蛋餅)
- carrier (漢堡/吐司/饅頭)
- drink (飲料): 豆漿、紅茶、奶茶等
- snack (點心): 雞塊、薯條、蘿蔔糕等
- jam_toast (果醬吐司): 草莓、花生、蒜香等口味
- combo (套餐)
- unknown: 無法確定或不屬於以上類別
{% if has_main_item %}
顧客已經點了主食，後續的飲料或點心相關詞更可能是飲料或點心。
{% endif %}
只回傳 JSON，不要加任何其他文字。"#;

const ROUTER_USER: &str = r#"顧客說: "{{ text }}"

{{ context_line }}

請以 JSON 回應:
{"route_type": "...", "confidence": 0.0, "reasoning": "..."}"#;

const CLARIFIER_SYSTEM: &str =
    "你是早餐店點餐系統的澄清助手，用自然、簡潔的台灣口語一次只問一個問題。";

const CLARIFIER_USER: &str = r#"品項類型: {{ item_label }} ({{ item_type }})
缺少的資訊: {{ slot }}
{{ context_line }}

請只輸出一句問句，不要重複已知資訊，不要加引號。"#;

static PROMPTS: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("router_system", ROUTER_SYSTEM)
        .expect("router system template");
    env.add_template("router_user", ROUTER_USER)
        .expect("router user template");
    env.add_template("clarifier_user", CLARIFIER_USER)
        .expect("clarifier user template");
    env
});

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    PROMPTS
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|e| StallError::internal(format!("Failed to render prompt '{}': {}", name, e)))
}

/// One-line description of the session for prompt context.
pub fn context_line(context: &SessionContext) -> String {
    let mut parts = Vec::new();
    if !context.cart_items.is_empty() {
        parts.push(format!("購物車中已有: {}", context.cart_items.join(", ")));
    }
    if context.has_main_item {
        parts.push("已有主食".to_string());
    }
    if context.has_drink {
        parts.push("已有飲料".to_string());
    }
    if !context.pending_items.is_empty() {
        parts.push(format!("待補資訊: {}", context.pending_items.join(", ")));
    }
    if parts.is_empty() {
        parts.push("購物車為空，這是一個新訂單".to_string());
    }
    format!("會話上下文: {}", parts.join(" | "))
}

/// System and user prompts for classifying `text`.
pub fn router_prompts(text: &str, context: &SessionContext) -> Result<(String, String)> {
    let system = render(
        "router_system",
        context! { has_main_item => context.has_main_item },
    )?;
    let user = render(
        "router_user",
        context! { text => text, context_line => context_line(context) },
    )?;
    Ok((system, user))
}

/// System and user prompts for asking about `slot`.
pub fn clarifier_prompts(
    item_type: ItemType,
    slot: Slot,
    context: &SessionContext,
) -> Result<(String, String)> {
    let user = render(
        "clarifier_user",
        context! {
            item_label => item_type.label(),
            item_type => item_type.as_ref(),
            slot => slot.as_ref(),
            context_line => context_line(context),
        },
    )?;
    Ok((CLARIFIER_SYSTEM.to_string(), user))
}
