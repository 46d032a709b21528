//! Combo detection, explosion and drink swaps.
//!
//! A combo entry reads `套餐六 鮪魚蛋吐司+荷包蛋+紅茶(大)`: a short name and a
//! `+`-joined component list. Components are resolved to menu entries through
//! the alias table, so cosmetic variants in the combo text never need code
//! changes.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use stall_core::config::ComboAliasConfig;
use stall_core::error::{Result, StallError};
use stall_core::item::{
    BundledDrink, ComboAttrs, DrinkAttrs, DrinkSize, DrinkSwap, ItemFrame, ItemKind, ItemType,
    ParsedFrame, SwapCandidate, SwapOffer,
};
use stall_core::menu::{MenuCatalog, MenuItem, category, item_type_for_category};
use stall_core::session::Session;
use stall_parsers::ParserRegistry;
use stall_parsers::numerals::parse_number;

static COMBO_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"套餐\s*([0-9]+|[一二兩三四五六七八九十]+)").expect("combo number regex")
});

static SWAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"換成|改成|換").expect("swap regex"));

const DECLINE_SWAP: &[&str] = &["不換", "不用換", "不要換", "算了", "維持", "原本的"];

/// One declared component of a combo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboComponent {
    /// Text as written in the combo entry, e.g. `紅茶(大)`.
    pub raw: String,
    /// After the normalize rules, before aliasing, e.g. `紅茶`.
    pub normalized: String,
    /// Base name of the resolved menu entry, e.g. `精選紅茶`.
    pub canonical: String,
    pub item_type: ItemType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboDefinition {
    pub short_name: String,
    pub menu_name: String,
    pub price: u32,
    pub components: Vec<ComboComponent>,
}

impl ComboDefinition {
    fn contains(&self, canonical: &str) -> bool {
        self.components.iter().any(|c| c.canonical == canonical)
    }

    /// `套餐六` is 6; `兒童餐` has no number.
    fn number(&self) -> Option<u32> {
        self.short_name
            .strip_prefix("套餐")
            .and_then(|n| parse_number(n.trim()))
    }
}

/// A combo turned into an aggregate frame plus its pending sub-items.
#[derive(Debug, Clone)]
pub struct ExplodedCombo {
    pub combo: ItemFrame,
    pub sub_items: Vec<ItemFrame>,
}

/// Result of a drink swap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Applied {
        combo_name: String,
        to: String,
        delta: u32,
    },
    /// Sizes differ in price; the customer has to pick one.
    Offered(SwapOffer),
    /// The replacement is not a drink on the menu, or the combo has none.
    NotDrink,
}

/// How a turn answered a pending swap offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapAnswer {
    Applied {
        combo_name: String,
        to: String,
        delta: u32,
    },
    Declined,
    Unanswered,
}

/// Splits `套餐六紅茶換成米漿` into the part before and after the swap marker.
pub fn split_swap(text: &str) -> (&str, Option<&str>) {
    match SWAP_RE.find(text) {
        Some(m) => {
            let target = text[m.end()..].trim();
            (&text[..m.start()], (!target.is_empty()).then_some(target))
        }
        None => (text, None),
    }
}

fn size_suffix(raw: &str) -> Option<DrinkSize> {
    let inner = raw.trim().strip_suffix(')')?;
    let open = inner.rfind('(')?;
    DrinkSize::from_menu_suffix(&inner[open + 1..])
}

fn is_drink_of(frame: &ItemFrame, combo_id: u64) -> bool {
    frame.combo_owner == Some(combo_id) && frame.item_type() == ItemType::Drink
}

pub struct ComboResolver {
    menu: Arc<dyn MenuCatalog>,
    parsers: ParserRegistry,
    aliases: ComboAliasConfig,
    rules: Vec<(Regex, String)>,
}

impl ComboResolver {
    /// # Errors
    ///
    /// Returns `StallError::Config` if a normalize rule is not a valid regex.
    pub fn new(
        menu: Arc<dyn MenuCatalog>,
        parsers: ParserRegistry,
        aliases: ComboAliasConfig,
    ) -> Result<Self> {
        let rules = aliases
            .normalize_rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.replace.clone()))
                    .map_err(|e| {
                        StallError::config(format!(
                            "Invalid combo normalize rule '{}': {}",
                            rule.pattern, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            menu,
            parsers,
            aliases,
            rules,
        })
    }

    fn normalize(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.trim().to_string(), |name, (re, replace)| {
                re.replace_all(&name, replace.as_str()).into_owned()
            })
    }

    /// Menu entry a component name refers to, after normalizing and aliasing.
    fn resolve(&self, name: &str) -> Result<Option<MenuItem>> {
        let aliased = self
            .aliases
            .manual_aliases
            .get(name)
            .map(String::as_str)
            .unwrap_or(name);
        self.menu.find_sellable(aliased)
    }

    /// Every combo on the menu with its components resolved.
    ///
    /// # Errors
    ///
    /// Returns `StallError::MenuUnavailable` if the menu cannot be loaded or
    /// a combo names a component that is not sold on its own.
    pub fn definitions(&self) -> Result<Vec<ComboDefinition>> {
        let mut definitions = Vec::new();
        for entry in self.menu.combos()? {
            let Some((short, description)) = entry.combo_parts() else {
                continue;
            };
            let mut components = Vec::new();
            for raw in description.split('+').map(str::trim).filter(|s| !s.is_empty()) {
                let normalized = self.normalize(raw);
                let item = self.resolve(&normalized)?.ok_or_else(|| {
                    StallError::menu_unavailable(format!(
                        "combo '{}' component '{}' is not on the menu",
                        short, raw
                    ))
                })?;
                let item_type = item_type_for_category(&item.category).ok_or_else(|| {
                    StallError::menu_unavailable(format!(
                        "combo '{}' component '{}' has unknown category '{}'",
                        short, raw, item.category
                    ))
                })?;
                components.push(ComboComponent {
                    raw: raw.to_string(),
                    normalized,
                    canonical: item.base_name().to_string(),
                    item_type,
                });
            }
            definitions.push(ComboDefinition {
                short_name: short.to_string(),
                menu_name: entry.name.clone(),
                price: entry.price,
                components,
            });
        }
        Ok(definitions)
    }

    /// Short names of every combo, in menu order.
    pub fn combo_names(&self) -> Result<Vec<String>> {
        Ok(self
            .menu
            .combos()?
            .iter()
            .filter_map(|entry| entry.combo_parts().map(|(short, _)| short.to_string()))
            .collect())
    }

    /// Finds the combo a span orders, by name or by its contents.
    pub fn detect(&self, text: &str) -> Result<Option<ComboDefinition>> {
        let definitions = self.definitions()?;

        let mut named: Vec<&ComboDefinition> = definitions
            .iter()
            .filter(|d| !d.short_name.is_empty() && text.contains(d.short_name.as_str()))
            .collect();
        named.sort_by_key(|d| std::cmp::Reverse(d.short_name.chars().count()));
        if let Some(found) = named.first() {
            return Ok(Some((*found).clone()));
        }

        if let Some(number) = COMBO_NUMBER_RE
            .captures(text)
            .and_then(|caps| parse_number(&caps[1]))
        {
            if let Some(found) = definitions.iter().find(|d| d.number() == Some(number)) {
                return Ok(Some(found.clone()));
            }
        }

        self.infer(text, &definitions)
    }

    /// Names of combo components mentioned in `text`, longest match first.
    fn mentions(&self, text: &str, definitions: &[ComboDefinition]) -> Result<Vec<String>> {
        let mut surfaces: HashMap<String, String> = HashMap::new();
        for component in definitions.iter().flat_map(|d| &d.components) {
            for surface in [&component.raw, &component.normalized, &component.canonical] {
                surfaces.insert(surface.clone(), component.canonical.clone());
            }
        }
        for (alias, target) in &self.aliases.manual_aliases {
            if let Some(item) = self.menu.find_sellable(target)? {
                let canonical = item.base_name();
                if definitions.iter().any(|d| d.contains(canonical)) {
                    surfaces.insert(alias.clone(), canonical.to_string());
                }
            }
        }

        let mut surfaces: Vec<(String, String)> = surfaces
            .into_iter()
            .filter(|(surface, _)| !surface.is_empty())
            .collect();
        surfaces.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut rest = text.to_string();
        let mut found: Vec<String> = Vec::new();
        for (surface, canonical) in surfaces {
            if rest.contains(surface.as_str()) {
                rest = rest.replace(surface.as_str(), "|");
                if !found.contains(&canonical) {
                    found.push(canonical);
                }
            }
        }
        Ok(found)
    }

    fn infer(
        &self,
        text: &str,
        definitions: &[ComboDefinition],
    ) -> Result<Option<ComboDefinition>> {
        let mentions = self.mentions(text, definitions)?;
        if mentions.is_empty() {
            return Ok(None);
        }

        if let [only] = mentions.as_slice() {
            let allowed = self
                .aliases
                .allow_single_item_keywords
                .iter()
                .any(|k| k == only);
            if !allowed && self.menu.find_sellable(only)?.is_some() {
                tracing::debug!(
                    "[ComboResolver] '{}' is sold on its own, not inferring a combo",
                    only
                );
                return Ok(None);
            }
        }

        let matching: Vec<&ComboDefinition> = definitions
            .iter()
            .filter(|d| mentions.iter().all(|m| d.contains(m)))
            .collect();
        match matching.as_slice() {
            [one] => {
                tracing::info!(
                    "[ComboResolver] Inferred {} from {:?}",
                    one.short_name,
                    mentions
                );
                Ok(Some((*one).clone()))
            }
            _ => Ok(None),
        }
    }

    /// Builds the combo aggregate and one sub-item frame per component.
    ///
    /// Sub-items carry `combo_owner = combo_id` and a fixed quantity of one.
    pub fn explode(&self, definition: &ComboDefinition, combo_id: u64) -> Result<ExplodedCombo> {
        let mut sub_items = Vec::with_capacity(definition.components.len());
        let mut bundled_drink = None;

        for component in &definition.components {
            let parser = self.parsers.get(component.item_type).ok_or_else(|| {
                StallError::internal(format!("no parser for {}", component.item_type))
            })?;
            let parsed = parser.parse(&component.raw)?;
            let mut frame = ItemFrame::from_parsed(parsed.with_quantity(Some(1)));
            frame.combo_owner = Some(combo_id);

            if let Some(drink) = frame.as_drink_mut() {
                let size = size_suffix(&component.raw)
                    .or(drink.size)
                    .unwrap_or(DrinkSize::Medium);
                drink.drink = Some(component.canonical.clone());
                drink.size = Some(size);
                let price = self
                    .menu
                    .get_price(category::DRINK, &size.menu_name(&component.canonical))?;
                bundled_drink = Some(BundledDrink {
                    drink: component.canonical.clone(),
                    size,
                    price,
                });
            }
            frame.refresh_missing_slots();
            sub_items.push(frame);
        }

        let combo = ItemFrame::from_parsed(ParsedFrame::new(ItemKind::Combo(ComboAttrs {
            combo_id,
            name: definition.short_name.clone(),
            menu_name: definition.menu_name.clone(),
            sub_items: Vec::new(),
            bundled_drink,
            swap_drink: None,
        })));

        tracing::info!(
            "[ComboResolver] Exploded {} into {} sub-items",
            definition.short_name,
            sub_items.len()
        );
        Ok(ExplodedCombo { combo, sub_items })
    }

    fn candidates(&self, target: &str, bundled: &BundledDrink) -> Result<Vec<SwapCandidate>> {
        let mut candidates: Vec<SwapCandidate> = self
            .menu
            .items_in(category::DRINK)?
            .into_iter()
            .filter(|item| item.base_name() == target)
            .filter_map(|item| {
                item.drink_size().map(|size| SwapCandidate {
                    size,
                    delta: item.price.saturating_sub(bundled.price),
                    menu_name: item.name.clone(),
                    price: item.price,
                })
            })
            .collect();
        candidates.sort_by_key(|c| c.price);
        Ok(candidates)
    }

    /// Handles `換成X` for the combo `combo_id`.
    ///
    /// The swap is applied at once when the size is stated, when only one
    /// size exists, or when every size costs the same extra. Otherwise the
    /// drink sub-item is parked on a [`SwapOffer`] until a size is chosen.
    pub fn request_swap(
        &self,
        session: &mut Session,
        combo_id: u64,
        target_text: &str,
    ) -> Result<SwapOutcome> {
        let requested = self.parse_drink(target_text)?;
        self.change_drink(session, combo_id, requested)
    }

    /// Prices an already parsed drink change for the combo `combo_id`.
    ///
    /// Used for swap requests and for slot answers that name a drink or size
    /// other than the one the combo currently holds. Temperature and sugar in
    /// `requested` are applied together with the swap.
    pub fn change_drink(
        &self,
        session: &mut Session,
        combo_id: u64,
        requested: DrinkAttrs,
    ) -> Result<SwapOutcome> {
        let Some((combo_name, bundled)) = combo_info(session, combo_id) else {
            return Ok(SwapOutcome::NotDrink);
        };
        let Some(target) = requested.drink.clone() else {
            return Ok(SwapOutcome::NotDrink);
        };
        let candidates = self.candidates(&target, &bundled)?;
        if candidates.is_empty() {
            return Ok(SwapOutcome::NotDrink);
        }

        let uniform = candidates.iter().all(|c| c.delta == candidates[0].delta);
        let chosen = requested
            .size
            .and_then(|size| candidates.iter().find(|c| c.size == size))
            .or_else(|| {
                uniform.then(|| {
                    candidates
                        .iter()
                        .find(|c| c.size == bundled.size)
                        .unwrap_or(&candidates[0])
                })
            })
            .cloned();

        match chosen {
            Some(candidate) => {
                apply_swap(session, combo_id, &bundled, &target, &candidate, requested);
                Ok(SwapOutcome::Applied {
                    combo_name,
                    to: target,
                    delta: candidate.delta,
                })
            }
            None => {
                let offer = SwapOffer {
                    combo_name,
                    target: target.clone(),
                    candidates,
                };
                park_offer(session, combo_id, &bundled, &target, offer.clone());
                tracing::info!(
                    "[ComboResolver] Swap to {} needs a size choice",
                    offer.target
                );
                Ok(SwapOutcome::Offered(offer))
            }
        }
    }

    /// Interprets `text` as the answer to a parked swap offer, if any.
    pub fn answer_swap(&self, session: &mut Session, text: &str) -> Result<SwapAnswer> {
        let Some(index) = session.pending_frames.iter().position(|f| {
            matches!(&f.kind, ItemKind::Drink(d) if d.swap_offer.is_some())
        }) else {
            return Ok(SwapAnswer::Unanswered);
        };
        let frame = &session.pending_frames[index];
        let (Some(combo_id), ItemKind::Drink(DrinkAttrs {
            swap_offer: Some(offer),
            ..
        })) = (frame.combo_owner, &frame.kind)
        else {
            return Ok(SwapAnswer::Unanswered);
        };
        let offer = offer.clone();

        if DECLINE_SWAP.iter().any(|word| text.contains(word)) {
            let frame = &mut session.pending_frames[index];
            if let Some(drink) = frame.as_drink_mut() {
                drink.swap_offer = None;
            }
            frame.refresh_missing_slots();
            if let Some(combo) = combo_attrs_mut(session, combo_id) {
                combo.swap_drink = None;
            }
            return Ok(SwapAnswer::Declined);
        }

        let requested = self.parse_drink(text)?;
        let Some(candidate) = requested.size.and_then(|size| offer.candidate(size)).cloned()
        else {
            return Ok(SwapAnswer::Unanswered);
        };
        let Some((combo_name, bundled)) = combo_info(session, combo_id) else {
            return Ok(SwapAnswer::Unanswered);
        };
        apply_swap(session, combo_id, &bundled, &offer.target, &candidate, requested);
        Ok(SwapAnswer::Applied {
            combo_name,
            to: offer.target,
            delta: candidate.delta,
        })
    }

    fn parse_drink(&self, text: &str) -> Result<DrinkAttrs> {
        let parser = self
            .parsers
            .get(ItemType::Drink)
            .ok_or_else(|| StallError::internal("no drink parser registered"))?;
        match parser.parse(text)?.kind {
            ItemKind::Drink(attrs) => Ok(attrs),
            _ => Ok(DrinkAttrs::default()),
        }
    }
}

fn combo_attrs_mut(session: &mut Session, combo_id: u64) -> Option<&mut ComboAttrs> {
    session
        .combo_frames
        .iter_mut()
        .filter_map(ItemFrame::as_combo_mut)
        .find(|c| c.combo_id == combo_id)
}

fn combo_info(session: &Session, combo_id: u64) -> Option<(String, BundledDrink)> {
    session
        .combo_frames
        .iter()
        .filter_map(ItemFrame::as_combo)
        .find(|c| c.combo_id == combo_id)
        .and_then(|c| c.bundled_drink.clone().map(|b| (c.name.clone(), b)))
}

/// The combo's drink sub-item, pending or already filled in.
fn drink_frame_mut(session: &mut Session, combo_id: u64) -> Option<&mut ItemFrame> {
    if let Some(index) = session
        .pending_frames
        .iter()
        .position(|f| is_drink_of(f, combo_id))
    {
        return session.pending_frames.get_mut(index);
    }
    combo_attrs_mut(session, combo_id)
        .and_then(|combo| combo.sub_items.iter_mut().find(|f| f.item_type() == ItemType::Drink))
}

fn apply_swap(
    session: &mut Session,
    combo_id: u64,
    bundled: &BundledDrink,
    target: &str,
    candidate: &SwapCandidate,
    requested: DrinkAttrs,
) {
    if let Some(frame) = drink_frame_mut(session, combo_id) {
        if let Some(drink) = frame.as_drink_mut() {
            drink.drink = Some(target.to_string());
            drink.size = Some(candidate.size);
            drink.swap_offer = None;
            if requested.temp.is_some() {
                drink.temp = requested.temp;
            }
            if requested.sugar.is_some() {
                drink.sugar = requested.sugar;
            }
        }
        frame.refresh_missing_slots();
    }

    let unchanged = target == bundled.drink && candidate.size == bundled.size;
    if let Some(combo) = combo_attrs_mut(session, combo_id) {
        combo.swap_drink = (!unchanged).then(|| DrinkSwap {
            from: bundled.drink.clone(),
            to: target.to_string(),
            size: Some(candidate.size),
            delta: Some(candidate.delta),
        });
    }
    tracing::info!(
        "[ComboResolver] Swapped combo {} drink to {} (+{})",
        combo_id,
        target,
        candidate.delta
    );
}

fn park_offer(
    session: &mut Session,
    combo_id: u64,
    bundled: &BundledDrink,
    target: &str,
    offer: SwapOffer,
) {
    // A drink already filled in goes back to the queue until the offer is settled.
    if !session.pending_frames.iter().any(|f| is_drink_of(f, combo_id)) {
        let taken = combo_attrs_mut(session, combo_id).and_then(|combo| {
            let index = combo
                .sub_items
                .iter()
                .position(|f| f.item_type() == ItemType::Drink)?;
            Some(combo.sub_items.remove(index))
        });
        if let Some(frame) = taken {
            session.pending_frames.push(frame);
        }
    }

    if let Some(frame) = drink_frame_mut(session, combo_id) {
        if let Some(drink) = frame.as_drink_mut() {
            drink.swap_offer = Some(offer);
        }
        frame.refresh_missing_slots();
    }
    if let Some(combo) = combo_attrs_mut(session, combo_id) {
        combo.swap_drink = Some(DrinkSwap {
            from: bundled.drink.clone(),
            to: target.to_string(),
            size: None,
            delta: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stall_core::slot::Slot;
    use stall_infrastructure::{JsonMenuCatalog, load_combo_aliases, load_pricing_rules};

    fn resolver() -> ComboResolver {
        let menu: Arc<dyn MenuCatalog> = Arc::new(JsonMenuCatalog::bundled());
        let parsers = ParserRegistry::standard(Arc::clone(&menu), &load_pricing_rules(None).unwrap());
        ComboResolver::new(menu, parsers, load_combo_aliases(None).unwrap()).unwrap()
    }

    fn detected(text: &str) -> Option<String> {
        resolver().detect(text).unwrap().map(|d| d.short_name)
    }

    /// Session with an exploded combo in progress.
    fn session_with(short_name: &str) -> (ComboResolver, Session, u64) {
        let resolver = resolver();
        let definition = resolver.detect(short_name).unwrap().unwrap();
        let mut session = Session::new("s");
        let combo_id = session.allocate_combo_id();
        let exploded = resolver.explode(&definition, combo_id).unwrap();
        session.combo_frames.push(exploded.combo);
        session.pending_frames.extend(exploded.sub_items);
        (resolver, session, combo_id)
    }

    fn drink_of(session: &Session, combo_id: u64) -> DrinkAttrs {
        session
            .pending_frames
            .iter()
            .find(|f| is_drink_of(f, combo_id))
            .and_then(|f| match &f.kind {
                ItemKind::Drink(d) => Some(d.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_definitions_resolve_components() {
        let definitions = resolver().definitions().unwrap();
        assert_eq!(definitions.len(), 7);

        let kids = definitions.iter().find(|d| d.short_name == "兒童餐").unwrap();
        let canonicals: Vec<&str> = kids.components.iter().map(|c| c.canonical.as_str()).collect();
        assert_eq!(canonicals, vec!["薯條", "麥克雞塊", "果醬吐司", "精選紅茶"]);
        assert_eq!(kids.components[2].item_type, ItemType::JamToast);
    }

    #[test]
    fn test_detect_by_name_and_number() {
        assert_eq!(detected("我要套餐二").as_deref(), Some("套餐二"));
        assert_eq!(detected("套餐2").as_deref(), Some("套餐二"));
        assert_eq!(detected("一份兒童餐").as_deref(), Some("兒童餐"));
        assert_eq!(detected("套餐九"), None);
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(detected("火腿蛋吐司薯餅紅茶").as_deref(), Some("套餐三"));
        assert_eq!(detected("醬燒肉片蛋餅配大豆漿").as_deref(), Some("套餐一"));
    }

    #[test]
    fn test_single_sellable_item_is_not_a_combo() {
        assert_eq!(detected("我要薯餅"), None);
        assert_eq!(detected("我要薯餅 算我5元"), None);
        assert_eq!(detected("紅茶"), None);
    }

    #[test]
    fn test_allow_listed_single_item_infers() {
        let menu: Arc<dyn MenuCatalog> = Arc::new(JsonMenuCatalog::bundled());
        let parsers = ParserRegistry::standard(Arc::clone(&menu), &load_pricing_rules(None).unwrap());
        let mut aliases = load_combo_aliases(None).unwrap();
        aliases.allow_single_item_keywords = vec!["十穀漿".into()];
        let resolver = ComboResolver::new(menu, parsers, aliases).unwrap();

        let found = resolver.detect("十穀漿").unwrap().unwrap();
        assert_eq!(found.short_name, "套餐二");
    }

    #[test]
    fn test_invalid_normalize_rule_is_config_error() {
        let menu: Arc<dyn MenuCatalog> = Arc::new(JsonMenuCatalog::bundled());
        let parsers = ParserRegistry::standard(Arc::clone(&menu), &load_pricing_rules(None).unwrap());
        let mut aliases = ComboAliasConfig::default();
        aliases.normalize_rules.push(stall_core::config::NormalizeRule {
            pattern: "(".into(),
            replace: String::new(),
        });
        assert!(matches!(
            ComboResolver::new(menu, parsers, aliases),
            Err(StallError::Config(_))
        ));
    }

    #[test]
    fn test_explode_combo_two() {
        let (_, session, combo_id) = session_with("套餐二");
        assert_eq!(session.pending_frames.len(), 2);

        let riceball = &session.pending_frames[0];
        assert_eq!(riceball.combo_owner, Some(combo_id));
        assert_eq!(riceball.missing_slots, vec![Slot::Rice]);

        let drink = drink_of(&session, combo_id);
        assert_eq!(drink.drink.as_deref(), Some("十穀漿"));
        assert_eq!(drink.size, Some(DrinkSize::Medium));

        let combo = session.combo_frames[0].as_combo().unwrap();
        assert_eq!(
            combo.bundled_drink,
            Some(BundledDrink {
                drink: "十穀漿".into(),
                size: DrinkSize::Medium,
                price: 30,
            })
        );
    }

    #[test]
    fn test_zero_delta_swap_applies_directly() {
        let (resolver, mut session, combo_id) = session_with("套餐六");
        let outcome = resolver.request_swap(&mut session, combo_id, "豆漿").unwrap();
        assert_eq!(
            outcome,
            SwapOutcome::Applied {
                combo_name: "套餐六".into(),
                to: "豆漿".into(),
                delta: 0,
            }
        );
        let drink = drink_of(&session, combo_id);
        assert_eq!(drink.drink.as_deref(), Some("豆漿"));
        assert_eq!(drink.size, Some(DrinkSize::Large));

        let swap = session.combo_frames[0].as_combo().unwrap().swap_drink.clone().unwrap();
        assert_eq!(swap.delta, Some(0));
    }

    #[test]
    fn test_price_changing_swap_is_offered_then_confirmed() {
        let (resolver, mut session, combo_id) = session_with("套餐六");
        let outcome = resolver
            .request_swap(&mut session, combo_id, "花生糙米漿")
            .unwrap();
        let SwapOutcome::Offered(offer) = outcome else {
            panic!("expected an offer");
        };
        assert_eq!(offer.candidates.len(), 2);
        assert_eq!(offer.candidate(DrinkSize::Large).unwrap().delta, 5);

        let pending_drink = session
            .pending_frames
            .iter()
            .find(|f| is_drink_of(f, combo_id))
            .unwrap();
        assert_eq!(pending_drink.missing_slots, vec![Slot::SwapConfirm]);
        let combo = session.combo_frames[0].as_combo().unwrap();
        assert_eq!(combo.swap_drink.as_ref().unwrap().delta, None);

        assert_eq!(
            resolver.answer_swap(&mut session, "嗯").unwrap(),
            SwapAnswer::Unanswered
        );
        let answer = resolver.answer_swap(&mut session, "大杯").unwrap();
        assert_eq!(
            answer,
            SwapAnswer::Applied {
                combo_name: "套餐六".into(),
                to: "花生糙米漿".into(),
                delta: 5,
            }
        );
        let drink = drink_of(&session, combo_id);
        assert_eq!(drink.size, Some(DrinkSize::Large));
        assert!(drink.swap_offer.is_none());
        let combo = session.combo_frames[0].as_combo().unwrap();
        assert_eq!(combo.swap_drink.as_ref().unwrap().delta, Some(5));
    }

    #[test]
    fn test_size_change_is_priced_against_bundled_drink() {
        let (resolver, mut session, combo_id) = session_with("套餐二");
        let requested = DrinkAttrs {
            drink: Some("十穀漿".into()),
            temp: Some("冰".into()),
            size: Some(DrinkSize::Large),
            ..Default::default()
        };
        let outcome = resolver.change_drink(&mut session, combo_id, requested).unwrap();
        assert_eq!(
            outcome,
            SwapOutcome::Applied {
                combo_name: "套餐二".into(),
                to: "十穀漿".into(),
                delta: 5,
            }
        );
        let drink = drink_of(&session, combo_id);
        assert_eq!(drink.size, Some(DrinkSize::Large));
        assert_eq!(drink.temp.as_deref(), Some("冰"));

        let combo = session.combo_frames[0].as_combo().unwrap();
        assert_eq!(combo.label(), "套餐二(飲料改大杯)");
    }

    #[test]
    fn test_declined_offer_keeps_bundled_drink() {
        let (resolver, mut session, combo_id) = session_with("套餐六");
        resolver
            .request_swap(&mut session, combo_id, "花生糙米漿")
            .unwrap();
        assert_eq!(
            resolver.answer_swap(&mut session, "算了不換").unwrap(),
            SwapAnswer::Declined
        );
        let drink = drink_of(&session, combo_id);
        assert_eq!(drink.drink.as_deref(), Some("精選紅茶"));
        assert!(session.combo_frames[0].as_combo().unwrap().swap_drink.is_none());
    }

    #[test]
    fn test_swap_to_non_drink() {
        let (resolver, mut session, combo_id) = session_with("套餐六");
        assert_eq!(
            resolver.request_swap(&mut session, combo_id, "薯條").unwrap(),
            SwapOutcome::NotDrink
        );
    }

    #[test]
    fn test_split_swap() {
        assert_eq!(split_swap("套餐六紅茶換成米漿"), ("套餐六紅茶", Some("米漿")));
        assert_eq!(split_swap("飲料改成 豆漿"), ("飲料", Some("豆漿")));
        assert_eq!(split_swap("套餐二"), ("套餐二", None));
        assert_eq!(split_swap("換成"), ("", None));
    }
}
