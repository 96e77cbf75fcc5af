use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::catalog::{Catalog, ResolvedProduct};

/// Префиксы идентификаторов товаров: лекарства, витамины, добавки, иммунитет
pub const ID_PREFIXES: [&str; 4] = ["med", "vit", "sup", "imm"];

// ASCII-границы слова: `med2é` тоже считается упоминанием med2
static PRODUCT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)(?:med|vit|sup|imm)[0-9]+(?-u:\b)").expect("static product id pattern")
});

// Полный id целиком, для проверки записей каталога
static FULL_PRODUCT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:med|vit|sup|imm)[0-9]+$").expect("static product id pattern"));

/// Может ли экстрактор когда-нибудь найти этот id в тексте
pub fn is_product_id(id: &str) -> bool {
    FULL_PRODUCT_ID.is_match(id)
}

/// Что делать с повторными упоминаниями одного и того же товара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Оставлять только первое упоминание
    #[default]
    Collapse,
    /// Карточка на каждое упоминание
    Keep,
}

/// Все идентификаторы товаров в тексте, в порядке появления, с повторами
pub fn extract_product_ids(text: &str) -> Vec<String> {
    PRODUCT_ID
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Сопоставляет идентификаторы с каталогом. Ненайденные молча пропускаются.
pub fn resolve_products(catalog: &Catalog, ids: &[String]) -> Vec<ResolvedProduct> {
    ids.iter().filter_map(|id| catalog.find(id)).collect()
}

/// Рекомендации из ответа модели
pub fn recommend(catalog: &Catalog, text: &str, policy: DuplicatePolicy) -> Vec<ResolvedProduct> {
    let mut ids = extract_product_ids(text);

    if policy == DuplicatePolicy::Collapse {
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
    }

    resolve_products(catalog, &ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[ResolvedProduct]) -> Vec<&str> {
        products.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn text_without_identifiers_yields_nothing() {
        let catalog = Catalog::builtin();
        assert!(extract_product_ids("Rest and drink plenty of water.").is_empty());
        assert!(recommend(&catalog, "", DuplicatePolicy::Collapse).is_empty());
        assert!(recommend(&catalog, "take medicine and vitamins", DuplicatePolicy::Keep).is_empty());
    }

    #[test]
    fn extracts_all_prefixes_in_order_of_appearance() {
        let text = "Try imm2, then sup3 (or vit4). Paracetamol Extra (med2) works too.";
        assert_eq!(extract_product_ids(text), vec!["imm2", "sup3", "vit4", "med2"]);
    }

    #[test]
    fn requires_word_boundaries_and_exact_case() {
        let text = "premed2 med2x Med2 VIT1 med vit_1 med12 vit1.";
        assert_eq!(extract_product_ids(text), vec!["med12", "vit1"]);
    }

    #[test]
    fn punctuation_and_line_breaks_count_as_boundaries() {
        let text = "1. Paracetamol Extra (med2) -\n2. **vit1**\n3. [sup1]:imm1";
        assert_eq!(extract_product_ids(text), vec!["med2", "vit1", "sup1", "imm1"]);
    }

    #[test]
    fn known_identifier_resolves_with_its_category() {
        let catalog = Catalog::builtin();
        let products = recommend(&catalog, "Consider sup2 for cramps.", DuplicatePolicy::Collapse);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id(), "sup2");
        assert_eq!(products[0].category, "supplements");
        assert_eq!(products[0].product, catalog.find("sup2").unwrap().product);
    }

    #[test]
    fn unknown_identifiers_are_dropped_silently() {
        let catalog = Catalog::builtin();
        let products = recommend(&catalog, "med99 then vit1 then imm42", DuplicatePolicy::Keep);
        assert_eq!(ids(&products), vec!["vit1"]);
    }

    #[test]
    fn duplicate_policy_controls_repeated_mentions() {
        let catalog = Catalog::builtin();
        let text = "med2 is great. Again: med2, and vit1, and med2.";

        let collapsed = recommend(&catalog, text, DuplicatePolicy::Collapse);
        assert_eq!(ids(&collapsed), vec!["med2", "vit1"]);

        let kept = recommend(&catalog, text, DuplicatePolicy::Keep);
        assert_eq!(ids(&kept), vec!["med2", "med2", "vit1", "med2"]);
    }

    #[test]
    fn every_prefix_is_recognised() {
        for prefix in ID_PREFIXES {
            let text = format!("see {}1 here", prefix);
            assert_eq!(extract_product_ids(&text), vec![format!("{}1", prefix)]);
        }
    }
}
