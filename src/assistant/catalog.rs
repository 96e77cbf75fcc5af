use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::recommend::is_product_id;

/// Товар из каталога. Категория хранится не в записи, а в группе каталога.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub dosage: String,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

/// Товар, найденный в каталоге, вместе с именем его категории
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProduct {
    pub product: Product,
    pub category: String,
}

impl ResolvedProduct {
    pub fn id(&self) -> &str {
        &self.product.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub products: Vec<Product>,
}

/// Статический каталог: категории в фиксированном порядке
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }

    /// Ищет товар по точному совпадению id. Побеждает первая категория.
    pub fn find(&self, id: &str) -> Option<ResolvedProduct> {
        self.categories.iter().find_map(|category| {
            category
                .products
                .iter()
                .find(|p| p.id == id)
                .map(|product| ResolvedProduct {
                    product: product.clone(),
                    category: category.name.clone(),
                })
        })
    }

    /// Разбирает JSON вида `{ "category": [product, ...], ... }`, порядок категорий сохраняется
    pub fn from_json_str(json: &str) -> Result<Self> {
        let groups: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("каталог должен быть JSON-объектом")?;

        let mut categories = Vec::with_capacity(groups.len());
        for (name, products) in groups {
            let products: Vec<Product> = serde_json::from_value(products)
                .with_context(|| format!("некорректные товары в категории '{}'", name))?;
            for product in &products {
                validate_product(&name, product)?;
            }
            categories.push(Category { name, products });
        }

        Ok(Self { categories })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("не удалось прочитать каталог {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("не удалось разобрать каталог {}", path.display()))
    }

    /// Сериализует каталог в тот же JSON, что принимает `from_json_str`
    pub fn to_json(&self) -> String {
        let mut groups = serde_json::Map::new();
        for category in &self.categories {
            groups.insert(
                category.name.clone(),
                serde_json::to_value(&category.products).unwrap_or_default(),
            );
        }
        serde_json::Value::Object(groups).to_string()
    }

    /// Встроенный каталог приложения
    pub fn builtin() -> Self {
        Self::new(vec![
            Category {
                name: "medicines".to_string(),
                products: vec![
                    product(
                        "med1",
                        "Ibuprofen 400mg",
                        8.99,
                        "1 tablet every 6-8 hours with food, max 3 tablets daily",
                        &["Stomach upset", "Heartburn", "Dizziness"],
                        "Anti-inflammatory pain reliever",
                        &["headache", "muscle pain", "inflammation", "fever"],
                    ),
                    product(
                        "med2",
                        "Paracetamol Extra",
                        6.49,
                        "1-2 tablets every 4-6 hours, max 8 tablets daily",
                        &["Nausea", "Rare allergic reactions"],
                        "Paracetamol 500mg for fever and pain relief",
                        &["fever", "headache", "pain"],
                    ),
                    product(
                        "med3",
                        "ColdFlu Relief",
                        11.99,
                        "1 tablet every 6 hours, max 4 tablets daily",
                        &["Drowsiness", "Dry mouth"],
                        "Multi-symptom relief for cold and flu",
                        &["cold", "flu", "congestion", "fever"],
                    ),
                    product(
                        "med4",
                        "Loratadine 10mg",
                        9.79,
                        "1 tablet once daily",
                        &["Headache", "Fatigue", "Dry mouth"],
                        "Non-drowsy antihistamine",
                        &["allergy", "hay fever", "sneezing"],
                    ),
                    product(
                        "med5",
                        "Antacid Chewables",
                        5.29,
                        "2-4 tablets as symptoms occur, max 10 tablets daily",
                        &["Constipation"],
                        "Fast relief from heartburn and indigestion",
                        &["heartburn", "indigestion", "acid reflux"],
                    ),
                ],
            },
            Category {
                name: "vitamins".to_string(),
                products: vec![
                    product(
                        "vit1",
                        "Vitamin C 1000mg",
                        12.99,
                        "1 tablet daily",
                        &["Stomach cramps at high doses"],
                        "Supports the immune system",
                        &["immunity", "cold", "fatigue"],
                    ),
                    product(
                        "vit2",
                        "Vitamin D3 2000IU",
                        10.49,
                        "1 softgel daily with a meal",
                        &["Nausea at high doses"],
                        "Supports bones and immune function",
                        &["bone health", "low sunlight", "immunity"],
                    ),
                    product(
                        "vit3",
                        "Vitamin B Complex",
                        13.99,
                        "1 capsule daily with breakfast",
                        &["Bright yellow urine", "Mild nausea"],
                        "Energy metabolism and nervous system support",
                        &["fatigue", "stress", "low energy"],
                    ),
                    product(
                        "vit4",
                        "Multivitamin Daily",
                        15.99,
                        "1 tablet daily with food",
                        &["Upset stomach"],
                        "Broad daily nutritional support",
                        &["general wellness", "nutrition gaps"],
                    ),
                ],
            },
            Category {
                name: "supplements".to_string(),
                products: vec![
                    product(
                        "sup1",
                        "Omega-3 Fish Oil",
                        18.99,
                        "2 softgels daily with meals",
                        &["Fishy aftertaste", "Mild indigestion"],
                        "Heart and joint health",
                        &["heart health", "joint pain", "inflammation"],
                    ),
                    product(
                        "sup2",
                        "Magnesium Glycinate",
                        14.49,
                        "2 capsules in the evening",
                        &["Loose stools"],
                        "Muscle relaxation and sleep support",
                        &["muscle cramps", "sleep", "stress"],
                    ),
                    product(
                        "sup3",
                        "Probiotic 10 Billion",
                        21.99,
                        "1 capsule daily before breakfast",
                        &["Bloating in the first days"],
                        "Digestive and gut flora support",
                        &["digestion", "after antibiotics", "bloating"],
                    ),
                ],
            },
            Category {
                name: "immunity".to_string(),
                products: vec![
                    product(
                        "imm1",
                        "Zinc Lozenges",
                        7.99,
                        "1 lozenge every 3 hours, max 6 daily",
                        &["Metallic taste", "Nausea"],
                        "Shortens the duration of colds",
                        &["cold", "sore throat", "immunity"],
                    ),
                    product(
                        "imm2",
                        "Elderberry Syrup",
                        16.49,
                        "10ml twice daily",
                        &["Rare stomach upset"],
                        "Traditional immune support",
                        &["flu", "cold", "immunity"],
                    ),
                    product(
                        "imm3",
                        "Echinacea Extract",
                        12.49,
                        "1 capsule three times daily for up to 10 days",
                        &["Rash", "Allergic reactions in people sensitive to daisies"],
                        "Herbal support at the first signs of a cold",
                        &["cold", "immunity"],
                    ),
                ],
            },
        ])
    }
}

/// Запись, которую нельзя порекомендовать или показать с ценой, отклоняется
fn validate_product(category: &str, product: &Product) -> Result<()> {
    if !is_product_id(&product.id) {
        bail!(
            "товар '{}' в категории '{}': id должен быть префиксом (med, vit, sup, imm) и числом",
            product.id,
            category
        );
    }
    if !product.price.is_finite() || product.price < 0.0 {
        bail!(
            "товар '{}' в категории '{}': некорректная цена {}",
            product.id,
            category,
            product.price
        );
    }
    Ok(())
}

fn product(
    id: &str,
    name: &str,
    price: f64,
    dosage: &str,
    side_effects: &[&str],
    description: &str,
    conditions: &[&str],
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        dosage: dosage.to_string(),
        side_effects: side_effects.iter().map(|s| s.to_string()).collect(),
        description: Some(description.to_string()),
        conditions: conditions.iter().map(|s| s.to_string()).collect(),
    }
}
