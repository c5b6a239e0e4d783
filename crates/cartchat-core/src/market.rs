//! Structured search results: products grouped by market and category.
//!
//! Field names on the wire follow the backend's Portuguese schema
//! (`nome_mercado`, `itens`, `categoria`, ...).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Price as sent by the backend: either preformatted text or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Amount(f64),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Text(s) => write!(f, "{}", s),
            Price::Amount(v) => write!(f, "{}", v),
        }
    }
}

/// A product matched by the search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// Raw description, possibly containing HTML markup.
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Retrieval score in [0, 1].
    #[serde(rename = "similaridade", default)]
    pub similarity: f64,
    #[serde(rename = "valor")]
    pub price: Price,
}

impl Product {
    /// Description with HTML tags removed and `&nbsp;` turned into spaces.
    pub fn plain_description(&self) -> String {
        static TAGS: OnceLock<Regex> = OnceLock::new();
        let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
        tags.replace_all(&self.description, "")
            .replace("&nbsp;", " ")
    }

    /// Case-insensitive match against name or category.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}

/// Products requested under one category (e.g. "leite").
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub products: Vec<Product>,
}

impl Category {
    pub fn filter_products(&self, term: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.matches(term)).collect()
    }
}

/// Category map that keeps the order categories arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories(Vec<Category>);

impl Categories {
    pub fn new(categories: Vec<Category>) -> Self {
        Self(categories)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.0.iter().find(|c| c.name == name)
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Categories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.products)?;
        }
        map.end()
    }
}

struct CategoriesVisitor;

impl<'de> Visitor<'de> for CategoriesVisitor {
    type Value = Categories;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category name to product list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut categories: Vec<Category> = Vec::new();
        while let Some((name, products)) = access.next_entry::<String, Vec<Product>>()? {
            // Last duplicate wins, position of the first is kept.
            match categories.iter_mut().find(|c| c.name == name) {
                Some(existing) => existing.products = products,
                None => categories.push(Category { name, products }),
            }
        }
        Ok(Categories(categories))
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoriesVisitor)
    }
}

/// Products found in one market, grouped by requested category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketResult {
    #[serde(rename = "nome_mercado")]
    pub market_name: String,
    #[serde(rename = "itens")]
    pub categories: Categories,
}

impl MarketResult {
    /// Number of categories, including empty ones.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of products across all categories.
    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }

    /// All products, flattened in category order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.categories.iter().flat_map(|c| c.products.iter())
    }

    /// Products whose name or category contains `term`, ignoring case.
    pub fn filter_products(&self, term: &str) -> Vec<&Product> {
        self.products().filter(|p| p.matches(term)).collect()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }
}

/// Find a market by name in a result set.
pub fn find_market<'a>(markets: &'a [MarketResult], name: &str) -> Option<&'a MarketResult> {
    markets.iter().find(|m| m.market_name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MarketResult {
        serde_json::from_value(json!({
            "nome_mercado": "Mercado do Inteli",
            "itens": {
                "leite": [{
                    "categoria": "Creme de leite|Enlatados e conservas|Alimentos",
                    "descricao": "<p>Creme&nbsp;de leite <b>UHT</b></p>",
                    "marca": "QUALITÁ",
                    "nome": "Creme de Leite UHT Qualitá Caixa 200g",
                    "similaridade": 0.82,
                    "valor": "R$ 4.39"
                }],
                "açúcar": [{
                    "categoria": "Alimentos|Doces e sobremesas",
                    "descricao": "",
                    "marca": "Bauducco",
                    "nome": "Bolo de Páscoa Bauducco Colomba 400g",
                    "similaridade": 0.83,
                    "valor": 19.99
                }],
                "ovos": []
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_categories_keep_document_order() {
        let market = sample();
        let names: Vec<&str> = market.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["leite", "açúcar", "ovos"]);
    }

    #[test]
    fn test_counts() {
        let market = sample();
        assert_eq!(market.category_count(), 3);
        assert_eq!(market.product_count(), 2);
        assert!(market.category("ovos").unwrap().products.is_empty());
    }

    #[test]
    fn test_price_accepts_text_and_number() {
        let market = sample();
        let prices: Vec<String> = market.products().map(|p| p.price.to_string()).collect();
        assert_eq!(prices, vec!["R$ 4.39", "19.99"]);
    }

    #[test]
    fn test_filter_products_ignores_case() {
        let market = sample();
        assert_eq!(market.filter_products("").len(), 2);
        assert_eq!(market.filter_products("qualitá").len(), 1);
        assert_eq!(market.filter_products("DOCES").len(), 1);
        assert!(market.filter_products("arroz").is_empty());
    }

    #[test]
    fn test_category_filter() {
        let market = sample();
        let leite = market.category("leite").unwrap();
        assert_eq!(leite.filter_products("").len(), 1);
        assert_eq!(leite.filter_products("ENLATADOS").len(), 1);
        assert!(leite.filter_products("doces").is_empty());
    }

    #[test]
    fn test_plain_description() {
        let market = sample();
        let product = market.products().next().unwrap();
        assert_eq!(product.plain_description(), "Creme de leite UHT");
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["nome_mercado"], "Mercado do Inteli");
        assert_eq!(value["itens"]["leite"][0]["marca"], "QUALITÁ");
    }

    #[test]
    fn test_find_market() {
        let markets = vec![sample()];
        assert!(find_market(&markets, "Mercado do Inteli").is_some());
        assert!(find_market(&markets, "Outro").is_none());
    }
}
