//! Typed navigation between the chat and the market browsing screens.
//!
//! Selected market data travels inside the route itself, so a screen only
//! ever sees what the previous screen explicitly handed to it.

use crate::error::CoreError;
use crate::market::{find_market, MarketResult, Product};

/// A screen and the data it was opened with.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// The chat transcript.
    Chat,
    /// Market tabs for one search result, with one market selected.
    Markets {
        markets: Vec<MarketResult>,
        selected: String,
    },
    /// Categories available in one market.
    MarketItems { market: MarketResult },
    /// Products of one category in one market.
    CategoryProducts {
        market: MarketResult,
        category: String,
    },
}

/// Route stack owned by the front end.
#[derive(Debug, Clone)]
pub struct NavigationState {
    stack: Vec<Route>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            stack: vec![Route::Chat],
        }
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route currently on screen.
    pub fn current(&self) -> &Route {
        // The stack always holds at least the chat route.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Open a search result, selecting its first market.
    pub fn open_results(&mut self, markets: Vec<MarketResult>) -> Result<(), CoreError> {
        let selected = markets
            .first()
            .map(|m| m.market_name.clone())
            .ok_or_else(|| CoreError::InvalidInput("empty market result".to_string()))?;
        self.stack.push(Route::Markets { markets, selected });
        Ok(())
    }

    /// Switch the selected market tab on the results screen.
    pub fn select_market(&mut self, name: &str) -> Result<(), CoreError> {
        match self.stack.last_mut() {
            Some(Route::Markets { markets, selected }) => {
                if find_market(markets, name).is_none() {
                    return Err(CoreError::MarketNotFound(name.to_string()));
                }
                *selected = name.to_string();
                Ok(())
            }
            _ => Err(CoreError::InvalidInput(
                "not on the market results screen".to_string(),
            )),
        }
    }

    /// Open the category list of the currently selected market.
    pub fn open_selected_market(&mut self) -> Result<(), CoreError> {
        let market = match self.current() {
            Route::Markets { markets, selected } => find_market(markets, selected)
                .cloned()
                .ok_or_else(|| CoreError::MarketNotFound(selected.clone()))?,
            _ => {
                return Err(CoreError::InvalidInput(
                    "not on the market results screen".to_string(),
                ))
            }
        };
        self.stack.push(Route::MarketItems { market });
        Ok(())
    }

    /// Open the products of one category in the current market.
    pub fn open_category(&mut self, category: &str) -> Result<(), CoreError> {
        let market = match self.current() {
            Route::MarketItems { market } => market.clone(),
            _ => {
                return Err(CoreError::InvalidInput(
                    "not on a market screen".to_string(),
                ))
            }
        };
        if market.category(category).is_none() {
            return Err(CoreError::CategoryNotFound {
                market: market.market_name,
                category: category.to_string(),
            });
        }
        self.stack.push(Route::CategoryProducts {
            market,
            category: category.to_string(),
        });
        Ok(())
    }

    /// Products on the current screen whose name or category contains
    /// `term`. An empty term keeps every product; screens without a product
    /// list yield nothing.
    pub fn visible_products(&self, term: &str) -> Vec<&Product> {
        match self.current() {
            Route::Markets { markets, selected } => find_market(markets, selected)
                .map(|m| m.filter_products(term))
                .unwrap_or_default(),
            Route::CategoryProducts { market, category } => market
                .category(category)
                .map(|c| c.filter_products(term))
                .unwrap_or_default(),
            Route::Chat | Route::MarketItems { .. } => Vec::new(),
        }
    }

    /// Go back one screen. Returns false when already on the chat.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Categories, Category, Price};

    fn product(name: &str) -> Product {
        Product {
            category: "Alimentos".to_string(),
            brand: "Marca".to_string(),
            name: name.to_string(),
            description: String::new(),
            similarity: 0.9,
            price: Price::Text("R$ 1.00".to_string()),
        }
    }

    fn market(name: &str) -> MarketResult {
        MarketResult {
            market_name: name.to_string(),
            categories: Categories::new(vec![
                Category {
                    name: "leite".to_string(),
                    products: vec![product("Leite Integral")],
                },
                Category {
                    name: "ovos".to_string(),
                    products: Vec::new(),
                },
            ]),
        }
    }

    #[test]
    fn test_starts_on_chat() {
        let mut nav = NavigationState::new();
        assert_eq!(nav.current(), &Route::Chat);
        assert!(!nav.back());
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_full_drill_down_and_back() {
        let mut nav = NavigationState::new();
        nav.open_results(vec![market("A"), market("B")]).unwrap();
        assert!(matches!(nav.current(), Route::Markets { selected, .. } if selected == "A"));

        nav.select_market("B").unwrap();
        nav.open_selected_market().unwrap();
        assert!(matches!(nav.current(), Route::MarketItems { market } if market.market_name == "B"));

        nav.open_category("leite").unwrap();
        assert_eq!(nav.visible_products("").len(), 1);
        assert_eq!(nav.visible_products("integral").len(), 1);
        assert!(nav.visible_products("desnatado").is_empty());
        assert_eq!(nav.depth(), 4);

        assert!(nav.back());
        assert!(nav.visible_products("").is_empty());
        assert!(nav.back());
        assert_eq!(nav.visible_products("ALIMENTOS").len(), 1);
        assert!(nav.back());
        assert_eq!(nav.current(), &Route::Chat);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut nav = NavigationState::new();
        assert!(nav.open_results(Vec::new()).is_err());
        assert!(nav.open_category("leite").is_err());

        nav.open_results(vec![market("A")]).unwrap();
        assert_eq!(
            nav.select_market("Z"),
            Err(CoreError::MarketNotFound("Z".to_string()))
        );
        nav.open_selected_market().unwrap();
        assert!(matches!(
            nav.open_category("arroz"),
            Err(CoreError::CategoryNotFound { .. })
        ));
    }
}
