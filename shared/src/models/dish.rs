//! Dish Model (menu item with tracked stock)

use serde::{Deserialize, Serialize};

/// Dish entity
///
/// `stock_available` is owned exclusively by the stock ledger; every mutation
/// goes through an atomic conditional update. `stock_max` is advisory display
/// metadata, never enforced as a ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub stock_available: i64,
    pub stock_max: i64,
    pub is_available: bool,
}

impl Dish {
    /// A dish is purchasable when flagged available AND stock remains
    pub fn is_purchasable(&self) -> bool {
        self.is_available && self.stock_available > 0
    }
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub stock_available: Option<i64>,
    pub stock_max: Option<i64>,
    pub is_available: Option<bool>,
}

/// Update dish payload
///
/// Deliberately has no `stock_available` field: stock moves only through the
/// ledger's adjust operation, not through blind CRUD writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock_max: Option<i64>,
    pub is_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchasable_requires_flag_and_stock() {
        let mut dish = Dish {
            id: 1,
            name: "Pasta".into(),
            description: None,
            price: 12.5,
            category: Some("Mains".into()),
            stock_available: 3,
            stock_max: 100,
            is_available: true,
        };
        assert!(dish.is_purchasable());

        dish.stock_available = 0;
        assert!(!dish.is_purchasable());

        dish.stock_available = 3;
        dish.is_available = false;
        assert!(!dish.is_purchasable());
    }
}
