//! Stock badges for the product list.

use serde::Serialize;

/// Units above which stock counts as plentiful.
const LOW_STOCK_CEILING: i32 = 20;

/// Coarse stock classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    InStock(i32),
    Low(i32),
    OutOfStock,
}

impl StockLevel {
    /// Classify a raw stock count. Negative counts are treated as zero.
    #[must_use]
    pub const fn from_stock(stock: i32) -> Self {
        if stock > LOW_STOCK_CEILING {
            Self::InStock(stock)
        } else if stock > 0 {
            Self::Low(stock)
        } else {
            Self::OutOfStock
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::InStock(n) => format!("In Stock ({n})"),
            Self::Low(n) => format!("Low Stock ({n})"),
            Self::OutOfStock => "Out of Stock".to_owned(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::InStock(_) => "in-stock",
            Self::Low(_) => "low-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(StockLevel::from_stock(21), StockLevel::InStock(21));
        assert_eq!(StockLevel::from_stock(20), StockLevel::Low(20));
        assert_eq!(StockLevel::from_stock(1), StockLevel::Low(1));
        assert_eq!(StockLevel::from_stock(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::from_stock(-3), StockLevel::OutOfStock);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StockLevel::from_stock(50).label(), "In Stock (50)");
        assert_eq!(StockLevel::from_stock(4).label(), "Low Stock (4)");
        assert_eq!(StockLevel::OutOfStock.label(), "Out of Stock");
        assert_eq!(StockLevel::from_stock(4).class(), "low-stock");
    }
}
