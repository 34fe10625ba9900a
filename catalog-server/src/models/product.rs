//! Product field validation and write inputs
//!
//! Prices are stored as `NUMERIC(10,2)`, so a valid price is strictly
//! positive, has at most two fractional digits and fewer than eight
//! integer digits. Stock is a non-negative count.

use rust_decimal::Decimal;

use super::{clean_name, Id, IdList, ValidationError};

/// Exclusive upper bound of `NUMERIC(10,2)`
const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Fractional digits kept for prices
const PRICE_SCALE: u32 = 2;

/// Validated product name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        clean_name("product_name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated unit price, always carried with two fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Create a price.
    ///
    /// # Example
    /// ```
    /// use catalog_server::models::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(10, 0)).unwrap();
    /// assert_eq!(price.value().to_string(), "10.00");
    /// assert!(Price::new(Decimal::ZERO).is_err());
    /// ```
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must be greater than zero",
            });
        }

        if value >= MAX_PRICE {
            return Err(ValidationError::OutOfRange {
                field: "price",
                reason: "must be less than 100000000",
            });
        }

        if value.normalize().scale() > PRICE_SCALE {
            return Err(ValidationError::InvalidFormat {
                field: "price",
                reason: "at most two decimal places",
            });
        }

        let mut value = value.normalize();
        value.rescale(PRICE_SCALE);
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Validated stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stock(i32);

impl Stock {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if value < 0 {
            return Err(ValidationError::OutOfRange {
                field: "stock",
                reason: "cannot be negative",
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Input for creating a product together with its tag set
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: Price,
    pub stock: Stock,
    pub category_id: Id,
    pub tag_ids: IdList,
}

/// Partial product update.
///
/// Every `Some` field replaces the stored value, including zero stock.
/// `tag_ids: Some(_)` replaces the whole tag set (an empty list clears it);
/// `None` leaves the associations untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<ProductName>,
    pub price: Option<Price>,
    pub stock: Option<Stock>,
    pub category_id: Option<Id>,
    pub tag_ids: Option<IdList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_rescaled_to_cents() {
        let price = Price::new(Decimal::new(1499, 2)).unwrap();
        assert_eq!(price.value().to_string(), "14.99");

        let price = Price::new(Decimal::new(5, 0)).unwrap();
        assert_eq!(price.value().to_string(), "5.00");

        // trailing zeros beyond cents are not extra precision
        let price = Price::new(Decimal::new(12_5000, 4)).unwrap();
        assert_eq!(price.value().to_string(), "12.50");
    }

    #[test]
    fn price_must_be_positive() {
        assert!(matches!(
            Price::new(Decimal::ZERO).unwrap_err(),
            ValidationError::OutOfRange { field: "price", .. }
        ));
        assert!(Price::new(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn price_rejects_sub_cent_precision() {
        assert!(matches!(
            Price::new(Decimal::new(1001, 3)).unwrap_err(),
            ValidationError::InvalidFormat { field: "price", .. }
        ));
    }

    #[test]
    fn price_upper_bound() {
        assert!(Price::new(Decimal::new(9_999_999_999, 2)).is_ok());
        assert!(Price::new(Decimal::new(100_000_000, 0)).is_err());
    }

    #[test]
    fn stock_accepts_zero() {
        assert_eq!(Stock::new(0).unwrap().value(), 0);
        assert!(matches!(
            Stock::new(-3).unwrap_err(),
            ValidationError::OutOfRange { field: "stock", .. }
        ));
    }

    #[test]
    fn product_name_rules() {
        assert_eq!(ProductName::new(" Atlas ").unwrap().as_str(), "Atlas");
        assert!(ProductName::new("").is_err());
    }
}
