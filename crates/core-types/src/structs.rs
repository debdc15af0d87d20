use crate::enums::{StockClass, TradeSide};
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed attributes of a listed stock.
///
/// Definitions are seeded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDefinition {
    pub symbol: String,
    pub stock_class: StockClass,
    /// Last dividend paid per share, in pence.
    pub last_dividend: Decimal,
    /// Fixed dividend as a percentage of par value (2 means 2%). Only read for `Preferred` stock.
    #[serde(default)]
    pub fixed_dividend_pct: Option<Decimal>,
    pub par_value: Decimal,
}

impl StockDefinition {
    pub fn common(symbol: impl Into<String>, last_dividend: Decimal, par_value: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            stock_class: StockClass::Common,
            last_dividend,
            fixed_dividend_pct: None,
            par_value,
        }
    }

    pub fn preferred(
        symbol: impl Into<String>,
        last_dividend: Decimal,
        fixed_dividend_pct: Decimal,
        par_value: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            stock_class: StockClass::Preferred,
            last_dividend,
            fixed_dividend_pct: Some(fixed_dividend_pct),
            par_value,
        }
    }

    /// Checks the invariants every catalogue entry must hold.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if self.last_dividend < Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                format!("{}.last_dividend", self.symbol),
                format!("must be non-negative, got {}", self.last_dividend),
            ));
        }
        if self.par_value <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                format!("{}.par_value", self.symbol),
                format!("must be positive, got {}", self.par_value),
            ));
        }
        if self.stock_class == StockClass::Preferred {
            match self.fixed_dividend_pct {
                None => {
                    return Err(CoreError::InvalidInput(
                        format!("{}.fixed_dividend_pct", self.symbol),
                        "is required for Preferred stock".to_string(),
                    ));
                }
                Some(pct) if pct < Decimal::ZERO => {
                    return Err(CoreError::InvalidInput(
                        format!("{}.fixed_dividend_pct", self.symbol),
                        format!("must be non-negative, got {}", pct),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// A single executed trade. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: Uuid,
    pub symbol: String,
    pub side: TradeSide,
    pub price: Decimal,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}

impl TradeRecord {
    /// Traded value of the record (`price * quantity`), or `None` when it
    /// does not fit in a `Decimal`.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn preferred_without_percentage_is_rejected() {
        let mut gin = StockDefinition::preferred("GIN", dec!(8), dec!(2), dec!(100));
        assert!(gin.validate().is_ok());

        gin.fixed_dividend_pct = None;
        let err = gin.validate().unwrap_err();
        assert!(err.to_string().contains("GIN.fixed_dividend_pct"));
    }

    #[test]
    fn common_ignores_fixed_percentage() {
        let mut tea = StockDefinition::common("TEA", dec!(0), dec!(100));
        tea.fixed_dividend_pct = Some(dec!(-5));
        assert!(tea.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_par_and_negative_dividend() {
        let zero_par = StockDefinition::common("ALE", dec!(23), dec!(0));
        assert!(zero_par.validate().is_err());

        let negative_dividend = StockDefinition::common("ALE", dec!(-1), dec!(60));
        assert!(negative_dividend.validate().is_err());

        let blank = StockDefinition::common("  ", dec!(1), dec!(60));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn notional_multiplies_price_by_quantity() {
        let trade = TradeRecord {
            trade_id: Uuid::new_v4(),
            symbol: "POP".to_string(),
            side: TradeSide::Buy,
            price: dec!(12.5),
            quantity: 4,
            timestamp: Utc::now(),
        };
        assert_eq!(trade.notional(), Some(dec!(50)));

        let huge = TradeRecord {
            price: dec!(10000000000),
            quantity: u64::MAX,
            ..trade
        };
        assert_eq!(huge.notional(), None);
    }
}
