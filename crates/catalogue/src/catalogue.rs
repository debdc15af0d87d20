use crate::error::CatalogueError;
use core_types::StockDefinition;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// The read-only set of listed stocks, keyed by symbol.
///
/// Every entry has passed `StockDefinition::validate`, so downstream code can
/// rely on the catalogue invariants without re-checking them.
#[derive(Debug, Clone, Default)]
pub struct StockCatalogue {
    stocks: BTreeMap<String, StockDefinition>,
}

impl StockCatalogue {
    /// Builds a catalogue, rejecting invalid definitions and duplicate symbols.
    pub fn new(
        definitions: impl IntoIterator<Item = StockDefinition>,
    ) -> Result<Self, CatalogueError> {
        let mut stocks = BTreeMap::new();

        for definition in definitions {
            definition.validate()?;
            if stocks.contains_key(&definition.symbol) {
                return Err(CatalogueError::DuplicateSymbol(definition.symbol));
            }
            stocks.insert(definition.symbol.clone(), definition);
        }

        tracing::debug!("Catalogue loaded with {} stocks", stocks.len());
        Ok(Self { stocks })
    }

    /// The sample Global Beverage Corporation Exchange listing.
    pub fn gbce_sample() -> Self {
        let stocks = [
            StockDefinition::common("TEA", dec!(0), dec!(100)),
            StockDefinition::common("POP", dec!(8), dec!(100)),
            StockDefinition::common("ALE", dec!(23), dec!(60)),
            StockDefinition::preferred("GIN", dec!(8), dec!(2), dec!(100)),
            StockDefinition::common("JOE", dec!(13), dec!(250)),
        ]
        .into_iter()
        .map(|s| (s.symbol.clone(), s))
        .collect();

        Self { stocks }
    }

    pub fn lookup(&self, symbol: &str) -> Result<&StockDefinition, CatalogueError> {
        self.stocks
            .get(symbol)
            .ok_or_else(|| CatalogueError::NotFound(symbol.to_string()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.stocks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockDefinition> {
        self.stocks.values()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::StockClass;

    #[test]
    fn lookup_finds_known_symbols_and_rejects_unknown() {
        let catalogue = StockCatalogue::gbce_sample();

        let gin = catalogue.lookup("GIN").unwrap();
        assert_eq!(gin.stock_class, StockClass::Preferred);
        assert_eq!(gin.fixed_dividend_pct, Some(dec!(2)));

        assert_eq!(
            catalogue.lookup("BEER").unwrap_err(),
            CatalogueError::NotFound("BEER".to_string())
        );
    }

    #[test]
    fn sample_listing_is_valid_and_ordered() {
        let sample = StockCatalogue::gbce_sample();
        let rebuilt = StockCatalogue::new(sample.iter().cloned()).unwrap();

        assert_eq!(rebuilt.len(), 5);
        assert_eq!(
            rebuilt.symbols().collect::<Vec<_>>(),
            vec!["ALE", "GIN", "JOE", "POP", "TEA"]
        );
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let result = StockCatalogue::new(vec![
            StockDefinition::common("TEA", dec!(0), dec!(100)),
            StockDefinition::common("TEA", dec!(1), dec!(100)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            CatalogueError::DuplicateSymbol("TEA".to_string())
        );
    }

    #[test]
    fn rejects_preferred_stock_without_fixed_dividend() {
        let mut gin = StockDefinition::preferred("GIN", dec!(8), dec!(2), dec!(100));
        gin.fixed_dividend_pct = None;

        let result = StockCatalogue::new(vec![gin]);
        assert!(matches!(result, Err(CatalogueError::InvalidDefinition(_))));
    }
}
