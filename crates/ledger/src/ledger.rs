use crate::error::LedgerError;
use catalogue::StockCatalogue;
use chrono::{DateTime, Duration, Utc};
use core_types::{Clock, TradeRecord, TradeSide};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Length of the default trade window used for volume-weighted prices.
pub const DEFAULT_WINDOW_SECS: i64 = 300;

/// The default trade window (five minutes).
pub fn default_window() -> Duration {
    Duration::seconds(DEFAULT_WINDOW_SECS)
}

/// Append-only record of executed trades, one book per symbol.
///
/// A single `RwLock` guards every book. The timestamp of a trade is read from
/// the clock while the write lock is held, so each book stays in
/// chronological order and readers never observe a half-finished append.
pub struct TradeLedger {
    books: RwLock<HashMap<String, Vec<TradeRecord>>>,
    clock: Arc<dyn Clock>,
}

impl TradeLedger {
    /// Creates a ledger with an empty book for each of the given symbols.
    pub fn new<I, S>(symbols: I, clock: Arc<dyn Clock>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let books: HashMap<String, Vec<TradeRecord>> = symbols
            .into_iter()
            .map(|symbol| (symbol.into(), Vec::new()))
            .collect();

        Self {
            books: RwLock::new(books),
            clock,
        }
    }

    /// Creates a ledger with an empty book for every stock in the catalogue.
    pub fn for_catalogue(catalogue: &StockCatalogue, clock: Arc<dyn Clock>) -> Self {
        Self::new(catalogue.symbols(), clock)
    }

    /// Current time according to the ledger's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Records a trade at the current time and returns the stored record.
    pub fn register_trade(
        &self,
        symbol: &str,
        side: TradeSide,
        price: Decimal,
        quantity: u64,
    ) -> Result<TradeRecord, LedgerError> {
        if price <= Decimal::ZERO {
            return Err(LedgerError::InvalidPrice(price));
        }
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let mut books = self.books.write().map_err(|_| LedgerError::LockPoisoned)?;
        let book = books
            .get_mut(symbol)
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))?;

        let record = TradeRecord {
            trade_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            side,
            price,
            quantity,
            timestamp: self.clock.now(),
        };
        book.push(record.clone());

        tracing::info!(
            symbol = %record.symbol,
            side = %record.side,
            price = %record.price,
            quantity = record.quantity,
            "Trade registered"
        );
        Ok(record)
    }

    /// Returns the trades for `symbol` executed less than `window` ago, oldest first.
    ///
    /// An empty result means "no recent trades"; an unknown symbol is an error.
    pub fn relevant_trades(
        &self,
        symbol: &str,
        window: Duration,
    ) -> Result<Vec<TradeRecord>, LedgerError> {
        self.relevant_trades_at(symbol, self.clock.now(), window)
    }

    /// `relevant_trades` measured from a fixed `now` instead of the clock.
    ///
    /// Trades stamped after `now` are not yet part of the window.
    pub fn relevant_trades_at(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<Vec<TradeRecord>, LedgerError> {
        let books = self.books.read().map_err(|_| LedgerError::LockPoisoned)?;
        let book = books
            .get(symbol)
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))?;

        let recent: Vec<TradeRecord> = book
            .iter()
            .filter(|trade| trade.timestamp <= now && now - trade.timestamp < window)
            .cloned()
            .collect();

        tracing::debug!(
            "Ledger: {} of {} trades for {} fall inside a {}s window",
            recent.len(),
            book.len(),
            symbol,
            window.num_seconds()
        );
        Ok(recent)
    }

    /// `relevant_trades` over the default five-minute window.
    pub fn relevant_trades_default(&self, symbol: &str) -> Result<Vec<TradeRecord>, LedgerError> {
        self.relevant_trades(symbol, default_window())
    }

    /// Every trade ever recorded for `symbol`, oldest first.
    pub fn all_trades(&self, symbol: &str) -> Result<Vec<TradeRecord>, LedgerError> {
        let books = self.books.read().map_err(|_| LedgerError::LockPoisoned)?;
        books
            .get(symbol)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))
    }

    pub fn trade_count(&self, symbol: &str) -> Result<usize, LedgerError> {
        let books = self.books.read().map_err(|_| LedgerError::LockPoisoned)?;
        books
            .get(symbol)
            .map(Vec::len)
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))
    }

    /// Symbols that have a book, in ascending order.
    pub fn symbols(&self) -> Result<Vec<String>, LedgerError> {
        let books = self.books.read().map_err(|_| LedgerError::LockPoisoned)?;
        let mut symbols: Vec<String> = books.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

impl std::fmt::Debug for TradeLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeLedger")
            .field("books", &self.books)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_types::ManualClock;
    use rust_decimal_macros::dec;
    use std::thread;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn ledger_with_clock() -> (TradeLedger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let ledger = TradeLedger::new(["POP", "TEA"], clock.clone());
        (ledger, clock)
    }

    #[test]
    fn register_trade_stamps_with_clock_time() {
        let (ledger, _clock) = ledger_with_clock();

        let record = ledger
            .register_trade("POP", TradeSide::Buy, dec!(10), 100)
            .unwrap();

        assert_eq!(record.timestamp, start());
        assert_eq!(record.symbol, "POP");
        assert_eq!(ledger.all_trades("POP").unwrap(), vec![record]);
    }

    #[test]
    fn register_trade_rejects_unknown_symbol_and_bad_input() {
        let (ledger, _clock) = ledger_with_clock();

        assert_eq!(
            ledger.register_trade("GIN", TradeSide::Sell, dec!(10), 1),
            Err(LedgerError::UnknownSymbol("GIN".to_string()))
        );
        assert_eq!(
            ledger.register_trade("POP", TradeSide::Sell, dec!(0), 1),
            Err(LedgerError::InvalidPrice(dec!(0)))
        );
        assert_eq!(
            ledger.register_trade("POP", TradeSide::Sell, dec!(-3), 1),
            Err(LedgerError::InvalidPrice(dec!(-3)))
        );
        assert_eq!(
            ledger.register_trade("POP", TradeSide::Sell, dec!(10), 0),
            Err(LedgerError::InvalidQuantity)
        );
        assert_eq!(ledger.trade_count("POP").unwrap(), 0);
    }

    #[test]
    fn relevant_trades_excludes_expired_trades() {
        let (ledger, clock) = ledger_with_clock();

        ledger.register_trade("POP", TradeSide::Buy, dec!(10), 100).unwrap();
        clock.advance(Duration::minutes(4));
        let fresh = ledger.register_trade("POP", TradeSide::Sell, dec!(12), 50).unwrap();
        clock.advance(Duration::minutes(2));

        let recent = ledger.relevant_trades_default("POP").unwrap();
        assert_eq!(recent, vec![fresh]);
        assert_eq!(ledger.trade_count("POP").unwrap(), 2);
    }

    #[test]
    fn trade_exactly_one_window_old_is_excluded() {
        let (ledger, clock) = ledger_with_clock();

        ledger.register_trade("POP", TradeSide::Buy, dec!(10), 1).unwrap();
        clock.advance(Duration::seconds(DEFAULT_WINDOW_SECS - 1));
        assert_eq!(ledger.relevant_trades_default("POP").unwrap().len(), 1);

        clock.advance(Duration::seconds(1));
        assert!(ledger.relevant_trades_default("POP").unwrap().is_empty());
    }

    #[test]
    fn empty_window_is_distinct_from_unknown_symbol() {
        let (ledger, _clock) = ledger_with_clock();

        assert!(ledger.relevant_trades_default("TEA").unwrap().is_empty());
        assert_eq!(
            ledger.relevant_trades_default("BEER"),
            Err(LedgerError::UnknownSymbol("BEER".to_string()))
        );
    }

    #[test]
    fn custom_window_widens_selection() {
        let (ledger, clock) = ledger_with_clock();

        ledger.register_trade("TEA", TradeSide::Buy, dec!(15), 10).unwrap();
        clock.advance(Duration::minutes(30));

        assert!(ledger.relevant_trades_default("TEA").unwrap().is_empty());
        assert_eq!(
            ledger.relevant_trades("TEA", Duration::hours(1)).unwrap().len(),
            1
        );
    }

    #[test]
    fn trades_stamped_after_now_are_not_recent() {
        let (ledger, clock) = ledger_with_clock();

        clock.advance(Duration::minutes(2));
        let later = ledger.register_trade("POP", TradeSide::Buy, dec!(10), 5).unwrap();
        clock.set(start());

        assert!(ledger.relevant_trades_default("POP").unwrap().is_empty());
        assert_eq!(
            ledger
                .relevant_trades_at("POP", later.timestamp, default_window())
                .unwrap(),
            vec![later]
        );
    }

    #[test]
    fn relevant_trades_at_ignores_the_clock() {
        let (ledger, clock) = ledger_with_clock();

        let early = ledger.register_trade("TEA", TradeSide::Sell, dec!(15), 3).unwrap();
        clock.advance(Duration::hours(1));

        assert!(ledger.relevant_trades_default("TEA").unwrap().is_empty());
        assert_eq!(
            ledger
                .relevant_trades_at("TEA", start() + Duration::minutes(1), default_window())
                .unwrap(),
            vec![early]
        );
    }

    #[test]
    fn ledger_for_catalogue_has_a_book_per_stock() {
        let catalogue = StockCatalogue::gbce_sample();
        let ledger = TradeLedger::for_catalogue(&catalogue, Arc::new(ManualClock::new(start())));

        assert_eq!(
            ledger.symbols().unwrap(),
            vec!["ALE", "GIN", "JOE", "POP", "TEA"]
        );
    }

    #[test]
    fn concurrent_writers_keep_every_trade() {
        let clock = Arc::new(ManualClock::new(start()));
        let ledger = Arc::new(TradeLedger::new(["POP"], clock));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..25 {
                        ledger
                            .register_trade("POP", TradeSide::Buy, dec!(10), 1)
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.trade_count("POP").unwrap(), 100);
    }
}
