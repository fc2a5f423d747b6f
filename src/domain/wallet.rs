//! Cash + asset ledger for a single strategy.
//!
//! Orders are expressed in cash terms and converted at the last refreshed
//! close price. Oversized orders are clamped to what is available; negative
//! orders are rejected.

use std::fmt;

use crate::domain::error::TradebotError;
use crate::domain::record::PriceRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    cash: f64,
    asset_qty: f64,
    last_price: f64,
}

impl Wallet {
    pub fn new(initial_cash: f64) -> Self {
        Wallet {
            cash: initial_cash,
            asset_qty: 0.0,
            last_price: 0.0,
        }
    }

    /// Refreshes the conversion price. No trading side effect.
    pub fn update(&mut self, record: &PriceRecord) {
        self.last_price = record.close;
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn asset_qty(&self) -> f64 {
        self.asset_qty
    }

    pub fn last_price(&self) -> f64 {
        self.last_price
    }

    /// Asset position valued at the last price.
    pub fn asset_value(&self) -> f64 {
        self.asset_qty * self.last_price
    }

    pub fn total_capital(&self) -> f64 {
        self.cash + self.asset_value()
    }

    pub fn is_bankrupt(&self) -> bool {
        self.total_capital() <= 0.0
    }

    /// Spends up to `amount` cash on the asset. Returns the cash actually spent.
    pub fn buy_up_to(&mut self, amount: f64) -> Result<f64, TradebotError> {
        if amount == 0.0 {
            return Ok(0.0);
        }
        check_amount("buy", amount)?;
        let price = self.price_for("buy")?;

        let executed = amount.min(self.cash);
        if executed <= 0.0 {
            return Ok(0.0);
        }
        self.cash -= executed;
        self.asset_qty += executed / price;
        Ok(executed)
    }

    /// Sells up to `amount` worth of the asset. Returns the cash actually received.
    pub fn sell_up_to(&mut self, amount: f64) -> Result<f64, TradebotError> {
        if amount == 0.0 {
            return Ok(0.0);
        }
        check_amount("sell", amount)?;
        let price = self.price_for("sell")?;

        let executed = amount.min(self.asset_value());
        if executed <= 0.0 {
            return Ok(0.0);
        }
        let qty = executed / price;
        // float rounding can push qty a hair above the position
        self.asset_qty -= qty.min(self.asset_qty);
        self.cash += executed;
        Ok(executed)
    }

    fn price_for(&self, operation: &'static str) -> Result<f64, TradebotError> {
        if self.last_price > 0.0 && self.last_price.is_finite() {
            Ok(self.last_price)
        } else {
            Err(TradebotError::PriceUnavailable { operation })
        }
    }
}

fn check_amount(operation: &'static str, amount: f64) -> Result<(), TradebotError> {
    // NaN fails this comparison as well
    if !(amount >= 0.0) {
        return Err(TradebotError::NegativeAmount { operation, amount });
    }
    Ok(())
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wallet={{ cash {:.2}, {:.6} at {:.2} == {:.2} }}",
            self.cash,
            self.asset_qty,
            self.last_price,
            self.asset_value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record_at(close: f64) -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(2021, 8, 15).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: "N/A".into(),
        }
    }

    fn priced_wallet(cash: f64, price: f64) -> Wallet {
        let mut wallet = Wallet::new(cash);
        wallet.update(&record_at(price));
        wallet
    }

    #[test]
    fn new_wallet() {
        let wallet = Wallet::new(1000.0);
        assert_relative_eq!(wallet.cash(), 1000.0);
        assert_relative_eq!(wallet.asset_qty(), 0.0);
        assert_relative_eq!(wallet.total_capital(), 1000.0);
        assert!(!wallet.is_bankrupt());
    }

    #[test]
    fn update_sets_price_only() {
        let mut wallet = Wallet::new(1000.0);
        wallet.update(&record_at(250.0));
        assert_relative_eq!(wallet.last_price(), 250.0);
        assert_relative_eq!(wallet.cash(), 1000.0);
    }

    #[test]
    fn buy_moves_cash_into_asset() {
        let mut wallet = priced_wallet(1000.0, 250.0);
        let executed = wallet.buy_up_to(500.0).unwrap();
        assert_relative_eq!(executed, 500.0);
        assert_relative_eq!(wallet.cash(), 500.0);
        assert_relative_eq!(wallet.asset_qty(), 2.0);
        assert_relative_eq!(wallet.total_capital(), 1000.0);
    }

    #[test]
    fn buy_clamps_to_cash() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        let executed = wallet.buy_up_to(5000.0).unwrap();
        assert_relative_eq!(executed, 1000.0);
        assert_relative_eq!(wallet.cash(), 0.0);
        assert_relative_eq!(wallet.asset_qty(), 10.0);
    }

    #[test]
    fn sell_clamps_to_asset_value() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        wallet.buy_up_to(400.0).unwrap();
        let executed = wallet.sell_up_to(10_000.0).unwrap();
        assert_relative_eq!(executed, 400.0);
        assert_relative_eq!(wallet.asset_qty(), 0.0);
        assert_relative_eq!(wallet.cash(), 1000.0);
    }

    #[test]
    fn sell_with_no_position_is_noop() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        assert_relative_eq!(wallet.sell_up_to(50.0).unwrap(), 0.0);
        assert_relative_eq!(wallet.cash(), 1000.0);
    }

    #[test]
    fn zero_amounts_are_noops() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        wallet.buy_up_to(300.0).unwrap();
        let before = wallet.clone();

        assert_relative_eq!(wallet.buy_up_to(0.0).unwrap(), 0.0);
        assert_relative_eq!(wallet.sell_up_to(0.0).unwrap(), 0.0);
        assert_eq!(wallet, before);
    }

    #[test]
    fn zero_amounts_need_no_price() {
        let mut wallet = Wallet::new(1000.0);
        assert!(wallet.buy_up_to(0.0).is_ok());
        assert!(wallet.sell_up_to(0.0).is_ok());
    }

    #[test]
    fn negative_amounts_fail() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        assert!(matches!(
            wallet.buy_up_to(-1.0),
            Err(TradebotError::NegativeAmount { operation: "buy", .. })
        ));
        assert!(matches!(
            wallet.sell_up_to(-1.0),
            Err(TradebotError::NegativeAmount { operation: "sell", .. })
        ));
        assert!(wallet.buy_up_to(f64::NAN).is_err());
    }

    #[test]
    fn trading_before_price_fails() {
        let mut wallet = Wallet::new(1000.0);
        assert!(matches!(
            wallet.buy_up_to(10.0),
            Err(TradebotError::PriceUnavailable { operation: "buy" })
        ));
    }

    #[test]
    fn total_capital_follows_price() {
        let mut wallet = priced_wallet(1000.0, 100.0);
        wallet.buy_up_to(1000.0).unwrap();
        wallet.update(&record_at(150.0));
        assert_relative_eq!(wallet.total_capital(), 1500.0);
        wallet.update(&record_at(0.0));
        assert!(wallet.is_bankrupt());
    }

    #[test]
    fn display_format() {
        let wallet = priced_wallet(100.0, 2.0);
        assert_eq!(
            wallet.to_string(),
            "wallet={ cash 100.00, 0.000000 at 2.00 == 0.00 }"
        );
    }

    proptest! {
        #[test]
        fn buy_all_then_sell_all_round_trips(cash in 1.0f64..1e7, price in 0.01f64..1e5) {
            let mut wallet = priced_wallet(cash, price);
            wallet.buy_up_to(wallet.cash()).unwrap();
            let total = wallet.total_capital();
            wallet.sell_up_to(total).unwrap();
            prop_assert!((wallet.cash() - cash).abs() <= cash * 1e-9);
            prop_assert!(wallet.asset_qty() >= 0.0);
        }

        #[test]
        fn capital_invariant_under_same_price_update(
            cash in 1.0f64..1e6,
            price in 0.01f64..1e4,
            fraction in 0.0f64..1.0,
        ) {
            let mut wallet = priced_wallet(cash, price);
            wallet.buy_up_to(cash * fraction).unwrap();
            let before = wallet.total_capital();
            wallet.update(&record_at(price));
            prop_assert_eq!(wallet.total_capital(), before);
        }

        #[test]
        fn never_goes_negative(
            orders in proptest::collection::vec((any::<bool>(), 0.0f64..5000.0), 0..50),
        ) {
            let mut wallet = priced_wallet(1000.0, 37.5);
            for (buy, amount) in orders {
                if buy {
                    wallet.buy_up_to(amount).unwrap();
                } else {
                    wallet.sell_up_to(amount).unwrap();
                }
                prop_assert!(wallet.cash() >= 0.0);
                prop_assert!(wallet.asset_qty() >= 0.0);
            }
        }
    }
}
