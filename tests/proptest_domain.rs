//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that pricing and stake selection maintain
//! their invariants across random inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use market_panel::domain::market::Side;
use market_panel::domain::pricing::{PriceModel, potential_winnings};
use market_panel::domain::stake::{Preset, Stake, StakeSelector};

/// Price from basis points, e.g. 6800 → 0.68.
fn price_bp(bp: u32) -> Decimal {
    Decimal::new(i64::from(bp), 4)
}

/// Stake from cents, e.g. 5000 → 50.00.
fn stake_cents(cents: u64) -> Stake {
    Stake::new(Decimal::new(i64::try_from(cents).unwrap(), 2)).unwrap()
}

fn preset() -> impl Strategy<Value = Preset> {
    prop_oneof![Just(Preset::Ten), Just(Preset::Fifty), Just(Preset::Hundred)]
}

// ── Price Display Properties ────────────────────────────────

proptest! {
    /// Percentages stay in [0, 100] whatever the price.
    #[test]
    fn percent_always_in_range(yes in -20_000i64..30_000, no in -20_000i64..30_000) {
        let model = PriceModel::new(Decimal::new(yes, 4), Decimal::new(no, 4));
        for side in Side::ALL {
            let percent = model.percent(side);
            prop_assert!(percent <= 100, "percent out of range: {percent}");
            let width = model.width_percent(side);
            prop_assert!((Decimal::ZERO..=dec!(100)).contains(&width));
        }
    }

    /// Complementary prices round to percentages summing to 100 ± 1.
    #[test]
    fn complementary_percentages_sum_to_hundred(bp in 0u32..=10_000) {
        let model = PriceModel::new(price_bp(bp), Decimal::ONE - price_bp(bp));
        let sum = u32::from(model.percent(Side::Yes)) + u32::from(model.percent(Side::No));
        prop_assert!((99..=101).contains(&sum), "sum was {sum} for yes={bp}bp");
    }
}

// ── Payout Properties ───────────────────────────────────────

proptest! {
    /// Winnings are `stake / price` and exceed the stake below price 1.
    #[test]
    fn winnings_exceed_stake_below_price_one(
        cents in 1u64..10_000_000,
        bp in 1u32..10_000,
    ) {
        let stake = stake_cents(cents);
        let price = price_bp(bp);
        let payout = potential_winnings(stake, price).unwrap();

        prop_assert!(payout > stake.amount(), "payout {payout} <= stake {stake}");
        let back = payout * price;
        prop_assert!((back - stake.amount()).abs() < dec!(0.000000001));
    }

    /// At price 1 the payout equals the stake.
    #[test]
    fn winnings_break_even_at_price_one(cents in 1u64..10_000_000) {
        let stake = stake_cents(cents);
        prop_assert_eq!(potential_winnings(stake, Decimal::ONE).unwrap(), stake.amount());
    }

    /// Higher prices never pay more for the same stake.
    #[test]
    fn winnings_decrease_with_price(cents in 1u64..1_000_000, bp in 1u32..9_999, delta in 1u32..5_000) {
        let stake = stake_cents(cents);
        let higher = (bp + delta).min(10_000);
        let cheap = potential_winnings(stake, price_bp(bp)).unwrap();
        let dear = potential_winnings(stake, price_bp(higher)).unwrap();
        prop_assert!(dear <= cheap);
    }
}

// ── Stake Selector Properties ───────────────────────────────

proptest! {
    /// Selecting the same preset twice leaves the stake unchanged.
    #[test]
    fn preset_selection_is_idempotent(p in preset()) {
        let mut selector = StakeSelector::new();
        selector.select_preset(p);
        let once = selector.current_stake();
        selector.select_preset(p);
        prop_assert_eq!(selector.current_stake(), once);
        prop_assert_eq!(selector.selected_preset(), Some(p));
    }

    /// The last write wins between presets and custom entries.
    #[test]
    fn last_write_wins(p in preset(), cents in 1u64..10_000_000) {
        let mut selector = StakeSelector::new();
        selector.select_preset(p);
        let custom = stake_cents(cents);
        selector.set_custom(&custom.amount().to_string()).unwrap();
        prop_assert_eq!(selector.current_stake().unwrap(), custom);

        selector.select_preset(p);
        prop_assert_eq!(selector.current_stake().unwrap(), p.stake());
    }

    /// Non-positive custom entries are always rejected.
    #[test]
    fn non_positive_custom_is_rejected(cents in -10_000_000i64..=0) {
        let mut selector = StakeSelector::new();
        let raw = Decimal::new(cents, 2).to_string();
        prop_assert!(selector.set_custom(&raw).is_err());
        prop_assert!(selector.current_stake().is_err());
    }
}
