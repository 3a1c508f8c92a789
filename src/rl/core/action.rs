//! Action Space
//!
//! Interprets the continuous 2-vector action and applies it to the account.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::account::AccountState;
use crate::domain::Bar;

/// Dimension of the continuous action vector
pub const ACTION_DIM: usize = 2;

/// Lower bound of each action component
pub const ACTION_LOW: [f64; ACTION_DIM] = [0.0, 0.0];

/// Upper bound of each action component
pub const ACTION_HIGH: [f64; ACTION_DIM] = [3.0, 1.0];

/// Raw action as produced by a policy: `[action_type, amount]`
pub type ActionVector = [f64; ACTION_DIM];

/// Trading decision decoded from an action vector
///
/// `amount` is passed through unclamped; values outside `[0, 1]` give
/// economically degenerate but well-defined results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Spend `amount` of the cash balance
    Buy { amount: f64 },
    /// Sell `amount` of current holdings
    Sell { amount: f64 },
    /// Leave the account untouched
    Hold,
}

impl From<ActionVector> for TradeAction {
    fn from(action: ActionVector) -> Self {
        let [action_type, amount] = action;
        if action_type < 1.0 {
            TradeAction::Buy { amount }
        } else if action_type < 2.0 {
            TradeAction::Sell { amount }
        } else {
            // Includes [2, 3], anything above, and NaN
            TradeAction::Hold
        }
    }
}

impl TradeAction {
    /// Canonical action vector for this decision
    pub fn to_vector(&self) -> ActionVector {
        match self {
            Self::Buy { amount } => [0.5, *amount],
            Self::Sell { amount } => [1.5, *amount],
            Self::Hold => [2.5, 0.0],
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, Self::Hold)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Buy { .. } => "buy",
            Self::Sell { .. } => "sell",
            Self::Hold => "hold",
        }
    }
}

/// Result of applying one action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub action: TradeAction,
    /// Price the trade (or mark) was executed at
    pub fill_price: f64,
    /// Shares bought (positive) or sold (negative)
    pub shares_traded: f64,
    /// Net worth at the fill price after the trade
    pub net_worth: f64,
}

/// Draw an execution price uniformly between the bar's open and close
///
/// Bounds are ordered first, so a down bar (open above close) samples
/// `[close, open]`.
pub fn sample_fill_price<R: Rng>(bar: &Bar, rng: &mut R) -> f64 {
    let (low, high) = bar.fill_range();
    if low == high {
        return low;
    }
    rng.gen_range(low..=high)
}

/// Applies decoded actions to an account at a randomly sampled fill price
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionInterpreter;

impl ActionInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Execute `action` against `account` inside `bar`
    pub fn apply<R: Rng>(
        &self,
        account: &mut AccountState,
        bar: &Bar,
        action: ActionVector,
        rng: &mut R,
    ) -> TradeOutcome {
        let fill_price = sample_fill_price(bar, rng);
        let decoded = TradeAction::from(action);

        let shares_traded = match decoded {
            TradeAction::Buy { amount } => account.buy(fill_price, amount),
            TradeAction::Sell { amount } => -account.sell(fill_price, amount),
            TradeAction::Hold => 0.0,
        };

        let net_worth = account.mark_to_market(fill_price);

        TradeOutcome {
            action: decoded,
            fill_price,
            shares_traded,
            net_worth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bar(open: f64, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Bar::new(date, open, open.max(close), open.min(close), close, 10_000.0)
    }

    #[test]
    fn test_action_decoding() {
        assert_eq!(TradeAction::from([0.0, 0.3]), TradeAction::Buy { amount: 0.3 });
        assert_eq!(TradeAction::from([0.99, 1.0]), TradeAction::Buy { amount: 1.0 });
        assert_eq!(TradeAction::from([1.0, 0.5]), TradeAction::Sell { amount: 0.5 });
        assert_eq!(TradeAction::from([1.99, 0.5]), TradeAction::Sell { amount: 0.5 });
        assert_eq!(TradeAction::from([2.0, 0.5]), TradeAction::Hold);
        assert_eq!(TradeAction::from([3.0, 0.5]), TradeAction::Hold);
        assert_eq!(TradeAction::from([7.0, 0.5]), TradeAction::Hold);
        assert_eq!(TradeAction::from([f64::NAN, 0.5]), TradeAction::Hold);
    }

    #[test]
    fn test_negative_action_type_buys() {
        assert_eq!(TradeAction::from([-1.0, 0.2]), TradeAction::Buy { amount: 0.2 });
    }

    #[test]
    fn test_canonical_vectors_decode_back() {
        for action in [
            TradeAction::Buy { amount: 0.4 },
            TradeAction::Sell { amount: 0.6 },
            TradeAction::Hold,
        ] {
            assert_eq!(TradeAction::from(action.to_vector()), action);
        }
    }

    #[test]
    fn test_fill_price_within_bar() {
        let mut rng = StdRng::seed_from_u64(11);
        let b = bar(100.0, 110.0);
        for _ in 0..500 {
            let price = sample_fill_price(&b, &mut rng);
            assert!((100.0..=110.0).contains(&price));
        }
    }

    #[test]
    fn test_fill_price_reversed_bar() {
        let mut rng = StdRng::seed_from_u64(12);
        let b = bar(110.0, 100.0);
        for _ in 0..500 {
            let price = sample_fill_price(&b, &mut rng);
            assert!((100.0..=110.0).contains(&price));
        }
    }

    #[test]
    fn test_fill_price_flat_bar() {
        let mut rng = StdRng::seed_from_u64(13);
        assert_eq!(sample_fill_price(&bar(100.0, 100.0), &mut rng), 100.0);
    }

    #[test]
    fn test_apply_buy_then_sell() {
        let mut rng = StdRng::seed_from_u64(14);
        let interpreter = ActionInterpreter::new();
        let b = bar(100.0, 100.0);
        let mut account = AccountState::new(10_000.0, 0);

        let outcome = interpreter.apply(&mut account, &b, [0.5, 1.0], &mut rng);
        assert_eq!(outcome.action, TradeAction::Buy { amount: 1.0 });
        assert_eq!(outcome.shares_traded, 100.0);
        assert_eq!(outcome.net_worth, 10_000.0);
        assert_eq!(account.balance, 0.0);
        assert_eq!(account.shares_held, 100.0);
        assert_eq!(account.average_share_cost, 100.0);

        let outcome = interpreter.apply(&mut account, &b, [1.5, 1.0], &mut rng);
        assert_eq!(outcome.shares_traded, -100.0);
        assert_eq!(account.balance, 10_000.0);
        assert_eq!(account.shares_held, 0.0);
        assert_eq!(account.average_share_cost, 0.0);
        assert_eq!(account.total_shares_sold, 100.0);
        assert_eq!(account.total_sales_value, 10_000.0);
    }

    #[test]
    fn test_apply_hold_is_noop() {
        let mut rng = StdRng::seed_from_u64(15);
        let interpreter = ActionInterpreter::new();
        let b = bar(90.0, 120.0);
        let mut account = AccountState::new(10_000.0, 3);
        let before = account.clone();

        let outcome = interpreter.apply(&mut account, &b, [2.5, 1.0], &mut rng);
        assert!(outcome.action.is_hold());
        assert_eq!(outcome.shares_traded, 0.0);
        assert_eq!(account, before);
    }

    #[test]
    fn test_apply_raises_net_worth_peak() {
        let mut rng = StdRng::seed_from_u64(16);
        let interpreter = ActionInterpreter::new();
        let mut account = AccountState::new(1_000.0, 0);

        interpreter.apply(&mut account, &bar(10.0, 10.0), [0.0, 1.0], &mut rng);
        interpreter.apply(&mut account, &bar(30.0, 30.0), [2.5, 0.0], &mut rng);

        assert_eq!(account.max_net_worth, 3_000.0);
    }
}
