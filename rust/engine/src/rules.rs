use serde::{Deserialize, Serialize};

use crate::player::PlayerAction as A;

/// How many chips a raise takes from the raiser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaiseAccounting {
    /// Charge the entire new table bet, ignoring what the raiser already put
    /// in. Table and player bets are not reset between streets of a hand.
    Legacy,
    /// Charge only the difference between the new table bet and the raiser's
    /// street contribution.
    #[default]
    Incremental,
}

/// Who takes the pot when best scores are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// First tied player in seating order takes everything.
    #[default]
    FirstSeat,
    /// Even split; odd chips go to the earliest seats.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blinds {
    pub small: u32,
    pub big: u32,
}

impl Default for Blinds {
    fn default() -> Self {
        Self { small: 10, big: 20 }
    }
}

/// An action with its chip charge worked out. Charges are requests; the
/// player pays at most what is left in the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Raise { to: u32, charge: u32 },
}

/// Resolves a parsed action against the table state.
///
/// Checking while facing a bet is accepted as-is; the single-pass model
/// never enforces it.
///
/// # Examples
///
/// ```
/// use tablemind_engine::rules::{validate_action, RaiseAccounting, ValidatedAction};
/// use tablemind_engine::player::PlayerAction;
///
/// // raiser already has 20 in, table bet 20, raise by 30
/// let legacy = validate_action(20, 20, RaiseAccounting::Legacy, PlayerAction::Raise(30));
/// assert_eq!(legacy, ValidatedAction::Raise { to: 50, charge: 50 });
///
/// let fixed = validate_action(20, 20, RaiseAccounting::Incremental, PlayerAction::Raise(30));
/// assert_eq!(fixed, ValidatedAction::Raise { to: 50, charge: 30 });
/// ```
pub fn validate_action(
    own_bet: u32,
    table_bet: u32,
    accounting: RaiseAccounting,
    action: A,
) -> ValidatedAction {
    match action {
        A::Fold => ValidatedAction::Fold,
        A::Check => ValidatedAction::Check,
        A::Call => ValidatedAction::Call(table_bet.saturating_sub(own_bet)),
        A::Raise(amount) => {
            let to = table_bet.saturating_add(amount);
            let charge = match accounting {
                RaiseAccounting::Legacy => to,
                RaiseAccounting::Incremental => to.saturating_sub(own_bet),
            };
            ValidatedAction::Raise { to, charge }
        }
    }
}
