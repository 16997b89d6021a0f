use fxhash::FxHashMap;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{Expense, Money};

/// Evenly distributed percentage defaults for a member list.
///
/// The first n-1 members get a one-decimal base percentage; the last member
/// absorbs the rest so the total is exactly 100.
pub fn suggest_equal_percentages<'a>(members: &[&'a str]) -> FxHashMap<&'a str, Decimal> {
    let Some((&last, rest)) = members.split_last() else {
        return FxHashMap::default();
    };
    let base = Decimal::new(1000 / members.len() as i64, 1);
    let mut suggestions = FxHashMap::default();
    let mut total = Decimal::ZERO;
    for &member in rest {
        suggestions.insert(member, base);
        total += base;
    }
    suggestions.insert(last, Decimal::ONE_HUNDRED - total);
    suggestions
}

/// Recovers percentage parameters from a stored expense's shares, for
/// pre-filling an edit of a percentage split. The last member's percentage
/// is the residual to 100, so the recovered set always totals exactly 100.
/// Empty when the amount is not positive.
pub fn infer_percentages<'a>(expense: &Expense<'a>) -> FxHashMap<&'a str, Decimal> {
    if expense.amount().amount() <= 0 {
        return FxHashMap::default();
    }
    let Some((&last, rest)) = expense.included_members().split_last() else {
        return FxHashMap::default();
    };
    let amount = expense.amount().as_decimal();
    let mut percentages = FxHashMap::default();
    let mut total = Decimal::ZERO;
    for &member in rest {
        let share = share_of(expense, member);
        let pct = round_one_decimal(share.as_decimal() / amount * Decimal::ONE_HUNDRED);
        percentages.insert(member, pct);
        total += pct;
    }
    percentages.insert(last, Decimal::ONE_HUNDRED - total);
    percentages
}

/// Recovers proportional weights from a stored expense's shares: each share
/// relative to the smallest positive one, at one-decimal precision. All
/// weights are zero when no share is positive.
pub fn infer_share_weights<'a>(expense: &Expense<'a>) -> FxHashMap<&'a str, Decimal> {
    let smallest = expense
        .shares()
        .values()
        .copied()
        .filter(|share| share.amount() > 0)
        .min();
    expense
        .included_members()
        .iter()
        .map(|&member| {
            let weight = match smallest {
                Some(smallest) => {
                    round_one_decimal(share_of(expense, member).as_decimal() / smallest.as_decimal())
                }
                None => Decimal::ZERO,
            };
            (member, weight)
        })
        .collect()
}

fn share_of<'a>(expense: &Expense<'a>, member: &'a str) -> Money {
    expense
        .shares()
        .get(member)
        .copied()
        .unwrap_or(Money::zero())
}

fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
