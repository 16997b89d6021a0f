use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::model::{Money, ShareMap, SplitPolicy};

/// Reasons a split cannot be computed.
///
/// All of these are recovered at the call boundary with corrected input;
/// the calculator never falls back to a different policy.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AllocationError<'a> {
    #[error("included members must not be empty")]
    NoParticipants,
    #[error("amount must be positive (found {0})")]
    NonPositiveAmount(Money),
    #[error("percentages must total 100 (found {total})")]
    PercentageTotal { total: Decimal },
    #[error("total weight must be positive (found {total})")]
    WeightTotal { total: Decimal },
    #[error("percentage for {member} must not be negative")]
    NegativePercentage { member: &'a str },
    #[error("weight for {member} must not be negative")]
    NegativeWeight { member: &'a str },
    #[error("computed share does not fit the money range")]
    ShareOutOfRange,
    #[error("share map keys must match the included members")]
    ShareKeysMismatch,
    #[error("shares must reconstitute the amount (expected {expected}, found {actual})")]
    ShareSumMismatch { expected: Money, actual: Money },
}

/// Expense division service.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Divides `amount` among `included_members` under `policy`.
    ///
    /// Each of the first n-1 members (in input order) receives their share
    /// rounded to the minor unit; the last member receives whatever
    /// reconstitutes the amount exactly. The last-member residual is the
    /// fixed remainder rule: the same members in the same order always
    /// produce the same map, and the shares always sum to `amount`.
    pub fn split<'a>(
        &self,
        amount: Money,
        included_members: &[&'a str],
        policy: &SplitPolicy<'a>,
    ) -> Result<ShareMap<'a>, AllocationError<'a>> {
        if included_members.is_empty() {
            return Err(AllocationError::NoParticipants);
        }
        if amount.amount() <= 0 {
            return Err(AllocationError::NonPositiveAmount(amount));
        }

        let amount_units = Decimal::from(amount.amount());
        match policy {
            SplitPolicy::Equal => {
                let quota = amount_units / Decimal::from(included_members.len() as i64);
                assign(amount, included_members, |_| quota)
            }
            SplitPolicy::Percentage(percentages) => {
                let mut total = Decimal::ZERO;
                for &member in included_members {
                    let pct = percentages.get(member).copied().unwrap_or_default();
                    if pct < Decimal::ZERO {
                        return Err(AllocationError::NegativePercentage { member });
                    }
                    total += pct;
                }
                if (total - Decimal::ONE_HUNDRED).abs() > Decimal::new(1, 3) {
                    return Err(AllocationError::PercentageTotal { total });
                }
                assign(amount, included_members, |member| {
                    let pct = percentages.get(member).copied().unwrap_or_default();
                    amount_units * (pct / Decimal::ONE_HUNDRED)
                })
            }
            SplitPolicy::Shares(weights) => {
                let mut total = Decimal::ZERO;
                for &member in included_members {
                    let weight = weights.get(member).copied().unwrap_or_default();
                    if weight < Decimal::ZERO {
                        return Err(AllocationError::NegativeWeight { member });
                    }
                    total += weight;
                }
                if total <= Decimal::ZERO {
                    return Err(AllocationError::WeightTotal { total });
                }
                assign(amount, included_members, |member| {
                    let weight = weights.get(member).copied().unwrap_or_default();
                    amount_units * (weight / total)
                })
            }
        }
    }
}

fn assign<'a>(
    amount: Money,
    included_members: &[&'a str],
    share_of: impl Fn(&'a str) -> Decimal,
) -> Result<ShareMap<'a>, AllocationError<'a>> {
    let Some((&last, rest)) = included_members.split_last() else {
        return Err(AllocationError::NoParticipants);
    };
    let mut shares = ShareMap::new();
    let mut assigned = Money::zero();
    for &member in rest {
        let share = round_to_minor(share_of(member))?;
        assigned += share;
        shares.insert(member, share);
    }
    shares.insert(last, amount - assigned);
    Ok(shares)
}

fn round_to_minor<'a>(value: Decimal) -> Result<Money, AllocationError<'a>> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Money::from_i64)
        .ok_or(AllocationError::ShareOutOfRange)
}
