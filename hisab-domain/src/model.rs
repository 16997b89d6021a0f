use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use fxhash::{FxHashMap, FxHashSet};
use rust_decimal::Decimal;

use crate::services::{AllocationError, SplitCalculator};

/// Net position of every member, keyed by name.
///
/// A BTreeMap keeps iteration in member order; transfer construction relies
/// on that order as the tie-break between equal outstanding amounts.
pub type MemberBalances<'a> = BTreeMap<&'a str, Money>;

/// Per-member portion of a single expense. Keys are exactly the expense's
/// included members.
pub type ShareMap<'a> = BTreeMap<&'a str, Money>;

/// An amount in integer minor units (paise).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(value as i64)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> i64 {
        self.0.abs()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    /// The amount in major units (rupees) as a decimal.
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = (self.0 / 100).abs();
        let minor = (self.0 % 100).abs();
        write!(f, "{sign}{major}.{minor:02}")
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// How an expense is divided among its included members.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitPolicy<'a> {
    /// Every included member owes the same share.
    Equal,
    /// Percentage of the amount per member; the percentages must total 100.
    Percentage(FxHashMap<&'a str, Decimal>),
    /// Proportional weight per member; the total weight must be positive.
    Shares(FxHashMap<&'a str, Decimal>),
}

/// A single shared expense with its computed share map.
///
/// Constructed only through [`Expense::try_new`] or
/// [`Expense::try_from_parts`], so every instance satisfies: the payer is
/// one of the included members, the share keys are exactly the included
/// members, and the shares sum to the amount exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense<'a> {
    amount: Money,
    payer: &'a str,
    included_members: Vec<&'a str>,
    policy: SplitPolicy<'a>,
    shares: ShareMap<'a>,
}

impl<'a> Expense<'a> {
    /// Builds an expense and computes its share map under `policy`.
    ///
    /// The payer always takes part in the split; a payer missing from
    /// `included_members` is appended to it.
    pub fn try_new(
        amount: Money,
        payer: &'a str,
        mut included_members: Vec<&'a str>,
        policy: SplitPolicy<'a>,
    ) -> Result<Self, AllocationError<'a>> {
        if !included_members.contains(&payer) {
            included_members.push(payer);
        }
        let shares = SplitCalculator.split(amount, &included_members, &policy)?;
        Ok(Self {
            amount,
            payer,
            included_members,
            policy,
            shares,
        })
    }

    /// Re-admits a stored expense record without recomputing its shares.
    ///
    /// The record must already satisfy the construction invariants; a share
    /// map whose keys stray from the included members or whose values do
    /// not reconstitute the amount is rejected rather than trusted.
    pub fn try_from_parts(
        amount: Money,
        payer: &'a str,
        mut included_members: Vec<&'a str>,
        policy: SplitPolicy<'a>,
        shares: ShareMap<'a>,
    ) -> Result<Self, AllocationError<'a>> {
        if amount.amount() <= 0 {
            return Err(AllocationError::NonPositiveAmount(amount));
        }
        if !included_members.contains(&payer) {
            included_members.push(payer);
        }
        let included: FxHashSet<&str> = included_members.iter().copied().collect();
        if shares.len() != included.len() || !shares.keys().all(|member| included.contains(member))
        {
            return Err(AllocationError::ShareKeysMismatch);
        }
        let actual: Money = shares.values().copied().sum();
        if actual != amount {
            return Err(AllocationError::ShareSumMismatch {
                expected: amount,
                actual,
            });
        }
        Ok(Self {
            amount,
            payer,
            included_members,
            policy,
            shares,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &'a str {
        self.payer
    }

    pub fn included_members(&self) -> &[&'a str] {
        &self.included_members
    }

    pub fn policy(&self) -> &SplitPolicy<'a> {
        &self.policy
    }

    pub fn shares(&self) -> &ShareMap<'a> {
        &self.shares
    }
}

/// A recommended payment from one member to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transfer<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: Money,
}

/// Result of settling a balance table: the payments, in the order they
/// should be made.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settlement<'a> {
    pub transfers: Vec<Transfer<'a>>,
}

impl<'a> Settlement<'a> {
    /// A settlement with nothing outstanding.
    pub fn settled() -> Self {
        Self {
            transfers: Vec::new(),
        }
    }

    /// True when every balance was already zero and no payment is required.
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}
