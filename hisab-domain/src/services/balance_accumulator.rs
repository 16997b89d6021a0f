use crate::model::{Expense, MemberBalances, Money};

/// Folds expenses into signed net positions: the payer is credited with the
/// full amount, every included member is debited with their share. A
/// member's result is what they paid minus what they owe; the table always
/// nets to zero because each expense credits exactly what it debits.
#[derive(Debug, Default)]
pub struct BalanceAccumulator<'a> {
    balances: MemberBalances<'a>,
}

impl<'a> BalanceAccumulator<'a> {
    pub fn new() -> Self {
        Self {
            balances: MemberBalances::new(),
        }
    }

    /// Seeds every group member with a zero balance, so members untouched
    /// by any expense still appear in the result.
    pub fn new_with_members(members: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            balances: members
                .into_iter()
                .map(|member| (member, Money::zero()))
                .collect(),
        }
    }

    pub fn apply(&mut self, expense: &Expense<'a>) {
        *self
            .balances
            .entry(expense.payer())
            .or_insert(Money::zero()) += expense.amount();
        for &member in expense.included_members() {
            let share = expense.shares().get(member).copied().unwrap_or(Money::zero());
            *self.balances.entry(member).or_insert(Money::zero()) -= share;
        }
    }

    pub fn balances(&self) -> &MemberBalances<'a> {
        &self.balances
    }

    pub fn into_balances(self) -> MemberBalances<'a> {
        self.balances
    }
}

/// Net balance of every member across `expenses`.
pub fn accumulate<'a, 'b>(
    expenses: impl IntoIterator<Item = &'b Expense<'a>>,
) -> MemberBalances<'a>
where
    'a: 'b,
{
    let mut accumulator = BalanceAccumulator::new();
    for expense in expenses {
        accumulator.apply(expense);
    }
    accumulator.into_balances()
}
