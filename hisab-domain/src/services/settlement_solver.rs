use hisab_settlement::{PersonBalance, SettlementError, construct_transfers};
use thiserror::Error;

use crate::model::{MemberBalances, Money, Settlement, Transfer};

/// Balance tables fed to the solver must net to exactly zero. A violation
/// signals an upstream accounting bug, not a user error, and is surfaced
/// instead of being silently truncated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SettlementInconsistency {
    #[error("balances must net to zero (found {0})")]
    ImbalancedTotal(Money),
}

/// Transfer-construction service over a member balance table.
pub struct SettlementSolver;

impl SettlementSolver {
    /// Reduces `balances` to an ordered list of transfers that drives every
    /// member to zero. Returns [`Settlement::settled`] when nothing is
    /// outstanding.
    pub fn settle<'a>(
        &self,
        balances: &MemberBalances<'a>,
    ) -> Result<Settlement<'a>, SettlementInconsistency> {
        // MemberBalances is a BTreeMap keyed by member name, so the solver
        // sees members in name order; equal amounts tie-break on that order.
        let people: Vec<PersonBalance<'a>> = balances
            .iter()
            .map(|(&member, balance)| PersonBalance {
                name: member,
                balance: balance.amount(),
            })
            .collect();

        tracing::debug!(
            member_count = people.len(),
            "transfer construction started"
        );

        let payments = construct_transfers(people).map_err(|err| match err {
            SettlementError::ImbalancedTotal(total) => {
                let residual = Money::from_i64(total);
                tracing::error!(
                    reject_reason = "input_imbalance",
                    member_count = balances.len(),
                    residual = %residual,
                    "transfer construction rejected due to input imbalance"
                );
                SettlementInconsistency::ImbalancedTotal(residual)
            }
        })?;

        if payments.is_empty() {
            return Ok(Settlement::settled());
        }

        let transfers = payments
            .into_iter()
            .map(|payment| Transfer {
                from: payment.from,
                to: payment.to,
                amount: Money::from_i64(payment.amount),
            })
            .collect();

        Ok(Settlement { transfers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn solver() -> SettlementSolver {
        SettlementSolver
    }

    fn balances<'a>(entries: &[(&'a str, i64)]) -> MemberBalances<'a> {
        entries
            .iter()
            .map(|&(member, units)| (member, Money::from_i64(units)))
            .collect()
    }

    #[rstest]
    #[case::two_members(
        &[("Asha", 5000), ("Bina", -5000)],
        &[("Bina", "Asha", 5000)]
    )]
    #[case::one_creditor_two_debtors(
        &[("Asha", 8000), ("Bina", -5000), ("Chand", -3000)],
        &[("Bina", "Asha", 5000), ("Chand", "Asha", 3000)]
    )]
    #[case::equal_amounts_follow_member_order(
        &[("Ann", 50), ("Ben", 50), ("Cal", -100)],
        &[("Cal", "Ann", 50), ("Cal", "Ben", 50)]
    )]
    #[case::zero_balance_member_is_skipped(
        &[("Asha", 5000), ("Bina", -5000), ("Chand", 0)],
        &[("Bina", "Asha", 5000)]
    )]
    fn settle_cases(
        solver: SettlementSolver,
        #[case] entries: &[(&'static str, i64)],
        #[case] expected: &[(&'static str, &'static str, i64)],
    ) {
        let settlement = solver
            .settle(&balances(entries))
            .expect("expected settlement");

        let expected: Vec<Transfer<'_>> = expected
            .iter()
            .map(|&(from, to, units)| Transfer {
                from,
                to,
                amount: Money::from_i64(units),
            })
            .collect();
        assert_eq!(settlement.transfers, expected);
    }

    #[rstest]
    fn settled_balances_yield_explicit_settled_result(solver: SettlementSolver) {
        let settlement = solver
            .settle(&balances(&[("Asha", 0), ("Bina", 0)]))
            .expect("expected settlement");

        assert!(settlement.is_settled());
        assert_eq!(settlement, Settlement::settled());
    }

    #[rstest]
    fn empty_balance_table_is_already_settled(solver: SettlementSolver) {
        let settlement = solver
            .settle(&MemberBalances::new())
            .expect("expected settlement");

        assert!(settlement.is_settled());
    }

    #[rstest]
    fn imbalanced_table_is_rejected(solver: SettlementSolver) {
        let result = solver.settle(&balances(&[("Asha", 5000), ("Bina", -4000)]));

        assert_eq!(
            result,
            Err(SettlementInconsistency::ImbalancedTotal(Money::from_i64(
                1000
            )))
        );
    }

    #[rstest]
    fn transfer_count_stays_below_member_count(solver: SettlementSolver) {
        let table = balances(&[
            ("Asha", 7000),
            ("Bina", -2000),
            ("Chand", -1000),
            ("Dev", -4000),
        ]);
        let settlement = solver.settle(&table).expect("expected settlement");

        assert!(settlement.transfers.len() <= table.len() - 1);
    }
}
