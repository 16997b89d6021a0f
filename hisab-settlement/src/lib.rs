#![warn(clippy::uninlined_format_args)]

mod model;

use thiserror::Error;

pub use model::{Payment, PersonBalance};

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Sum of balances must be zero (found {0})")]
    ImbalancedTotal(i64),
}

struct Party<'a> {
    name: &'a str,
    remaining: i64,
}

/// Constructs the payments that drive every balance to zero by repeatedly
/// matching the largest creditor with the largest debtor.
///
/// Balances must sum to exactly zero. Equal outstanding amounts keep the
/// caller's input order (all sorts are stable). The result is not guaranteed
/// to be globally minimal, but never exceeds `n - 1` payments: every
/// iteration exhausts at least one party.
pub fn construct_transfers<'a>(
    people: impl IntoIterator<Item = PersonBalance<'a>>,
) -> Result<Vec<Payment<'a>>, SettlementError> {
    let people: Vec<PersonBalance<'a>> = people.into_iter().collect();
    let total: i64 = people.iter().map(|p| p.balance).sum();
    if total != 0 {
        return Err(SettlementError::ImbalancedTotal(total));
    }

    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for person in &people {
        if person.balance > 0 {
            creditors.push(Party {
                name: person.name,
                remaining: person.balance,
            });
        } else if person.balance < 0 {
            debtors.push(Party {
                name: person.name,
                remaining: -person.balance,
            });
        }
    }

    sort_descending(&mut creditors);
    sort_descending(&mut debtors);

    let mut payments = Vec::new();
    while !creditors.is_empty() && !debtors.is_empty() {
        let amount = creditors[0].remaining.min(debtors[0].remaining);
        payments.push(Payment {
            from: debtors[0].name,
            to: creditors[0].name,
            amount,
        });
        creditors[0].remaining -= amount;
        debtors[0].remaining -= amount;
        if creditors[0].remaining == 0 {
            creditors.remove(0);
        }
        if debtors[0].remaining == 0 {
            debtors.remove(0);
        }
        // Outstanding amounts changed; the largest party may be a different one now.
        sort_descending(&mut creditors);
        sort_descending(&mut debtors);
    }

    // A zero total guarantees both sides exhaust on the same iteration.
    debug_assert!(creditors.is_empty() && debtors.is_empty());

    Ok(payments)
}

fn sort_descending(parties: &mut [Party<'_>]) {
    parties.sort_by(|a, b| b.remaining.cmp(&a.remaining));
}
