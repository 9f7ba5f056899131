use crate::balance::{outstanding_share, ContributionIndex};
use crate::money::Money;
use crate::schemas::{Contribution, Expense, UserId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct PersonalBalance {
    pub id: UserId,
    pub balance: Money,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct UserPair {
    pub user1: UserId,
    pub user2: UserId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Debt {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}

// What every participant still owes every payer, netted per pair of members
pub fn pairwise_debts(expenses: &[Expense], contributions: &[Contribution]) -> Vec<Debt> {
    let contributions = ContributionIndex::new(contributions);
    // Positive means user2 owes user1
    let mut balances_between_people: BTreeMap<UserPair, Decimal> = BTreeMap::new();

    for expense in expenses {
        for participant in &expense.split_between {
            if *participant == expense.paid_by {
                continue;
            }
            let remainder = outstanding_share(expense, participant, &contributions);
            if remainder.is_zero() {
                continue;
            }

            // We use alphabetical order to ensure all the debts regarding
            // the same users end up stored in the same direction
            let (pair, amount) = if expense.paid_by < *participant {
                (
                    UserPair {
                        user1: expense.paid_by.clone(),
                        user2: participant.clone(),
                    },
                    remainder,
                )
            } else {
                (
                    UserPair {
                        user1: participant.clone(),
                        user2: expense.paid_by.clone(),
                    },
                    -remainder,
                )
            };

            balances_between_people
                .entry(pair)
                .and_modify(|balance| *balance += amount)
                .or_insert(amount);
        }
    }

    let mut debts = Vec::new();
    for (people_pair, balance) in balances_between_people {
        let amount = Money::settle(balance.abs());
        if amount == Money::ZERO {
            continue;
        }
        // If the balance is negative the debt goes the other way
        let (from, to) = if balance.is_sign_negative() {
            (people_pair.user1, people_pair.user2)
        } else {
            (people_pair.user2, people_pair.user1)
        };
        debts.push(Debt { from, to, amount });
    }
    debts.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
    debts
}

// Tries to simplify the number of transfers
fn get_simplified_debts(
    mut payers: Vec<PersonalBalance>,
    mut receivers: Vec<PersonalBalance>,
) -> Vec<Debt> {
    // Ties broken by id so the plan is stable for the same input
    payers.sort_by(|a, b| a.balance.cmp(&b.balance).then_with(|| b.id.cmp(&a.id)));
    receivers.sort_by(|a, b| a.balance.cmp(&b.balance).then_with(|| b.id.cmp(&a.id)));

    let mut debts: Vec<Debt> = Vec::new();

    while let (Some(payer), Some(receiver)) = (payers.last_mut(), receivers.last_mut()) {
        let mut debt = Debt {
            from: payer.id.clone(),
            to: receiver.id.clone(),
            amount: Money::ZERO,
        };
        if receiver.balance == payer.balance {
            debt.amount = payer.balance;
            payers.pop();
            receivers.pop();
        } else if receiver.balance > payer.balance {
            debt.amount = payer.balance;
            receiver.balance -= payer.balance;
            payers.pop();
        } else {
            debt.amount = receiver.balance;
            payer.balance -= receiver.balance;
            receivers.pop();
        }
        debts.push(debt);
    }
    debts
}

pub fn settlement_plan(expenses: &[Expense], contributions: &[Contribution]) -> Vec<Debt> {
    let naive_debts = pairwise_debts(expenses, contributions);

    let mut people_balances: BTreeMap<&str, Money> = BTreeMap::new();
    for debt in &naive_debts {
        *people_balances.entry(debt.from.as_str()).or_default() -= debt.amount;
        *people_balances.entry(debt.to.as_str()).or_default() += debt.amount;
    }

    // Divide people into payers and receivers
    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for (id, balance) in people_balances {
        if balance == Money::ZERO {
            continue;
        }
        let person = PersonalBalance {
            id: id.to_string(),
            balance: balance.abs(),
        };
        if balance.is_negative() {
            payers.push(person);
        } else {
            receivers.push(person);
        }
    }

    let simplified_debts = get_simplified_debts(payers, receivers);

    // We ensure the simplification didn't accidentally end up being
    // more complicated than the naive debts
    if simplified_debts.len() < naive_debts.len() {
        simplified_debts
    } else {
        naive_debts
    }
}
