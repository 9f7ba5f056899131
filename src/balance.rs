use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{share_remainder, Money};
use crate::schemas::{Contribution, Expense, User};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    pub total_owed: Money,
    pub total_owing: Money,
    // Positive when the user is owed overall
    pub net_balance: Money,
}

pub struct ContributionIndex<'a> {
    paid: HashMap<(&'a str, &'a str), Money>,
}

impl<'a> ContributionIndex<'a> {
    pub fn new(contributions: &'a [Contribution]) -> Self {
        let mut paid = HashMap::new();
        for contribution in contributions {
            paid.entry((contribution.expense_id.as_str(), contribution.user_id.as_str()))
                .and_modify(|v| *v += contribution.amount)
                .or_insert(contribution.amount);
        }
        ContributionIndex { paid }
    }

    pub fn paid(&self, expense_id: &str, user_id: &str) -> Money {
        self.paid
            .get(&(expense_id, user_id))
            .copied()
            .unwrap_or(Money::ZERO)
    }
}

pub fn outstanding_share(
    expense: &Expense,
    participant: &str,
    contributions: &ContributionIndex,
) -> Decimal {
    let paid = contributions.paid(&expense.id, participant);
    share_remainder(expense.amount, expense.share_count(), paid)
}

pub fn compute_user_balance(
    current_user: Option<&User>,
    expenses: &[Expense],
    contributions: &[Contribution],
) -> BalanceSummary {
    let Some(user) = current_user else {
        return BalanceSummary::default();
    };
    let contributions = ContributionIndex::new(contributions);

    let mut owed = Decimal::ZERO;
    let mut owing = Decimal::ZERO;
    for expense in expenses {
        if expense.paid_by == user.id {
            for participant in &expense.split_between {
                owing += outstanding_share(expense, participant, &contributions);
            }
        } else if expense.split_between.contains(&user.id) {
            owed += outstanding_share(expense, &user.id, &contributions);
        }
    }

    let total_owed = Money::settle(owed);
    let total_owing = Money::settle(owing);
    BalanceSummary {
        total_owed,
        total_owing,
        net_balance: total_owing - total_owed,
    }
}
