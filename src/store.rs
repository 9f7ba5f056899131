use std::collections::HashSet;

use thiserror::Error;

use crate::chores::{parse_due_date, ChoreError};
use crate::dashboard::DashboardInputs;
use crate::money::Money;
use crate::schemas::{Chore, Contribution, Expense, House, Note, User};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown expense: {0}")]
    UnknownExpense(String),

    #[error("{kind} already exists: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Money),

    #[error("Amount {0} is above the maximum of {max}", max = Money::limit())]
    AmountTooLarge(Money),

    #[error("The payer {0} can't also be listed in split_between")]
    PayerInSplit(String),

    #[error("Participant listed twice: {0}")]
    DuplicateParticipant(String),

    #[error("Display name must not be empty")]
    EmptyDisplayName,

    #[error(transparent)]
    Chore(#[from] ChoreError),
}

/// In-memory state of a single house.
///
/// Every registered user is a member of the house. Expenses are kept newest
/// first, everything else in insertion order.
#[derive(Debug, Default)]
pub struct HouseStore {
    house: Option<House>,
    users: Vec<User>,
    expenses: Vec<Expense>,
    contributions: Vec<Contribution>,
    chores: Vec<Chore>,
    notes: Vec<Note>,
}

impl HouseStore {
    pub fn new(house: Option<House>) -> Self {
        HouseStore {
            house,
            ..Default::default()
        }
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    // Returns `true` when the user is new
    pub fn upsert_user(&mut self, user: User) -> Result<bool, StoreError> {
        if user.display_name.trim().is_empty() {
            return Err(StoreError::EmptyDisplayName);
        }
        match self.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => {
                existing.display_name = user.display_name;
                Ok(false)
            }
            None => {
                self.users.push(user);
                Ok(true)
            }
        }
    }

    pub fn add_expense(&mut self, expense: Expense) -> Result<(), StoreError> {
        if self.expenses.iter().any(|e| e.id == expense.id) {
            return Err(StoreError::DuplicateId {
                kind: "Expense",
                id: expense.id,
            });
        }
        check_amount(expense.amount)?;
        self.check_user(&expense.paid_by)?;
        let mut seen = HashSet::new();
        for participant in &expense.split_between {
            if *participant == expense.paid_by {
                return Err(StoreError::PayerInSplit(participant.clone()));
            }
            if !seen.insert(participant.as_str()) {
                return Err(StoreError::DuplicateParticipant(participant.clone()));
            }
            self.check_user(participant)?;
        }
        self.expenses.insert(0, expense);
        Ok(())
    }

    pub fn add_contribution(&mut self, contribution: Contribution) -> Result<(), StoreError> {
        if self.contributions.iter().any(|c| c.id == contribution.id) {
            return Err(StoreError::DuplicateId {
                kind: "Contribution",
                id: contribution.id,
            });
        }
        check_amount(contribution.amount)?;
        self.check_user(&contribution.user_id)?;
        if !self.expenses.iter().any(|e| e.id == contribution.expense_id) {
            return Err(StoreError::UnknownExpense(contribution.expense_id));
        }
        self.contributions.push(contribution);
        Ok(())
    }

    pub fn add_chore(&mut self, chore: Chore) -> Result<(), StoreError> {
        if self.chores.iter().any(|c| c.id == chore.id) {
            return Err(StoreError::DuplicateId {
                kind: "Chore",
                id: chore.id,
            });
        }
        parse_due_date(&chore.due_date)?;
        if let Some(assignee) = &chore.assigned_to {
            self.check_user(assignee)?;
        }
        self.chores.push(chore);
        Ok(())
    }

    pub fn add_note(&mut self, note: Note) -> Result<(), StoreError> {
        if self.notes.iter().any(|n| n.id == note.id) {
            return Err(StoreError::DuplicateId {
                kind: "Note",
                id: note.id,
            });
        }
        self.check_user(&note.author_id)?;
        self.notes.push(note);
        Ok(())
    }

    // Unknown users get the guest view
    pub fn dashboard_inputs(&self, user_id: &str) -> DashboardInputs<'_> {
        DashboardInputs {
            user: self.user(user_id),
            house: self.house.as_ref(),
            members: &self.users,
            chores: &self.chores,
            expenses: &self.expenses,
            contributions: &self.contributions,
            notes: &self.notes,
        }
    }

    fn check_user(&self, id: &str) -> Result<(), StoreError> {
        match self.user(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::UnknownUser(id.to_string())),
        }
    }
}

fn check_amount(amount: Money) -> Result<(), StoreError> {
    if amount.is_negative() {
        return Err(StoreError::NegativeAmount(amount));
    }
    if amount > Money::limit() {
        return Err(StoreError::AmountTooLarge(amount));
    }
    Ok(())
}
