use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

pub type UserId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct House {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Money,
    pub paid_by: UserId,
    // The payer is never listed here, it always holds one implicit share
    pub split_between: Vec<UserId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    // Every participant plus the payer
    pub fn share_count(&self) -> i64 {
        self.split_between.len() as i64 + 1
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Contribution {
    pub id: String,
    pub expense_id: String,
    pub user_id: UserId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Chore {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: UserId,
    #[serde(default)]
    pub is_pinned: bool,
}
