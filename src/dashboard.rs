
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::balance::{compute_user_balance, BalanceSummary};
use crate::chores::{chore_status, chore_variant, ChoreError, ChoreStatus, ChoreVariant};
use crate::schemas::{Chore, Contribution, Expense, House, Note, User};

const UPCOMING_CHORES: usize = 3;
const RECENT_EXPENSES: usize = 3;
const PINNED_NOTES: usize = 2;

#[derive(Clone, Copy, Debug)]
pub struct DashboardInputs<'a> {
    pub user: Option<&'a User>,
    pub house: Option<&'a House>,
    pub members: &'a [User],
    pub chores: &'a [Chore],
    pub expenses: &'a [Expense],
    pub contributions: &'a [Contribution],
    pub notes: &'a [Note],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpcomingChore {
    #[serde(flatten)]
    pub chore: Chore,
    pub variant: ChoreVariant,
    pub status: ChoreStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub greeting: String,
    pub display_name: Option<String>,
    pub avatar_initial: Option<String>,
    pub house_name: Option<String>,
    // No house yet: ask to create or join one
    pub needs_house: bool,
    pub upcoming_chores: Vec<UpcomingChore>,
    pub recent_expenses: Vec<Expense>,
    pub pinned_notes: Vec<Note>,
    pub balance: BalanceSummary,
}

pub fn build_dashboard(
    inputs: DashboardInputs,
    now: DateTime<Utc>,
) -> Result<Dashboard, ChoreError> {
    let display_name = inputs
        .user
        .map(|user| user.display_name.clone())
        .filter(|name| !name.is_empty());
    let greeting = format!(
        "Welcome back, {}!",
        display_name.as_deref().unwrap_or("Guest")
    );
    let avatar_initial = display_name
        .as_deref()
        .and_then(|name| name.chars().next())
        .map(String::from);

    let in_house = match (inputs.house, inputs.user) {
        (Some(_), Some(user)) => inputs.members.iter().any(|member| member.id == user.id),
        _ => false,
    };

    let upcoming_chores = inputs
        .chores
        .iter()
        .filter(|chore| !chore.completed)
        .take(UPCOMING_CHORES)
        .map(|chore| {
            Ok(UpcomingChore {
                chore: chore.clone(),
                variant: chore_variant(&chore.due_date, now)?,
                status: chore_status(&chore.due_date, now)?,
            })
        })
        .collect::<Result<Vec<_>, ChoreError>>()?;

    let recent_expenses = inputs
        .expenses
        .iter()
        .take(RECENT_EXPENSES)
        .cloned()
        .collect();

    let pinned_notes = inputs
        .notes
        .iter()
        .filter(|note| note.is_pinned)
        .take(PINNED_NOTES)
        .cloned()
        .collect();

    Ok(Dashboard {
        greeting,
        display_name,
        avatar_initial,
        house_name: inputs.house.map(|house| house.name.clone()),
        needs_house: !in_house,
        upcoming_chores,
        recent_expenses,
        pinned_notes,
        balance: compute_user_balance(inputs.user, inputs.expenses, inputs.contributions),
    })
}
