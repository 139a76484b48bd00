//! Works out who owes money and who is owed money within a group.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::expense::Expense;

/// The label used in place of the viewer's own ID.
pub const VIEWER_LABEL: &str = "You";

/// How much one participant owes or is owed across all of a group's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    /// The participant's ID, or "You" for the viewer.
    pub name: String,
    /// The size of the balance, never negative.
    pub amount: f64,
    /// Whether the participant owes money (`true`) or is owed money (`false`).
    pub owes: bool,
}

/// Sum what each participant has paid minus what they owe.
///
/// The creator of an expense is credited the full amount, and each
/// participant in a split is debited their share. A positive total means the
/// participant is owed money.
pub fn net_totals(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.created_by.clone()).or_default() += expense.amount;

        for split in &expense.splits {
            *totals.entry(split.user_id.clone()).or_default() -= split.amount;
        }
    }

    totals
}

/// Net the expenses of a group into one balance per participant.
///
/// Balances are sorted by participant ID. The viewer's balance is named
/// [VIEWER_LABEL]. Participants who are square are included with an amount of
/// zero.
pub fn compute_balances(expenses: &[Expense], viewer_id: &str) -> Vec<Balance> {
    net_totals(expenses)
        .into_iter()
        .map(|(user_id, total)| Balance {
            name: if user_id == viewer_id {
                VIEWER_LABEL.to_owned()
            } else {
                user_id
            },
            amount: total.abs(),
            owes: total < 0.0,
        })
        .collect()
}
