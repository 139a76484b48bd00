//! Saving new expenses together with their splits.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{
        core::{Expense, Split},
        split::{Participant, allocate},
    },
    group::GroupId,
};

/// The details needed to record a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRequest {
    /// The total amount paid.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// The group the expense belongs to.
    pub group_id: GroupId,
    /// How much of `amount`, in percent, is shared between the participants.
    pub split_percentage: f64,
    /// The people who share the cost.
    pub participants: Vec<Participant>,
    /// The ID of the participant who paid.
    pub created_by: String,
}

/// Split an expense between its participants and save the expense with its
/// splits.
///
/// The expense and all of its splits are written in a single SQL transaction,
/// so either all of them are saved or none are.
///
/// # Errors
/// Returns the errors from [allocate] when the request is invalid, these are
/// never caused by the database. Returns [Error::SqlError] if the expense could
/// not be saved.
pub fn add_expense(request: &ExpenseRequest, connection: &Connection) -> Result<Expense, Error> {
    let new_splits = allocate(
        request.amount,
        request.split_percentage,
        &request.participants,
    )?;

    let transaction = connection.unchecked_transaction()?;
    let created_at = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO expense (amount, description, group_id, created_by, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            request.amount,
            &request.description,
            request.group_id,
            &request.created_by,
            created_at,
        ),
    )?;
    let expense_id = transaction.last_insert_rowid();

    let mut splits = Vec::with_capacity(new_splits.len());
    {
        let mut statement = transaction.prepare(
            "INSERT INTO split (expense_id, user_id, user_name, amount, percentage)
            VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for split in new_splits {
            statement.execute((
                expense_id,
                &split.user_id,
                &split.user_name,
                split.amount,
                split.percentage,
            ))?;

            splits.push(Split {
                user_id: split.user_id,
                user_name: split.user_name,
                amount: split.amount,
                percentage: split.percentage,
            });
        }
    }

    transaction.commit()?;

    tracing::debug!(
        "Saved expense {expense_id} in group {} with {} splits",
        request.group_id,
        splits.len()
    );

    Ok(Expense {
        id: expense_id,
        amount: request.amount,
        description: request.description.clone(),
        group_id: request.group_id,
        created_by: request.created_by.clone(),
        created_at,
        splits,
    })
}
