use std::collections::HashMap;

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId, group::GroupId};

/// Alias for the integer type used for expense IDs.
pub type ExpenseId = DatabaseId;

/// A payment made by one member of a group on behalf of others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The total amount paid.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// The group the expense belongs to.
    pub group_id: GroupId,
    /// The ID of the participant who paid.
    pub created_by: String,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Who owes what, in the order the shares were created.
    pub splits: Vec<Split>,
}

/// One participant's share of a saved expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    /// The ID of the participant who owes this share.
    pub user_id: String,
    /// The participant's display name at the time the expense was created.
    pub user_name: String,
    /// The amount of money owed.
    pub amount: f64,
    /// The share of the expense amount, in percent.
    pub percentage: f64,
}

/// Create the tables for expenses and their splits.
///
/// Splits are deleted with their expense, and expenses are deleted with
/// their group. Foreign keys must be enabled on the connection for the
/// cascades to happen, see [initialize](crate::db::initialize).
pub fn create_expense_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            description TEXT NOT NULL,
            group_id INTEGER NOT NULL,
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(group_id) REFERENCES expense_group(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_group_created_at ON expense(group_id, created_at);

        CREATE TABLE IF NOT EXISTS split (
            id INTEGER PRIMARY KEY,
            expense_id INTEGER NOT NULL,
            user_id TEXT NOT NULL,
            user_name TEXT NOT NULL,
            amount REAL NOT NULL,
            percentage REAL NOT NULL,
            FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_split_expense_id ON split(expense_id);",
    )?;

    Ok(())
}

/// Retrieve the expenses of a group with their splits, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn get_group_expenses(group_id: GroupId, connection: &Connection) -> Result<Vec<Expense>, Error> {
    let mut splits_by_expense: HashMap<ExpenseId, Vec<Split>> = HashMap::new();

    connection
        .prepare(
            "SELECT s.expense_id, s.user_id, s.user_name, s.amount, s.percentage
            FROM split s
            INNER JOIN expense e ON e.id = s.expense_id
            WHERE e.group_id = :group_id
            ORDER BY s.id ASC",
        )?
        .query_map(&[(":group_id", &group_id)], |row| {
            let expense_id: ExpenseId = row.get(0)?;
            Ok((expense_id, map_row_to_split(row, 1)?))
        })?
        .try_for_each(|maybe_split| -> Result<(), Error> {
            let (expense_id, split) = maybe_split?;
            splits_by_expense.entry(expense_id).or_default().push(split);
            Ok(())
        })?;

    connection
        .prepare(
            "SELECT id, amount, description, group_id, created_by, created_at
            FROM expense
            WHERE group_id = :group_id
            ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":group_id", &group_id)], map_row_to_expense)?
        .map(|maybe_expense| -> Result<Expense, Error> {
            let mut expense = maybe_expense?;
            expense.splits = splits_by_expense.remove(&expense.id).unwrap_or_default();
            Ok(expense)
        })
        .collect()
}

/// Get the ID of the group an expense belongs to.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist.
pub fn get_expense_group_id(expense_id: ExpenseId, connection: &Connection) -> Result<GroupId, Error> {
    connection
        .query_row(
            "SELECT group_id FROM expense WHERE id = ?1",
            [expense_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Map a row of `id, amount, description, group_id, created_by, created_at`
/// to an expense without its splits.
pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        group_id: row.get(3)?,
        created_by: row.get(4)?,
        created_at: row.get(5)?,
        splits: Vec::new(),
    })
}

fn map_row_to_split(row: &Row, offset: usize) -> Result<Split, rusqlite::Error> {
    Ok(Split {
        user_id: row.get(offset)?,
        user_name: row.get(offset + 1)?,
        amount: row.get(offset + 2)?,
        percentage: row.get(offset + 3)?,
    })
}
