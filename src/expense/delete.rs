//! Removing expenses.

use rusqlite::Connection;

use crate::{Error, expense::core::ExpenseId, group::GroupId};

/// Delete an expense and its splits.
///
/// Splits are removed by the foreign key cascade, see
/// [initialize](crate::db::initialize).
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Delete every expense in a group along with their splits.
///
/// Returns the number of expenses deleted.
pub fn delete_group_expenses(group_id: GroupId, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM expense WHERE group_id = ?1", [group_id])
        .map_err(Error::from)
}
