//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, expense::create_expense_tables, group::create_group_tables};

/// Create the tables for the groups, expenses and splits.
///
/// Foreign keys are enabled on `connection` so that deleting a group also
/// deletes its members, expenses and splits. This is safe to call on a
/// database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_group_tables(&transaction)?;
    create_expense_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}
