//! Expenses paid by one member of a group and shared with others.
//!
//! This module contains:
//! - The [Expense] and [Split] models and the functions for storing them
//! - The split allocator, [allocate], which divides an expense between its participants
//! - The page and endpoints for adding and deleting expenses

mod core;
mod create;
mod create_endpoint;
mod create_page;
mod delete;
mod delete_endpoint;
mod split;

pub use core::{Expense, ExpenseId, Split, create_expense_tables, get_group_expenses};
pub use create::{ExpenseRequest, add_expense};
pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_new_expense_page;
pub use delete::{delete_expense, delete_group_expenses};
pub use delete_endpoint::delete_expense_endpoint;
pub use split::{NewSplit, Participant, allocate};
