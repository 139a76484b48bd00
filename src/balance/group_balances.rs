//! Loads a group's expenses and balances for display and for the JSON API.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    balance::core::{Balance, compute_balances},
    expense::{Expense, get_group_expenses},
    group::{GroupId, require_membership},
    identity::Viewer,
};

/// A group's expenses, newest first, and the balances derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupBalances {
    /// The group's expenses with their splits.
    pub expenses: Vec<Expense>,
    /// One balance per participant, sorted by participant ID.
    pub balances: Vec<Balance>,
}

/// Load the expenses of a group and net them into balances for `viewer_id`.
///
/// Store errors are logged and result in empty expenses and balances, so the
/// caller can always render something.
pub fn get_group_balances(
    group_id: GroupId,
    viewer_id: &str,
    connection: &Connection,
) -> GroupBalances {
    match get_group_expenses(group_id, connection) {
        Ok(expenses) => {
            let balances = compute_balances(&expenses, viewer_id);

            GroupBalances { expenses, balances }
        }
        Err(error) => {
            tracing::error!("Could not load the expenses for group {group_id}: {error}");
            GroupBalances::default()
        }
    }
}

/// The state needed for the group balances API.
#[derive(Debug, Clone)]
pub struct GroupBalancesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GroupBalancesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return the expenses and balances of a group as JSON.
pub async fn get_group_balances_endpoint(
    Path(group_id): Path<GroupId>,
    State(state): State<GroupBalancesState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = require_membership(group_id, &viewer.id, &connection) {
        return error.into_alert_response();
    }

    Json(get_group_balances(group_id, &viewer.id, &connection)).into_response()
}
