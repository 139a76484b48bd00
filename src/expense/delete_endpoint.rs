use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    expense::{
        core::{ExpenseId, get_expense_group_id},
        delete::delete_expense,
    },
    group::require_membership,
    identity::Viewer,
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, redirects to the expense's group
/// page on success.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<DeleteExpenseState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let group_id = match get_expense_group_id(expense_id, &connection) {
        Ok(group_id) => group_id,
        Err(Error::NotFound) => return Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("could not look up the group of expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    match require_membership(group_id, &viewer.id, &connection)
        .and_then(|_| delete_expense(expense_id, &connection))
    {
        Ok(()) => {
            tracing::info!("{} deleted expense {expense_id}", viewer.id);

            (
                HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::NotGroupMember | Error::DeleteMissingExpense)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
