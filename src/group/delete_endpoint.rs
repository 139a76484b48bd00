//! Group deletion endpoint.

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
    AppState, Error, endpoints,
    expense::delete_group_expenses,
    group::core::{GroupId, delete_group, require_membership},
    identity::Viewer,
};

/// The state needed for deleting a group.
#[derive(Debug, Clone)]
pub struct DeleteGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a group with its expenses and memberships, then go back to the
/// groups page.
pub async fn delete_group_endpoint(
    Path(group_id): Path<GroupId>,
    State(state): State<DeleteGroupState>,
    Extension(viewer): Extension<Viewer>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match require_membership(group_id, &viewer.id, &connection)
        .and_then(|_| delete_group_with_expenses(group_id, &connection))
    {
        Ok(expense_count) => {
            tracing::info!(
                "{} deleted group {group_id} and its {expense_count} expenses",
                viewer.id
            );

            (
                HxRedirect(endpoints::GROUPS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::NotGroupMember | Error::DeleteMissingGroup)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting group {group_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn delete_group_with_expenses(group_id: GroupId, connection: &Connection) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    let expense_count = delete_group_expenses(group_id, &transaction)?;
    delete_group(group_id, &transaction)?;

    transaction.commit()?;

    Ok(expense_count)
}
