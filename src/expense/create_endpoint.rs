//! Endpoint for adding an expense to a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    expense::{
        create::{ExpenseRequest, add_expense},
        split::Participant,
    },
    group::{GroupId, Member, get_members, require_membership},
    identity::Viewer,
};

/// The state needed for adding an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for a new expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub amount: f64,
    pub description: String,
    pub split_percentage: f64,
    /// The user IDs of the members sharing the expense.
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Record an expense paid by the viewer and go back to the group page.
pub async fn create_expense_endpoint(
    Path(group_id): Path<GroupId>,
    State(state): State<CreateExpenseState>,
    Extension(viewer): Extension<Viewer>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = require_membership(group_id, &viewer.id, &connection)
        .and_then(|_| get_members(group_id, &connection))
        .and_then(|members| resolve_participants(&form.participants, &members))
        .and_then(|participants| {
            let request = ExpenseRequest {
                amount: form.amount,
                description: form.description.trim().to_owned(),
                group_id,
                split_percentage: form.split_percentage,
                participants,
                created_by: viewer.id.clone(),
            };

            add_expense(&request, &connection)
        });

    match result {
        Ok(expense) => {
            tracing::info!(
                "{} added expense {} to group {group_id}",
                viewer.id,
                expense.id
            );

            (
                HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) if error.is_invalid_input() || error == Error::NotGroupMember => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while adding an expense: {error}");
            error.into_alert_response()
        }
    }
}

/// Look up the display name of each participant in the group's members.
///
/// Repeated IDs are only counted once, in the position they first appear.
fn resolve_participants(
    user_ids: &[String],
    members: &[Member],
) -> Result<Vec<Participant>, Error> {
    let mut participants: Vec<Participant> = Vec::with_capacity(user_ids.len());

    for user_id in user_ids {
        if participants.iter().any(|participant| &participant.id == user_id) {
            continue;
        }

        let member = members
            .iter()
            .find(|member| &member.user_id == user_id)
            .ok_or_else(|| Error::UnknownParticipant(user_id.clone()))?;

        participants.push(Participant {
            id: member.user_id.clone(),
            name: member.name.clone(),
        });
    }

    Ok(participants)
}
