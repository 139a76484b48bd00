//! Group creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    group::core::{Member, create_group},
    identity::Viewer,
};

/// The state needed for creating a group.
#[derive(Debug, Clone)]
pub struct CreateGroupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGroupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupForm {
    pub name: String,
}

/// Create a group with the viewer as its first member and redirect to it.
pub async fn create_group_endpoint(
    State(state): State<CreateGroupState>,
    Extension(viewer): Extension<Viewer>,
    Form(form): Form<GroupForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let creator = Member {
        user_id: viewer.id,
        name: viewer.name,
    };

    match create_group(&form.name, &creator, &connection) {
        Ok(group) => {
            tracing::info!("{} created group {}", creator.user_id, group.id);

            (
                HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group.id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) if error.is_invalid_input() => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a group: {error}");
            error.into_alert_response()
        }
    }
}
