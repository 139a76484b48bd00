//! Endpoint for adding people to a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    group::core::{GroupId, Member, add_member, require_membership},
    identity::Viewer,
};

/// The state needed for adding a member to a group.
#[derive(Debug, Clone)]
pub struct AddMemberState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddMemberState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for adding a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberForm {
    /// The new member's user ID at the identity provider.
    pub user_id: String,
    /// An optional display name.
    #[serde(default)]
    pub name: String,
}

/// Add a person to a group the viewer belongs to, then reload the group page.
pub async fn add_member_endpoint(
    Path(group_id): Path<GroupId>,
    State(state): State<AddMemberState>,
    Extension(viewer): Extension<Viewer>,
    Form(form): Form<MemberForm>,
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

    let member = Member {
        user_id: form.user_id,
        name: form.name,
    };

    match add_member(group_id, &member, &connection) {
        Ok(()) => (
            HxRedirect(format_endpoint(endpoints::GROUP_VIEW, group_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            if !error.is_invalid_input() {
                tracing::error!(
                    "An unexpected error occurred while adding a member to group {group_id}: {error}"
                );
            }

            error.into_alert_response()
        }
    }
}
