//! Lists the groups the viewer belongs to.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    group::core::{Group, get_groups_for_user},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    identity::Viewer,
    navigation::NavBar,
};

/// The state needed for the [get_groups_page](crate::group::get_groups_page) route handler.
#[derive(Debug, Clone)]
pub struct GroupsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GroupsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page listing the viewer's groups.
pub async fn get_groups_page(
    State(state): State<GroupsPageState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let groups = get_groups_for_user(&viewer.id, &connection)
        .inspect_err(|error| tracing::error!("could not get groups for {}: {error}", viewer.id))?;

    Ok(groups_view(&groups, &viewer).into_response())
}

fn groups_view(groups: &[Group], viewer: &Viewer) -> Markup {
    let nav_bar = NavBar::new(endpoints::GROUPS_VIEW, &viewer.name).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-6"
            {
                h1 class="text-xl font-bold" { "Your groups" }

                ul class="space-y-2" data-group-list="true"
                {
                    @for group in groups {
                        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                        {
                            a
                                href=(format_endpoint(endpoints::GROUP_VIEW, group.id))
                                class=(LINK_STYLE)
                            {
                                (group.name)
                            }
                        }
                    }

                    @if groups.is_empty() {
                        li class="rounded border border-dashed border-gray-300 px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:text-gray-400"
                        {
                            "You are not in any groups yet. Create one below or ask a friend to add you."
                        }
                    }
                }

                (new_group_form_view())
            }
        }
    );

    base("Groups", &[], &content)
}

fn new_group_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_GROUP)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "New group"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Flatmates"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Group" }
        }
    }
}
