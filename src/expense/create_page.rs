//! The page for adding an expense to a group.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    group::{Group, GroupId, Member, get_group, get_members, require_membership},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CHECKBOX_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, dollar_input_styles,
    },
    identity::Viewer,
    navigation::NavBar,
};

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct NewExpensePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the form for adding an expense to a group.
pub async fn get_new_expense_page(
    Path(group_id): Path<GroupId>,
    State(state): State<NewExpensePageState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    require_membership(group_id, &viewer.id, &connection)?;

    let group = get_group(group_id, &connection)?;
    let members = get_members(group_id, &connection)
        .inspect_err(|error| tracing::error!("could not get members of group {group_id}: {error}"))?;

    Ok(new_expense_view(&group, &members, &viewer).into_response())
}

fn new_expense_view(group: &Group, members: &[Member], viewer: &Viewer) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW, &viewer.name).into_html();
    let group_url = format_endpoint(endpoints::GROUP_VIEW, group.id);
    let create_expense_url = format_endpoint(endpoints::POST_EXPENSE, group.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4"
            {
                h1 class="text-xl font-bold"
                {
                    "New expense in "
                    a href=(group_url) class=(LINK_STYLE) { (group.name) }
                }

                form
                    hx-post=(create_expense_url)
                    hx-target-error="#alert-container"
                    class="w-full space-y-4 md:space-y-6"
                {
                    div
                    {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                        div class="input-wrapper"
                        {
                            input
                                id="amount"
                                type="number"
                                name="amount"
                                step="0.01"
                                min="0"
                                placeholder="0.00"
                                required
                                autofocus
                                class=(FORM_TEXT_INPUT_STYLE);
                        }
                    }

                    div
                    {
                        label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                        input
                            id="description"
                            type="text"
                            name="description"
                            placeholder="e.g. Groceries"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="split_percentage" class=(FORM_LABEL_STYLE)
                        {
                            "Percentage to split"
                        }

                        input
                            id="split_percentage"
                            type="number"
                            name="split_percentage"
                            step="any"
                            min="0"
                            max="100"
                            value="100"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    fieldset
                    {
                        legend class=(FORM_LABEL_STYLE) { "Split with" }

                        div class="flex flex-col gap-2"
                        {
                            @for member in members {
                                label class="flex items-center gap-2 text-sm"
                                {
                                    input
                                        type="checkbox"
                                        name="participants"
                                        value=(member.user_id)
                                        checked
                                        class=(FORM_CHECKBOX_STYLE);

                                    (member.name)
                                }
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
                }
            }
        }
    };

    base("New Expense", &[dollar_input_styles()], &content)
}
