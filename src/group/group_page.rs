//! The page for a single group: who owes what, the expenses and the members.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    balance::{Balance, get_group_balances},
    endpoints::{self, format_endpoint},
    expense::Expense,
    group::core::{Group, GroupId, Member, get_group, get_members, require_membership},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CHIP_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, format_percentage,
    },
    identity::Viewer,
    navigation::NavBar,
};

/// Balances smaller than half a cent are shown as settled.
const SETTLED_THRESHOLD: f64 = 0.005;

/// The state needed for the [get_group_page](crate::group::get_group_page) route handler.
#[derive(Debug, Clone)]
pub struct GroupPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GroupPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for a group the viewer belongs to.
pub async fn get_group_page(
    Path(group_id): Path<GroupId>,
    State(state): State<GroupPageState>,
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
    let group_balances = get_group_balances(group_id, &viewer.id, &connection);

    Ok(group_view(
        &group,
        &members,
        &group_balances.balances,
        &group_balances.expenses,
        &viewer,
    )
    .into_response())
}

/// Balances grouped by how they are shown on the page.
#[derive(Debug, Default, PartialEq)]
struct BalanceSections<'a> {
    needs_to_pay: Vec<&'a Balance>,
    to_receive: Vec<&'a Balance>,
    settled_up: Vec<&'a Balance>,
}

fn sort_balances(balances: &[Balance]) -> BalanceSections<'_> {
    let mut sections = BalanceSections::default();

    for balance in balances {
        if balance.amount < SETTLED_THRESHOLD {
            sections.settled_up.push(balance);
        } else if balance.owes {
            sections.needs_to_pay.push(balance);
        } else {
            sections.to_receive.push(balance);
        }
    }

    sections
}

fn group_view(
    group: &Group,
    members: &[Member],
    balances: &[Balance],
    expenses: &[Expense],
    viewer: &Viewer,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::GROUP_VIEW, &viewer.name).into_html();
    let names: HashMap<&str, &str> = members
        .iter()
        .map(|member| (member.user_id.as_str(), member.name.as_str()))
        .collect();
    // Balances use the viewer label or raw user IDs.
    let display_name = |name: &'_ str| -> String {
        names.get(name).copied().unwrap_or(name).to_owned()
    };
    let sections = sort_balances(balances);
    let new_expense_url = format_endpoint(endpoints::NEW_EXPENSE_VIEW, group.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-8"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { (group.name) }

                    a href=(new_expense_url) class=(LINK_STYLE) { "Add Expense" }
                }

                section class="space-y-4" data-balances="true"
                {
                    h2 class="text-lg font-semibold" { "Balances" }

                    @if balances.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "No expenses yet, so nobody owes anything."
                        }
                    }

                    @if !sections.needs_to_pay.is_empty() {
                        (balance_list_view("Needs to pay", "needs-to-pay", &sections.needs_to_pay, &display_name))
                    }

                    @if !sections.to_receive.is_empty() {
                        (balance_list_view("To receive", "to-receive", &sections.to_receive, &display_name))
                    }

                    @if !sections.settled_up.is_empty() {
                        div data-section="settled-up"
                        {
                            h3 class="font-medium" { "Settled up" }

                            ul class="flex flex-wrap gap-2 mt-2"
                            {
                                @for balance in &sections.settled_up {
                                    li class=(CHIP_STYLE) { (display_name(&balance.name)) }
                                }
                            }
                        }
                    }
                }

                (expenses_view(expenses, &display_name))

                (members_view(group.id, members))

                div class="pt-4 border-t border-gray-200 dark:border-gray-700"
                {
                    button
                        type="button"
                        hx-delete=(format_endpoint(endpoints::DELETE_GROUP, group.id))
                        hx-confirm={
                            "Are you sure you want to delete the group '" (group.name)
                            "' and all of its expenses? This cannot be undone."
                        }
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete Group"
                    }
                }
            }
        }
    );

    base(&group.name, &[], &content)
}

fn balance_list_view(
    title: &str,
    section_id: &str,
    balances: &[&Balance],
    display_name: &impl Fn(&str) -> String,
) -> Markup {
    html!(
        div data-section=(section_id)
        {
            h3 class="font-medium" { (title) }

            ul class="mt-2 space-y-1"
            {
                @for balance in balances {
                    li class="flex justify-between rounded bg-white px-4 py-2 shadow-sm dark:bg-gray-800"
                    {
                        span { (display_name(&balance.name)) }
                        span
                            class=(if balance.owes { "tabular-nums text-red-600 dark:text-red-400" } else { "tabular-nums text-green-600 dark:text-green-400" })
                        {
                            (format_currency(balance.amount))
                        }
                    }
                }
            }
        }
    )
}

fn expenses_view(expenses: &[Expense], display_name: &impl Fn(&str) -> String) -> Markup {
    let table_row = |expense: &Expense| {
        html!(
            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    (expense.description)
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_currency(expense.amount))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (display_name(&expense.created_by))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(expense.created_at.date()) { (expense.created_at.date()) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex flex-wrap gap-1"
                    {
                        @for split in &expense.splits {
                            span
                                class=(CHIP_STYLE)
                                title=(format_currency(split.amount))
                            {
                                (split.user_name) " " (format_percentage(split.percentage))
                            }
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    button
                        type="button"
                        hx-delete=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                        hx-confirm={
                            "Are you sure you want to delete the expense '"
                            (expense.description) "'? This cannot be undone."
                        }
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    html!(
        section class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Expenses" }

            div class="w-full overflow-x-auto dark:bg-gray-800"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class="px-6 py-3 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Paid by" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Split with" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for expense in expenses {
                            (table_row(expense))
                        }

                        @if expenses.is_empty() {
                            tr
                            {
                                td
                                    colspan="6"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No expenses yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn members_view(group_id: GroupId, members: &[Member]) -> Markup {
    html!(
        section class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Members" }

            ul class="flex flex-wrap gap-2" data-members="true"
            {
                @for member in members {
                    li class=(CHIP_STYLE) title=(member.user_id) { (member.name) }
                }
            }

            form
                hx-post=(format_endpoint(endpoints::POST_MEMBER, group_id))
                hx-target-error="#alert-container"
                class="grid gap-4 sm:grid-cols-3 items-end"
            {
                div
                {
                    label for="user_id" class=(FORM_LABEL_STYLE) { "User ID" }

                    input
                        id="user_id"
                        type="text"
                        name="user_id"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Display name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="Optional"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Member" }
            }
        }
    )
}


#[cfg(test)]
mod group_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        db::initialize,
        endpoints::{self, format_endpoint},
        expense::{ExpenseRequest, Participant, add_expense},
        group::{
            core::{Member, add_member, create_group},
            group_page::{GroupPageState, get_group_page},
        },
        identity::Viewer,
        test_utils::{assert_hx_endpoint, assert_valid_html, parse_html_document},
    };

    fn member(user_id: &str, name: &str) -> Member {
        Member {
            user_id: user_id.to_owned(),
            name: name.to_owned(),
        }
    }

    fn viewer(id: &str) -> Viewer {
        Viewer {
            id: id.to_owned(),
            name: id.to_owned(),
        }
    }

    /// A group where Alice paid 100 for herself and Bob, and Carol has no
    /// expenses.
    fn get_state() -> (GroupPageState, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let group = create_group("Flat", &member("alice", "Alice"), &connection).unwrap();
        add_member(group.id, &member("bob", "Bob"), &connection).unwrap();
        add_member(group.id, &member("carol", "Carol"), &connection).unwrap();
        add_expense(
            &ExpenseRequest {
                amount: 100.0,
                description: "Groceries".to_owned(),
                group_id: group.id,
                split_percentage: 100.0,
                participants: vec![
                    Participant {
                        id: "alice".to_owned(),
                        name: "Alice".to_owned(),
                    },
                    Participant {
                        id: "bob".to_owned(),
                        name: "Bob".to_owned(),
                    },
                ],
                created_by: "alice".to_owned(),
            },
            &connection,
        )
        .unwrap();

        (
            GroupPageState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            group.id,
        )
    }

    fn section_text(html: &Html, section: &str) -> String {
        html.select(&Selector::parse(&format!("[data-section='{section}']")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("Could not find section {section}"))
            .text()
            .collect()
    }

    #[tokio::test]
    async fn shows_balances_by_section() {
        let (state, group_id) = get_state();

        let response = get_group_page(Path(group_id), State(state), Extension(viewer("bob")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let needs_to_pay = section_text(&html, "needs-to-pay");
        assert!(needs_to_pay.contains("You"), "got {needs_to_pay:?}");
        assert!(needs_to_pay.contains("$50"), "got {needs_to_pay:?}");
        let to_receive = section_text(&html, "to-receive");
        assert!(to_receive.contains("Alice"), "got {to_receive:?}");
        assert!(
            html.select(&Selector::parse("[data-section='settled-up']").unwrap())
                .next()
                .is_none(),
            "Carol has no expenses so has no balance"
        );
    }

    #[tokio::test]
    async fn lists_expenses_with_delete_buttons() {
        let (state, group_id) = get_state();

        let response = get_group_page(Path(group_id), State(state), Extension(viewer("alice")))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let rows: Vec<_> = html
            .select(&Selector::parse("tr[data-expense-id]").unwrap())
            .collect();
        assert_eq!(rows.len(), 1);
        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Groceries"));
        assert!(row_text.contains("Alice 50%"), "got {row_text:?}");
        let delete_button = rows[0]
            .select(&Selector::parse("button").unwrap())
            .next()
            .expect("Could not find delete button");
        let expense_id: i64 = rows[0]
            .value()
            .attr("data-expense-id")
            .unwrap()
            .parse()
            .unwrap();
        assert_hx_endpoint(
            &delete_button,
            &format_endpoint(endpoints::DELETE_EXPENSE, expense_id),
            "hx-delete",
        );
    }

    #[tokio::test]
    async fn shows_add_member_form() {
        let (state, group_id) = get_state();

        let response = get_group_page(Path(group_id), State(state), Extension(viewer("alice")))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::POST_MEMBER, group_id),
            "hx-post",
        );
        let members = html
            .select(&Selector::parse("[data-members] li").unwrap())
            .map(|member| member.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(members, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn non_member_is_forbidden() {
        let (state, group_id) = get_state();

        let response = get_group_page(Path(group_id), State(state), Extension(viewer("mallory")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
