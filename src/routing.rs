//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    balance::get_group_balances_endpoint,
    endpoints,
    expense::{create_expense_endpoint, delete_expense_endpoint, get_new_expense_page},
    group::{
        add_member_endpoint, create_group_endpoint, delete_group_endpoint, get_group_page,
        get_groups_page,
    },
    identity::{identity_guard, identity_guard_hx},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(
        endpoints::INTERNAL_ERROR_VIEW,
        get(get_internal_server_error_page),
    );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::GROUPS_VIEW, get(get_groups_page))
        .route(endpoints::GROUP_VIEW, get(get_group_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_new_expense_page))
        .layer(middleware::from_fn_with_state(state.clone(), identity_guard));

    // Requests from HTMX need the rejection as an alert so it can be swapped into the page.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::POST_GROUP, post(create_group_endpoint))
            .route(endpoints::DELETE_GROUP, delete(delete_group_endpoint))
            .route(endpoints::POST_MEMBER, post(add_member_endpoint))
            .route(endpoints::POST_EXPENSE, post(create_expense_endpoint))
            .route(endpoints::DELETE_EXPENSE, delete(delete_expense_endpoint))
            .route(
                endpoints::GROUP_BALANCES_API,
                get(get_group_balances_endpoint),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                identity_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the groups page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::GROUPS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        identity::{DEFAULT_ID_HEADER, DEFAULT_NAME_HEADER, IdentityHeaders},
        routing::build_router,
    };

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, IdentityHeaders::default()).unwrap();

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn pages_require_identity() {
        let server = get_test_server();

        let response = server.get(endpoints::GROUPS_VIEW).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_requires_identity() {
        let server = get_test_server();

        let response = server
            .post(endpoints::POST_GROUP)
            .form(&[("name", "Flat")])
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn error_page_does_not_require_identity() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn expense_flow_produces_balances() {
        let server = get_test_server();

        server
            .post(endpoints::POST_GROUP)
            .add_header(DEFAULT_ID_HEADER, "alice")
            .add_header(DEFAULT_NAME_HEADER, "Alice")
            .form(&[("name", "Flat")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        // The first group gets the first row ID.
        let group_id = 1;

        server
            .post(&format_endpoint(endpoints::POST_MEMBER, group_id))
            .add_header(DEFAULT_ID_HEADER, "alice")
            .form(&[("user_id", "bob"), ("name", "Bob")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        server
            .post(&format_endpoint(endpoints::POST_EXPENSE, group_id))
            .add_header(DEFAULT_ID_HEADER, "alice")
            .form(&[
                ("amount", "80"),
                ("description", "Power bill"),
                ("split_percentage", "100"),
                ("participants", "alice"),
                ("participants", "bob"),
            ])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server
            .get(&format_endpoint(endpoints::GROUP_BALANCES_API, group_id))
            .add_header(DEFAULT_ID_HEADER, "bob")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["expenses"].as_array().map(Vec::len), Some(1));
        let balances = body["balances"].as_array().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0]["name"], "alice");
        assert_eq!(balances[0]["amount"], 40.0);
        assert_eq!(balances[0]["owes"], false);
        assert_eq!(balances[1]["name"], "You");
        assert_eq!(balances[1]["amount"], 40.0);
        assert_eq!(balances[1]["owes"], true);
    }
}
