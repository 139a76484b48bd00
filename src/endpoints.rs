//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/groups/{group_id}', use [format_endpoint].

/// The root route which redirects to the groups page.
pub const ROOT: &str = "/";
/// The page listing the groups the user belongs to.
pub const GROUPS_VIEW: &str = "/groups";
/// The page for a single group showing its balances and expenses.
pub const GROUP_VIEW: &str = "/groups/{group_id}";
/// The page for adding an expense to a group.
pub const NEW_EXPENSE_VIEW: &str = "/groups/{group_id}/expenses/new";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create a group.
pub const POST_GROUP: &str = "/api/groups";
/// The route to delete a group and all of its expenses.
pub const DELETE_GROUP: &str = "/api/groups/{group_id}";
/// The route to add a member to a group.
pub const POST_MEMBER: &str = "/api/groups/{group_id}/members";
/// The route to add an expense to a group.
pub const POST_EXPENSE: &str = "/api/groups/{group_id}/expenses";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to get the expenses and balances of a group as JSON.
pub const GROUP_BALANCES_API: &str = "/api/groups/{group_id}/balances";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/groups/{group_id}', '{group_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::GROUPS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::GROUP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);

        assert_endpoint_is_valid_uri(endpoints::POST_GROUP);
        assert_endpoint_is_valid_uri(endpoints::DELETE_GROUP);
        assert_endpoint_is_valid_uri(endpoints::POST_MEMBER);
        assert_endpoint_is_valid_uri(endpoints::POST_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::GROUP_BALANCES_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::NEW_EXPENSE_VIEW, 42);

        assert_eq!(formatted_path, "/groups/42/expenses/new");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
