//! Splitteur is a web app for splitting shared expenses within a group.
//!
//! Members of a group record who paid for what and who shares the cost, and
//! the app works out who owes whom.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod balance;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod group;
mod html;
mod identity;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use balance::{Balance, GroupBalances, compute_balances, get_group_balances, net_totals};
pub use db::initialize as initialize_db;
pub use expense::{
    Expense, ExpenseRequest, NewSplit, Participant, Split, add_expense, allocate, delete_expense,
    delete_group_expenses, get_group_expenses,
};
pub use group::{Group, Member, add_member, create_group, get_members};
pub use identity::{IdentityHeaders, Viewer};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense must be split between at least one participant.
    #[error("an expense needs at least one participant")]
    NoParticipants,

    /// The expense amount was negative, infinite or NaN.
    #[error("{0} is not a valid expense amount")]
    InvalidAmount(f64),

    /// The split percentage was outside of 0-100%, infinite or NaN.
    #[error("{0} is not a valid split percentage, it must be between 0 and 100")]
    InvalidSplitPercentage(f64),

    /// A participant ID in an expense did not match a member of the group.
    #[error("\"{0}\" is not a member of this group")]
    UnknownParticipant(String),

    /// An empty string was used to create a group name.
    #[error("Group name cannot be empty")]
    EmptyGroupName,

    /// An empty string was used as a member's user ID.
    #[error("Member ID cannot be empty")]
    EmptyMemberId,

    /// The request did not carry the identity headers set by the
    /// authenticating proxy.
    #[error("the request is missing the user identity")]
    MissingIdentity,

    /// The user tried to access a group they do not belong to.
    #[error("you are not a member of this group")]
    NotGroupMember,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to delete a group that does not exist
    #[error("tried to delete a group that is not in the database")]
    DeleteMissingGroup,
}

impl Error {
    /// Whether the error was caused by a malformed request that the client
    /// can correct, as opposed to a failure on the server.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::NoParticipants
                | Error::InvalidAmount(_)
                | Error::InvalidSplitPercentage(_)
                | Error::UnknownParticipant(_)
                | Error::EmptyGroupName
                | Error::EmptyMemberId
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::MissingIdentity => InternalServerError {
                status_code: StatusCode::UNAUTHORIZED,
                header: "401",
                description: "Who are you?",
                fix: "Sign in through your identity provider and try again.",
            }
            .into_response(),
            Error::NotGroupMember => InternalServerError {
                status_code: StatusCode::FORBIDDEN,
                header: "403",
                description: "You do not have access to this group",
                fix: "Ask a member of the group to add you.",
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            error if error.is_invalid_input() => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid request".to_owned(),
                    details: error.to_string(),
                },
            )
                .into_response(),
            Error::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Not signed in".to_owned(),
                    details: "Sign in through your identity provider and try again.".to_owned(),
                },
            )
                .into_response(),
            Error::NotGroupMember => (
                StatusCode::FORBIDDEN,
                Alert::ErrorSimple {
                    message: "You do not have access to this group".to_owned(),
                },
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found".to_owned(),
                },
            )
                .into_response(),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            Error::DeleteMissingGroup => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete group".to_owned(),
                    details: "The group could not be found. \
                    Try refreshing the page to see if the group has already been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            )
                .into_response(),
        }
    }
}
