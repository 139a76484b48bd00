//! Alert system for displaying error messages to users.
//!
//! Alerts are returned as HTML fragments that replace the `#alert-container`
//! element out-of-band, which is also the target of `hx-target-error`.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to show at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::ErrorSimple { message } => (message, String::new()),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow"
                    onclick="this.remove()"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p data-alert-details="true" { (details) }
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
