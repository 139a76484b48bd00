//! Identifies the user making a request.
//!
//! Users sign in with an external identity provider that sits in front of the
//! app as a reverse proxy. The proxy forwards the user's ID, and optionally
//! their display name, in request headers that the app trusts.

use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error};

/// The default header carrying the user ID.
pub const DEFAULT_ID_HEADER: &str = "x-remote-user";
/// The default header carrying the user's display name.
pub const DEFAULT_NAME_HEADER: &str = "x-remote-name";

/// The user making the current request.
///
/// Route handlers behind [identity_guard] or [identity_guard_hx] can use the
/// function argument `Extension(viewer): Extension<Viewer>` to receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// The user ID issued by the identity provider.
    pub id: String,
    /// The display name, which falls back to the user ID.
    pub name: String,
}

/// The names of the headers set by the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    /// The header carrying the user ID.
    pub id_header: HeaderName,
    /// The header carrying the user's display name.
    pub name_header: HeaderName,
}

impl Default for IdentityHeaders {
    fn default() -> Self {
        Self {
            id_header: HeaderName::from_static(DEFAULT_ID_HEADER),
            name_header: HeaderName::from_static(DEFAULT_NAME_HEADER),
        }
    }
}

impl FromRef<AppState> for IdentityHeaders {
    fn from_ref(state: &AppState) -> Self {
        state.identity_headers.clone()
    }
}

impl IdentityHeaders {
    /// Read the viewer from `headers`.
    ///
    /// Returns `None` if the ID header is missing, blank or not valid UTF-8.
    pub fn get_viewer(&self, headers: &HeaderMap) -> Option<Viewer> {
        let id = headers
            .get(&self.id_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())?;

        let name = headers
            .get(&self.name_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(id);

        Some(Viewer {
            id: id.to_owned(),
            name: name.to_owned(),
        })
    }
}

#[inline]
async fn identity_guard_internal(
    headers: IdentityHeaders,
    mut request: Request,
    next: Next,
    get_rejection: impl Fn(Error) -> Response,
) -> Response {
    let Some(viewer) = headers.get_viewer(request.headers()) else {
        tracing::warn!(
            "Rejected request to {} without the {} header.",
            request.uri().path(),
            headers.id_header
        );
        return get_rejection(Error::MissingIdentity);
    };

    request.extensions_mut().insert(viewer);

    next.run(request).await
}

/// Middleware function that reads the viewer from the identity headers.
///
/// The viewer is placed into the request and the request is executed normally
/// if the ID header is present, otherwise a 401 page is returned.
pub async fn identity_guard(
    State(headers): State<IdentityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    identity_guard_internal(headers, request, next, |error| error.into_response()).await
}

/// Middleware function that reads the viewer from the identity headers.
///
/// Same as [identity_guard] except that the rejection is an alert fragment for
/// HTMX requests.
pub async fn identity_guard_hx(
    State(headers): State<IdentityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    identity_guard_internal(headers, request, next, |error| {
        error.into_alert_response()
    })
    .await
}
