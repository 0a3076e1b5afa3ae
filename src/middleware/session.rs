//! Session cookie middleware.
//!
//! This middleware runs before every page handler to:
//! 1. Read the session id from the `sid` cookie
//! 2. Look the session up in the registry, or start a fresh unregistered one
//! 3. Inject a `SessionContext` into the request extensions
//! 4. Register a fresh session and set its cookie only once it has logged in
//!
//! Anonymous requests never touch the registry, so it only holds sessions
//! that passed a login.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::state::{AppState, SessionHandle};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Session attached to the current request.
///
/// Handlers extract it with `Extension<SessionContext>`.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    pub handle: SessionHandle,
}

/// Build the session cookie for `id`.
pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Resolve or create the session for this request.
///
/// Unknown or malformed cookie values start a new session rather than
/// failing the request. A new session is kept only if the handler left it
/// authenticated.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .and_then(|id| state.sessions.get(&id).map(|handle| (id, handle)));

    let (context, created) = match existing {
        Some((id, handle)) => (SessionContext { id, handle }, false),
        None => {
            let id = Uuid::new_v4();
            (SessionContext { id, handle: state.new_session() }, true)
        }
    };

    let SessionContext { id, handle } = context.clone();
    request.extensions_mut().insert(context);
    let response = next.run(request).await;

    if created && handle.lock().await.state.is_authenticated() {
        state.sessions.insert(id, handle);
        tracing::debug!(session = %id, "session registered");
        (jar.add(session_cookie(id)), response).into_response()
    } else {
        response
    }
}
