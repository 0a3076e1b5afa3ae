//! Page handlers.
//!
//! Each handler turns one request into at most one `Action`, runs it
//! through `session_service::update`, carries out the resulting effect and
//! renders the new state:
//! - GET / - Current view
//! - POST /login - Log in
//! - POST /logout - Log out and drop the session
//! - GET /expenses/new - Entry form
//! - POST /expenses - Recompute the total (`intent=preview`) or save (`intent=save`)
//! - GET /dashboard - Dashboard

use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::session::{SESSION_COOKIE, SessionContext},
    services::{
        expense_form::FormInput,
        session_service::{self, Action, Effect, Route, SessionState, Transition},
    },
    state::{AppState, Session, today},
    views::{html, screen},
};

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Expense form body: the fields plus which button was pressed.
#[derive(Debug, Deserialize)]
pub struct ExpenseSubmission {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(flatten)]
    pub fields: FormInput,
}

/// Run `action` against the session and carry out its effect.
async fn apply(
    app: &AppState,
    context: &SessionContext,
    session: &mut Session,
    action: Action,
) -> Result<(), AppError> {
    let current = std::mem::replace(&mut session.state, SessionState::new(today()));
    let Transition { state, effect } = session_service::update(current, action, &app.credentials);
    session.state = state;

    match effect {
        Some(Effect::Append(record)) => {
            if let Err(err) = session.store.append(record).await {
                // The save did not happen; do not announce it on the next page
                session.state.notice = None;
                return Err(err);
            }
            tracing::info!(
                user = session.state.username().unwrap_or_default(),
                "expense recorded"
            );
        }
        Some(Effect::EndSession) => {
            app.sessions.remove(&context.id);
            tracing::debug!(session = %context.id, "session ended");
        }
        None => {}
    }

    Ok(())
}

/// Render the session's current view.
async fn render(session: &Session) -> Result<Html<String>, AppError> {
    let records = if session.state.shows_dashboard() {
        session.store.all().await?
    } else {
        Vec::new()
    };

    Ok(Html(html::page(&screen::screen(&session.state, records))))
}

async fn act_and_render(
    app: &AppState,
    context: &SessionContext,
    action: Action,
) -> Result<Html<String>, AppError> {
    let mut session = context.handle.lock().await;
    apply(app, context, &mut session, action).await?;
    render(&session).await
}

/// Show the current view: login when unauthenticated, else the selected route.
pub async fn index(
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    let session = context.handle.lock().await;
    render(&session).await
}

/// Verify credentials. Failure re-renders the login page with an inline error.
pub async fn login(
    State(app): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Form(form): Form<LoginForm>,
) -> Result<Html<String>, AppError> {
    let action = Action::Login {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    act_and_render(&app, &context, action).await
}

/// Log out: the session and its cookie are discarded, then back to the login page.
pub async fn logout(
    State(app): State<AppState>,
    Extension(context): Extension<SessionContext>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    {
        let mut session = context.handle.lock().await;
        apply(&app, &context, &mut session, Action::Logout).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/")))
}

pub async fn new_expense(
    State(app): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    act_and_render(&app, &context, Action::Navigate(Route::EntryForm)).await
}

/// Preview or save the posted expense.
///
/// Anything other than `intent=preview` counts as a save, matching the
/// form's default submit button.
pub async fn submit_expense(
    State(app): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Form(submission): Form<ExpenseSubmission>,
) -> Result<Html<String>, AppError> {
    let action = match submission.intent.as_deref() {
        Some("preview") => Action::EditForm(submission.fields),
        _ => Action::Submit(submission.fields),
    };
    act_and_render(&app, &context, action).await
}

pub async fn dashboard(
    State(app): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    act_and_render(&app, &context, Action::Navigate(Route::Dashboard)).await
}
